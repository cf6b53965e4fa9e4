/// Digital inputs of the virtual controller. Closed set; the wire key of each
/// variant is given by [`Button::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Start,
    Back,
    Guide,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    pub const COUNT: usize = 11;

    pub const ALL: [Button; Button::COUNT] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::Start,
        Button::Back,
        Button::Guide,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    /// Canonical (uppercase) key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::Start => "START",
            Button::Back => "BACK",
            Button::Guide => "GUIDE",
            Button::Up => "UP",
            Button::Down => "DOWN",
            Button::Left => "LEFT",
            Button::Right => "RIGHT",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Left thumbstick channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal, wire key `RX`.
    X,
    /// Vertical, wire key `RY`.
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn key(self) -> &'static str {
        match self {
            Axis::X => "RX",
            Axis::Y => "RY",
        }
    }
}

/// Session state republished to the virtual controller after every datagram.
///
/// Buttons are momentary: [`ControllerState::release_buttons`] runs before each
/// message is applied. Axes persist until a message overwrites them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    buttons: [bool; Button::COUNT],
    pub x: i16,
    pub y: i16,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons[button.index()]
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.buttons[button.index()] = pressed;
    }

    pub fn release_buttons(&mut self) {
        self.buttons = [false; Button::COUNT];
    }

    pub fn axis(&self, axis: Axis) -> i16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set_axis(&mut self, axis: Axis, value: i16) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    /// Iterate all buttons with their pressed state, in [`Button::ALL`] order.
    pub fn buttons(&self) -> impl Iterator<Item = (Button, bool)> + '_ {
        Button::ALL.iter().map(move |&b| (b, self.is_pressed(b)))
    }

    pub fn pressed(&self) -> impl Iterator<Item = Button> + '_ {
        self.buttons().filter(|&(_, p)| p).map(|(b, _)| b)
    }
}
