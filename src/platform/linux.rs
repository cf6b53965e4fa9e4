use crate::device::{Axis, Button};
use crate::error::{BridgeError, Result};
use crate::platform::VirtualController;
use evdev::uinput::VirtualDevice;
use evdev::{
    AbsInfo, AbsoluteAxisCode, AttributeSet, BusType, EventType, InputEvent, InputId, KeyCode,
    UinputAbsSetup,
};

/// Xbox 360 wired pad ids, so games pick a sensible default layout.
const VENDOR_ID: u16 = 0x045e;
const PRODUCT_ID: u16 = 0x028e;

/// uinput-backed virtual gamepad (needs write access to /dev/uinput).
pub struct UinputController {
    device: VirtualDevice,
    pending: Vec<InputEvent>,
}

fn key_code(button: Button) -> KeyCode {
    match button {
        Button::A => KeyCode::BTN_SOUTH,
        Button::B => KeyCode::BTN_EAST,
        Button::X => KeyCode::BTN_NORTH,
        Button::Y => KeyCode::BTN_WEST,
        Button::Start => KeyCode::BTN_START,
        Button::Back => KeyCode::BTN_SELECT,
        Button::Guide => KeyCode::BTN_MODE,
        Button::Up => KeyCode::BTN_DPAD_UP,
        Button::Down => KeyCode::BTN_DPAD_DOWN,
        Button::Left => KeyCode::BTN_DPAD_LEFT,
        Button::Right => KeyCode::BTN_DPAD_RIGHT,
    }
}

fn abs_code(axis: Axis) -> AbsoluteAxisCode {
    match axis {
        Axis::X => AbsoluteAxisCode::ABS_X,
        Axis::Y => AbsoluteAxisCode::ABS_Y,
    }
}

/// Wire axes are positive-up like XInput; evdev's ABS_Y is positive-down.
fn abs_value(axis: Axis, value: i16) -> i32 {
    match axis {
        Axis::X => value.into(),
        Axis::Y => value.saturating_neg().into(),
    }
}

impl UinputController {
    pub fn connect(name: &str) -> Result<Self> {
        Self::build(name).map_err(|e| {
            BridgeError::ControllerUnavailable(format!(
                "cannot create uinput device ({}). Check permissions on /dev/uinput",
                e
            ))
        })
    }

    fn build(name: &str) -> std::io::Result<Self> {
        let mut keys = AttributeSet::<KeyCode>::new();
        for button in Button::ALL {
            keys.insert(key_code(button));
        }

        let range = AbsInfo::new(0, i16::MIN.into(), i16::MAX.into(), 0, 0, 0);
        let mut builder = VirtualDevice::builder()?
            .name(name)
            .input_id(InputId::new(BusType::BUS_USB, VENDOR_ID, PRODUCT_ID, 1))
            .with_keys(&keys)?;
        for axis in Axis::ALL {
            builder = builder.with_absolute_axis(&UinputAbsSetup::new(abs_code(axis), range))?;
        }
        let device = builder.build()?;

        log::info!("Virtual uinput gamepad '{}' connected", name);
        Ok(Self {
            device,
            pending: Vec::with_capacity(Button::COUNT + Axis::ALL.len()),
        })
    }
}

impl VirtualController for UinputController {
    fn set_button(&mut self, button: Button, pressed: bool) {
        self.pending.push(InputEvent::new(
            EventType::KEY.0,
            key_code(button).0,
            i32::from(pressed),
        ));
    }

    fn set_axis(&mut self, axis: Axis, value: i16) {
        self.pending.push(InputEvent::new(
            EventType::ABSOLUTE.0,
            abs_code(axis).0,
            abs_value(axis, value),
        ));
    }

    fn submit(&mut self) -> Result<()> {
        // emit() terminates the batch with SYN_REPORT.
        let result = self.device.emit(&self.pending);
        self.pending.clear();
        result.map_err(|e| BridgeError::Publish(e.to_string()))
    }
}
