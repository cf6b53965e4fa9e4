//! ViGEmBus backend.
//!
//! ViGEmBus is a virtual gamepad bus driver by Nefarius that can create
//! virtual Xbox 360 controllers. Reference: https://github.com/nefarius/ViGEmBus
//! Rust crate: https://github.com/CasualX/vigem-client

use crate::device::{Axis, Button};
use crate::error::{BridgeError, Result};
use crate::platform::VirtualController;
use vigem_client::{Client, TargetId, XButtons, XGamepad, Xbox360Wired};

pub struct ViGEmController {
    target: Xbox360Wired<Client>,
    report: XGamepad,
}

impl ViGEmController {
    pub fn connect() -> Result<Self> {
        let client = Client::connect().map_err(|e| {
            BridgeError::ControllerUnavailable(format!(
                "ViGEmBus not reachable ({:?}). Install it from github.com/nefarius/ViGEmBus/releases",
                e
            ))
        })?;

        let mut target = Xbox360Wired::new(client, TargetId::XBOX360_WIRED);
        target
            .plugin()
            .map_err(|e| BridgeError::ControllerUnavailable(format!("plugin failed: {:?}", e)))?;
        target
            .wait_ready()
            .map_err(|e| BridgeError::ControllerUnavailable(format!("not ready: {:?}", e)))?;

        log::info!("Virtual Xbox 360 controller connected");
        Ok(Self {
            target,
            report: XGamepad::default(),
        })
    }
}

fn xbutton(button: Button) -> u16 {
    match button {
        Button::A => XButtons::A,
        Button::B => XButtons::B,
        Button::X => XButtons::X,
        Button::Y => XButtons::Y,
        Button::Start => XButtons::START,
        Button::Back => XButtons::BACK,
        Button::Guide => XButtons::GUIDE,
        Button::Up => XButtons::UP,
        Button::Down => XButtons::DOWN,
        Button::Left => XButtons::LEFT,
        Button::Right => XButtons::RIGHT,
    }
}

impl VirtualController for ViGEmController {
    fn set_button(&mut self, button: Button, pressed: bool) {
        let bit = xbutton(button);
        if pressed {
            self.report.buttons.raw |= bit;
        } else {
            self.report.buttons.raw &= !bit;
        }
    }

    fn set_axis(&mut self, axis: Axis, value: i16) {
        match axis {
            Axis::X => self.report.thumb_lx = value,
            Axis::Y => self.report.thumb_ly = value,
        }
    }

    fn submit(&mut self) -> Result<()> {
        self.target
            .update(&self.report)
            .map_err(|e| BridgeError::Publish(format!("{:?}", e)))
    }
}
