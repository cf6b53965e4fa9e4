use crate::config::BridgeConfig;
use crate::device::{Axis, Button, ControllerState};
use crate::error::Result;

/// A virtual gamepad exposed to the host's input subsystem.
///
/// Setters only stage values; nothing reaches the driver until `submit`.
pub trait VirtualController {
    fn set_button(&mut self, button: Button, pressed: bool);
    fn set_axis(&mut self, axis: Axis, value: i16);
    fn submit(&mut self) -> Result<()>;
}

/// Push the complete state (every button, both axes) to the controller.
pub fn publish(controller: &mut dyn VirtualController, state: &ControllerState) -> Result<()> {
    for (button, pressed) in state.buttons() {
        controller.set_button(button, pressed);
    }
    for axis in Axis::ALL {
        controller.set_axis(axis, state.axis(axis));
    }
    controller.submit()
}

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "linux")]
mod linux;

/// Create and connect the platform's virtual controller.
pub fn connect(config: &BridgeConfig) -> Result<Box<dyn VirtualController>> {
    #[cfg(target_os = "windows")]
    {
        let _ = config;
        Ok(Box::new(windows::ViGEmController::connect()?))
    }
    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(linux::UinputController::connect(&config.controller_name)?))
    }
    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        let _ = config;
        Err(crate::error::BridgeError::PlatformNotSupported(
            std::env::consts::OS.into(),
        ))
    }
}
