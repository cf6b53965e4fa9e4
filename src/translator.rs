use crate::device::ControllerState;
use crate::protocol::{self, Assignment};

/// Field counts for one translated message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translation {
    pub applied: usize,
    pub skipped: usize,
}

/// Merge one message into the session state.
///
/// Every button is released first, then fields are applied left to right, so
/// the last occurrence of a key wins. Axes not named by a valid field keep
/// their previous value.
pub fn translate(state: &mut ControllerState, message: &str) -> Translation {
    state.release_buttons();

    let mut outcome = Translation::default();
    for field in protocol::parse(message) {
        match field {
            Ok(Assignment::Button(button, pressed)) => state.set_button(button, pressed),
            Ok(Assignment::Axis(axis, value)) => state.set_axis(axis, value),
            Err(skip) => {
                log::trace!("Skipping field ({:?})", skip);
                outcome.skipped += 1;
                continue;
            }
        }
        outcome.applied += 1;
    }
    outcome
}
