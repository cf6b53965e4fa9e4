//! Text wire format sent by the handheld: `KEY=value` fields joined by `,`.
//!
//! e.g. `RX=120,RY=-45,A=1,B=0`. Keys are case-insensitive. Fields that can't
//! be used are reported as [`Skip`] and never abort the rest of the message.

use crate::device::{Axis, Button};

pub const FIELD_DELIMITER: char = ',';
pub const ASSIGN_DELIMITER: char = '=';

/// Value a button must carry to count as pressed.
pub const PRESSED: &str = "1";

/// One accepted field of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Button(Button, bool),
    Axis(Axis, i16),
}

/// Why a field was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Token did not split into exactly one key and one value.
    Malformed,
    /// Axis value is not a decimal `i16`.
    InvalidAxis(Axis),
    UnknownKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Button(Button),
    Axis(Axis),
}

/// Resolve a canonical (trimmed, uppercase) key.
fn lookup(key: &str) -> Option<Key> {
    Button::ALL
        .iter()
        .find(|b| b.key() == key)
        .map(|&b| Key::Button(b))
        .or_else(|| {
            Axis::ALL
                .iter()
                .find(|a| a.key() == key)
                .map(|&a| Key::Axis(a))
        })
}

/// Parse a single `key=value` token.
pub fn parse_field(token: &str) -> Result<Assignment, Skip> {
    let mut parts = token.split(ASSIGN_DELIMITER);
    let (key, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => (key, value),
        _ => return Err(Skip::Malformed),
    };

    let key = key.trim().to_ascii_uppercase();
    let value = value.trim();

    match lookup(&key).ok_or(Skip::UnknownKey)? {
        Key::Button(button) => Ok(Assignment::Button(button, value == PRESSED)),
        Key::Axis(axis) => value
            .parse::<i16>()
            .map(|v| Assignment::Axis(axis, v))
            .map_err(|_| Skip::InvalidAxis(axis)),
    }
}

/// Parse a whole message, yielding one result per token in order.
pub fn parse(message: &str) -> impl Iterator<Item = Result<Assignment, Skip>> + '_ {
    message.split(FIELD_DELIMITER).map(parse_field)
}
