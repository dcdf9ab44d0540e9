//! Keyboard to frame step mapping

use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;
use std::str::FromStr;

use spin360_shared::constants::{KEY_CODE_ARROW_LEFT, KEY_CODE_ARROW_RIGHT};

use crate::frame::Direction;

const KEY_CODE_ESCAPE: u32 = 27;
const KEY_CODE_ARROW_UP: u32 = 38;
const KEY_CODE_ARROW_DOWN: u32 = 40;

/// A key as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
    /// Any other key, by DOM key code.
    Other(u32),
}

impl Key {
    /// Map a DOM `keyCode`.
    pub fn from_code(code: u32) -> Self {
        match code {
            KEY_CODE_ARROW_LEFT => Self::ArrowLeft,
            KEY_CODE_ARROW_RIGHT => Self::ArrowRight,
            KEY_CODE_ARROW_UP => Self::ArrowUp,
            KEY_CODE_ARROW_DOWN => Self::ArrowDown,
            KEY_CODE_ESCAPE => Self::Escape,
            other => Self::Other(other),
        }
    }

    /// DOM `keyCode` of this key.
    pub fn code(self) -> u32 {
        match self {
            Self::ArrowLeft => KEY_CODE_ARROW_LEFT,
            Self::ArrowRight => KEY_CODE_ARROW_RIGHT,
            Self::ArrowUp => KEY_CODE_ARROW_UP,
            Self::ArrowDown => KEY_CODE_ARROW_DOWN,
            Self::Escape => KEY_CODE_ESCAPE,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArrowLeft => f.write_str("ArrowLeft"),
            Self::ArrowRight => f.write_str("ArrowRight"),
            Self::ArrowUp => f.write_str("ArrowUp"),
            Self::ArrowDown => f.write_str("ArrowDown"),
            Self::Escape => f.write_str("Escape"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    /// Parses key names case-insensitively, or a raw numeric key code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arrowleft" | "left" => Ok(Self::ArrowLeft),
            "arrowright" | "right" => Ok(Self::ArrowRight),
            "arrowup" | "up" => Ok(Self::ArrowUp),
            "arrowdown" | "down" => Ok(Self::ArrowDown),
            "escape" | "esc" => Ok(Self::Escape),
            other => other
                .parse::<u32>()
                .map(Self::from_code)
                .map_err(|_| format!("Unknown key: {s}")),
        }
    }
}

fn serialize_key<S>(key: &Key, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&key.to_string())
}

fn deserialize_key<'de, D>(deserializer: D) -> Result<Key, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

/// Keys that spin the viewer one frame.
///
/// Default: ArrowLeft advances, ArrowRight retreats.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyboardMapping {
    #[serde(serialize_with = "serialize_key", deserialize_with = "deserialize_key")]
    pub next: Key,
    #[serde(serialize_with = "serialize_key", deserialize_with = "deserialize_key")]
    pub prev: Key,
}

impl Default for KeyboardMapping {
    fn default() -> Self {
        Self {
            next: Key::ArrowLeft,
            prev: Key::ArrowRight,
        }
    }
}

impl KeyboardMapping {
    /// Direction a key spins in, inverted while autoplay runs `reversed`.
    /// `None` for keys that do not spin.
    pub fn direction(&self, key: Key, reversed: bool) -> Option<Direction> {
        let direction = if key == self.next {
            Direction::Advance
        } else if key == self.prev {
            Direction::Retreat
        } else {
            return None;
        };
        Some(direction.flip_if(reversed))
    }

    /// Whether `key` is bound to a spin direction.
    pub fn is_spin_key(&self, key: Key) -> bool {
        key == self.next || key == self.prev
    }
}
