//! Translation of egui input into viewer input

use eframe::egui;

use spin360_core::{Cursor, InputEvent, Key};
use spin360_shared::Point;

const KEY_CODE_SPACE: u32 = 32;
const KEY_CODE_ENTER: u32 = 13;

/// Pointer gesture over the spin surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Press(egui::Pos2),
    Move(egui::Pos2),
    Release,
}

fn point(pos: egui::Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

/// egui folds touches into pointer events; `touch` restores the distinction.
pub fn gesture_event(gesture: Gesture, touch: bool) -> InputEvent {
    match (gesture, touch) {
        (Gesture::Press(pos), false) => InputEvent::PointerDown(point(pos)),
        (Gesture::Press(pos), true) => InputEvent::TouchStart(point(pos)),
        (Gesture::Move(pos), false) => InputEvent::PointerMove(point(pos)),
        (Gesture::Move(pos), true) => InputEvent::TouchMove(point(pos)),
        (Gesture::Release, false) => InputEvent::PointerUp,
        (Gesture::Release, true) => InputEvent::TouchEnd,
    }
}

/// Map an egui key to the viewer's key codes. `None` for keys without a
/// DOM key code counterpart.
pub fn map_key(key: egui::Key) -> Option<Key> {
    let key = match key {
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::ArrowUp => Key::ArrowUp,
        egui::Key::ArrowDown => Key::ArrowDown,
        egui::Key::Escape => Key::Escape,
        egui::Key::Space => Key::Other(KEY_CODE_SPACE),
        egui::Key::Enter => Key::Other(KEY_CODE_ENTER),
        other => {
            // Letters and digits share their ASCII code with the DOM key code
            let mut chars = other.name().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => {
                    Key::Other(c.to_ascii_uppercase() as u32)
                }
                _ => return None,
            }
        }
    };
    Some(key)
}

pub fn cursor_icon(cursor: Cursor) -> egui::CursorIcon {
    match cursor {
        Cursor::Wait => egui::CursorIcon::Wait,
        Cursor::Grab => egui::CursorIcon::Grab,
        Cursor::Grabbing => egui::CursorIcon::Grabbing,
    }
}
