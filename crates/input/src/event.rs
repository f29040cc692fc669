/// Keys the demo reacts to. Everything else maps to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    Escape,
    Other,
}

/// A raw input event, already detached from the windowing library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    /// Relative pointer motion in pixels, `dy` pointing down.
    MouseMotion { dx: f32, dy: f32 },
    /// Wheel motion in lines, positive away from the user.
    Scroll { dy: f32 },
    Resized { width: u32, height: u32 },
    CloseRequested,
}
