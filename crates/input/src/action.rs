/// Direction of a keyboard-driven camera move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// A high-level action produced from raw input.
///
/// The frame context consumes actions, never raw window events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Close the window and leave the frame loop.
    Quit,
    /// Move the camera one frame's worth in a direction.
    Move(Movement),
    /// Turn the camera. Offsets are in screen pixels, `y` pointing up.
    Look { x_offset: f32, y_offset: f32 },
    /// Adjust the field of view by scroll lines.
    Zoom(f32),
    /// Output surface changed size.
    Resize { width: u32, height: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_ordering_is_stable() {
        let mut dirs = vec![Movement::Right, Movement::Forward, Movement::Left];
        dirs.sort();
        assert_eq!(dirs, vec![Movement::Forward, Movement::Left, Movement::Right]);
    }

    #[test]
    fn look_action_carries_offsets() {
        let a = Action::Look {
            x_offset: 1.0,
            y_offset: -2.0,
        };
        assert!(matches!(a, Action::Look { y_offset, .. } if y_offset == -2.0));
    }
}
