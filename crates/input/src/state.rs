use crate::action::{Action, Movement};
use crate::event::{InputEvent, Key};
use std::collections::BTreeSet;

/// Tracks held keys across frames and turns events into actions.
#[derive(Debug, Default)]
pub struct InputState {
    held: BTreeSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Drain one frame's events into actions.
    ///
    /// Discrete actions come first in event order, followed by one
    /// [`Action::Move`] per held movement key.
    pub fn process(&mut self, events: &[InputEvent]) -> Vec<Action> {
        let mut actions = Vec::new();
        for event in events {
            if let Some(action) = self.handle(event) {
                actions.push(action);
            }
        }
        actions.extend(self.held_movements().into_iter().map(Action::Move));
        actions
    }

    fn handle(&mut self, event: &InputEvent) -> Option<Action> {
        match *event {
            InputEvent::Key { key, pressed } => {
                if pressed {
                    self.held.insert(key);
                } else {
                    self.held.remove(&key);
                }
                (pressed && key == Key::Escape).then_some(Action::Quit)
            }
            InputEvent::MouseMotion { dx, dy } => Some(Action::Look {
                x_offset: dx,
                // screen y grows downward, camera pitch grows upward
                y_offset: -dy,
            }),
            InputEvent::Scroll { dy } => Some(Action::Zoom(dy)),
            InputEvent::Resized { width, height } => Some(Action::Resize { width, height }),
            InputEvent::CloseRequested => Some(Action::Quit),
        }
    }

    fn held_movements(&self) -> Vec<Movement> {
        let mut moves = Vec::new();
        if self.is_held(Key::W) {
            moves.push(Movement::Forward);
        }
        if self.is_held(Key::S) {
            moves.push(Movement::Backward);
        }
        if self.is_held(Key::A) {
            moves.push(Movement::Left);
        }
        if self.is_held(Key::D) {
            moves.push(Movement::Right);
        }
        if !moves.is_empty() {
            tracing::trace!(?moves, "held movement keys");
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> InputEvent {
        InputEvent::Key { key, pressed: true }
    }

    fn release(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            pressed: false,
        }
    }

    #[test]
    fn escape_quits() {
        let mut input = InputState::new();
        let actions = input.process(&[press(Key::Escape)]);
        assert_eq!(actions, vec![Action::Quit]);
    }

    #[test]
    fn escape_release_does_not_quit() {
        let mut input = InputState::new();
        let actions = input.process(&[release(Key::Escape)]);
        assert!(actions.is_empty());
    }

    #[test]
    fn held_keys_repeat_every_frame() {
        let mut input = InputState::new();
        let first = input.process(&[press(Key::W), press(Key::D)]);
        assert_eq!(
            first,
            vec![Action::Move(Movement::Forward), Action::Move(Movement::Right)]
        );

        // No new events, keys still held.
        let second = input.process(&[]);
        assert_eq!(second, first);

        let third = input.process(&[release(Key::W)]);
        assert_eq!(third, vec![Action::Move(Movement::Right)]);
    }

    #[test]
    fn wasd_maps_to_directions() {
        let mut input = InputState::new();
        let actions = input.process(&[press(Key::A), press(Key::S)]);
        assert_eq!(
            actions,
            vec![Action::Move(Movement::Backward), Action::Move(Movement::Left)]
        );
    }

    #[test]
    fn mouse_motion_inverts_y() {
        let mut input = InputState::new();
        let actions = input.process(&[InputEvent::MouseMotion { dx: 4.0, dy: 3.0 }]);
        assert_eq!(
            actions,
            vec![Action::Look {
                x_offset: 4.0,
                y_offset: -3.0
            }]
        );
    }

    #[test]
    fn scroll_resize_and_close() {
        let mut input = InputState::new();
        let actions = input.process(&[
            InputEvent::Scroll { dy: 1.0 },
            InputEvent::Resized {
                width: 640,
                height: 480,
            },
            InputEvent::CloseRequested,
        ]);
        assert_eq!(
            actions,
            vec![
                Action::Zoom(1.0),
                Action::Resize {
                    width: 640,
                    height: 480
                },
                Action::Quit,
            ]
        );
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut input = InputState::new();
        assert!(input.process(&[press(Key::Other)]).is_empty());
        assert!(input.is_held(Key::Other));
    }
}
