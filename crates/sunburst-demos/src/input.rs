use std::collections::HashSet;

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Polled keyboard and mouse state built from window events.
///
/// Feed every event to [`handle`](Self::handle) and call
/// [`end_frame`](Self::end_frame) after each simulated frame.
#[derive(Debug, Default)]
pub struct InputTracker {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    cursor: Option<(f32, f32)>,
    wheel: f32,
}

impl InputTracker {
    pub fn handle(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key(code, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button, .. } => {
                self.buttons_pressed.insert(*button);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 40.0) as f32,
                };
            }
            WindowEvent::Focused(false) => self.held.clear(),
            _ => {}
        }
    }

    /// Records a key transition. Auto-repeat presses do not count as new presses.
    pub fn key(&mut self, code: KeyCode, down: bool) {
        if down {
            if self.held.insert(code) {
                self.pressed.insert(code);
            }
        } else {
            self.held.remove(&code);
        }
    }

    pub fn is_down(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Pressed since the last `end_frame`.
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    pub fn was_clicked(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Cursor position in physical pixels.
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Wheel lines scrolled since the last `end_frame`.
    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.buttons_pressed.clear();
        self.wheel = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once() {
        let mut input = InputTracker::default();
        input.key(KeyCode::KeyB, true);
        assert!(input.was_pressed(KeyCode::KeyB));
        assert!(input.is_down(KeyCode::KeyB));

        input.end_frame();
        input.key(KeyCode::KeyB, true); // repeat
        assert!(!input.was_pressed(KeyCode::KeyB));
        assert!(input.is_down(KeyCode::KeyB));

        input.key(KeyCode::KeyB, false);
        assert!(!input.is_down(KeyCode::KeyB));
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut input = InputTracker::default();
        input.key(KeyCode::KeyW, true);
        input.handle(&WindowEvent::Focused(false));
        assert!(!input.is_down(KeyCode::KeyW));
    }
}
