use std::collections::HashSet;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Read-only "is this key currently held" capability.
///
/// The per-frame control step consumes this instead of a concrete window
/// type, so the whole command table can be exercised in tests with a plain
/// set of key codes.
pub trait KeySource {
    /// Returns true if the key is currently held down.
    fn is_down(&self, key: KeyCode) -> bool;
}

/// Tracks keyboard state from winit window events.
#[derive(Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(key) = event.physical_key {
                match event.state {
                    ElementState::Pressed => {
                        if !self.keys_down.contains(&key) {
                            self.keys_pressed.insert(key);
                        }
                        self.keys_down.insert(key);
                    }
                    ElementState::Released => {
                        self.keys_down.remove(&key);
                        self.keys_released.insert(key);
                    }
                }
            }
        }
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }
}

impl KeySource for Input {
    fn is_down(&self, key: KeyCode) -> bool {
        self.key_down(key)
    }
}

impl KeySource for HashSet<KeyCode> {
    fn is_down(&self, key: KeyCode) -> bool {
        self.contains(&key)
    }
}
