//! Per-frame keyboard command handling.
//!
//! The sketch is driven entirely by held keys: a modifier key names a field
//! (rotate-Y, camera-X, ...) and the arrow keys pick the direction. The
//! whole command surface lives in one declarative table so a frame's worth
//! of input is a uniform pass over [`BINDINGS`] rather than a ladder of
//! nested key checks.
//!
//! # Commands
//!
//! | Keys        | Effect                                   |
//! |-------------|------------------------------------------|
//! | A/S/D + ↑/↓ | rotate the live quad around Y/X/Z (±1°)  |
//! | C/X/Z + ↑/↓ | move the live quad along Y/X/Z (±0.01)   |
//! | U/I/O + ↑/↓ | rotate the camera around X/Y/Z (±2°)     |
//! | Q + ↑/↓     | wireframe on/off                         |
//! | W + ↑/↓     | depth test on/off                        |
//! | P (+ ↑/↓)   | auto-advance on, speed ±0.1              |
//! | L           | auto-advance off, speed back to 2.0      |
//! | T           | reset everything                         |
//! | ESC         | quit (handled by the event loop)         |

use winit::keyboard::KeyCode;

use crate::input::KeySource;

/// Default auto-advance speed, restored by the stop key and by reset.
pub const DEFAULT_SPEED: f32 = 2.0;

const ROTATION_STEP: f32 = 1.0;
const OFFSET_STEP: f32 = 0.01;
const CAMERA_STEP: f32 = 2.0;
const SPEED_STEP: f32 = 0.1;

/// Field of [`ControlState`] targeted by one additive binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    RotationY,
    RotationX,
    RotationZ,
    OffsetY,
    OffsetX,
    OffsetZ,
    CameraX,
    CameraY,
    CameraZ,
    Speed,
}

/// One entry of the command table: while `hold` is down, ArrowUp adds
/// `step` to `field` and ArrowDown subtracts it.
struct Binding {
    hold: KeyCode,
    field: Field,
    step: f32,
}

const fn bind(hold: KeyCode, field: Field, step: f32) -> Binding {
    Binding { hold, field, step }
}

const BINDINGS: [Binding; 10] = [
    bind(KeyCode::KeyA, Field::RotationY, ROTATION_STEP),
    bind(KeyCode::KeyS, Field::RotationX, ROTATION_STEP),
    bind(KeyCode::KeyD, Field::RotationZ, ROTATION_STEP),
    bind(KeyCode::KeyC, Field::OffsetY, OFFSET_STEP),
    bind(KeyCode::KeyX, Field::OffsetX, OFFSET_STEP),
    bind(KeyCode::KeyZ, Field::OffsetZ, OFFSET_STEP),
    bind(KeyCode::KeyU, Field::CameraX, CAMERA_STEP),
    bind(KeyCode::KeyI, Field::CameraY, CAMERA_STEP),
    bind(KeyCode::KeyO, Field::CameraZ, CAMERA_STEP),
    bind(KeyCode::KeyP, Field::Speed, SPEED_STEP),
];

/// Everything the keyboard can change, bundled in one struct.
///
/// Angles are in degrees and unbounded; nothing wraps. The two render-mode
/// booleans only select a pipeline at draw time but live here so the whole
/// reachable state is one testable value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlState {
    /// Live-quad rotation around Y, degrees.
    pub rotation_y: f32,
    /// Live-quad rotation around X, degrees.
    pub rotation_x: f32,
    /// Live-quad rotation around Z, degrees.
    pub rotation_z: f32,
    /// Live-quad position offset along X.
    pub offset_x: f32,
    /// Live-quad position offset along Y.
    pub offset_y: f32,
    /// Live-quad position offset along Z.
    pub offset_z: f32,
    /// Camera rotation around X, degrees.
    pub camera_x: f32,
    /// Camera rotation around Y, degrees.
    pub camera_y: f32,
    /// Camera rotation around Z, degrees.
    pub camera_z: f32,
    /// Degrees added to every camera angle per auto-advance frame.
    pub speed: f32,
    /// Whether the camera angles advance on their own each frame.
    pub auto_advance: bool,
    /// Line polygon mode instead of fill.
    pub wireframe: bool,
    /// Depth testing on.
    pub depth_test: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            rotation_y: 0.0,
            rotation_x: 0.0,
            rotation_z: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_z: 0.0,
            camera_x: 0.0,
            camera_y: 0.0,
            camera_z: 0.0,
            speed: DEFAULT_SPEED,
            auto_advance: false,
            wireframe: false,
            depth_test: false,
        }
    }
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the state by one frame of held keys.
    ///
    /// Every held binding applies independently in the same frame; holding
    /// both arrows while a modifier is down is a well-defined net-zero
    /// change. Auto-advance uses the speed the frame started with, so a
    /// speed tweak and the advance it affects never land in the same frame.
    /// Reset is applied last and wins over everything else held.
    pub fn step(&mut self, keys: &impl KeySource) {
        let frame_speed = self.speed;

        let up = keys.is_down(KeyCode::ArrowUp);
        let down = keys.is_down(KeyCode::ArrowDown);

        for binding in &BINDINGS {
            if !keys.is_down(binding.hold) {
                continue;
            }
            let field = self.field_mut(binding.field);
            if up {
                *field += binding.step;
            }
            if down {
                *field -= binding.step;
            }
        }

        if keys.is_down(KeyCode::KeyQ) {
            if up {
                self.wireframe = true;
            }
            if down {
                self.wireframe = false;
            }
        }
        if keys.is_down(KeyCode::KeyW) {
            if up {
                self.depth_test = true;
            }
            if down {
                self.depth_test = false;
            }
        }

        // Activation leaves the speed alone; only the stop key restores it.
        if keys.is_down(KeyCode::KeyP) {
            self.auto_advance = true;
        }
        if keys.is_down(KeyCode::KeyL) {
            self.auto_advance = false;
            self.speed = DEFAULT_SPEED;
        }

        if self.auto_advance {
            self.camera_x += frame_speed;
            self.camera_y += frame_speed;
            self.camera_z += frame_speed;
        }

        if keys.is_down(KeyCode::KeyT) {
            *self = Self::default();
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut f32 {
        match field {
            Field::RotationY => &mut self.rotation_y,
            Field::RotationX => &mut self.rotation_x,
            Field::RotationZ => &mut self.rotation_z,
            Field::OffsetY => &mut self.offset_y,
            Field::OffsetX => &mut self.offset_x,
            Field::OffsetZ => &mut self.offset_z,
            Field::CameraX => &mut self.camera_x,
            Field::CameraY => &mut self.camera_y,
            Field::CameraZ => &mut self.camera_z,
            Field::Speed => &mut self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn held(keys: &[KeyCode]) -> HashSet<KeyCode> {
        keys.iter().copied().collect()
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn unheld_frame_changes_nothing() {
        let mut state = ControlState::new();
        state.step(&held(&[]));
        assert_eq!(state, ControlState::default());

        // Arrows without a modifier are inert too.
        state.step(&held(&[KeyCode::ArrowUp, KeyCode::ArrowDown]));
        assert_eq!(state, ControlState::default());
    }

    #[test]
    fn rotate_y_accumulates_one_degree_per_frame() {
        let mut state = ControlState::new();
        let keys = held(&[KeyCode::KeyA, KeyCode::ArrowUp]);
        for _ in 0..5 {
            state.step(&keys);
        }
        assert_close(state.rotation_y, 5.0);

        let expected = ControlState {
            rotation_y: state.rotation_y,
            ..ControlState::default()
        };
        assert_eq!(state, expected);
    }

    #[test]
    fn arrow_down_subtracts() {
        let mut state = ControlState::new();
        state.step(&held(&[KeyCode::KeyX, KeyCode::ArrowDown]));
        assert_close(state.offset_x, -0.01);

        state.step(&held(&[KeyCode::KeyU, KeyCode::ArrowDown]));
        assert_close(state.camera_x, -2.0);
    }

    #[test]
    fn both_arrows_in_one_frame_are_net_zero() {
        let mut state = ControlState::new();
        let keys = held(&[KeyCode::KeyS, KeyCode::ArrowUp, KeyCode::ArrowDown]);
        state.step(&keys);
        assert_close(state.rotation_x, 0.0);
        assert_eq!(state, ControlState::default());
    }

    #[test]
    fn simultaneous_modifiers_each_apply() {
        let mut state = ControlState::new();
        let keys = held(&[KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyC, KeyCode::ArrowUp]);
        state.step(&keys);
        assert_close(state.rotation_y, 1.0);
        assert_close(state.rotation_x, 1.0);
        assert_close(state.offset_y, 0.01);
        assert_close(state.rotation_z, 0.0);
    }

    #[test]
    fn render_mode_toggles() {
        let mut state = ControlState::new();
        state.step(&held(&[KeyCode::KeyQ, KeyCode::ArrowUp]));
        assert!(state.wireframe);
        state.step(&held(&[KeyCode::KeyW, KeyCode::ArrowUp]));
        assert!(state.depth_test);
        state.step(&held(&[KeyCode::KeyQ, KeyCode::ArrowDown]));
        assert!(!state.wireframe);
        assert!(state.depth_test);
        state.step(&held(&[KeyCode::KeyW, KeyCode::ArrowDown]));
        assert!(!state.depth_test);
    }

    #[test]
    fn auto_advance_uses_frame_start_speed() {
        let mut state = ControlState::new();
        let keys = held(&[KeyCode::KeyP, KeyCode::ArrowUp]);
        for _ in 0..3 {
            state.step(&keys);
        }
        // Speed rose 2.0 -> 2.3; each frame advanced by the pre-tweak value.
        assert_close(state.speed, 2.3);
        let advanced = 2.0 + 2.1 + 2.2;
        assert_close(state.camera_x, advanced);
        assert_close(state.camera_y, advanced);
        assert_close(state.camera_z, advanced);

        state.step(&held(&[KeyCode::KeyL]));
        assert!(!state.auto_advance);
        assert_close(state.speed, DEFAULT_SPEED);
        assert_close(state.camera_x, advanced);

        // Camera stays frozen once stopped.
        state.step(&held(&[]));
        assert_close(state.camera_x, advanced);
    }

    #[test]
    fn activation_does_not_touch_speed() {
        let mut state = ControlState {
            speed: 3.5,
            ..ControlState::default()
        };
        state.step(&held(&[KeyCode::KeyP]));
        assert!(state.auto_advance);
        assert_close(state.speed, 3.5);
        assert_close(state.camera_x, 3.5);
    }

    #[test]
    fn manual_camera_delta_stacks_with_auto_advance() {
        let mut state = ControlState {
            auto_advance: true,
            ..ControlState::default()
        };
        state.step(&held(&[KeyCode::KeyU, KeyCode::ArrowUp]));
        assert_close(state.camera_x, 2.0 + DEFAULT_SPEED);
        assert_close(state.camera_y, DEFAULT_SPEED);
        assert_close(state.camera_z, DEFAULT_SPEED);
    }

    #[test]
    fn reset_restores_defaults_from_any_state() {
        let mut state = ControlState {
            rotation_y: 123.0,
            offset_z: -4.5,
            camera_x: 99.0,
            speed: 7.7,
            auto_advance: true,
            wireframe: true,
            depth_test: true,
            ..ControlState::default()
        };
        state.step(&held(&[KeyCode::KeyT]));
        assert_eq!(state, ControlState::default());
    }

    #[test]
    fn reset_wins_over_other_held_keys() {
        let mut state = ControlState {
            auto_advance: true,
            ..ControlState::default()
        };
        let keys = held(&[
            KeyCode::KeyT,
            KeyCode::KeyA,
            KeyCode::KeyU,
            KeyCode::ArrowUp,
        ]);
        state.step(&keys);
        assert_eq!(state, ControlState::default());
    }
}
