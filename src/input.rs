use std::time::{Duration, Instant};

use glam::Vec2;
use winit::{event::MouseScrollDelta, keyboard::KeyCode};

use crate::viewport::Viewport;

/// Pointer position normalised to the canvas.
///
/// `x` goes from -0.5 (left edge) to 0.5 (right edge), `y` from -0.5 (bottom)
/// to 0.5 (top).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    pub fn from_window_position(position: Vec2, viewport: &Viewport) -> Self {
        if viewport.is_empty() {
            return Self::default();
        }

        let local = position - Vec2::new(viewport.x as f32, viewport.y as f32);

        Self {
            x: local.x / viewport.width as f32 - 0.5,
            y: -(local.y / viewport.height as f32 - 0.5),
        }
    }
}

/// Turns a stream of primary button presses into double clicks.
#[derive(Debug, Clone)]
pub struct DoubleClick {
    max_interval: Duration,
    max_distance: f32,
    last_press: Option<(Instant, Vec2)>,
}

impl DoubleClick {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(300);
    pub const DEFAULT_DISTANCE: f32 = 4.0;

    pub fn new(max_interval: Duration, max_distance: f32) -> Self {
        Self {
            max_interval,
            max_distance,
            last_press: None,
        }
    }

    /// Records a press and returns true if it completes a double click.
    pub fn press(&mut self, at: Instant, position: Vec2) -> bool {
        let is_double = match self.last_press {
            Some((previous_at, previous_position)) => {
                at.saturating_duration_since(previous_at) <= self.max_interval
                    && previous_position.distance(position) <= self.max_distance
            }
            None => false,
        };

        // A completed double click must not be the first half of the next one
        self.last_press = if is_double { None } else { Some((at, position)) };

        is_double
    }
}

impl Default for DoubleClick {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_DISTANCE)
    }
}

/// Button state for pointer drags that drive the camera controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    Rotate,
    Pan,
}

#[derive(Debug, Default)]
pub struct PointerState {
    pub position: Vec2,
    pub cursor: Cursor,
    pub drag: Option<DragButton>,
    pub double_click: DoubleClick,
}

impl PointerState {
    /// Updates the tracked position and returns the movement since the last event.
    pub fn move_to(&mut self, position: Vec2, viewport: &Viewport) -> Vec2 {
        let delta = position - self.position;
        self.position = position;
        self.cursor = Cursor::from_window_position(position, viewport);
        delta
    }
}

/// Number keys 1 to 9 select the scene at that position in the registry.
pub fn scene_shortcut(code: KeyCode) -> Option<usize> {
    let index = match code {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        KeyCode::Digit9 => 8,
        _ => return None,
    };

    Some(index)
}

/// Wheel movement in notches, positive when scrolling up. Touchpads report pixels.
pub fn wheel_notches(delta: MouseScrollDelta) -> f32 {
    const PIXELS_PER_NOTCH: f64 = 50.0;

    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_NOTCH) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            x: 100,
            y: 50,
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn cursor_center_is_zero() {
        let cursor = Cursor::from_window_position(Vec2::new(500.0, 350.0), &viewport());
        assert_eq!(cursor, Cursor { x: 0.0, y: 0.0 });
    }

    #[test]
    fn cursor_corners() {
        let top_left = Cursor::from_window_position(Vec2::new(100.0, 50.0), &viewport());
        assert_eq!(top_left, Cursor { x: -0.5, y: 0.5 });

        let bottom_right = Cursor::from_window_position(Vec2::new(900.0, 650.0), &viewport());
        assert_eq!(bottom_right, Cursor { x: 0.5, y: -0.5 });
    }

    #[test]
    fn cursor_outside_canvas_extrapolates() {
        // Window origin sits in the letterbox above and left of the canvas
        let cursor = Cursor::from_window_position(Vec2::ZERO, &viewport());
        assert!((cursor.x - (-0.625)).abs() < 1e-6);
        assert!((cursor.y - (0.5 + 50.0 / 600.0)).abs() < 1e-6);

        let right = Cursor::from_window_position(Vec2::new(1300.0, 350.0), &viewport());
        assert!((right.x - 1.0).abs() < 1e-6);
        assert_eq!(right.y, 0.0);
    }

    #[test]
    fn cursor_on_empty_viewport() {
        let cursor = Cursor::from_window_position(Vec2::new(10.0, 10.0), &Viewport::default());
        assert_eq!(cursor, Cursor::default());
    }

    #[test]
    fn double_click_within_interval() {
        let mut detector = DoubleClick::default();
        let start = Instant::now();

        assert!(!detector.press(start, Vec2::new(10.0, 10.0)));
        assert!(detector.press(start + Duration::from_millis(200), Vec2::new(11.0, 10.0)));
    }

    #[test]
    fn slow_or_distant_clicks_are_single() {
        let mut detector = DoubleClick::default();
        let start = Instant::now();

        assert!(!detector.press(start, Vec2::ZERO));
        assert!(!detector.press(start + Duration::from_millis(500), Vec2::ZERO));
        assert!(!detector.press(
            start + Duration::from_millis(600),
            Vec2::new(50.0, 0.0)
        ));
    }

    #[test]
    fn triple_click_is_one_double_click() {
        let mut detector = DoubleClick::default();
        let start = Instant::now();

        assert!(!detector.press(start, Vec2::ZERO));
        assert!(detector.press(start + Duration::from_millis(100), Vec2::ZERO));
        assert!(!detector.press(start + Duration::from_millis(200), Vec2::ZERO));
    }

    #[test]
    fn pointer_tracks_delta() {
        let mut pointer = PointerState::default();
        pointer.move_to(Vec2::new(100.0, 100.0), &viewport());
        let delta = pointer.move_to(Vec2::new(110.0, 95.0), &viewport());
        assert_eq!(delta, Vec2::new(10.0, -5.0));
    }

    #[test]
    fn number_keys_pick_scenes() {
        assert_eq!(scene_shortcut(KeyCode::Digit1), Some(0));
        assert_eq!(scene_shortcut(KeyCode::Digit9), Some(8));
        assert_eq!(scene_shortcut(KeyCode::Digit0), None);
        assert_eq!(scene_shortcut(KeyCode::KeyA), None);
    }

    #[test]
    fn wheel_deltas() {
        assert_eq!(wheel_notches(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        assert_eq!(
            wheel_notches(MouseScrollDelta::PixelDelta(
                winit::dpi::PhysicalPosition::new(0.0, 25.0)
            )),
            0.5
        );
    }
}
