use winit::dpi::{LogicalSize, PhysicalSize};

/// Upper bounds for the drawing area, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub max_width: f64,
    pub max_height: f64,
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self {
            max_width: 800.0,
            max_height: 600.0,
        }
    }
}

/// Size of the canvas for a window of the given logical size.
///
/// The height is also capped by the window width, so narrow windows get a
/// square-ish canvas instead of a tall one.
pub fn canvas_size(window: LogicalSize<f64>, bounds: CanvasBounds) -> LogicalSize<f64> {
    let width = bounds.max_width.min(window.width);
    let height = bounds.max_height.min(window.height).min(window.width);

    LogicalSize::new(width.max(0.0), height.max(0.0))
}

/// The canvas rectangle inside the window, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn fit(window: PhysicalSize<u32>, scale_factor: f64, bounds: CanvasBounds) -> Self {
        let logical: LogicalSize<f64> = window.to_logical(scale_factor);
        let canvas: PhysicalSize<u32> = canvas_size(logical, bounds).to_physical(scale_factor);

        let width = canvas.width.min(window.width);
        let height = canvas.height.min(window.height);

        Self {
            x: (window.width - width) / 2,
            y: (window.height - height) / 2,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logical(width: f64, height: f64) -> LogicalSize<f64> {
        LogicalSize::new(width, height)
    }

    #[test]
    fn large_window_is_clamped_to_bounds() {
        let size = canvas_size(logical(1920.0, 1080.0), CanvasBounds::default());
        assert_eq!(size, logical(800.0, 600.0));
    }

    #[test]
    fn small_window_uses_window_size() {
        let size = canvas_size(logical(700.0, 500.0), CanvasBounds::default());
        assert_eq!(size, logical(700.0, 500.0));
    }

    #[test]
    fn narrow_window_caps_height_by_width() {
        let size = canvas_size(logical(400.0, 900.0), CanvasBounds::default());
        assert_eq!(size, logical(400.0, 400.0));
    }

    #[test]
    fn viewport_is_centered() {
        let viewport = Viewport::fit(
            PhysicalSize::new(1000, 800),
            1.0,
            CanvasBounds::default(),
        );

        assert_eq!(
            viewport,
            Viewport {
                x: 100,
                y: 100,
                width: 800,
                height: 600,
            }
        );
        assert!((viewport.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn viewport_scales_with_dpi() {
        let viewport = Viewport::fit(
            PhysicalSize::new(3840, 2160),
            2.0,
            CanvasBounds::default(),
        );

        assert_eq!(viewport.width, 1600);
        assert_eq!(viewport.height, 1200);
    }

    #[test]
    fn minimized_window_has_empty_viewport() {
        let viewport = Viewport::fit(PhysicalSize::new(0, 0), 1.0, CanvasBounds::default());
        assert!(viewport.is_empty());
        assert_eq!(viewport.aspect(), 1.0);
    }
}
