//! Responsive canvas sizing
//!
//! Narrow windows get a phone layout with shrunken geometry; wider windows
//! get the 3:4 desktop playfield, scaled down to fit when needed.

use crate::sim::{MenuBounds, Viewport};

/// Windows at most this wide use the phone layout
pub const MOBILE_BREAKPOINT: f64 = 768.0;
pub const DESKTOP_WIDTH: f64 = 720.0;
pub const DESKTOP_HEIGHT: f64 = 960.0;
pub const MOBILE_MAX_WIDTH: f64 = 450.0;
pub const MOBILE_SCALE: f32 = 0.7;
/// Horizontal page padding around the canvas
pub const PAGE_MARGIN: f64 = 32.0;
/// Vertical room left for the HUD and controls
pub const MOBILE_CHROME: f64 = 100.0;
pub const DESKTOP_CHROME: f64 = 200.0;
/// Smallest playfield we will lay out; tinier windows get scrollbars
pub const MIN_CANVAS_WIDTH: u32 = 280;
pub const MIN_CANVAS_HEIGHT: u32 = 400;

/// Canvas size and geometry scale for a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub scale: f32,
    pub mobile: bool,
}

impl Layout {
    /// Fit the playfield into a window of `inner_width` x `inner_height` CSS px
    pub fn from_window(inner_width: f64, inner_height: f64) -> Self {
        let mobile = inner_width <= MOBILE_BREAKPOINT;
        let max_width = inner_width - PAGE_MARGIN;
        let max_height = inner_height - if mobile { MOBILE_CHROME } else { DESKTOP_CHROME };

        let (width, height, scale) = if mobile {
            (max_width.min(MOBILE_MAX_WIDTH), max_height, MOBILE_SCALE)
        } else {
            let (mut width, mut height) = (DESKTOP_WIDTH, DESKTOP_HEIGHT);
            if max_width < DESKTOP_WIDTH {
                width = max_width;
                height = max_width / DESKTOP_WIDTH * DESKTOP_HEIGHT;
            }
            if height > max_height {
                height = max_height;
                width = max_height / DESKTOP_HEIGHT * DESKTOP_WIDTH;
            }
            (width, height, 1.0)
        };

        let canvas_width = (width.floor().max(0.0) as u32).max(MIN_CANVAS_WIDTH);
        let canvas_height = (height.floor().max(0.0) as u32).max(MIN_CANVAS_HEIGHT);

        Self {
            canvas_width,
            canvas_height,
            scale,
            mobile,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.canvas_width as f32,
            height: self.canvas_height as f32,
            scale: self.scale,
        }
    }

    /// Title text height on the menu screen
    pub fn title_height(&self) -> f32 {
        if self.mobile { 24.0 } else { 36.0 }
    }

    pub fn menu_bounds(&self) -> MenuBounds {
        MenuBounds::new(
            self.canvas_width as f32,
            self.canvas_height as f32,
            self.scale,
            self.title_height(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_large_desktop_gets_full_playfield() {
        let layout = Layout::from_window(1920.0, 1200.0);
        assert!(!layout.mobile);
        assert_eq!((layout.canvas_width, layout.canvas_height), (720, 960));
        assert_eq!(layout.scale, 1.0);
        assert_eq!(layout.title_height(), 36.0);
    }

    #[test]
    fn test_short_desktop_fits_height() {
        let layout = Layout::from_window(1440.0, 900.0);
        // 700 tall at 3:4
        assert_eq!((layout.canvas_width, layout.canvas_height), (525, 700));
        assert_eq!(layout.scale, 1.0);
    }

    #[test]
    fn test_narrow_desktop_fits_width() {
        let layout = Layout::from_window(800.0, 2000.0);
        assert_eq!((layout.canvas_width, layout.canvas_height), (720, 960));
        let layout = Layout::from_window(780.0, 2000.0);
        assert_eq!(layout.canvas_width, 720);
    }

    #[test]
    fn test_phone_layout() {
        let layout = Layout::from_window(390.0, 844.0);
        assert!(layout.mobile);
        assert_eq!((layout.canvas_width, layout.canvas_height), (358, 744));
        assert_eq!(layout.scale, 0.7);
        assert_eq!(layout.title_height(), 24.0);

        let layout = Layout::from_window(768.0, 1024.0);
        assert!(layout.mobile);
        assert_eq!(layout.canvas_width, 450);
    }

    #[test]
    fn test_tiny_window_clamped() {
        let layout = Layout::from_window(100.0, 150.0);
        assert_eq!(
            (layout.canvas_width, layout.canvas_height),
            (MIN_CANVAS_WIDTH, MIN_CANVAS_HEIGHT)
        );
    }

    proptest! {
        #[test]
        fn prop_layout_within_bounds(w in 0.0f64..4000.0, h in 0.0f64..4000.0) {
            let layout = Layout::from_window(w, h);
            prop_assert!(layout.canvas_width >= MIN_CANVAS_WIDTH);
            prop_assert!(layout.canvas_height >= MIN_CANVAS_HEIGHT);
            if layout.mobile {
                prop_assert!(layout.canvas_width <= 450);
            } else {
                prop_assert!(layout.canvas_width <= 720);
                prop_assert!(layout.canvas_height <= 960);
            }
        }
    }
}
