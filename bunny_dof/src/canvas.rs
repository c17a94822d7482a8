// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sizing the canvas for the display's device pixel ratio.

use glam::UVec2;
use web_sys::HtmlCanvasElement;

/// Size of a canvas in CSS pixels and in real (device) pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    /// How big the canvas appears on the page.
    pub css: UVec2,
    /// How many pixels the backing store has.
    pub physical: UVec2,
}

impl CanvasSize {
    /// Scales `css` by `device_pixel_ratio` so the canvas stays crisp on high density displays.
    /// Fractional pixels are truncated like assigning `canvas.width` in JavaScript. A ratio that
    /// isn't finite and positive counts as `1.0`.
    pub fn new(css: UVec2, device_pixel_ratio: f64) -> Self {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let scale = |n: u32| ((n as f64 * ratio).floor() as u32).max(1);

        Self {
            css,
            physical: UVec2::new(scale(css.x), scale(css.y)),
        }
    }

    /// Sizes the canvas using the current device pixel ratio.
    pub fn of_window(css: UVec2) -> Self {
        Self::new(css, js_hooks::device_pixel_ratio())
    }

    /// Sets the backing store to [`physical`][`Self::physical`] and the CSS size to
    /// [`css`][`Self::css`].
    pub fn apply(&self, canvas: &HtmlCanvasElement) -> Result<(), String> {
        canvas.set_width(self.physical.x);
        canvas.set_height(self.physical.y);

        let style = canvas.style();
        for (property, value) in [("width", self.css.x), ("height", self.css.y)] {
            style
                .set_property(property, &format!("{}px", value))
                .map_err(|e| {
                    js_hooks::error_message(&e)
                        .unwrap_or_else(|| format!("could not set canvas {}", property))
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::uvec2;

    #[test]
    fn scales_by_ratio() {
        let size = CanvasSize::new(uvec2(1000, 600), 2.0);
        assert_eq!(size.css, uvec2(1000, 600));
        assert_eq!(size.physical, uvec2(2000, 1200));

        assert_eq!(
            CanvasSize::new(uvec2(1000, 600), 1.5).physical,
            uvec2(1500, 900)
        );
    }

    #[test]
    fn fractional_pixels_truncate() {
        assert_eq!(
            CanvasSize::new(uvec2(1000, 600), 1.5005).physical,
            uvec2(1500, 900)
        );
        assert_eq!(
            CanvasSize::new(uvec2(1000, 600), 1.9999).physical,
            uvec2(1999, 1199)
        );
    }

    #[test]
    fn invalid_ratio_is_one() {
        for ratio in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                CanvasSize::new(uvec2(1000, 600), ratio).physical,
                uvec2(1000, 600),
                "{}",
                ratio
            );
        }
    }

    #[test]
    fn never_zero() {
        assert_eq!(CanvasSize::new(uvec2(1, 1), 0.25).physical, uvec2(1, 1));
    }
}
