// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use glam::{Vec3, Vec4};

/// RGB components to [`Vec3`].
pub fn rgb(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::from([r, g, b].map(convert))
}

/// RGB hex to [`Vec3`].
pub fn rgb_hex(hex: u32) -> Vec3 {
    debug_assert!(hex <= 0xffffff, "rgb has no alpha");
    let [_, r, g, b] = hex.to_be_bytes();
    rgb(r, g, b)
}

/// RGBA components to [`Vec4`].
pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Vec4 {
    rgba_array([r, g, b, a])
}

/// RGBA array to [`Vec4`].
pub fn rgba_array(rgba: [u8; 4]) -> Vec4 {
    Vec4::from(rgba.map(convert))
}

/// Converts a u8 channel to an f32 in `0.0..=1.0`.
fn convert(v: u8) -> f32 {
    v as f32 * (1.0 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels() {
        assert_eq!(rgba(255, 0, 0, 255), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(rgb_hex(0x00ff00), Vec3::new(0.0, 1.0, 0.0));
        assert!((rgb(51, 51, 51).x - 0.2).abs() < 1e-6);
    }
}
