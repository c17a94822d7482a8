// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Placement and rotation of the instanced bunny grid.

use glam::{vec3, Vec3};
use renderer::derive_vertex;
use std::f32::consts::TAU;

derive_vertex!(
    /// Per instance attributes of a bunny in the grid.
    pub struct BunnyInstance {
        /// World space position of the bunny's base.
        pub offset: Vec3,
        /// Rotation around +Y in radians.
        pub angle: f32,
    }
);

/// Positions of an `n` by `n` grid centered on the origin in the XZ plane, row major.
pub fn grid_offsets(n: usize, spacing: f32) -> Vec<Vec3> {
    let half = (n as f32 - 1.0) * 0.5;
    (0..n)
        .flat_map(|i| {
            (0..n).map(move |j| vec3((i as f32 - half) * spacing, 0.0, (j as f32 - half) * spacing))
        })
        .collect()
}

/// Rotation of every bunny in `[0, TAU)`. Staggered at the start so they don't spin in lockstep.
///
/// Angles wrap instead of growing so that small steps never round away.
#[derive(Clone, Debug)]
pub struct InstanceAngles(Vec<f32>);

impl InstanceAngles {
    /// Starts instance `i` at `i * 0.1` radians.
    pub fn new(count: usize) -> Self {
        Self((0..count).map(|i| (i as f32 * 0.1).rem_euclid(TAU)).collect())
    }

    /// Turns every bunny by `step` radians.
    pub fn advance(&mut self, step: f32) {
        for angle in &mut self.0 {
            *angle = (*angle + step).rem_euclid(TAU);
        }
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// If there are no instances.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Angles in radians, one per instance.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Pairs offsets with angles into buffer ready instances, reusing `out`'s allocation.
pub fn fill_instances(offsets: &[Vec3], angles: &InstanceAngles, out: &mut Vec<BunnyInstance>) {
    debug_assert_eq!(offsets.len(), angles.len());
    out.clear();
    out.extend(
        offsets
            .iter()
            .zip(angles.as_slice())
            .map(|(&offset, &angle)| BunnyInstance { offset, angle }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_centered() {
        let offsets = grid_offsets(3, 2.0);
        assert_eq!(offsets.len(), 9);
        assert_eq!(offsets[0], vec3(-2.0, 0.0, -2.0));
        assert_eq!(offsets[1], vec3(-2.0, 0.0, 0.0));
        assert_eq!(offsets[4], Vec3::ZERO);
        assert_eq!(offsets[8], vec3(2.0, 0.0, 2.0));

        let sum = grid_offsets(10, 1.5)
            .into_iter()
            .fold(Vec3::ZERO, |sum, offset| sum + offset);
        assert!(sum.length() < 1e-3);
    }

    #[test]
    fn empty_and_single() {
        assert!(grid_offsets(0, 1.0).is_empty());
        assert_eq!(grid_offsets(1, 5.0), vec![Vec3::ZERO]);
        assert!(InstanceAngles::new(0).is_empty());
    }

    #[test]
    fn angles_advance() {
        let mut angles = InstanceAngles::new(100);
        assert_eq!(angles.len(), 100);
        assert_eq!(angles.as_slice()[0], 0.0);
        assert!((angles.as_slice()[10] - 1.0).abs() < 1e-6);

        let before = angles.clone();
        angles.advance(0.01);
        for (a, b) in before.as_slice().iter().zip(angles.as_slice()) {
            assert!(((b - a).rem_euclid(TAU) - 0.01).abs() < 1e-5, "{} -> {}", a, b);
        }
    }

    #[test]
    fn angles_keep_turning_after_many_frames() {
        let mut angles = InstanceAngles::new(1);
        angles.advance(262_144.0);

        for _ in 0..1000 {
            let before = angles.as_slice()[0];
            angles.advance(0.01);
            let after = angles.as_slice()[0];

            assert!((0.0..=TAU).contains(&after), "{}", after);
            let turned = (after - before).rem_euclid(TAU);
            assert!((turned - 0.01).abs() < 1e-4, "{} -> {}", before, after);
        }
    }

    #[test]
    fn fills_instances() {
        let offsets = grid_offsets(2, 1.0);
        let angles = InstanceAngles::new(offsets.len());
        let mut instances = vec![BunnyInstance {
            offset: Vec3::ONE,
            angle: 9.0,
        }];
        fill_instances(&offsets, &angles, &mut instances);
        assert_eq!(instances.len(), 4);
        assert_eq!(instances[3].offset, offsets[3]);
        assert_eq!(instances[3].angle, angles.as_slice()[3]);
    }
}
