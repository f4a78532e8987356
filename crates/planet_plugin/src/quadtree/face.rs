//! Cube faces and their fixed transforms.
//!
//! Each face quadtree works in a face-local frame where the face plane is
//! `y = radius` and `(x, z)` span `[-radius, radius]`. The face rotation maps
//! face-local `+Y` onto the face normal, so the six rotated planes tile the
//! cube enclosing the planet.

use glam::{DQuat, DVec3};

/// One of the six faces of the cube sphere.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum CubeFace {
  PosX,
  NegX,
  PosY,
  NegY,
  PosZ,
  NegZ,
}

impl CubeFace {
  pub const ALL: [Self; 6] = [
    Self::PosX,
    Self::NegX,
    Self::PosY,
    Self::NegY,
    Self::PosZ,
    Self::NegZ,
  ];

  /// Stable index in `0..6`, matching the order of [`CubeFace::ALL`].
  #[inline]
  pub const fn index(self) -> usize {
    match self {
      Self::PosX => 0,
      Self::NegX => 1,
      Self::PosY => 2,
      Self::NegY => 3,
      Self::PosZ => 4,
      Self::NegZ => 5,
    }
  }

  /// Outward unit normal of the face.
  #[inline]
  pub const fn normal(self) -> DVec3 {
    match self {
      Self::PosX => DVec3::X,
      Self::NegX => DVec3::NEG_X,
      Self::PosY => DVec3::Y,
      Self::NegY => DVec3::NEG_Y,
      Self::PosZ => DVec3::Z,
      Self::NegZ => DVec3::NEG_Z,
    }
  }

  /// Rotation taking face-local `+Y` to [`CubeFace::normal`].
  pub fn rotation(self) -> DQuat {
    use std::f64::consts::{FRAC_PI_2, PI};
    match self {
      Self::PosX => DQuat::from_rotation_z(-FRAC_PI_2),
      Self::NegX => DQuat::from_rotation_z(FRAC_PI_2),
      Self::PosY => DQuat::IDENTITY,
      Self::NegY => DQuat::from_rotation_x(PI),
      Self::PosZ => DQuat::from_rotation_x(FRAC_PI_2),
      Self::NegZ => DQuat::from_rotation_x(-FRAC_PI_2),
    }
  }

  /// Transform placing this face's plane at `radius` from the planet center.
  pub fn transform(self, radius: f64) -> FaceTransform {
    FaceTransform {
      rotation: self.rotation(),
      translation: self.normal() * radius,
    }
  }
}

/// Rigid transform from a face-local plane to planet space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceTransform {
  pub rotation: DQuat,
  pub translation: DVec3,
}

impl FaceTransform {
  /// Map a face-local point (on the `y = 0` plane) to planet space.
  #[inline]
  pub fn transform_point(&self, local: DVec3) -> DVec3 {
    self.rotation * local + self.translation
  }

  /// Map a face-local direction to planet space.
  #[inline]
  pub fn transform_vector(&self, local: DVec3) -> DVec3 {
    self.rotation * local
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TOLERANCE: f64 = 1e-12;

  #[test]
  fn rotation_maps_up_to_normal() {
    for face in CubeFace::ALL {
      let up = face.rotation() * DVec3::Y;
      assert!(
        (up - face.normal()).length() < TOLERANCE,
        "{:?}: +Y mapped to {:?}",
        face,
        up
      );
    }
  }

  #[test]
  fn indices_are_stable() {
    for (i, face) in CubeFace::ALL.iter().enumerate() {
      assert_eq!(face.index(), i);
    }
  }

  #[test]
  fn face_centers_sit_on_the_cube() {
    let radius = 500.0;
    for face in CubeFace::ALL {
      let center = face.transform(radius).transform_point(DVec3::ZERO);
      assert!((center - face.normal() * radius).length() < 1e-9);
    }
  }

  #[test]
  fn face_corners_are_cube_corners() {
    let radius = 1.0;
    for face in CubeFace::ALL {
      let t = face.transform(radius);
      for (x, z) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        let corner = t.transform_point(DVec3::new(x, 0.0, z));
        for c in corner.to_array() {
          assert!((c.abs() - 1.0).abs() < 1e-9, "{:?} corner {:?}", face, corner);
        }
      }
    }
  }

  #[test]
  fn faces_are_disjoint_interiors() {
    // A point just inside one face maps off every other face's plane.
    let radius = 1.0;
    for face in CubeFace::ALL {
      let p = face.transform(radius).transform_point(DVec3::new(0.3, 0.0, -0.4));
      for other in CubeFace::ALL {
        if other != face {
          assert!((p.dot(other.normal()) - radius).abs() > 1e-6);
        }
      }
    }
  }
}
