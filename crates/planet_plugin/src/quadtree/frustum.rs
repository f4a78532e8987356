//! View frustum as six inward-facing planes.

use glam::{DMat4, DVec3, DVec4};

use super::bounds::DAabb3;

/// Plane `normal . p + d = 0`; the positive side is "inside".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: DVec3,
  pub d: f64,
}

impl Plane {
  /// Build from raw `(a, b, c, d)` coefficients, normalizing the normal.
  ///
  /// Degenerate coefficients give a plane that accepts every point.
  pub fn from_coefficients(v: DVec4) -> Self {
    let normal = v.truncate();
    let length = normal.length();
    if length.is_finite() && length > f64::EPSILON {
      Self {
        normal: normal / length,
        d: v.w / length,
      }
    } else {
      Self {
        normal: DVec3::ZERO,
        d: 0.0,
      }
    }
  }

  /// Plane through `point` facing `normal`.
  pub fn from_point_normal(point: DVec3, normal: DVec3) -> Self {
    let normal = normal.normalize_or_zero();
    Self {
      normal,
      d: -normal.dot(point),
    }
  }

  #[inline]
  pub fn signed_distance(&self, point: DVec3) -> f64 {
    self.normal.dot(point) + self.d
  }
}

/// Camera view volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
  /// Left, right, bottom, top, near, far.
  pub planes: [Plane; 6],
}

impl Frustum {
  pub fn from_planes(planes: [Plane; 6]) -> Self {
    Self { planes }
  }

  /// Extract planes from a combined view-projection matrix.
  ///
  /// Expects the `[0, 1]` clip depth range produced by
  /// `DMat4::perspective_rh` and friends.
  pub fn from_view_projection(view_projection: DMat4) -> Self {
    let r0 = view_projection.row(0);
    let r1 = view_projection.row(1);
    let r2 = view_projection.row(2);
    let r3 = view_projection.row(3);
    Self {
      planes: [
        Plane::from_coefficients(r3 + r0),
        Plane::from_coefficients(r3 - r0),
        Plane::from_coefficients(r3 + r1),
        Plane::from_coefficients(r3 - r1),
        Plane::from_coefficients(r2),
        Plane::from_coefficients(r3 - r2),
      ],
    }
  }

  pub fn contains_point(&self, point: DVec3) -> bool {
    self
      .planes
      .iter()
      .all(|plane| plane.signed_distance(point) >= 0.0)
  }

  /// Conservative AABB test: false only when the box is fully outside one plane.
  pub fn intersects_aabb(&self, aabb: &DAabb3) -> bool {
    self
      .planes
      .iter()
      .all(|plane| plane.signed_distance(aabb.positive_vertex(plane.normal)) >= 0.0)
  }
}
