//! Camera input for a frame: position, orientation and projection.

use glam::{DMat4, DQuat, DVec3};

use crate::quadtree::Frustum;

/// Perspective projection settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
  /// Vertical field of view in radians.
  pub fov_y: f64,
  /// Width over height.
  pub aspect: f64,
  pub near: f64,
  pub far: f64,
}

impl Default for Projection {
  fn default() -> Self {
    Self {
      fov_y: 60f64.to_radians(),
      aspect: 16.0 / 9.0,
      near: 0.5,
      far: 1.0e7,
    }
  }
}

impl Projection {
  /// Right-handed projection with `[0, 1]` clip depth.
  pub fn matrix(&self) -> DMat4 {
    DMat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
  }
}

/// Camera pose in world space. Looks down its local `-Z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
  pub position: DVec3,
  pub rotation: DQuat,
}

impl Default for CameraState {
  fn default() -> Self {
    Self {
      position: DVec3::ZERO,
      rotation: DQuat::IDENTITY,
    }
  }
}

impl CameraState {
  pub fn new(position: DVec3, rotation: DQuat) -> Self {
    Self { position, rotation }
  }

  /// Camera at `position` facing `target`.
  ///
  /// Falls back to another up axis when `up` is parallel to the view
  /// direction, and to the identity rotation when `target == position`.
  pub fn looking_at(position: DVec3, target: DVec3, up: DVec3) -> Self {
    let forward = (target - position).normalize_or_zero();
    if forward == DVec3::ZERO {
      return Self::new(position, DQuat::IDENTITY);
    }
    let up = if forward.cross(up).length_squared() > 1e-12 {
      up
    } else if forward.cross(DVec3::Z).length_squared() > 1e-12 {
      DVec3::Z
    } else {
      DVec3::X
    };
    let view = DMat4::look_to_rh(position, forward, up);
    let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
    Self::new(position, rotation)
  }

  #[inline]
  pub fn forward(&self) -> DVec3 {
    self.rotation * DVec3::NEG_Z
  }

  /// World-to-view matrix.
  pub fn view_matrix(&self) -> DMat4 {
    DMat4::from_rotation_translation(self.rotation, self.position).inverse()
  }

  /// World-space view frustum for `projection`.
  pub fn frustum(&self, projection: &Projection) -> Frustum {
    Frustum::from_view_projection(projection.matrix() * self.view_matrix())
  }
}
