//! Scalar shaping helpers with the same semantics as shader intrinsics.
//!
//! All of them are total: degenerate edges and out-of-range inputs collapse
//! to a value in [0, 1] instead of producing NaN.

use crate::constants::EPSILON;

/// Clamp to [0, 1]. NaN maps to 0.
#[inline]
pub fn saturate(x: f64) -> f64 {
  if x.is_nan() {
    0.0
  } else {
    x.clamp(0.0, 1.0)
  }
}

/// Linear interpolation `a + (b - a) * t`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
  a + (b - a) * t
}

/// Hermite smoothstep between `edge0` and `edge1`.
///
/// When the edges coincide the result is a hard step at `edge0`.
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
  let width = edge1 - edge0;
  if width.abs() < EPSILON {
    return if x < edge0 { 0.0 } else { 1.0 };
  }
  let t = saturate((x - edge0) / width);
  t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn smoothstep_hits_edges() {
    assert_eq!(smoothstep(0.46, 0.54, 0.46), 0.0);
    assert_eq!(smoothstep(0.46, 0.54, 0.54), 1.0);
    assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
  }

  #[test]
  fn smoothstep_clamps_outside_range() {
    assert_eq!(smoothstep(0.2, 0.4, -10.0), 0.0);
    assert_eq!(smoothstep(0.2, 0.4, 10.0), 1.0);
  }

  #[test]
  fn smoothstep_degenerate_edges_is_step() {
    assert_eq!(smoothstep(0.5, 0.5, 0.49), 0.0);
    assert_eq!(smoothstep(0.5, 0.5, 0.5), 1.0);
    assert_eq!(smoothstep(0.5, 0.5, 0.51), 1.0);
  }

  #[test]
  fn saturate_swallows_nan() {
    assert_eq!(saturate(f64::NAN), 0.0);
    assert_eq!(saturate(f64::INFINITY), 1.0);
    assert_eq!(saturate(f64::NEG_INFINITY), 0.0);
  }

  #[test]
  fn lerp_endpoints() {
    assert_eq!(lerp(-10.0, 10.0, 0.0), -10.0);
    assert_eq!(lerp(-10.0, 10.0, 1.0), 10.0);
    assert_eq!(lerp(-10.0, 10.0, 0.5), 0.0);
  }
}
