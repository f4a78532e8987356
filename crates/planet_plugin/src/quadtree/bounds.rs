//! Double-precision bounds of quadtree nodes.
//!
//! Planet-scale coordinates overflow f32 precision long before the finest
//! leaves are reached, so all traversal geometry stays in f64.

use glam::DVec3;

/// Face-local bounds of a node: center on the face plane and edge length.
///
/// The center is embedded in 3D as `(cx, 0, cy)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeBounds {
	pub center: DVec3,
	pub size: f64,
}

/// Double-precision axis-aligned bounding box.
///
/// Traversal wraps every node's world center in a cube of the node's edge
/// length and tests it against the view frustum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DAabb3 {
	/// Minimum corner (inclusive).
	pub min: DVec3,
	/// Maximum corner (inclusive).
	pub max: DVec3,
}

impl DAabb3 {
	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: DVec3, max: DVec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Axis-aligned cube of edge `size` around `center`.
	pub fn cube(center: DVec3, size: f64) -> Self {
		Self::from_center_half_extents(center, DVec3::splat(size * 0.5))
	}

	/// Check if this AABB overlaps with another (touching counts).
	#[inline]
	pub fn overlaps(&self, other: &DAabb3) -> bool {
		self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
	}

	/// Check if this AABB contains a point.
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		point.cmpge(self.min).all() && point.cmple(self.max).all()
	}

	/// Corner furthest along `direction` (the "p-vertex" of a plane test).
	#[inline]
	pub fn positive_vertex(&self, direction: DVec3) -> DVec3 {
		DVec3::select(direction.cmpge(DVec3::ZERO), self.max, self.min)
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> DVec3 {
		self.max - self.min
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}
}
