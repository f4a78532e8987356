//! Patch vertex builders.
//!
//! A patch covers one quadtree node with an `(N + 1) x (N + 1)` grid laid out
//! row-major on the face plane. Each grid point is pushed through the face
//! transform onto the sphere. Vertices are stored relative to the node's
//! sphere center in the face frame, which keeps f32 positions precise at
//! planet scale.
//!
//! # Pipeline
//!
//! ```text
//! grid (x, y) -> face-local point -> planet direction
//!   Terrain: direction * (radius + elevation), field color
//!   Water:   direction * radius, sphere normal
//! ```
//!
//! Vertex evaluation runs in parallel batches of [`VERTEX_BATCH`]; terrain
//! normals are recomputed from the finished triangles afterwards.

use glam::{DQuat, DVec3, Vec3};
use rayon::prelude::*;

use crate::constants::VERTEX_BATCH;
use crate::field::TerrainField;
use crate::quadtree::{CubeFace, FaceTransform, NodeBounds, QuadNode, QuadtreeConfig};

use super::patch::{PatchKind, PatchVertex};

/// Display color of water patches.
pub const WATER_COLOR: [f32; 4] = [0.0, 0.231, 0.388, 0.85];

/// Everything a worker needs to place a node's grid on the sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchGeometry {
  pub face: CubeFace,
  pub bounds: NodeBounds,
  pub radius: f64,
  /// Planet-space point on the base sphere above the node center.
  /// Vertex positions are stored relative to it.
  pub origin: DVec3,
  face_transform: FaceTransform,
}

impl PatchGeometry {
  pub fn new(config: &QuadtreeConfig, node: &QuadNode) -> Self {
    Self {
      face: node.face,
      bounds: config.node_bounds(node),
      radius: config.radius,
      origin: config.node_sphere_center(node),
      face_transform: node.face.transform(config.radius),
    }
  }

  /// Rotation of the patch frame relative to planet space.
  #[inline]
  pub fn rotation(&self) -> DQuat {
    self.face_transform.rotation
  }

  /// Unit planet-space direction through grid point `(x, y)` of an
  /// `resolution`-quad grid.
  #[inline]
  pub fn grid_direction(&self, x: u32, y: u32, resolution: u32) -> DVec3 {
    let n = resolution.max(1) as f64;
    let size = self.bounds.size;
    let local = DVec3::new(
      self.bounds.center.x + (x as f64 / n - 0.5) * size,
      0.0,
      self.bounds.center.z + (y as f64 / n - 0.5) * size,
    );
    self
      .face_transform
      .transform_point(local)
      .normalize_or(self.face.normal())
  }

  /// Planet-space point expressed in the patch frame.
  #[inline]
  pub fn to_patch_local(&self, planet_point: DVec3) -> DVec3 {
    self.face_transform.rotation.inverse() * (planet_point - self.origin)
  }

  /// Planet-space direction expressed in the patch frame.
  #[inline]
  pub fn to_patch_vector(&self, planet_vector: DVec3) -> DVec3 {
    self.face_transform.rotation.inverse() * planet_vector
  }
}

/// Number of vertices of a patch with `resolution` quads per side.
#[inline]
pub fn vertex_count(resolution: u32) -> usize {
  let row = resolution as usize + 1;
  row * row
}

/// Fill `vertices` for a patch of the given kind.
pub fn build_patch(
  kind: PatchKind,
  field: &TerrainField,
  geometry: &PatchGeometry,
  resolution: u32,
  indices: &[u32],
  vertices: &mut Vec<PatchVertex>,
) {
  match kind {
    PatchKind::Terrain => build_terrain(field, geometry, resolution, indices, vertices),
    PatchKind::Water => build_water(geometry, resolution, vertices),
  }
}

/// Displaced, colored terrain grid with normals recomputed from `indices`.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "chunk::build_terrain"))]
pub fn build_terrain(
  field: &TerrainField,
  geometry: &PatchGeometry,
  resolution: u32,
  indices: &[u32],
  vertices: &mut Vec<PatchVertex>,
) {
  reset(vertices, resolution);
  let row = resolution + 1;
  let n = resolution.max(1) as f32;

  vertices
    .par_iter_mut()
    .enumerate()
    .with_min_len(VERTEX_BATCH)
    .for_each(|(i, vertex)| {
      let (x, y) = (i as u32 % row, i as u32 / row);
      let direction = geometry.grid_direction(x, y, resolution);
      let sample = field.evaluate(direction);
      let position = direction * (geometry.radius + sample.elevation);

      *vertex = PatchVertex {
        position: geometry.to_patch_local(position).as_vec3().to_array(),
        normal: geometry.to_patch_vector(direction).as_vec3().to_array(),
        uv: [x as f32 / n, y as f32 / n],
        color: sample.color,
      };
    });

  recompute_normals(vertices, indices);
}

/// Flat sea-level shell with sphere normals.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "chunk::build_water"))]
pub fn build_water(geometry: &PatchGeometry, resolution: u32, vertices: &mut Vec<PatchVertex>) {
  reset(vertices, resolution);
  let row = resolution + 1;
  let n = resolution.max(1) as f32;

  vertices
    .par_iter_mut()
    .enumerate()
    .with_min_len(VERTEX_BATCH)
    .for_each(|(i, vertex)| {
      let (x, y) = (i as u32 % row, i as u32 / row);
      let direction = geometry.grid_direction(x, y, resolution);

      *vertex = PatchVertex {
        position: geometry.to_patch_local(direction * geometry.radius).as_vec3().to_array(),
        normal: geometry.to_patch_vector(direction).as_vec3().to_array(),
        uv: [x as f32 / n, y as f32 / n],
        color: WATER_COLOR,
      };
    });
}

/// Area-weighted vertex normals from a triangle list.
///
/// Triangles referencing out-of-range vertices are skipped. Vertices with
/// no usable triangle get `+Y`, the patch frame's outward axis.
pub fn recompute_normals(vertices: &mut [PatchVertex], indices: &[u32]) {
  let mut accum = vec![Vec3::ZERO; vertices.len()];

  for tri in indices.chunks_exact(3) {
    let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
    if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
      continue;
    }
    let pa = Vec3::from_array(vertices[a].position);
    let pb = Vec3::from_array(vertices[b].position);
    let pc = Vec3::from_array(vertices[c].position);
    // Unnormalized cross product: magnitude is twice the triangle area.
    let face_normal = (pb - pa).cross(pc - pa);
    accum[a] += face_normal;
    accum[b] += face_normal;
    accum[c] += face_normal;
  }

  for (vertex, normal) in vertices.iter_mut().zip(accum) {
    vertex.normal = normal.normalize_or(Vec3::Y).to_array();
  }
}

fn reset(vertices: &mut Vec<PatchVertex>, resolution: u32) {
  vertices.clear();
  vertices.resize(vertex_count(resolution), PatchVertex::default());
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
