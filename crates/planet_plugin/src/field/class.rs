//! Discrete surface classification and its display palette.

/// Surface class decided per sample from the continent value and land mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainClass {
  DeepOcean,
  ShallowCoast,
  Beach,
  Plains,
  Mountain,
}

impl TerrainClass {
  pub const ALL: [Self; 5] = [
    Self::DeepOcean,
    Self::ShallowCoast,
    Self::Beach,
    Self::Plains,
    Self::Mountain,
  ];

  /// Fixed linear RGBA color of the class.
  #[inline]
  pub const fn color(self) -> [f32; 4] {
    match self {
      Self::DeepOcean => [0.0, 0.067, 0.102, 1.0],
      Self::ShallowCoast => [0.714, 0.651, 0.435, 1.0],
      Self::Beach => [0.855, 0.761, 0.624, 1.0],
      Self::Plains => [0.408, 0.741, 0.337, 1.0],
      Self::Mountain => [1.0, 1.0, 1.0, 1.0],
    }
  }

  /// Whether the class lies below sea level.
  #[inline]
  pub const fn is_submerged(self) -> bool {
    matches!(self, Self::DeepOcean | Self::ShallowCoast)
  }

  /// Classify from the coastline-perturbed continent value and land mask.
  ///
  /// Below `sea_level` the class is underwater: shallow while any land mask
  /// remains, deep otherwise. Above it, a partial land mask is beach; full
  /// land becomes mountain at or beyond `mountain_start`.
  pub fn classify(continent_with_coastline: f64, land_mask: f64, sea_level: f64, mountain_start: f64) -> Self {
    if continent_with_coastline < sea_level {
      if land_mask > 0.0 {
        Self::ShallowCoast
      } else {
        Self::DeepOcean
      }
    } else if land_mask < 1.0 {
      Self::Beach
    } else if continent_with_coastline >= mountain_start {
      Self::Mountain
    } else {
      Self::Plains
    }
  }
}
