//! Scene configuration: tree layout, per-group dataset parameters and the
//! orbit camera settings, all with `Default` values taken from `constants`.

use crate::camera::OrbitConfig;
use crate::constants::*;
use crate::dataset::Category;
use smallvec::{smallvec, SmallVec};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tree height must be positive, got {0}")]
    NonPositiveHeight(f32),
    #[error("tree base radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("height bias exponent must be >= 1, got {0}")]
    BiasExponent(f32),
    #[error("chaos shell [{min}, {max}] must start outside the tree radius {tree_radius}")]
    ChaosShell { min: f32, max: f32, tree_radius: f32 },
    #[error("speed range [{min}, {max}] must be positive and ordered")]
    SpeedRange { min: f32, max: f32 },
    #[error("category split for {group} is empty")]
    EmptySplit { group: &'static str },
    #[error("split weight for {category:?} must be positive and finite, got {weight}")]
    SplitWeight { category: Category, weight: f32 },
    #[error("polar bounds [{min}, {max}] must satisfy 0 <= min < max <= pi")]
    PolarBounds { min: f32, max: f32 },
    #[error("distance bounds [{min}, {max}] must satisfy 0 < min <= max")]
    DistanceBounds { min: f32, max: f32 },
    #[error("orbit {name} must be positive and finite, got {value}")]
    OrbitParameter { name: &'static str, value: f32 },
}

/// Geometry of the formed cone and of the scatter shell.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout {
    pub height: f32,
    pub base_y: f32,
    pub base_radius: f32,
    pub bias_exponent: f32,
    pub spiral_wind: f32,
    pub spiral_jitter: f32,
    pub chaos_shell_min: f32,
    pub chaos_shell_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            height: TREE_HEIGHT,
            base_y: TREE_BASE_Y,
            base_radius: TREE_BASE_RADIUS,
            bias_exponent: HEIGHT_BIAS_EXPONENT,
            spiral_wind: SPIRAL_WIND,
            spiral_jitter: SPIRAL_JITTER,
            chaos_shell_min: CHAOS_SHELL_MIN,
            chaos_shell_max: CHAOS_SHELL_MAX,
            speed_min: SPEED_MIN,
            speed_max: SPEED_MAX,
        }
    }
}

impl TreeLayout {
    /// Height of the formed volume's centre of mass. For `h = u^k` the mean
    /// height fraction is `1 / (k + 1)`.
    pub fn center_of_mass_y(&self) -> f32 {
        self.base_y + self.height / (self.bias_exponent + 1.0)
    }

    pub fn apex_y(&self) -> f32 {
        self.base_y + self.height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::NonPositiveHeight(self.height));
        }
        if !(self.base_radius.is_finite() && self.base_radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.base_radius));
        }
        if !(self.bias_exponent.is_finite() && self.bias_exponent >= 1.0) {
            return Err(ConfigError::BiasExponent(self.bias_exponent));
        }
        let tree_radius = self.base_radius.max(self.height * 0.5);
        if !(self.chaos_shell_min > tree_radius && self.chaos_shell_max >= self.chaos_shell_min)
            || !self.chaos_shell_max.is_finite()
        {
            return Err(ConfigError::ChaosShell {
                min: self.chaos_shell_min,
                max: self.chaos_shell_max,
                tree_radius,
            });
        }
        if !(self.speed_min > 0.0 && self.speed_max >= self.speed_min && self.speed_max.is_finite())
        {
            return Err(ConfigError::SpeedRange {
                min: self.speed_min,
                max: self.speed_max,
            });
        }
        Ok(())
    }
}

/// Weighted category draw. Weights need not sum to one; they are normalized
/// into cumulative thresholds when picking.
#[derive(Clone, Debug, PartialEq)]
pub struct CategorySplit {
    entries: SmallVec<[(Category, f32); 4]>,
}

impl CategorySplit {
    pub fn new(entries: impl IntoIterator<Item = (Category, f32)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn single(category: Category) -> Self {
        Self {
            entries: smallvec![(category, 1.0)],
        }
    }

    pub fn ornaments() -> Self {
        Self::new([
            (Category::Ball, ORNAMENT_BALL_WEIGHT),
            (Category::Gift, ORNAMENT_GIFT_WEIGHT),
            (Category::Light, ORNAMENT_LIGHT_WEIGHT),
        ])
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    /// Map a uniform variate in \[0, 1) onto a category by cumulative weight.
    /// Falls back to the last entry for `u` at (or rounding past) the top.
    pub fn pick(&self, u: f32) -> Option<Category> {
        let total: f32 = self.entries.iter().map(|(_, w)| *w).sum();
        let threshold = u * total;
        let mut acc = 0.0;
        for (category, weight) in &self.entries {
            acc += *weight;
            if threshold < acc {
                return Some(*category);
            }
        }
        self.entries.last().map(|(c, _)| *c)
    }

    pub fn validate(&self, group: &'static str) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptySplit { group });
        }
        for (category, weight) in &self.entries {
            if !(weight.is_finite() && *weight > 0.0) {
                return Err(ConfigError::SplitWeight {
                    category: *category,
                    weight: *weight,
                });
            }
        }
        Ok(())
    }
}

/// Inputs of one dataset generation. Two equal `DatasetParams` (with equal
/// layouts) always produce identical records.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetParams {
    pub count: usize,
    pub split: CategorySplit,
    pub seed: u64,
}

impl DatasetParams {
    pub fn new(count: usize, split: CategorySplit, seed: u64) -> Self {
        Self { count, split, seed }
    }
}

/// Full scene configuration: one dataset per group plus layout and camera.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub layout: TreeLayout,
    pub foliage: DatasetParams,
    pub ornaments: DatasetParams,
    pub photos: DatasetParams,
    pub star: DatasetParams,
    pub orbit: OrbitConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::with_counts(
            DEFAULT_FOLIAGE_COUNT,
            DEFAULT_ORNAMENT_COUNT,
            DEFAULT_PHOTO_COUNT,
            DEFAULT_SEED,
        )
    }
}

impl SceneConfig {
    /// Build a config with the default split policy. Each group derives its own
    /// seed from `seed` so groups do not share random streams.
    pub fn with_counts(foliage: usize, ornaments: usize, photos: usize, seed: u64) -> Self {
        Self {
            layout: TreeLayout::default(),
            foliage: DatasetParams::new(foliage, CategorySplit::single(Category::Foliage), seed),
            ornaments: DatasetParams::new(ornaments, CategorySplit::ornaments(), seed.wrapping_add(1)),
            photos: DatasetParams::new(photos, CategorySplit::single(Category::Photo), seed.wrapping_add(2)),
            star: DatasetParams::new(1, CategorySplit::single(Category::Star), seed.wrapping_add(3)),
            orbit: OrbitConfig::default(),
        }
    }

    /// Same layout and counts, new seeds for every group.
    pub fn reseeded(&self, seed: u64) -> Self {
        let mut next = self.clone();
        next.foliage.seed = seed;
        next.ornaments.seed = seed.wrapping_add(1);
        next.photos.seed = seed.wrapping_add(2);
        next.star.seed = seed.wrapping_add(3);
        next
    }

    pub fn datasets(&self) -> [(&'static str, &DatasetParams); 4] {
        [
            ("foliage", &self.foliage),
            ("ornaments", &self.ornaments),
            ("photos", &self.photos),
            ("star", &self.star),
        ]
    }

    /// Most instances `category` can ever hold under these counts, whatever
    /// the seed. Renderers size their batches with this so a reseed that
    /// shifts the split never outgrows them.
    pub fn max_instances(&self, category: Category) -> usize {
        self.datasets()
            .iter()
            .filter(|(_, p)| p.split.categories().any(|c| c == category))
            .map(|(_, p)| p.count)
            .sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        for (group, params) in self.datasets() {
            params.split.validate(group)?;
        }
        self.orbit.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SceneConfig::default().validate(), Ok(()));
    }

    #[test]
    fn split_pick_follows_cumulative_thresholds() {
        let split = CategorySplit::ornaments();
        assert_eq!(split.pick(0.0), Some(Category::Ball));
        assert_eq!(split.pick(0.79), Some(Category::Ball));
        assert_eq!(split.pick(0.85), Some(Category::Gift));
        assert_eq!(split.pick(0.95), Some(Category::Light));
        assert_eq!(split.pick(1.0), Some(Category::Light));
        assert_eq!(CategorySplit::new(Vec::<(Category, f32)>::new()).pick(0.5), None);
    }

    #[test]
    fn reseeded_keeps_counts() {
        let base = SceneConfig::with_counts(10, 20, 3, 1);
        let next = base.reseeded(99);
        assert_eq!(next.ornaments.count, 20);
        assert_eq!(next.foliage.seed, 99);
        assert_ne!(next.ornaments.seed, next.foliage.seed);
    }

    #[test]
    fn max_instances_covers_every_split_entry() {
        let cfg = SceneConfig::with_counts(10, 20, 3, 1);
        assert_eq!(cfg.max_instances(Category::Foliage), 10);
        assert_eq!(cfg.max_instances(Category::Gift), 20);
        assert_eq!(cfg.max_instances(Category::Photo), 3);
        assert_eq!(cfg.max_instances(Category::Star), 1);
    }
}
