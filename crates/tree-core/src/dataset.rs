//! Static per-instance data for every animated element.
//!
//! A [`Dataset`] is generated once per [`DatasetParams`] and never mutated.
//! Records are partitioned by category at generation time so each category
//! maps onto one renderable batch.

use crate::config::{DatasetParams, TreeLayout};
use crate::constants::*;
use fnv::FnvHashMap;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;
use std::rc::Rc;

/// Kind of element. Decides placement, look and secondary motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Foliage,
    Ball,
    Gift,
    Light,
    Photo,
    Star,
}

/// Where a category sits inside the formed tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Anywhere inside the cone.
    Volume,
    /// Close to the cone surface.
    Surface,
    /// On the tip.
    Apex,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Foliage,
        Category::Ball,
        Category::Gift,
        Category::Light,
        Category::Photo,
        Category::Star,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Foliage => "foliage",
            Category::Ball => "ball",
            Category::Gift => "gift",
            Category::Light => "light",
            Category::Photo => "photo",
            Category::Star => "star",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn placement(self) -> Placement {
        match self {
            Category::Foliage => Placement::Volume,
            Category::Star => Placement::Apex,
            _ => Placement::Surface,
        }
    }

    /// Inclusive base scale range.
    pub fn scale_range(self) -> (f32, f32) {
        match self {
            Category::Foliage => (0.06, 0.14),
            Category::Ball => (0.18, 0.32),
            Category::Gift => (0.22, 0.38),
            Category::Light => (0.08, 0.12),
            Category::Photo => (0.9, 1.1),
            Category::Star => (1.0, 1.0),
        }
    }

    /// Emissive categories keep a fixed color instead of a palette draw.
    pub fn fixed_color(self) -> Option<[f32; 3]> {
        match self {
            Category::Light => Some(LIGHT_COLOR),
            Category::Star => Some(STAR_COLOR),
            Category::Photo => Some(PHOTO_COLOR),
            _ => None,
        }
    }

    pub fn palette(self) -> &'static [[f32; 3]] {
        match self {
            Category::Foliage => &FOLIAGE_PALETTE,
            _ => &ORNAMENT_PALETTE,
        }
    }
}

/// Immutable data for one animated instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceRecord {
    pub chaos_position: Vec3,
    pub target_position: Vec3,
    pub category: Category,
    pub color: [f32; 3],
    pub scale: f32,
    /// Approach rate multiplier (1/s). Different per instance so groups do not
    /// move in lockstep.
    pub speed: f32,
    /// Phase offset in \[0, 2π) for wobble, pulse and initial spin.
    pub phase: f32,
}

/// Contiguous records of a single category.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceGroup {
    pub category: Category,
    pub records: Rc<[InstanceRecord]>,
}

impl InstanceGroup {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Generated record set, one group per category of the split (in split order,
/// empty groups included).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Dataset {
    pub groups: Vec<InstanceGroup>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.groups.iter().map(InstanceGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn group(&self, category: Category) -> Option<&InstanceGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    pub fn count_of(&self, category: Category) -> usize {
        self.group(category).map_or(0, InstanceGroup::len)
    }

    pub fn records(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.groups.iter().flat_map(|g| g.records.iter())
    }
}

/// Generate the records for `params` on `layout`. Pure: the only randomness
/// comes from a `StdRng` seeded with `params.seed`.
pub fn generate(params: &DatasetParams, layout: &TreeLayout) -> Dataset {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let categories: Vec<Category> = params.split.categories().collect();
    let mut buckets: Vec<Vec<InstanceRecord>> = vec![Vec::new(); categories.len()];

    for _ in 0..params.count {
        let Some(category) = params.split.pick(rng.gen::<f32>()) else {
            break;
        };
        let record = make_record(category, layout, &mut rng);
        if let Some(slot) = categories.iter().position(|c| *c == category) {
            buckets[slot].push(record);
        }
    }

    Dataset {
        groups: categories
            .into_iter()
            .zip(buckets)
            .map(|(category, records)| InstanceGroup {
                category,
                records: records.into(),
            })
            .collect(),
    }
}

fn make_record(category: Category, layout: &TreeLayout, rng: &mut StdRng) -> InstanceRecord {
    let target_position = formed_position(category.placement(), layout, rng);
    let chaos_position = chaos_position(layout, rng);
    let (scale_min, scale_max) = category.scale_range();
    let scale = rng.gen_range(scale_min..=scale_max);
    let color = match category.fixed_color() {
        Some(c) => c,
        None => *category.palette().choose(rng).unwrap_or(&ORNAMENT_PALETTE[0]),
    };
    let speed = rng.gen_range(layout.speed_min..=layout.speed_max);
    let phase = rng.gen_range(0.0..TAU);
    InstanceRecord {
        chaos_position,
        target_position,
        category,
        color,
        scale,
        speed,
        phase,
    }
}

/// Point on or inside the spiral cone. Height uses `u^k` so density piles up
/// toward the base; radius shrinks linearly to zero at the apex.
fn formed_position(placement: Placement, layout: &TreeLayout, rng: &mut StdRng) -> Vec3 {
    if placement == Placement::Apex {
        return Vec3::new(0.0, layout.apex_y(), 0.0);
    }
    let h = rng.gen::<f32>().powf(layout.bias_exponent);
    let y = layout.base_y + h * layout.height;
    let radial = match placement {
        Placement::Surface => rng.gen_range(0.85..=1.0),
        _ => rng.gen::<f32>().sqrt(),
    };
    let r = (1.0 - h) * layout.base_radius * radial;
    let angle = h * layout.height * layout.spiral_wind + rng.gen_range(0.0..=layout.spiral_jitter);
    Vec3::new(r * angle.cos(), y, r * angle.sin())
}

/// Uniform direction, radius drawn inside the scatter shell, centred on the
/// formed volume's centre of mass.
fn chaos_position(layout: &TreeLayout, rng: &mut StdRng) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let cos_phi: f32 = rng.gen_range(-1.0..=1.0);
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    let dir = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
    let radius = rng.gen_range(layout.chaos_shell_min..=layout.chaos_shell_max);
    dir * radius + Vec3::new(0.0, layout.center_of_mass_y(), 0.0)
}

struct CacheEntry {
    params: DatasetParams,
    layout: TreeLayout,
    dataset: Dataset,
}

/// Memoizes one dataset per named group; a group is regenerated only when its
/// parameters or the layout change.
#[derive(Default)]
pub struct DatasetCache {
    entries: FnvHashMap<&'static str, CacheEntry>,
    generations: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_generate(
        &mut self,
        group: &'static str,
        params: &DatasetParams,
        layout: &TreeLayout,
    ) -> Dataset {
        if let Some(entry) = self.entries.get(group) {
            if entry.params == *params && entry.layout == *layout {
                log::debug!("[dataset] reuse {} ({} records)", group, entry.dataset.len());
                return entry.dataset.clone();
            }
        }
        let dataset = generate(params, layout);
        self.generations += 1;
        log::info!(
            "[dataset] generated {} count={} seed={} groups={}",
            group,
            params.count,
            params.seed,
            dataset.groups.len()
        );
        self.entries.insert(
            group,
            CacheEntry {
                params: params.clone(),
                layout: layout.clone(),
                dataset: dataset.clone(),
            },
        );
        dataset
    }

    /// Number of actual generations performed (cache misses).
    pub fn generations(&self) -> usize {
        self.generations
    }
}
