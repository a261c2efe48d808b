//! Scene orchestration: owns the datasets and the orbit camera, and runs one
//! full update per frame against whatever render batches are attached.

use crate::animate::{animate_group, initial_transform, MotionProfile};
use crate::camera::{CameraPose, OrbitController};
use crate::config::{ConfigError, SceneConfig};
use crate::dataset::{Category, DatasetCache, InstanceGroup, InstanceRecord};
use crate::input::{FrameTime, HandSample, Mode};
use crate::transform::{MatrixBuffer, TransformBuffer};
use fnv::FnvHashMap;
use std::rc::Rc;

/// Access to per-category transform buffers owned by the renderer side.
pub trait RenderBackend {
    /// `None` while the category's batch is not attached (or not ready).
    fn group_buffer(&mut self, category: Category) -> Option<&mut dyn TransformBuffer>;
}

/// In-memory batches keyed by category; the default backend.
#[derive(Default)]
pub struct InstanceBatches {
    batches: FnvHashMap<Category, MatrixBuffer>,
}

impl InstanceBatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, category: Category, buffer: MatrixBuffer) {
        self.batches.insert(category, buffer);
    }

    pub fn detach(&mut self, category: Category) -> Option<MatrixBuffer> {
        self.batches.remove(&category)
    }

    pub fn get(&self, category: Category) -> Option<&MatrixBuffer> {
        self.batches.get(&category)
    }

    pub fn get_mut(&mut self, category: Category) -> Option<&mut MatrixBuffer> {
        self.batches.get_mut(&category)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Category, &mut MatrixBuffer)> {
        self.batches.iter_mut().map(|(c, b)| (*c, b))
    }
}

impl RenderBackend for InstanceBatches {
    fn group_buffer(&mut self, category: Category) -> Option<&mut dyn TransformBuffer> {
        self.batches
            .get_mut(&category)
            .map(|b| b as &mut dyn TransformBuffer)
    }
}

/// What one frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub groups_updated: usize,
    pub groups_skipped: usize,
    pub instances_written: usize,
    pub camera_moved: bool,
}

pub struct TreeScene {
    config: SceneConfig,
    cache: DatasetCache,
    groups: Vec<InstanceGroup>,
    orbit: OrbitController,
    frames: u64,
}

impl TreeScene {
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut scene = Self {
            orbit: OrbitController::new(config.orbit.clone()),
            config,
            cache: DatasetCache::new(),
            groups: Vec::new(),
            frames: 0,
        };
        scene.rebuild_groups();
        Ok(scene)
    }

    /// Swap in a new configuration. Datasets whose inputs did not change are
    /// reused; the orbit keeps its angles unless its own config changed.
    /// Returns the categories whose record sets changed.
    pub fn reconfigure(&mut self, config: SceneConfig) -> Result<Vec<Category>, ConfigError> {
        config.validate()?;
        if config.orbit != self.config.orbit {
            self.orbit = OrbitController::new(config.orbit.clone());
        }
        self.config = config;
        let previous = std::mem::take(&mut self.groups);
        self.rebuild_groups();
        let mut changed = Vec::new();
        for group in &mut self.groups {
            match previous.iter().find(|p| p.category == group.category) {
                Some(p) if Rc::ptr_eq(&p.records, &group.records) => {}
                // merged groups are collected afresh; keep the old set when equal
                Some(p) if p.records == group.records => group.records = p.records.clone(),
                _ => changed.push(group.category),
            }
        }
        Ok(changed)
    }

    /// Regenerate every dataset with a new seed, keeping counts and layout.
    pub fn reseed(&mut self, seed: u64) -> Result<Vec<Category>, ConfigError> {
        let next = self.config.reseeded(seed);
        self.reconfigure(next)
    }

    fn rebuild_groups(&mut self) {
        let mut merged: Vec<(Category, Vec<Rc<[InstanceRecord]>>)> = Vec::new();
        for (name, params) in self.config.datasets() {
            let dataset = self.cache.get_or_generate(name, params, &self.config.layout);
            for group in dataset.groups {
                match merged.iter_mut().find(|(c, _)| *c == group.category) {
                    Some((_, parts)) => parts.push(group.records),
                    None => merged.push((group.category, vec![group.records])),
                }
            }
        }
        self.groups = merged
            .into_iter()
            .map(|(category, mut parts)| {
                let records = if parts.len() == 1 {
                    parts.remove(0)
                } else {
                    parts
                        .iter()
                        .flat_map(|p| p.iter().copied())
                        .collect::<Vec<_>>()
                        .into()
                };
                InstanceGroup { category, records }
            })
            .collect();
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn groups(&self) -> &[InstanceGroup] {
        &self.groups
    }

    pub fn group(&self, category: Category) -> Option<&InstanceGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(InstanceGroup::len).sum()
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitController {
        &mut self.orbit
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.orbit.pose()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn dataset_generations(&self) -> usize {
        self.cache.generations()
    }

    /// Make `batches` hold one buffer per non-empty group with matching size.
    /// Existing buffers keep the transforms of indices that still exist, so a
    /// reseed flows from the current pose instead of jumping.
    pub fn sync_batches(&self, batches: &mut InstanceBatches) {
        for group in &self.groups {
            if group.is_empty() {
                batches.detach(group.category);
                continue;
            }
            let resized = match batches.get(group.category) {
                Some(existing) if existing.len() == group.len() => continue,
                Some(existing) => MatrixBuffer::from_transforms(
                    group.records.iter().enumerate().map(|(i, r)| {
                        if i < existing.len() {
                            existing.read_transform(i)
                        } else {
                            initial_transform(r)
                        }
                    }),
                ),
                None => MatrixBuffer::from_transforms(group.records.iter().map(initial_transform)),
            };
            log::debug!(
                "[scene] batch {} sized to {}",
                group.category.name(),
                group.len()
            );
            batches.attach(group.category, resized);
        }
    }

    /// Animate every attached group, then follow the hand with the camera.
    pub fn frame<B: RenderBackend + ?Sized>(
        &mut self,
        mode: Mode,
        hand: HandSample,
        time: FrameTime,
        backend: &mut B,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        for group in &self.groups {
            if group.is_empty() {
                continue;
            }
            let Some(buffer) = backend.group_buffer(group.category) else {
                log::trace!("[scene] {} not attached, skipping", group.category.name());
                report.groups_skipped += 1;
                continue;
            };
            if buffer.len() < group.len() {
                log::warn!(
                    "[scene] {} batch holds {} of {} instances, skipping",
                    group.category.name(),
                    buffer.len(),
                    group.len()
                );
                report.groups_skipped += 1;
                continue;
            }
            let profile = MotionProfile::for_category(group.category);
            let update = animate_group(mode, &group.records, &profile, buffer, time);
            report.groups_updated += 1;
            report.instances_written += update.written;
        }
        report.camera_moved = self.orbit.update(hand, time.delta);
        self.frames += 1;
        report
    }
}
