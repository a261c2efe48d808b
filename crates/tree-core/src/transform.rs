//! Shared per-instance transform storage.
//!
//! The renderer's packed matrices are the only copy of each instance's live
//! state. The animation engine reads a transform back (decompose), changes it
//! and writes it forward (recompose) through [`TransformBuffer`].

use glam::{Mat4, Quat, Vec3};

/// Decomposed instance transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn decompose(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn recompose(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

/// Fixed-capacity, index-addressed transform collection for one batch.
pub trait TransformBuffer {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current transform of instance `index`. Out-of-range reads yield identity.
    fn read_transform(&self, index: usize) -> Transform;

    /// Overwrite instance `index`. Out-of-range writes are ignored.
    fn write_transform(&mut self, index: usize, transform: &Transform);

    /// Signal the consumer that the contents changed since its last upload.
    fn mark_dirty(&mut self);
}

/// Column-major 4x4 matrices, laid out exactly like a GPU instance buffer.
#[derive(Clone, Debug, Default)]
pub struct MatrixBuffer {
    matrices: Vec<Mat4>,
    dirty: bool,
    version: u64,
}

impl MatrixBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; capacity],
            dirty: true,
            version: 0,
        }
    }

    pub fn from_transforms(transforms: impl IntoIterator<Item = Transform>) -> Self {
        Self {
            matrices: transforms.into_iter().map(|t| t.recompose()).collect(),
            dirty: true,
            version: 0,
        }
    }

    /// Flat `f32` view (16 floats per instance) for upload.
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.matrices)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Number of times the buffer has been marked dirty.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl TransformBuffer for MatrixBuffer {
    fn len(&self) -> usize {
        self.matrices.len()
    }

    fn read_transform(&self, index: usize) -> Transform {
        self.matrices
            .get(index)
            .map(Transform::decompose)
            .unwrap_or_default()
    }

    fn write_transform(&mut self, index: usize, transform: &Transform) {
        if let Some(m) = self.matrices.get_mut(index) {
            *m = transform.recompose();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.version += 1;
    }
}
