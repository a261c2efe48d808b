//! JS-side render targets.
//!
//! Meshes and cameras are owned by the page's renderer (three.js style
//! objects). We only touch the few properties the renderer reads back:
//! `instanceMatrix.array`, `instanceMatrix.needsUpdate` and `count` on an
//! instanced mesh, `position.set` and `lookAt` on a camera.

use crate::constants::FLOATS_PER_MATRIX;
use glam::Vec3;
use js_sys::{Float32Array, Function, Reflect};
use tree_core::CameraPose;
use wasm_bindgen::{JsCast, JsValue};

fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(key))?;
    if value.is_undefined() || value.is_null() {
        return Err(JsValue::from_str(&format!("missing property `{key}`")));
    }
    Ok(value)
}

fn call3(target: &JsValue, method: &str, v: Vec3) -> Result<(), JsValue> {
    let f: Function = get(target, method)?.dyn_into()?;
    f.call3(
        target,
        &JsValue::from_f64(v.x as f64),
        &JsValue::from_f64(v.y as f64),
        &JsValue::from_f64(v.z as f64),
    )?;
    Ok(())
}

/// An instanced mesh whose matrix attribute mirrors one batch.
pub struct MeshSink {
    mesh: JsValue,
    capacity: usize,
}

impl MeshSink {
    pub fn new(mesh: JsValue) -> Result<Self, JsValue> {
        let attribute = get(&mesh, "instanceMatrix")?;
        let array: Float32Array = get(&attribute, "array")?.dyn_into()?;
        let capacity = array.length() as usize / FLOATS_PER_MATRIX;
        Ok(Self { mesh, capacity })
    }

    /// Instances the mesh can draw.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy `floats` into the mesh and flag it for re-upload. Returns
    /// `Ok(false)` without touching the mesh when it is too small.
    pub fn upload(&self, floats: &[f32]) -> Result<bool, JsValue> {
        let instances = floats.len() / FLOATS_PER_MATRIX;
        if instances > self.capacity {
            return Ok(false);
        }
        let attribute = get(&self.mesh, "instanceMatrix")?;
        let array: Float32Array = get(&attribute, "array")?.dyn_into()?;
        array.subarray(0, floats.len() as u32).copy_from(floats);
        Reflect::set(&attribute, &JsValue::from_str("needsUpdate"), &JsValue::TRUE)?;
        Reflect::set(
            &self.mesh,
            &JsValue::from_str("count"),
            &JsValue::from_f64(instances as f64),
        )?;
        Ok(true)
    }
}

pub struct CameraSink {
    camera: JsValue,
}

impl CameraSink {
    pub fn new(camera: JsValue) -> Result<Self, JsValue> {
        let position = get(&camera, "position")?;
        let _: Function = get(&position, "set")?.dyn_into()?;
        let _: Function = get(&camera, "lookAt")?.dyn_into()?;
        Ok(Self { camera })
    }

    pub fn apply(&self, pose: &CameraPose) -> Result<(), JsValue> {
        let position = get(&self.camera, "position")?;
        call3(&position, "set", pose.eye)?;
        call3(&self.camera, "lookAt", pose.target)
    }
}
