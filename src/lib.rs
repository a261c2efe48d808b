#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;
use tree_core::{Category, Mode, SceneConfig, TreeScene};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod sink;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn category(name: &str) -> Result<Category, JsValue> {
    Category::from_name(name).ok_or_else(|| js_err(format!("unknown group `{name}`")))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tree-web starting");
    Ok(())
}

/// Animation core handle for the page. The page owns the renderer and hands
/// us its instanced meshes and camera; we write their transforms each frame.
#[wasm_bindgen]
pub struct TreeApp {
    ctx: Rc<RefCell<frame::FrameContext>>,
    running: bool,
}

#[wasm_bindgen]
impl TreeApp {
    #[wasm_bindgen(constructor)]
    pub fn new(foliage: u32, ornaments: u32, photos: u32, seed: u32) -> Result<TreeApp, JsValue> {
        let config = SceneConfig::with_counts(
            foliage as usize,
            ornaments as usize,
            photos as usize,
            seed as u64,
        );
        let scene = TreeScene::new(config).map_err(js_err)?;
        log::info!(
            "[app] {} instances in {} groups",
            scene.instance_count(),
            scene.groups().len()
        );
        Ok(TreeApp {
            ctx: Rc::new(RefCell::new(frame::FrameContext::new(scene))),
            running: false,
        })
    }

    /// Names of the groups that currently hold instances.
    pub fn group_names(&self) -> Vec<JsValue> {
        self.ctx
            .borrow()
            .scene
            .groups()
            .iter()
            .filter(|g| !g.is_empty())
            .map(|g| JsValue::from_str(g.category.name()))
            .collect()
    }

    pub fn group_count(&self, name: &str) -> Result<u32, JsValue> {
        let category = category(name)?;
        let ctx = self.ctx.borrow();
        Ok(ctx.scene.group(category).map_or(0, |g| g.len()) as u32)
    }

    /// Instances a mesh for `name` should be allocated with to survive reseeds.
    pub fn group_capacity(&self, name: &str) -> Result<u32, JsValue> {
        let category = category(name)?;
        Ok(self.ctx.borrow().scene.config().max_instances(category) as u32)
    }

    /// Flat rgb triples, one per instance, in batch order.
    pub fn group_colors(&self, name: &str) -> Result<Vec<f32>, JsValue> {
        let category = category(name)?;
        let ctx = self.ctx.borrow();
        Ok(ctx
            .scene
            .group(category)
            .map(|g| g.records.iter().flat_map(|r| r.color).collect())
            .unwrap_or_default())
    }

    pub fn attach_mesh(&mut self, name: &str, mesh: JsValue) -> Result<(), JsValue> {
        let category = category(name)?;
        let sink = sink::MeshSink::new(mesh)?;
        self.ctx.borrow_mut().attach_mesh(category, sink);
        Ok(())
    }

    pub fn detach_mesh(&mut self, name: &str) -> Result<bool, JsValue> {
        let category = category(name)?;
        Ok(self.ctx.borrow_mut().detach_mesh(category))
    }

    pub fn attach_camera(&mut self, camera: JsValue) -> Result<(), JsValue> {
        let sink = sink::CameraSink::new(camera)?;
        self.ctx.borrow_mut().attach_camera(sink);
        Ok(())
    }

    /// Wire keyboard, pointer fallback and the mode button for `canvas`.
    pub fn bind_canvas(&mut self, canvas: web::HtmlCanvasElement) {
        events::keyboard::wire_global_keydown(self.ctx.clone());
        events::pointer::wire_pointer_handlers(&canvas, self.ctx.clone());
        if let Some(document) = dom::window_document() {
            let ctx = self.ctx.clone();
            dom::add_click_listener(&document, constants::MODE_BUTTON_ID, move || {
                let mut c = ctx.borrow_mut();
                let next = c.mode().toggled();
                c.set_mode(next);
            });
            overlay::set_mode_label(&document, self.ctx.borrow().mode());
        }
    }

    /// Zoom the orbit; the distance is clamped to its configured bounds.
    pub fn set_distance(&mut self, distance: f32) {
        self.ctx.borrow_mut().set_distance(distance);
    }

    pub fn distance(&self) -> f32 {
        self.ctx.borrow().scene.orbit().distance()
    }

    /// Column-major view-projection matrix of the orbit camera, for pages
    /// that draw without a three.js style camera object.
    pub fn view_projection(&self, aspect: f32) -> Vec<f32> {
        self.ctx
            .borrow()
            .scene
            .camera_pose()
            .view_projection(aspect)
            .to_cols_array()
            .to_vec()
    }

    /// Latest hand-tracker reading, normalized image coordinates.
    pub fn set_hand(&mut self, x: f32, y: f32, detected: bool) {
        self.ctx.borrow_mut().hand.from_tracker(x, y, detected);
    }

    pub fn set_mode(&mut self, formed: bool) {
        let mode = if formed { Mode::Formed } else { Mode::Chaos };
        self.ctx.borrow_mut().set_mode(mode);
    }

    pub fn toggle_mode(&mut self) -> bool {
        let mut ctx = self.ctx.borrow_mut();
        let next = ctx.mode().toggled();
        ctx.set_mode(next);
        next.is_formed()
    }

    pub fn is_formed(&self) -> bool {
        self.ctx.borrow().mode().is_formed()
    }

    pub fn regenerate(&mut self, seed: u32) -> Result<(), JsValue> {
        self.ctx.borrow_mut().regenerate(seed as u64).map_err(js_err)
    }

    /// Advance one frame by explicit time, for pages that run their own loop.
    pub fn frame(&mut self, delta: f32, elapsed: f32) -> bool {
        self.ctx.borrow_mut().step(delta, elapsed).camera_moved
    }

    /// Drive frames from requestAnimationFrame. Calling twice is a no-op.
    pub fn run(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        frame::start_loop(self.ctx.clone());
    }
}
