use crate::constants::MAX_FRAME_DELTA_SEC;
use crate::dom;
use crate::input::{HandState, PointerState};
use crate::overlay;
use crate::sink::{CameraSink, MeshSink};
use fnv::FnvHashMap;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use tree_core::{
    Category, ConfigError, FrameReport, FrameTime, InstanceBatches, Mode, RenderBackend,
    TransformBuffer, TreeScene,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything one animation frame needs, shared between the RAF loop, the
/// input handlers and the exported `TreeApp` methods.
pub struct FrameContext {
    pub scene: TreeScene,
    pub batches: InstanceBatches,
    pub meshes: FnvHashMap<Category, MeshSink>,
    pub camera: Option<CameraSink>,
    pub camera_dirty: bool,

    pub mode: Mode,
    pub hand: HandState,
    pub pointer: PointerState,

    pub started: Instant,
    pub last_instant: Instant,
}

/// Batches as seen by the scene: a group only animates while a mesh draws it.
struct AttachedBatches<'a> {
    batches: &'a mut InstanceBatches,
    meshes: &'a FnvHashMap<Category, MeshSink>,
}

impl RenderBackend for AttachedBatches<'_> {
    fn group_buffer(&mut self, category: Category) -> Option<&mut dyn TransformBuffer> {
        if !self.meshes.contains_key(&category) {
            return None;
        }
        self.batches.group_buffer(category)
    }
}

impl FrameContext {
    pub fn new(scene: TreeScene) -> Self {
        let mut batches = InstanceBatches::new();
        scene.sync_batches(&mut batches);
        let now = Instant::now();
        Self {
            scene,
            batches,
            meshes: FnvHashMap::default(),
            camera: None,
            camera_dirty: true,
            mode: Mode::default(),
            hand: HandState::default(),
            pointer: PointerState::default(),
            started: now,
            last_instant: now,
        }
    }

    /// Advance by wall-clock time since the previous call.
    pub fn frame(&mut self) -> FrameReport {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DELTA_SEC);
        self.last_instant = now;
        let elapsed = (now - self.started).as_secs_f32();
        self.step(dt_sec, elapsed)
    }

    /// Advance by an explicit frame time, then push dirty batches and the
    /// camera pose to the page.
    pub fn step(&mut self, delta: f32, elapsed: f32) -> FrameReport {
        let time = FrameTime::new(delta, elapsed);
        let mut backend = AttachedBatches {
            batches: &mut self.batches,
            meshes: &self.meshes,
        };
        let report = self
            .scene
            .frame(self.mode, self.hand.sample, time, &mut backend);
        self.flush_batches();
        if report.camera_moved || self.camera_dirty {
            self.flush_camera();
        }
        report
    }

    fn flush_batches(&mut self) {
        for (category, buffer) in self.batches.iter_mut() {
            let Some(mesh) = self.meshes.get(&category) else {
                continue;
            };
            if !buffer.take_dirty() {
                continue;
            }
            match mesh.upload(buffer.as_f32_slice()) {
                Ok(true) => {}
                Ok(false) => log::warn!(
                    "[frame] {} mesh holds {} of {} instances",
                    category.name(),
                    mesh.capacity(),
                    buffer.len()
                ),
                Err(e) => log::error!("[frame] {} upload failed: {:?}", category.name(), e),
            }
        }
    }

    fn flush_camera(&mut self) {
        let Some(camera) = &self.camera else {
            return;
        };
        match camera.apply(&self.scene.camera_pose()) {
            Ok(()) => self.camera_dirty = false,
            Err(e) => log::error!("[frame] camera update failed: {:?}", e),
        }
    }

    pub fn attach_mesh(&mut self, category: Category, mesh: MeshSink) {
        let needed = self.scene.config().max_instances(category);
        if mesh.capacity() < needed {
            log::warn!(
                "[frame] {} mesh holds {} instances, up to {} may be drawn",
                category.name(),
                mesh.capacity(),
                needed
            );
        }
        if let Some(buffer) = self.batches.get_mut(category) {
            buffer.mark_dirty();
        }
        self.meshes.insert(category, mesh);
        self.flush_batches();
    }

    pub fn detach_mesh(&mut self, category: Category) -> bool {
        self.meshes.remove(&category).is_some()
    }

    pub fn attach_camera(&mut self, camera: CameraSink) {
        self.camera = Some(camera);
        self.camera_dirty = true;
        self.flush_camera();
    }

    /// Zoom request; clamped by the orbit's distance bounds.
    pub fn set_distance(&mut self, distance: f32) {
        self.scene.orbit_mut().set_distance(distance);
        self.camera_dirty = true;
        self.flush_camera();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        log::info!("[mode] {}", mode.label());
        if let Some(document) = dom::window_document() {
            overlay::set_mode_label(&document, mode);
        }
    }

    /// Re-run the pointer fallback after the pointer state changed.
    pub fn refresh_pointer_hand(&mut self, requires_press: bool) {
        let pointer = self.pointer;
        self.hand.from_pointer(&pointer, requires_press);
    }

    /// New layout from `seed`. Instances keep their current pose and flow
    /// toward the new destinations.
    pub fn regenerate(&mut self, seed: u64) -> Result<(), ConfigError> {
        let changed = self.scene.reseed(seed)?;
        self.scene.sync_batches(&mut self.batches);
        for category in &changed {
            if let Some(buffer) = self.batches.get_mut(*category) {
                buffer.mark_dirty();
            }
        }
        log::info!(
            "[scene] regenerated with seed {} ({} groups changed)",
            seed,
            changed.len()
        );
        self.flush_batches();
        Ok(())
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref().map(|c| c.as_ref().clone()))
    else {
        return;
    };
    _ = w.request_animation_frame(cb.unchecked_ref());
}
