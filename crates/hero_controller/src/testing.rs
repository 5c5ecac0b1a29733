//! Recording fakes for controller tests.

use std::collections::HashMap;

use glam::Vec3;
use hero_core::scene::{MeshBundle, MeshPrimitive, ModelSlot, SceneGraph, SceneModel};
use hero_core::section::{SectionId, SectionStyle};
use hero_core::stage::Stage;
use hero_core::tier::EnvironmentSignals;
use hero_render::{PerspectiveCamera, Renderer};

use crate::assets::{LoadCompletion, MeshLoader};
use crate::error::AssetLoadError;
use crate::host::{EventKind, FrameRequestId, Host, ListenerId, PinnedRegion, TickerId};

pub struct FakeHost {
    pub canvas_present: bool,
    pub env: EnvironmentSignals,
    pub region: Option<PinnedRegion>,
    pub scroll_y: f32,
    pub section_styles: HashMap<SectionId, SectionStyle>,
    pub stage_attribute: Option<Stage>,
    pub stage_writes: Vec<Stage>,
    pub listeners: HashMap<ListenerId, EventKind>,
    pub unsubscribe_calls: usize,
    pub pending_frames: Vec<FrameRequestId>,
    pub cancelled_frames: Vec<FrameRequestId>,
    pub ticker: Option<TickerId>,
    next_id: u64,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            canvas_present: true,
            env: EnvironmentSignals::default(),
            region: None,
            scroll_y: 0.0,
            section_styles: HashMap::new(),
            stage_attribute: None,
            stage_writes: Vec::new(),
            listeners: HashMap::new(),
            unsubscribe_calls: 0,
            pending_frames: Vec::new(),
            cancelled_frames: Vec::new(),
            ticker: None,
            next_id: 0,
        }
    }

    /// Host with a canvas and a pinned root starting at the top of the page.
    pub fn with_pinned_root() -> Self {
        let mut host = Self::new();
        host.region = Some(PinnedRegion {
            start: 0.0,
            top: 0.0,
            bottom: host.env.viewport_height,
        });
        host
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for FakeHost {
    fn has_canvas(&self, _selector: &str) -> bool {
        self.canvas_present
    }

    fn environment(&self) -> EnvironmentSignals {
        self.env
    }

    fn pinned_region(&self, _selector: &str) -> Option<PinnedRegion> {
        self.region
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn set_scroll_y(&mut self, y: f32) {
        self.scroll_y = y;
    }

    fn apply_section_style(&mut self, section: SectionId, style: SectionStyle) {
        self.section_styles.insert(section, style);
    }

    fn set_stage_attribute(&mut self, stage: Stage) {
        self.stage_attribute = Some(stage);
        self.stage_writes.push(stage);
    }

    fn subscribe(&mut self, kind: EventKind) -> ListenerId {
        let id = self.next();
        self.listeners.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.unsubscribe_calls += 1;
        self.listeners.remove(&id);
    }

    fn request_frame(&mut self) -> FrameRequestId {
        let id = self.next();
        self.pending_frames.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.pending_frames.retain(|pending| *pending != id);
        self.cancelled_frames.push(id);
    }

    fn add_ticker(&mut self) -> TickerId {
        let id = self.next();
        self.ticker = Some(id);
        id
    }

    fn remove_ticker(&mut self, id: TickerId) {
        if self.ticker == Some(id) {
            self.ticker = None;
        }
    }
}

#[derive(Default)]
pub struct FakeRenderer {
    pub resizes: Vec<(u32, u32, f32)>,
    pub uploads: Vec<ModelSlot>,
    pub releases: Vec<ModelSlot>,
    pub renders: usize,
    pub last_models: Vec<SceneModel>,
    pub last_camera: Option<(Vec3, Vec3)>,
    pub supports_context_loss: bool,
}

impl Renderer for FakeRenderer {
    fn resize_surface(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.resizes.push((width, height, pixel_ratio));
    }

    fn upload_model(&mut self, slot: ModelSlot, _bundle: &MeshBundle) {
        self.uploads.push(slot);
    }

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) {
        self.renders += 1;
        self.last_models = scene.models().copied().collect();
        self.last_camera = Some((camera.position, camera.target));
    }

    fn release_model(&mut self, slot: ModelSlot) {
        self.releases.push(slot);
    }

    fn force_context_loss(&mut self) -> bool {
        self.supports_context_loss
    }
}

#[derive(Default)]
pub struct FakeLoader {
    pub requests: Vec<(ModelSlot, String, u64)>,
    queued: Vec<LoadCompletion>,
}

impl FakeLoader {
    fn token_for(&self, slot: ModelSlot) -> u64 {
        self.requests
            .iter()
            .rev()
            .find(|(s, _, _)| *s == slot)
            .map_or(0, |(_, _, token)| *token)
    }

    pub fn succeed(&mut self, slot: ModelSlot, bundle: MeshBundle) {
        let token = self.token_for(slot);
        self.queued.push(LoadCompletion {
            slot,
            token,
            result: Ok(bundle),
        });
    }

    pub fn fail(&mut self, slot: ModelSlot) {
        let token = self.token_for(slot);
        let url = self
            .requests
            .iter()
            .find(|(s, _, _)| *s == slot)
            .map_or_else(String::new, |(_, url, _)| url.clone());
        self.queued.push(LoadCompletion {
            slot,
            token,
            result: Err(AssetLoadError::Io {
                url,
                reason: "not found".to_string(),
            }),
        });
    }
}

impl MeshLoader for FakeLoader {
    fn request(&mut self, slot: ModelSlot, url: &str, token: u64) {
        self.requests.push((slot, url.to_string(), token));
    }

    fn poll(&mut self) -> Vec<LoadCompletion> {
        std::mem::take(&mut self.queued)
    }
}

/// Axis-aligned box from `min` to `max` as a single primitive.
pub fn box_bundle(min: Vec3, max: Vec3) -> MeshBundle {
    let positions = vec![
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(min.x, min.y, max.z),
    ];
    MeshBundle {
        name: "box".to_string(),
        primitives: vec![MeshPrimitive {
            positions,
            base_color: [1.0; 4],
            ..MeshPrimitive::default()
        }],
    }
}
