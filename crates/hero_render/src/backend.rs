use hero_core::scene::{MeshBundle, ModelSlot, SceneGraph};

use crate::camera::PerspectiveCamera;

/// Drawing surface the scene controller renders through.
///
/// GPU resources are owned per model slot. `release_model` must be a no-op
/// for a slot that was never uploaded, and safe to call repeatedly.
pub trait Renderer {
    /// Resize the drawing surface to `width x height` CSS pixels at `pixel_ratio`.
    fn resize_surface(&mut self, width: u32, height: u32, pixel_ratio: f32);

    fn upload_model(&mut self, slot: ModelSlot, bundle: &MeshBundle);

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera);

    fn release_model(&mut self, slot: ModelSlot);

    /// Deliberately lose the graphics context. Returns false when the backend
    /// has no such capability.
    fn force_context_loss(&mut self) -> bool {
        false
    }
}
