//! Scroll-synchronized 3D hero scene controller.

pub mod assets;
pub mod camera_rig;
pub mod controller;
pub mod driver;
pub mod error;
pub mod gltf_loader;
pub mod host;
pub mod lifecycle;
pub mod render_loop;
pub mod snap;
#[cfg(test)]
mod testing;

pub use assets::{LoadCompletion, MeshLoader, ModelState};
pub use camera_rig::CameraRig;
pub use controller::{HeroController, ViewportSize};
pub use error::{AssetLoadError, InitError};
pub use gltf_loader::GltfFileLoader;
pub use host::{EventKind, EventOutcome, FrameRequestId, Host, HostEvent, ListenerId, PinnedRegion, TickerId};
