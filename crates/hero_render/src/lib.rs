pub mod backend;
pub mod camera;
pub mod gpu_context;
pub mod mesh_pipeline;
pub mod renderer;
pub mod vertex;

pub use backend::Renderer;
pub use camera::{CameraUniform, PerspectiveCamera};
pub use gpu_context::GpuContext;
pub use mesh_pipeline::MeshPipeline;
pub use renderer::{RendererConfig, WgpuRenderer};
pub use vertex::MeshVertex;
