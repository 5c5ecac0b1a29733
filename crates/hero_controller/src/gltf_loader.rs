//! glTF / GLB loading from disk.
//!
//! Each request runs on its own short-lived thread; finished bundles are
//! collected on the next `poll`.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use glam::{Mat3, Mat4, Vec3};
use hero_core::scene::{MeshBundle, MeshPrimitive, ModelSlot};

use crate::assets::{LoadCompletion, MeshLoader};
use crate::error::AssetLoadError;

pub struct GltfFileLoader {
    asset_root: PathBuf,
    sender: Sender<LoadCompletion>,
    receiver: Receiver<LoadCompletion>,
    /// Completions produced without a worker thread (spawn failures).
    ready: Vec<LoadCompletion>,
}

impl GltfFileLoader {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            asset_root: asset_root.into(),
            sender,
            receiver,
            ready: Vec::new(),
        }
    }

    /// Root-relative URLs (leading `/`) resolve under the asset root; anything
    /// else is used as a filesystem path as-is.
    pub fn resolve(&self, url: &str) -> PathBuf {
        match url.strip_prefix('/') {
            Some(relative) => self.asset_root.join(relative),
            None => PathBuf::from(url),
        }
    }
}

impl MeshLoader for GltfFileLoader {
    fn request(&mut self, slot: ModelSlot, url: &str, token: u64) {
        let path = self.resolve(url);
        let url = url.to_string();
        let sender = self.sender.clone();
        log::info!("Loading {slot} model from {}", path.display());

        let spawned = std::thread::Builder::new()
            .name(format!("hero-load-{slot}"))
            .spawn({
                let url = url.clone();
                move || {
                    let result = load_mesh_bundle(&path, &url);
                    // The receiver is gone once the loader is dropped; nothing to do then.
                    let _ = sender.send(LoadCompletion {
                        slot,
                        token,
                        result,
                    });
                }
            });
        if let Err(e) = spawned {
            self.ready.push(LoadCompletion {
                slot,
                token,
                result: Err(AssetLoadError::Io {
                    url,
                    reason: format!("failed to start loader thread: {e}"),
                }),
            });
        }
    }

    fn poll(&mut self) -> Vec<LoadCompletion> {
        let mut completions = std::mem::take(&mut self.ready);
        loop {
            match self.receiver.try_recv() {
                Ok(completion) => completions.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        completions
    }
}

/// Read a `.gltf` or `.glb` file into a bundle with node transforms baked in.
pub fn load_mesh_bundle(path: &Path, url: &str) -> Result<MeshBundle, AssetLoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if !matches!(extension.as_deref(), Some("gltf") | Some("glb")) {
        return Err(AssetLoadError::Unsupported {
            url: url.to_string(),
            reason: "expected a .gltf or .glb file".to_string(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| AssetLoadError::Io {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice(&bytes).map_err(|e| AssetLoadError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(extension) = document.extensions_required().next() {
        return Err(AssetLoadError::Unsupported {
            url: url.to_string(),
            reason: format!("required extension {extension}"),
        });
    }

    let buffers = gltf::import_buffers(&document, path.parent(), blob).map_err(|e| match e {
        gltf::Error::Io(io) => AssetLoadError::Io {
            url: url.to_string(),
            reason: io.to_string(),
        },
        other => AssetLoadError::Parse {
            url: url.to_string(),
            reason: other.to_string(),
        },
    })?;

    let mut primitives = Vec::new();
    if let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) {
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, &buffers, &mut primitives);
        }
    }
    if primitives.is_empty() {
        return Err(AssetLoadError::EmptyMesh {
            url: url.to_string(),
        });
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();
    Ok(MeshBundle { name, primitives })
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshPrimitive>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!(
                    "Skipping {:?} primitive in mesh {:?}",
                    primitive.mode(),
                    mesh.name()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| {
                buffers.get(buffer.index()).map(|data| data.0.as_slice())
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions
                .map(|p| world.transform_point3(Vec3::from_array(p)))
                .collect();
            if positions.is_empty() {
                continue;
            }
            let normals = reader
                .read_normals()
                .map(|normals| {
                    normals
                        .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
                        .collect()
                })
                .unwrap_or_default();
            let indices = reader
                .read_indices()
                .map(|indices| indices.into_u32().collect())
                .unwrap_or_default();
            let base_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();
            out.push(MeshPrimitive {
                positions,
                normals,
                indices,
                base_color,
            });
        }
    }
    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}
