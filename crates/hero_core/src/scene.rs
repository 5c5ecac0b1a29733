//! Renderable scene contents: lighting rig, mesh data, and model slots.

use glam::{Mat4, Quat, Vec3};

/// The two fixed mesh slots of the hero scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSlot {
    Robot,
    Human,
}

impl ModelSlot {
    pub const ALL: &'static [ModelSlot] = &[ModelSlot::Robot, ModelSlot::Human];

    pub fn index(self) -> usize {
        match self {
            Self::Robot => 0,
            Self::Human => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Robot => "robot",
            Self::Human => "human",
        }
    }
}

impl std::fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.min = bounds.min.min(*p);
            bounds.max = bounds.max.max(*p);
        }
        Some(bounds)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// One drawable primitive in model space. `indices` may be empty, in which
/// case positions are drawn as a triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshPrimitive {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

/// A loaded mesh bundle with node transforms already baked into positions.
#[derive(Debug, Clone, Default)]
pub struct MeshBundle {
    pub name: String,
    pub primitives: Vec<MeshPrimitive>,
}

impl MeshBundle {
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.primitives.iter().flat_map(|p| p.positions.iter()))
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.positions.len()).sum()
    }
}

/// Uniform scale, yaw rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub translation: Vec3,
    pub yaw: f32,
    pub scale: f32,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            yaw: 0.0,
            scale: 1.0,
        }
    }
}

impl ModelTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.yaw),
            self.translation,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Directional light shining from `position` toward the origin.
    Directional { position: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
}

impl Light {
    pub fn ambient(color: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color: rgb_from_hex(color),
            intensity,
        }
    }

    pub fn directional(color: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            kind: LightKind::Directional { position },
            color: rgb_from_hex(color),
            intensity,
        }
    }
}

pub fn rgb_from_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// The five-light rig: ambient, key, cool fill, rim, and a soft bottom fill.
pub fn lighting_rig() -> Vec<Light> {
    vec![
        Light::ambient(0xffffff, 0.75),
        Light::directional(0xffffff, 2.1, Vec3::new(4.0, 6.0, 4.5)),
        Light::directional(0xbad9ff, 0.65, Vec3::new(-4.0, 3.0, -3.0)),
        Light::directional(0xffffff, 0.95, Vec3::new(0.0, 4.0, -5.0)),
        Light::directional(0xffffff, 0.34, Vec3::new(0.0, -3.0, 2.0)),
    ]
}

/// A placed model as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneModel {
    pub slot: ModelSlot,
    pub transform: ModelTransform,
}

/// Persistent renderable set: lights plus zero to two models.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub lights: Vec<Light>,
    models: [Option<SceneModel>; 2],
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            lights: lighting_rig(),
            models: [None, None],
        }
    }

    pub fn insert(&mut self, model: SceneModel) {
        self.models[model.slot.index()] = Some(model);
    }

    pub fn remove(&mut self, slot: ModelSlot) -> Option<SceneModel> {
        self.models[slot.index()].take()
    }

    pub fn model(&self, slot: ModelSlot) -> Option<&SceneModel> {
        self.models[slot.index()].as_ref()
    }

    pub fn model_mut(&mut self, slot: ModelSlot) -> Option<&mut SceneModel> {
        self.models[slot.index()].as_mut()
    }

    pub fn models(&self) -> impl Iterator<Item = &SceneModel> {
        self.models.iter().flatten()
    }

    pub fn model_count(&self) -> usize {
        self.models().count()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
