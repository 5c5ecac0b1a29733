use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = eye position, w unused.
    pub eye: [f32; 4],
}

pub struct PerspectiveCamera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y_deg,
            aspect: sanitize_aspect(aspect),
            near,
            far,
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        // A zero-length view direction would produce NaNs.
        let target = if (self.target - self.position).length_squared() < 1e-12 {
            self.position - Vec3::Z
        } else {
            self.target
        };
        Mat4::look_at_rh(self.position, target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            eye: self.position.extend(1.0).to_array(),
        }
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let mut camera = PerspectiveCamera::new(34.0, 16.0 / 9.0, 0.1, 1000.0);
        camera.look_at(Vec3::new(0.02, 1.08, 7.9), Vec3::new(0.0, 0.03, 0.06));
        let clip = camera.view_proj().project_point3(Vec3::new(0.0, 0.03, 0.06));
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn set_aspect_rebuilds_the_projection() {
        let mut camera = PerspectiveCamera::new(34.0, 1.0, 0.1, 1000.0);
        let square = camera.view_proj();
        camera.set_aspect(2.0);
        assert_ne!(camera.view_proj(), square);
        let wide = PerspectiveCamera::new(34.0, 2.0, 0.1, 1000.0);
        assert_eq!(camera.view_proj(), wide.view_proj());
    }

    #[test]
    fn degenerate_aspect_falls_back_to_square() {
        let camera = PerspectiveCamera::new(34.0, 0.0, 0.1, 1000.0);
        assert_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn coincident_eye_and_target_stay_finite() {
        let mut camera = PerspectiveCamera::new(34.0, 1.0, 0.1, 1000.0);
        camera.look_at(Vec3::ONE, Vec3::ONE);
        assert!(camera.view_proj().is_finite());
    }
}
