//! Camera and view management.

use glam::{Mat4, Vec3};

/// Camera for ray generation.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Default lens placed at `position`, looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            ..Self::default()
        };
        camera.look_at(target);
        camera
    }

    /// Look at a target position.
    pub fn look_at(&mut self, target: Vec3) {
        self.direction = (target - self.position).normalize();
    }

    /// Set the aspect ratio from an output size in pixels.
    #[must_use]
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        self
    }

    /// Camera-space +X in world space.
    pub fn right(&self) -> Vec3 {
        self.direction.cross(self.up).normalize()
    }

    /// Camera-space +Y in world space, orthogonal to the view direction.
    pub fn true_up(&self) -> Vec3 {
        self.right().cross(self.direction)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.direction, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get the view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn inverse_view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix().inverse()
    }

    /// Get the per-frame parameters the traversal kernel reads.
    pub fn uniforms(&self) -> CameraUniforms {
        CameraUniforms::from(self)
    }
}

/// Per-frame camera parameters in the layout the traversal kernel reads.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub inverse_view_projection: [[f32; 4]; 4],
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub right: [f32; 4],
    pub up: [f32; 4],
}

impl CameraUniforms {
    pub fn inverse_view_projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inverse_view_projection)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], self.position[2])
    }
}

impl From<&Camera> for CameraUniforms {
    fn from(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            inverse_view_projection: camera.inverse_view_projection_matrix().to_cols_array_2d(),
            position: camera.position.extend(1.0).to_array(),
            direction: camera.direction.extend(0.0).to_array(),
            right: camera.right().extend(0.0).to_array(),
            up: camera.true_up().extend(0.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniforms_layout() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 3 * 64 + 4 * 16);
        assert_eq!(std::mem::offset_of!(CameraUniforms, inverse_view_projection), 128);
        assert_eq!(std::mem::offset_of!(CameraUniforms, position), 192);
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = Camera::looking_at(Vec3::new(3.0, 5.0, -2.0), Vec3::new(4.0, 4.0, 4.0));
        let right = camera.right();
        let up = camera.true_up();
        assert_relative_eq!(right.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(up.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(right.dot(camera.direction), 0.0, epsilon = 1e-5);
        assert_relative_eq!(up.dot(camera.direction), 0.0, epsilon = 1e-5);
        assert!(up.y > 0.0);
    }

    #[test]
    fn inverse_view_projection_roundtrips() {
        let camera = Camera::looking_at(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO);
        let point = Vec3::new(0.5, -0.25, 1.0);
        let forward = camera.view_projection_matrix().project_point3(point);
        let back = camera.uniforms().inverse_view_projection().project_point3(forward);
        assert_relative_eq!(back.x, point.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, point.y, epsilon = 1e-3);
        assert_relative_eq!(back.z, point.z, epsilon = 1e-3);
    }

    #[test]
    fn viewport_sets_aspect() {
        let camera = Camera::default().with_viewport(640, 480);
        assert_relative_eq!(camera.aspect, 4.0 / 3.0);
    }
}
