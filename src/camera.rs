use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};

/// Camera orbiting a target on a sphere, parameterized by longitude `alpha`,
/// latitude `beta` (measured from +Y) and distance `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,

    pub lower_radius_limit: f32,
    pub upper_radius_limit: f32,

    /// Vertical field of view in radians
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub aspect: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            alpha: FRAC_PI_2,
            beta: FRAC_PI_2,
            radius: 160.0,

            lower_radius_limit: 10.0,
            upper_radius_limit: 160.0,

            fovy: 0.8,
            znear: 0.1,
            zfar: 1000.0,
            aspect: 1.0,
        }
    }
}

impl OrbitCamera {
    /// Keeps the camera off the poles so `look_at` stays defined.
    const BETA_EPSILON: f32 = 0.01;

    pub fn eye(&self) -> Vec3 {
        let (sin_alpha, cos_alpha) = self.alpha.sin_cos();
        let (sin_beta, cos_beta) = self.beta.sin_cos();

        self.target + self.radius * Vec3::new(cos_alpha * sin_beta, cos_beta, sin_alpha * sin_beta)
    }

    /// Rotates around the target by the given angles in radians.
    pub fn orbit(&mut self, delta_alpha: f32, delta_beta: f32) {
        self.alpha += delta_alpha;
        self.beta = (self.beta + delta_beta).clamp(Self::BETA_EPSILON, PI - Self::BETA_EPSILON);
    }

    /// Moves toward (positive) or away from (negative) the target by a
    /// fraction of the current distance.
    pub fn zoom(&mut self, amount: f32) {
        self.radius = (self.radius * (1.0 - amount))
            .clamp(self.lower_radius_limit, self.upper_radius_limit);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let projection = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);

        projection * view
    }
}
