//! Pinhole camera for ray generation.

use kestrel_core::CameraDescription;
use kestrel_math::{safe_normalize, Ray, Vec3};

/// Camera for generating rays into the scene.
///
/// The projection basis is recomputed by every builder method, so a camera
/// is always ready to generate rays.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached projection basis
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 768,
            image_height: 576,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        };
        camera.update_basis();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.update_basis();
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.update_basis();
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self.update_basis();
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height.max(1) as f32
    }

    pub fn origin(&self) -> Vec3 {
        self.look_from
    }

    /// Camera basis as (right, up, backward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    fn update_basis(&mut self) {
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect_ratio() * half_height;

        // Calculate camera basis vectors
        self.w = safe_normalize(self.look_from - self.look_at);
        self.u = safe_normalize(self.vup.cross(self.w));
        self.v = self.w.cross(self.u);

        self.horizontal = 2.0 * half_width * self.u;
        self.vertical = 2.0 * half_height * self.v;
        self.lower_left_corner =
            self.look_from - half_width * self.u - half_height * self.v - self.w;
    }

    /// Generate the ray through normalized image coordinates.
    ///
    /// `(s, t)` = `(0, 0)` is the bottom-left corner of the image plane and
    /// `(1, 1)` the top-right. The direction is not normalized.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.look_from, target - self.look_from)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&CameraDescription> for Camera {
    fn from(desc: &CameraDescription) -> Self {
        Camera::new()
            .with_resolution(desc.width, desc.height)
            .with_position(desc.origin, desc.target, desc.up)
            .with_fov(desc.fov)
    }
}
