use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;

const EPS: f32 = 0.000001;

/// Spherical coordinates with +Y as the pole. `theta` is the azimuth measured
/// from +Z toward +X, `phi` the polar angle measured from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }

        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(&self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Orbit-style camera controls: rotate around a target, dolly toward it and
/// pan it across the view plane.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enabled: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,

            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Rotates by a pointer drag, in pixels, relative to the canvas height.
    pub fn rotate(&mut self, dx: f32, dy: f32, canvas_height: f32) {
        if !self.enabled || canvas_height <= 0.0 {
            return;
        }

        self.delta_theta -= TAU * dx / canvas_height * self.rotate_speed;
        self.delta_phi -= TAU * dy / canvas_height * self.rotate_speed;
    }

    /// Dollies by wheel notches. Positive values move toward the target.
    pub fn dolly(&mut self, notches: f32) {
        if !self.enabled {
            return;
        }

        self.scale *= self.zoom_scale().powf(notches);
    }

    /// Pans by a pointer drag so that the point under the cursor follows it.
    pub fn pan(&mut self, dx: f32, dy: f32, canvas_height: f32, camera: &PerspectiveCamera) {
        if !self.enabled || canvas_height <= 0.0 {
            return;
        }

        let target_distance =
            (camera.position - self.target).length() * (camera.fov_y.to_radians() / 2.0).tan();
        let scale = 2.0 * target_distance / canvas_height * self.pan_speed;

        self.pan_offset -= camera.right() * dx * scale;
        self.pan_offset += camera.up() * dy * scale;
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// Applies pending input to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        if self.enable_damping {
            spherical.theta += self.delta_theta * self.damping_factor;
            spherical.phi += self.delta_phi * self.damping_factor;
            self.target += self.pan_offset * self.damping_factor;
        } else {
            spherical.theta += self.delta_theta;
            spherical.phi += self.delta_phi;
            self.target += self.pan_offset;
        }

        let min_phi = self.min_polar_angle.max(EPS);
        let max_phi = self.max_polar_angle.min(PI - EPS);
        spherical.phi = spherical.phi.clamp(min_phi, max_phi.max(min_phi));

        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let previous_position = camera.position;
        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }

        self.scale = 1.0;

        previous_position.distance_squared(camera.position) > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 1.0).with_position(position);
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn spherical_offset_conversion() {
        let offset = Vec3::new(1.0, 2.0, 3.0);
        let spherical = Spherical::from_offset(offset);
        assert!(spherical.to_offset().abs_diff_eq(offset, 1e-5));
    }

    #[test]
    fn idle_update_keeps_camera() {
        let mut camera = camera_at(Vec3::new(0.0, 2.0, 5.0));
        let mut controls = OrbitControls::new(Vec3::ZERO);

        assert!(!controls.update(&mut camera));
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 2.0, 5.0), 1e-5));
    }

    #[test]
    fn quarter_drag_rotates_quarter_turn() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(Vec3::ZERO);

        controls.rotate(150.0, 0.0, 600.0);
        assert!(controls.update(&mut camera));

        assert!(camera.position.abs_diff_eq(Vec3::new(-5.0, 0.0, 0.0), 1e-4));
        assert!(camera.forward().abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.max_polar_angle = PI / 2.0;

        // Dragging up lowers the camera under the horizon, which is not allowed
        controls.rotate(0.0, -600.0, 600.0);
        controls.update(&mut camera);

        assert!(camera.position.y >= -1e-4);
        assert!((camera.position.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn dolly_respects_distance_limits() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.min_distance = 2.0;
        controls.max_distance = 8.0;

        controls.dolly(100.0);
        controls.update(&mut camera);
        assert!((camera.position.length() - 2.0).abs() < 1e-4);

        controls.dolly(-100.0);
        controls.update(&mut camera);
        assert!((camera.position.length() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.enable_damping = true;
        controls.damping_factor = 0.1;

        controls.rotate(-150.0, 0.0, 600.0);
        controls.update(&mut camera);
        let first_step = Spherical::from_offset(camera.position).theta;
        assert!((first_step - PI / 2.0 * 0.1).abs() < 1e-4);

        for _ in 0..200 {
            controls.update(&mut camera);
        }

        let settled = Spherical::from_offset(camera.position).theta;
        assert!((settled - PI / 2.0).abs() < 1e-3);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(Vec3::ZERO);

        controls.pan(-100.0, 0.0, 600.0, &camera);
        controls.update(&mut camera);

        assert!(controls.target.x > 0.0);
        assert!((camera.position.x - controls.target.x).abs() < 1e-4);
        assert!((camera.position.z - 5.0).abs() < 1e-4);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.enabled = false;

        controls.rotate(300.0, 300.0, 600.0);
        controls.dolly(5.0);
        assert!(!controls.update(&mut camera));
    }
}
