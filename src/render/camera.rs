use glam::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y_deg: f32,
}

/// Pixel size of the surface rays are cast through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl CameraController {
    pub fn new(position: [f32; 3], yaw: f32, pitch: f32, fov_y_deg: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            fov_y_deg,
        }
    }

    /// Places the camera `distance` away from `target`, facing it along yaw/pitch.
    pub fn orbiting(target: [f32; 3], yaw: f32, pitch: f32, distance: f32, fov_y_deg: f32) -> Self {
        let mut camera = Self::new(target, yaw, pitch, fov_y_deg);
        wrap_angles(&mut camera.yaw, &mut camera.pitch);
        let (forward, _, _) = camera.basis();
        let distance = distance.max(0.05);
        camera.position = [
            target[0] - forward[0] * distance,
            target[1] - forward[1] * distance,
            target[2] - forward[2] * distance,
        ];
        camera
    }

    pub fn basis(&self) -> ([f32; 3], [f32; 3], [f32; 3]) {
        camera_basis(self.yaw, self.pitch)
    }

    /// World-space ray through a pixel (top-left origin). Returns origin and
    /// unit direction.
    pub fn ray_through(&self, screen_x: f32, screen_y: f32, viewport: Viewport) -> (Vec3, Vec3) {
        let width = viewport.width.max(1) as f32;
        let height = viewport.height.max(1) as f32;
        let aspect = width / height;
        let ndc_x = 2.0 * screen_x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen_y / height;
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();

        let (forward, right, up) = self.basis();
        let dir = Vec3::from_array(forward)
            + Vec3::from_array(right) * (ndc_x * tan_half * aspect)
            + Vec3::from_array(up) * (ndc_y * tan_half);
        (Vec3::from_array(self.position), dir.normalize_or_zero())
    }
}

fn camera_basis(yaw: f32, pitch: f32) -> ([f32; 3], [f32; 3], [f32; 3]) {
    let cos_pitch = pitch.cos();
    let forward = Vec3::new(yaw.cos() * cos_pitch, pitch.sin(), yaw.sin() * cos_pitch);
    let right = Vec3::new(-yaw.sin(), 0.0, yaw.cos());
    let up = right.cross(forward).normalize_or_zero();
    (forward.to_array(), right.to_array(), up.to_array())
}

fn wrap_angles(yaw: &mut f32, pitch: &mut f32) {
    const TWO_PI: f32 = std::f32::consts::PI * 2.0;
    if yaw.is_finite() {
        *yaw = (*yaw + std::f32::consts::PI).rem_euclid(TWO_PI) - std::f32::consts::PI;
    }
    if pitch.is_finite() {
        *pitch = (*pitch + std::f32::consts::PI).rem_euclid(TWO_PI) - std::f32::consts::PI;
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraController, Viewport};
    use glam::Vec3;

    const VIEWPORT: Viewport = Viewport {
        width: 1280,
        height: 720,
    };

    #[test]
    fn orbiting_backs_off_from_target() {
        let camera = CameraController::orbiting([0.0, 0.0, 0.0], 0.0, 0.0, 10.0, 45.0);
        assert!((Vec3::from_array(camera.position) - Vec3::new(-10.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn center_ray_points_forward() {
        let camera = CameraController::orbiting([0.0, 0.0, 0.0], 0.0, 0.0, 10.0, 45.0);
        let (origin, dir) = camera.ray_through(640.0, 360.0, VIEWPORT);
        assert_eq!(origin, Vec3::from_array(camera.position));
        assert!((dir - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn upper_pixels_aim_up_and_right_pixels_aim_right() {
        let camera = CameraController::orbiting([0.0, 0.0, 0.0], 0.0, 0.0, 10.0, 45.0);
        let (_, up_dir) = camera.ray_through(640.0, 0.0, VIEWPORT);
        assert!(up_dir.y > 0.0);
        let (_, right_dir) = camera.ray_through(1279.0, 360.0, VIEWPORT);
        let (_, right, _) = camera.basis();
        assert!(right_dir.dot(Vec3::from_array(right)) > 0.0);
    }

    #[test]
    fn orbiting_keeps_distance_and_wraps_angles() {
        let camera = CameraController::orbiting([1.0, 2.0, 3.0], 7.0, 0.2, 6.0, 45.0);
        let distance = (Vec3::from_array(camera.position) - Vec3::new(1.0, 2.0, 3.0)).length();
        assert!((distance - 6.0).abs() < 1e-4);
        assert!(camera.yaw.abs() <= std::f32::consts::PI);
        assert!(camera.pitch.is_finite());
    }
}
