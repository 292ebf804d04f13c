use glam::{Mat4, Vec3, Vec4};

use crate::input::RotationDelta;

/// Camera position.
pub const EYE: Vec3 = Vec3::ZERO;
/// Point the camera looks at.
pub const LOOK_AT: Vec3 = Vec3::new(0.0, 0.0, -5.0);
/// Camera up direction.
pub const UP: Vec3 = Vec3::Y;

pub const NEAR: f32 = 1.0;
pub const FAR: f32 = 5000.0;

/// Distance the scene is pushed away from the camera.
pub const MODEL_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -3.5);
/// Light placement relative to the world origin.
pub const LIGHT_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -5.0);

/// Maps GL clip-space depth `[-w, w]` onto the `[0, w]` range wgpu expects.
pub const DEPTH_REMAP: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 0.0),
    Vec4::new(0.0, 0.0, 0.5, 1.0),
);

/// Read-only matrices handed to a shape's render call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTransforms {
    /// `projection × view × model`, GL clip convention.
    pub mvp: Mat4,
    /// `view × model`.
    pub model_view: Mat4,
    /// Light position in eye space.
    pub light_eye: Vec4,
}

impl FrameTransforms {
    /// MVP with depth remapped for wgpu's clip volume.
    pub fn clip_mvp(&self) -> Mat4 {
        DEPTH_REMAP * self.mvp
    }
}

/// Camera, projection and accumulated model rotation.
///
/// Transitions: [`surface_created`](Self::surface_created) once,
/// [`surface_resized`](Self::surface_resized) on every size change and
/// [`frame`](Self::frame) once per presented frame.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    model: Mat4,
    view: Mat4,
    projection: Mat4,
    accumulated: Mat4,
    current: Mat4,
    mvp: Mat4,
    light_model: Vec4,
    light_world: Vec4,
    light_eye: Vec4,
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::look_at_rh(EYE, LOOK_AT, UP),
            projection: frustum(-1.0, 1.0, -1.0, 1.0, NEAR, FAR),
            accumulated: Mat4::IDENTITY,
            current: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
            light_model: Vec4::W,
            light_world: Vec4::W,
            light_eye: Vec4::W,
        }
    }

    /// Resets the camera and drops any accumulated rotation.
    pub fn surface_created(&mut self) {
        self.view = Mat4::look_at_rh(EYE, LOOK_AT, UP);
        self.accumulated = Mat4::IDENTITY;
    }

    /// Rebuilds the projection for a new drawable size.
    ///
    /// A zero height keeps the previous projection.
    pub fn surface_resized(&mut self, width: u32, height: u32) {
        if height == 0 {
            log::debug!("ignoring resize to {width}x0");
            return;
        }
        let ratio = width as f32 / height as f32;
        self.projection = frustum(-ratio, ratio, -1.0, 1.0, NEAR, FAR);
    }

    /// Advances one frame with the rotation collected since the last one.
    pub fn frame(&mut self, delta: RotationDelta) -> FrameTransforms {
        let light_model_matrix = Mat4::from_translation(LIGHT_OFFSET);
        self.light_world = light_model_matrix * self.light_model;
        self.light_eye = self.view * self.light_world;

        self.current = rotation(delta);
        self.accumulated = self.current * self.accumulated;
        self.model = Mat4::from_translation(MODEL_OFFSET) * self.accumulated;

        let model_view = self.view * self.model;
        self.mvp = self.projection * model_view;

        FrameTransforms { mvp: self.mvp, model_view, light_eye: self.light_eye }
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn accumulated(&self) -> Mat4 {
        self.accumulated
    }

    pub fn mvp(&self) -> Mat4 {
        self.mvp
    }

    pub fn light_world(&self) -> Vec4 {
        self.light_world
    }
}

/// Yaw about +Y followed by pitch about +X, angles in degrees.
pub fn rotation(delta: RotationDelta) -> Mat4 {
    Mat4::from_axis_angle(Vec3::Y, delta.yaw.to_radians())
        * Mat4::from_axis_angle(Vec3::X, delta.pitch.to_radians())
}

/// Perspective frustum in GL clip convention (depth in `[-1, 1]`).
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let (w, h, d) = (right - left, top - bottom, far - near);
    Mat4::from_cols(
        Vec4::new(2.0 * near / w, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near / h, 0.0, 0.0),
        Vec4::new((right + left) / w, (top + bottom) / h, -(far + near) / d, -1.0),
        Vec4::new(0.0, 0.0, -2.0 * far * near / d, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn delta(yaw: f32, pitch: f32) -> RotationDelta {
        RotationDelta { yaw, pitch }
    }

    fn ready(width: u32, height: u32) -> TransformPipeline {
        let mut p = TransformPipeline::new();
        p.surface_created();
        p.surface_resized(width, height);
        p
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn frustum_maps_near_and_far_planes_to_clip_bounds() {
        let p = frustum(-1.5, 1.5, -1.0, 1.0, NEAR, FAR);
        let near = p * Vec4::new(0.0, 0.0, -NEAR, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -FAR, 1.0);
        assert_abs_diff_eq!(near.z / near.w, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn resize_scales_horizontal_extent_with_aspect() {
        let p = ready(1600, 800);
        let edge = p.projection() * Vec4::new(2.0, 1.0, -1.0, 1.0);
        assert_abs_diff_eq!(edge.x / edge.w, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(edge.y / edge.w, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_height_keeps_previous_projection() {
        let mut p = ready(800, 600);
        let before = p.projection();
        p.surface_resized(800, 0);
        assert_eq!(p.projection(), before);
    }

    #[test]
    fn depth_remap_targets_zero_to_one() {
        let t = ready(100, 100).frame(RotationDelta::default());
        let clip = t.clip_mvp() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc_z = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&ndc_z));
    }

    // ── per frame ─────────────────────────────────────────────────────────

    #[test]
    fn mvp_is_projection_view_model_for_any_inputs() {
        let mut p = ready(1280, 720);
        for (yaw, pitch) in [(0.0, 0.0), (12.5, -3.0), (-90.0, 45.0), (0.25, 0.0)] {
            let t = p.frame(delta(yaw, pitch));
            let expected = p.projection() * p.view() * p.model();
            assert_abs_diff_eq!(t.mvp, expected, epsilon = 1e-5);
            assert_abs_diff_eq!(p.mvp(), t.mvp, epsilon = 0.0);
            assert_abs_diff_eq!(t.model_view, p.view() * p.model(), epsilon = 1e-5);
        }
    }

    #[test]
    fn rotation_composes_on_the_left() {
        let mut p = ready(640, 480);
        p.frame(delta(30.0, 10.0));
        p.frame(delta(-15.0, 60.0));

        let expected = rotation(delta(-15.0, 60.0)) * rotation(delta(30.0, 10.0));
        assert_abs_diff_eq!(p.accumulated(), expected, epsilon = 1e-5);

        // Order matters: the reverse composition differs.
        let reversed = rotation(delta(30.0, 10.0)) * rotation(delta(-15.0, 60.0));
        assert!(!p.accumulated().abs_diff_eq(reversed, 1e-3));
    }

    #[test]
    fn idle_frames_keep_the_model_still() {
        let mut p = ready(640, 480);
        let first = p.frame(delta(0.0, 0.0));
        let second = p.frame(delta(0.0, 0.0));
        assert_eq!(first, second);
        assert_abs_diff_eq!(
            p.model(),
            Mat4::from_translation(MODEL_OFFSET),
            epsilon = 0.0
        );
    }

    #[test]
    fn surface_created_resets_accumulated_rotation() {
        let mut p = ready(640, 480);
        p.frame(delta(45.0, 0.0));
        p.surface_created();
        assert_eq!(p.accumulated(), Mat4::IDENTITY);
    }

    #[test]
    fn light_sits_five_units_in_front_of_the_eye() {
        let mut p = ready(640, 480);
        let t = p.frame(delta(90.0, 90.0));
        assert_abs_diff_eq!(p.light_world(), Vec4::new(0.0, 0.0, -5.0, 1.0), epsilon = 1e-6);
        // The view looks down -z from the origin, so eye space equals world space.
        assert_abs_diff_eq!(t.light_eye, Vec4::new(0.0, 0.0, -5.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn yaw_turns_about_vertical_axis() {
        let r = rotation(delta(90.0, 0.0));
        let x = r * Vec4::new(1.0, 0.0, 0.0, 0.0);
        assert_abs_diff_eq!(x, Vec4::new(0.0, 0.0, -1.0, 0.0), epsilon = 1e-6);
    }
}
