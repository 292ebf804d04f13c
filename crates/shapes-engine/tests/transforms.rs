//! Transform sequences driven the way the session drives them.

use std::sync::Arc;
use std::thread;

use approx::assert_abs_diff_eq;
use glam::{Mat4, Vec3, Vec4};

use shapes_engine::input::{
    InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
    PointerTracker, RotationDelta, RotationInput,
};
use shapes_engine::transform::{rotation, TransformPipeline, MODEL_OFFSET};

fn ready(width: u32, height: u32) -> TransformPipeline {
    let mut p = TransformPipeline::new();
    p.surface_created();
    p.surface_resized(width, height);
    p
}

fn yaw(degrees: f32) -> RotationDelta {
    RotationDelta { yaw: degrees, pitch: 0.0 }
}

// ── accumulation ──────────────────────────────────────────────────────────

#[test]
fn frames_compose_rotations_left_to_right() {
    let mut p = ready(800, 600);
    let a = RotationDelta { yaw: 20.0, pitch: 5.0 };
    let b = RotationDelta { yaw: -7.0, pitch: 12.0 };
    p.frame(a);
    p.frame(b);
    assert_abs_diff_eq!(p.accumulated(), rotation(b) * rotation(a), epsilon = 1e-5);
}

#[test]
fn four_quarter_turns_return_home() {
    let mut p = ready(640, 480);
    for _ in 0..4 {
        p.frame(yaw(90.0));
    }
    assert_abs_diff_eq!(p.accumulated(), Mat4::IDENTITY, epsilon = 1e-4);
    assert_abs_diff_eq!(p.model(), Mat4::from_translation(MODEL_OFFSET), epsilon = 1e-4);
}

#[test]
fn idle_frames_keep_the_mvp_stable() {
    let mut p = ready(1280, 720);
    p.frame(yaw(30.0));
    let first = p.frame(RotationDelta::default());
    let second = p.frame(RotationDelta::default());
    assert_eq!(first, second);
    assert_abs_diff_eq!(second.mvp, p.projection() * p.view() * p.model(), epsilon = 1e-5);
}

#[test]
fn recreating_the_surface_drops_accumulated_rotation() {
    let mut p = ready(800, 600);
    p.frame(yaw(45.0));
    p.surface_created();
    assert_eq!(p.accumulated(), Mat4::IDENTITY);
}

// ── projection ────────────────────────────────────────────────────────────

#[test]
fn model_origin_lands_inside_the_clip_volume() {
    let mut p = ready(1024, 768);
    let t = p.frame(RotationDelta::default());

    let clip = t.clip_mvp() * Vec4::W;
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
    assert!((0.0..=1.0).contains(&ndc.z));
}

#[test]
fn wider_surfaces_narrow_the_horizontal_scale() {
    let square = ready(600, 600).projection();
    let wide = ready(1200, 600).projection();
    assert_abs_diff_eq!(wide.x_axis.x * 2.0, square.x_axis.x, epsilon = 1e-6);
    assert_eq!(wide.y_axis.y, square.y_axis.y);
}

#[test]
fn light_sits_in_front_of_the_camera() {
    let mut p = ready(800, 600);
    let t = p.frame(yaw(60.0));
    assert_abs_diff_eq!(t.light_eye.truncate(), Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
}

// ── input to transforms ───────────────────────────────────────────────────

#[test]
fn drag_from_another_thread_reaches_the_next_frame() {
    let input = Arc::new(RotationInput::new());
    let producer = {
        let input = Arc::clone(&input);
        thread::spawn(move || {
            let mut tracker = PointerTracker::new(1.0);
            let events = [
                InputEvent::PointerButton(PointerButtonEvent {
                    button: MouseButton::Left,
                    state: MouseButtonState::Pressed,
                    x: 100.0,
                    y: 100.0,
                }),
                InputEvent::PointerMoved(PointerMoveEvent { x: 140.0, y: 100.0 }),
                InputEvent::PointerMoved(PointerMoveEvent { x: 180.0, y: 110.0 }),
            ];
            for event in &events {
                if let Some(delta) = tracker.handle(event) {
                    input.add(delta);
                }
            }
        })
    };
    producer.join().unwrap();

    let delta = input.take();
    assert_eq!(delta, RotationDelta { yaw: 40.0, pitch: 5.0 });

    let mut p = ready(800, 600);
    p.frame(delta);
    assert_abs_diff_eq!(p.accumulated(), rotation(delta), epsilon = 1e-6);
    assert!(input.take().is_zero());
}
