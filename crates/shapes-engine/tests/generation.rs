//! End-to-end generation: catalog parameters through the worker to CPU meshes.

use std::time::Duration;

use shapes_engine::catalog::{GeneratedShape, ShapeKind, ShapeSpec};
use shapes_engine::geometry::{BoxSetParams, BoxVertexCount, HeightSample, Topology};
use shapes_engine::scheduler::{notice_channel, Notice, Scheduler};

const TIMEOUT: Duration = Duration::from_secs(20);

fn generate(spec: ShapeSpec) -> GeneratedShape {
    let (notices, rx) = notice_channel();
    let mut scheduler: Scheduler = Scheduler::new(notices);
    scheduler.submit(spec).unwrap();
    let done = scheduler.wait(TIMEOUT).expect("worker finished in time");
    assert!(rx.try_recv().is_err(), "no notice for a successful build");
    done.result.unwrap()
}

// ── every kind ────────────────────────────────────────────────────────────

#[test]
fn every_demo_shape_builds_a_valid_mesh() {
    for kind in ShapeKind::ALL {
        let shape = generate(ShapeSpec::demo(kind));
        assert_eq!(shape.kind(), kind);

        let mesh = shape.mesh();
        mesh.validate().unwrap();
        assert!(mesh.vertex_count() > 0, "{kind} is empty");
        assert!(mesh.draw_count as usize <= mesh.drawable_count() || kind == ShapeKind::Boxes);
    }
}

#[test]
fn topologies_follow_the_shape_family() {
    let expect = [
        (ShapeKind::Points, Topology::Points),
        (ShapeKind::Lines, Topology::Lines),
        (ShapeKind::Triangles, Topology::Triangles),
        (ShapeKind::Quad, Topology::TriangleStrip),
        (ShapeKind::HeightGrid, Topology::TriangleStrip),
        (ShapeKind::Boxes, Topology::Triangles),
        (ShapeKind::Spheres, Topology::Triangles),
    ];
    for (kind, topology) in expect {
        assert_eq!(generate(ShapeSpec::demo(kind)).mesh().topology, topology, "{kind}");
    }
}

#[test]
fn only_lit_shapes_carry_normals() {
    for kind in ShapeKind::ALL {
        let mesh = generate(ShapeSpec::demo(kind)).mesh().clone();
        let lit = matches!(kind, ShapeKind::HeightGrid | ShapeKind::Boxes);
        assert_eq!(mesh.normals.is_some(), lit, "{kind}");
    }
}

// ── shape-specific behaviour ──────────────────────────────────────────────

#[test]
fn raw_scalar_box_count_overshoots_the_vertices() {
    let shape = generate(ShapeSpec::Boxes(BoxSetParams {
        bounds: vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0],
        colors: vec![1.0, 1.0, 1.0, 1.0],
        count_rule: BoxVertexCount::RawScalarCount,
    }));
    let mesh = shape.mesh();
    assert_eq!(mesh.vertex_count(), 36);
    assert_eq!(mesh.draw_count, 216);
}

#[test]
fn generated_height_grid_accepts_samples() {
    let GeneratedShape::HeightGrid(mut grid) = generate(ShapeSpec::demo(ShapeKind::HeightGrid))
    else {
        panic!("expected a height grid");
    };
    let before = grid.mesh().positions.clone();
    assert_eq!(grid.inject(&[HeightSample::new(0.5, 0.8, 0.5)]), 1);

    let changed = before
        .chunks(3)
        .zip(grid.mesh().positions.chunks(3))
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(changed, 1);
}

#[test]
fn spheres_keep_their_blend_flag() {
    let ShapeSpec::Spheres(mut params) = ShapeSpec::demo(ShapeKind::Spheres) else {
        unreachable!()
    };
    params.blending = true;
    params.steps = 8;
    match generate(ShapeSpec::Spheres(params)) {
        GeneratedShape::Spheres { blending, .. } => assert!(blending),
        other => panic!("unexpected {:?}", other.kind()),
    }
}

// ── failures ──────────────────────────────────────────────────────────────

#[test]
fn mismatched_arrays_fail_with_a_notice_and_the_worker_recovers() {
    let (notices, rx) = notice_channel();
    let mut scheduler: Scheduler = Scheduler::new(notices);

    let ShapeSpec::Spheres(mut bad) = ShapeSpec::demo(ShapeKind::Spheres) else { unreachable!() };
    bad.radii.pop();
    scheduler.submit(ShapeSpec::Spheres(bad)).unwrap();
    assert!(scheduler.wait(TIMEOUT).unwrap().result.is_err());
    assert!(matches!(rx.try_recv().unwrap(), Notice::GenerationFailed { .. }));

    scheduler.submit(ShapeSpec::demo(ShapeKind::Lines)).unwrap();
    assert!(scheduler.wait(TIMEOUT).unwrap().result.is_ok());
}
