use std::path::PathBuf;

use clap::Parser;
use shapes_engine::catalog::{ShapeKind, ShapeSpec};
use shapes_engine::geometry::BoxVertexCount;

/// Procedural shape viewer.
///
/// Drag to rotate, arrow keys to nudge the rotation, Space to raise the
/// height grid, Escape to quit.
#[derive(Parser, Debug, Clone)]
#[command(name = "shapes-viewer", version, about)]
pub struct Args {
    /// Shape to show: points, lines, triangles, quad, height-grid, boxes or spheres.
    #[arg(short, long, default_value = "spheres")]
    pub shape: ShapeKind,

    /// Print the available shapes and exit.
    #[arg(long)]
    pub list: bool,

    /// Sphere tessellation (steps per great circle).
    #[arg(long)]
    pub steps: Option<u32>,

    /// Draw spheres with inverse-alpha blending.
    #[arg(long)]
    pub blend: bool,

    /// Use the scalar count of the box bounds as the draw count.
    #[arg(long)]
    pub legacy_box_count: bool,

    /// Image for textured shapes; a checkerboard is used otherwise.
    #[arg(short, long)]
    pub texture: Option<PathBuf>,

    /// Divisor applied to drag distances.
    #[arg(long, default_value_t = 1.0)]
    pub density: f32,

    /// Log filter, e.g. "debug" or "shapes_engine=debug". Overrides RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

impl Args {
    /// Demo parameters for the chosen shape with the overrides applied.
    pub fn shape_spec(&self) -> ShapeSpec {
        let mut spec = ShapeSpec::demo(self.shape);
        match &mut spec {
            ShapeSpec::Spheres(params) => {
                if let Some(steps) = self.steps {
                    params.steps = steps;
                }
                params.blending = self.blend;
            }
            ShapeSpec::Boxes(params) if self.legacy_box_count => {
                params.count_rule = BoxVertexCount::RawScalarCount;
            }
            _ => {}
        }
        spec
    }

    /// Drag divisor, falling back to 1 for non-positive values.
    pub fn density(&self) -> f32 {
        if self.density.is_finite() && self.density > 0.0 {
            self.density
        } else {
            log::warn!("ignoring density {}; using 1", self.density);
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("shapes-viewer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_show_spheres() {
        let args = parse(&[]);
        assert_eq!(args.shape, ShapeKind::Spheres);
        assert_eq!((args.width, args.height), (1280, 720));
        assert_eq!(args.density(), 1.0);
    }

    #[test]
    fn sphere_overrides_reach_the_spec() {
        let spec = parse(&["--shape", "spheres", "--steps", "12", "--blend"]).shape_spec();
        let ShapeSpec::Spheres(p) = spec else { panic!("expected spheres") };
        assert_eq!(p.steps, 12);
        assert!(p.blending);
    }

    #[test]
    fn legacy_box_count_switches_the_rule() {
        let ShapeSpec::Boxes(p) = parse(&["-s", "boxes", "--legacy-box-count"]).shape_spec() else {
            panic!("expected boxes")
        };
        assert_eq!(p.count_rule, BoxVertexCount::RawScalarCount);
    }

    #[test]
    fn unknown_shapes_are_rejected() {
        assert!(Args::try_parse_from(["shapes-viewer", "--shape", "torus"]).is_err());
    }

    #[test]
    fn bad_density_falls_back() {
        assert_eq!(parse(&["--density", "0"]).density(), 1.0);
        assert_eq!(parse(&["--density", "2.5"]).density(), 2.5);
    }
}
