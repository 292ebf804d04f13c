//! UV-spheres tessellated into latitude/longitude cells.

use std::f64::consts::PI;

use super::error::{checked_len, try_vec, GeometryError};
use super::mesh::{tuple_count, MeshData, Topology, COLOR_STRIDE, POSITION_STRIDE};

const SHAPE: &str = "spheres";

/// One center, one RGBA and one radius per sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereSetParams {
    pub centers: Vec<f32>,
    pub colors: Vec<f32>,
    pub radii: Vec<f32>,
    /// Latitude and longitude band count.
    pub steps: u32,
    /// Draw with alpha blending instead of opaque.
    pub blending: bool,
}

pub fn build_spheres(params: &SphereSetParams) -> Result<MeshData, GeometryError> {
    let spheres = tuple_count(SHAPE, "centers", &params.centers, POSITION_STRIDE)?;
    let colors = tuple_count(SHAPE, "colors", &params.colors, COLOR_STRIDE)?;
    if colors != spheres || params.radii.len() != spheres {
        return Err(GeometryError::malformed(
            SHAPE,
            format!(
                "{spheres} centers, {colors} colors and {} radii",
                params.radii.len()
            ),
        ));
    }
    if params.steps == 0 {
        return Err(GeometryError::malformed(SHAPE, "steps must be at least 1"));
    }

    let steps = params.steps as usize;
    let per_sphere = checked_len(SHAPE, &[steps, steps, 6])?;
    let vertices = checked_len(SHAPE, &[per_sphere, spheres])?;
    let mut positions = try_vec(SHAPE, checked_len(SHAPE, &[vertices, 3])?)?;
    let mut out_colors = try_vec(SHAPE, checked_len(SHAPE, &[vertices, 4])?)?;

    for ((center, color), &radius) in params
        .centers
        .chunks_exact(POSITION_STRIDE)
        .zip(params.colors.chunks_exact(COLOR_STRIDE))
        .zip(params.radii.iter())
    {
        tessellate(&mut positions, center, radius, params.steps);
        for _ in 0..per_sphere {
            out_colors.extend_from_slice(color);
        }
    }

    Ok(MeshData {
        topology: Topology::Triangles,
        positions,
        colors: out_colors,
        normals: None,
        uvs: None,
        indices: None,
        draw_count: u32::try_from(vertices)
            .map_err(|_| GeometryError::malformed(SHAPE, "too many vertices for one draw"))?,
    })
}

/// Appends `steps² × 6` vertices for one sphere.
///
/// Geometry is computed in f64 and narrowed on output. The effective radius
/// is twice the requested one.
fn tessellate(out: &mut Vec<f32>, center: &[f32], radius: f32, steps: u32) {
    let r = 2.0 * radius as f64;
    let (cx, cy, cz) = (center[0] as f64, center[1] as f64, center[2] as f64);
    let n = steps as f64;

    for i in 0..steps {
        let lat0 = PI * (-0.5 + i as f64 / n);
        let (z0, zr0) = (r * lat0.sin() + cz, lat0.cos());
        let lat1 = PI * (-0.5 + (i + 1) as f64 / n);
        let (z1, zr1) = (r * lat1.sin() + cz, lat1.cos());

        for j in 0..steps {
            let lng0 = 2.0 * PI * (j as f64 - 1.0) / n;
            let (x0, y0) = (r * lng0.cos(), r * lng0.sin());
            let lng1 = 2.0 * PI * j as f64 / n;
            let (x1, y1) = (r * lng1.cos(), r * lng1.sin());

            let a = [x0 * zr0 + cx, y0 * zr0 + cy, z0];
            let b = [x0 * zr1 + cx, y0 * zr1 + cy, z1];
            let c = [x1 * zr0 + cx, y1 * zr0 + cy, z0];
            let d = [x1 * zr1 + cx, y1 * zr1 + cy, z1];

            for p in [a, b, c, c, b, d] {
                out.extend(p.iter().map(|&v| v as f32));
            }
        }
    }
}
