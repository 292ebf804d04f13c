//! Lit height grid on the XZ plane with incremental height injection.

use super::error::{checked_len, try_vec, GeometryError};
use super::grid::{check_dimensions, strip_indices};
use super::mesh::{MeshData, Topology};
use super::search::nearest_index;

const SHAPE: &str = "height grid";

/// Scale applied to injected heights.
pub const AMPLITUDE: f32 = 5.0;

/// Grid dimensions and plot window.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGridParams {
    pub columns: u16,
    pub rows: u16,
    /// Width of the plotted window along x and z.
    pub plot_range: f32,
    /// Lower bound of the plotted window along x and z.
    pub plot_min: f32,
}

impl Default for HeightGridParams {
    fn default() -> Self {
        Self { columns: 32, rows: 32, plot_range: 2.2, plot_min: -1.1 }
    }
}

/// A sample in normalized plot units, each component in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeightSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl HeightSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Owns its mesh and the coordinate tables used to place samples.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    columns: usize,
    rows: usize,
    plot_range: f32,
    plot_min: f32,
    /// x coordinate of each column, descending.
    x_table: Vec<f32>,
    /// z coordinate of each row, descending.
    z_table: Vec<f32>,
    mesh: MeshData,
}

impl HeightGrid {
    pub fn new(params: &HeightGridParams) -> Result<Self, GeometryError> {
        let (columns, rows) = (params.columns as usize, params.rows as usize);
        check_dimensions(SHAPE, columns, rows)?;
        if !(params.plot_range.is_finite() && params.plot_range > 0.0) {
            return Err(GeometryError::malformed(SHAPE, "plot range must be positive"));
        }
        let (range, min) = (params.plot_range, params.plot_min);

        let x_table: Vec<f32> = (0..columns)
            .map(|c| min + (columns - 1 - c) as f32 / (columns - 1) as f32 * range)
            .collect();
        let z_table: Vec<f32> = (0..rows)
            .map(|r| min + (1.0 - r as f32 / (rows - 1) as f32) * range)
            .collect();

        let indices = strip_indices(SHAPE, columns, rows)?;
        let vertices = checked_len(SHAPE, &[columns, rows])?;
        let mut positions = try_vec(SHAPE, vertices * 3)?;
        let mut normals = try_vec(SHAPE, vertices * 3)?;
        let mut colors = try_vec(SHAPE, vertices * 4)?;

        for (r, &z) in z_table.iter().enumerate() {
            for (c, &x) in x_table.iter().enumerate() {
                positions.extend_from_slice(&[x, 0.0, z]);
                normals.extend_from_slice(&slope_normal(x, z));
                colors.extend_from_slice(&[
                    0.0,
                    (columns - c) as f32 / columns as f32,
                    r as f32 / rows as f32,
                    1.0,
                ]);
            }
        }

        let draw_count = indices.len() as u32;
        Ok(Self {
            columns,
            rows,
            plot_range: range,
            plot_min: min,
            x_table,
            z_table,
            mesh: MeshData {
                topology: Topology::TriangleStrip,
                positions,
                colors,
                normals: Some(normals),
                uvs: None,
                indices: Some(indices),
                draw_count,
            },
        })
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Raises the vertex nearest to each sample and tints it red.
    ///
    /// Only the matched vertex of each sample changes. Returns the number
    /// of samples applied; samples with non-finite coordinates are skipped.
    pub fn inject(&mut self, samples: &[HeightSample]) -> usize {
        let mut applied = 0;
        for sample in samples {
            let Some(vertex) = self.nearest_vertex(sample) else { continue };

            let lift = self.plot_range / 4.0 + (sample.y * self.plot_range + self.plot_min) / 2.0;
            let y = &mut self.mesh.positions[vertex * 3 + 1];
            *y = (*y + lift) * AMPLITUDE / 2.0;
            let y = *y;

            let color = &mut self.mesh.colors[vertex * 4..vertex * 4 + 4];
            color[0] += y;
            color[1] = 0.0;
            applied += 1;
        }
        applied
    }

    /// Row-major vertex index closest to the sample's horizontal position.
    pub fn nearest_vertex(&self, sample: &HeightSample) -> Option<usize> {
        if !sample.y.is_finite() {
            return None;
        }
        let key_x = sample.x * self.plot_range + self.plot_min;
        let key_z = sample.z * self.plot_range + self.plot_min;
        let c = nearest_index(&self.x_table, key_x)?;
        let r = nearest_index(&self.z_table, key_z)?;
        Some(r * self.columns + c)
    }
}

/// Unit normal of the implicit surface `x² + z²`, facing +y.
fn slope_normal(x: f32, z: f32) -> [f32; 3] {
    let (xs, zs) = (2.0 * x, 2.0 * z);
    let n = [-xs, 1.0, -zs];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    [n[0] / len, n[1] / len, n[2] / len]
}
