//! The 3x3 vertex grid: three triangles, each on the big ring, each vertex on
//! a small ring around its triangle's center.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

/// Radius of both rings, in clip-space units.
pub const RING_RADIUS: f32 = 0.5;

/// Scale applied to `corner` before it is added to `center` (matches the
/// `CORNER_SCALE` constant in the shaders).
pub const CORNER_SCALE: f32 = 0.5;

pub const POINTS_PER_RING: usize = 3;

/// Vertices drawn per frame.
pub const VERTEX_COUNT: u32 = (POINTS_PER_RING * POINTS_PER_RING) as u32;

const GRID_LEN: usize = POINTS_PER_RING * POINTS_PER_RING;

/// A `float32x2` vertex attribute.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Point {
    pub pos: [f32; 2],
}

impl Point {
    const AT_LOCATION_0: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
    const AT_LOCATION_1: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

    /// Layout of a buffer of `Point`s feeding shader location `location`
    /// (0 or 1).
    pub fn layout(location: u32) -> wgpu::VertexBufferLayout<'static> {
        let attributes: &'static [wgpu::VertexAttribute] = if location == 0 {
            &Self::AT_LOCATION_0
        } else {
            &Self::AT_LOCATION_1
        };

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Point>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}

/// Angle of the `k`-th point on a ring: a multiple of 2π/3.
pub fn ring_angle(k: usize) -> f32 {
    k as f32 * TAU / POINTS_PER_RING as f32
}

fn ring_point(k: usize) -> Point {
    let (sin, cos) = ring_angle(k).sin_cos();
    Point {
        pos: [RING_RADIUS * cos, RING_RADIUS * sin],
    }
}

/// The `center` and `corner` attribute streams.
///
/// Vertex `i * 3 + j` belongs to triangle `i` (center on the big ring at angle
/// `i·2π/3`) and is its `j`-th corner (angle `j·2π/3` on the small ring).
#[derive(Debug, Clone)]
pub struct RingGrid {
    pub centers: [Point; GRID_LEN],
    pub corners: [Point; GRID_LEN],
}

impl RingGrid {
    pub fn new() -> Self {
        let mut centers = [Point::zeroed(); GRID_LEN];
        let mut corners = [Point::zeroed(); GRID_LEN];

        for i in 0..POINTS_PER_RING {
            for j in 0..POINTS_PER_RING {
                let k = i * POINTS_PER_RING + j;
                centers[k] = ring_point(i);
                corners[k] = ring_point(j);
            }
        }

        Self { centers, corners }
    }

    /// Untransformed vertex positions: `center + CORNER_SCALE * corner`.
    pub fn combined(&self) -> [Point; GRID_LEN] {
        let mut out = [Point::zeroed(); GRID_LEN];
        for (k, p) in out.iter_mut().enumerate() {
            let (c, r) = (self.centers[k].pos, self.corners[k].pos);
            p.pos = [c[0] + CORNER_SCALE * r[0], c[1] + CORNER_SCALE * r[1]];
        }
        out
    }
}

impl Default for RingGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn length(p: Point) -> f32 {
        p.pos[0].hypot(p.pos[1])
    }

    #[test]
    fn grid_has_nine_vertices() {
        let grid = RingGrid::new();
        assert_eq!(grid.centers.len(), VERTEX_COUNT as usize);
        assert_eq!(grid.corners.len(), VERTEX_COUNT as usize);
    }

    #[test]
    fn combined_points_are_distinct() {
        let points = RingGrid::new().combined();
        for a in 0..points.len() {
            for b in (a + 1)..points.len() {
                let dx = points[a].pos[0] - points[b].pos[0];
                let dy = points[a].pos[1] - points[b].pos[1];
                assert!(dx.hypot(dy) > 1e-3, "points {a} and {b} coincide");
            }
        }
    }

    #[test]
    fn every_point_lies_on_its_ring() {
        let grid = RingGrid::new();
        for k in 0..grid.centers.len() {
            assert_abs_diff_eq!(length(grid.centers[k]), RING_RADIUS, epsilon = 1e-6);
            assert_abs_diff_eq!(length(grid.corners[k]), RING_RADIUS, epsilon = 1e-6);
        }
    }

    #[test]
    fn combined_corner_sits_at_scaled_radius_from_center() {
        let grid = RingGrid::new();
        let combined = grid.combined();
        for k in 0..combined.len() {
            let d = Point {
                pos: [
                    combined[k].pos[0] - grid.centers[k].pos[0],
                    combined[k].pos[1] - grid.centers[k].pos[1],
                ],
            };
            assert_abs_diff_eq!(length(d), RING_RADIUS * CORNER_SCALE, epsilon = 1e-6);
        }
    }

    #[test]
    fn angles_are_multiples_of_a_third_turn() {
        let grid = RingGrid::new();
        let step = TAU / 3.0;
        for i in 0..POINTS_PER_RING {
            for j in 0..POINTS_PER_RING {
                let k = i * POINTS_PER_RING + j;
                let center = grid.centers[k].pos[1].atan2(grid.centers[k].pos[0]).rem_euclid(TAU);
                let corner = grid.corners[k].pos[1].atan2(grid.corners[k].pos[0]).rem_euclid(TAU);
                assert_abs_diff_eq!(center, i as f32 * step, epsilon = 1e-5);
                assert_abs_diff_eq!(corner, j as f32 * step, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn layouts_are_one_float2_at_stride_8() {
        for location in [0, 1] {
            let layout = Point::layout(location);
            assert_eq!(layout.array_stride, 8);
            assert_eq!(layout.attributes.len(), 1);
            assert_eq!(layout.attributes[0].shader_location, location);
            assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
        }
    }
}
