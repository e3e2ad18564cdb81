//! Rasterises every cube of a wall into a [`Canvas`].

use crate::faces::{Face, Rgba};
use crate::graphics::{draw_line, draw_triangle, Canvas};
use crate::math::{calculate_normal, multiply_matrices, multiply_matrix_vector, rotation_x, rotation_y};
use crate::state::Orientation;
use crate::surface::Rect;
use crate::vertex::Vertex;
use crate::wall::Cube;

// Define cube vertices
const VERTICES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0], // 0
    [1.0, -1.0, -1.0],  // 1
    [1.0, 1.0, -1.0],   // 2
    [-1.0, 1.0, -1.0],  // 3
    [-1.0, -1.0, 1.0],  // 4
    [1.0, -1.0, 1.0],   // 5
    [1.0, 1.0, 1.0],    // 6
    [-1.0, 1.0, 1.0],   // 7
];

// Faces in `Face::ALL` order, each by 4 vertex indices
const FACES: [(usize, usize, usize, usize); 6] = [
    (0, 1, 2, 3), // front
    (5, 4, 7, 6), // back
    (4, 0, 3, 7), // left
    (1, 5, 6, 2), // right
    (4, 5, 1, 0), // top
    (3, 2, 6, 7), // bottom
];

const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0), // Front face
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4), // Back face
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7), // Connecting edges
];

/// Half the cell pitch taken by each cube, leaving a gap between neighbours
const CUBE_FILL: f64 = 0.34;

/// How a frame is drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    pub background: Rgba,
    pub edge_color: Rgba,
    /// Light position in cube space
    pub light_position: [f64; 3],
    pub wireframe: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            background: Rgba::rgb(0, 0, 0),
            edge_color: Rgba::rgba(163, 255, 18, 0.15),
            light_position: [2.0, 2.0, -5.0],
            wireframe: false,
        }
    }
}

/// Rotated, projected corners of one cube centred at `center`
pub fn project_cube(orientation: Orientation, center: [f64; 2], scale: f64) -> [[f64; 3]; 8] {
    let rotation = multiply_matrices(&rotation_y(orientation.tilt_b), &rotation_x(orientation.tilt_a));
    let mut projected = [[0.0; 3]; 8];
    for (out, vertex) in projected.iter_mut().zip(VERTICES.iter()) {
        let [x, y, z] = multiply_matrix_vector(&rotation, vertex);
        *out = [x * scale + center[0], y * scale + center[1], z];
    }
    projected
}

/// Draws `cubes` (row-major, `grid_size` per side) inside `scene`
pub fn render_wall(
    cubes: &[Cube],
    grid_size: usize,
    scene: Rect,
    now: f64,
    options: &RenderOptions,
    canvas: &mut Canvas,
) {
    canvas.clear(options.background);
    if grid_size == 0 {
        return;
    }
    let cell_w = scene.width / grid_size as f64;
    let cell_h = scene.height / grid_size as f64;
    let scale = cell_w.min(cell_h) * CUBE_FILL;

    for cube in cubes {
        let cell = cube.cell();
        let center = [
            scene.left + (cell.col as f64 + 0.5) * cell_w,
            scene.top + (cell.row as f64 + 0.5) * cell_h,
        ];
        let corners = project_cube(cube.orientation(), center, scale);
        // Every cube is centred on z = 0 at the same scale, so cube-space
        // depth orders faces across the whole wall; screen x/y carry placement
        let local: Vec<[f64; 3]> = corners
            .iter()
            .map(|c| [(c[0] - center[0]) / scale, (c[1] - center[1]) / scale, c[2]])
            .collect();

        if !options.wireframe {
            let colors = cube.faces().colors_at(now);
            for (face, &(a, b, c, d)) in Face::ALL.iter().zip(FACES.iter()) {
                // Face winding yields inward normals
                let inward = calculate_normal(&local[a], &local[b], &local[c]);
                let normal = inward.map(|n| -n);
                let vertex = |i: usize| Vertex {
                    position: local[i],
                    screen_position: [corners[i][0], corners[i][1]],
                    normal,
                };
                let color = options.edge_color.over(colors[*face as usize]);
                draw_triangle(&vertex(a), &vertex(b), &vertex(c), canvas, &options.light_position, color);
                draw_triangle(&vertex(a), &vertex(c), &vertex(d), canvas, &options.light_position, color);
            }
        }

        let edge = if options.wireframe {
            Rgba { a: 1.0, ..options.edge_color }
        } else {
            options.edge_color
        };
        for &(start, end) in &EDGES {
            draw_line(
                corners[start][0],
                corners[start][1],
                corners[end][0],
                corners[end][1],
                canvas,
                edge,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn neutral_cube_projects_to_square() {
        let corners = project_cube(Orientation::NEUTRAL, [10.0, 20.0], 2.0);
        assert_eq!(corners[0], [8.0, 18.0, -1.0]);
        assert_eq!(corners[6], [12.0, 22.0, 1.0]);
    }

    #[test]
    fn tilt_moves_corners() {
        let corners = project_cube(Orientation::new(-35.0, 35.0), [0.0, 0.0], 1.0);
        let neutral = project_cube(Orientation::NEUTRAL, [0.0, 0.0], 1.0);
        assert_ne!(corners, neutral);
        // rotations preserve distance from the centre
        for c in corners {
            assert_abs_diff_eq!((c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt(), 3f64.sqrt(), epsilon = 1e-12);
        }
    }
}
