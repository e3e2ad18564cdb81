use crate::faces::Rgba;
use crate::math::{apply_lighting, calculate_light_intensity, edge_function};
use crate::vertex::Vertex;

/// Pixel buffer with a depth buffer
#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    z_buffer: Vec<f64>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Rgba) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![background; width * height],
            z_buffer: vec![f64::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fills with `background` and resets depth
    pub fn clear(&mut self, background: Rgba) {
        self.pixels.fill(background);
        self.z_buffer.fill(f64::INFINITY);
    }

    /// Resizes if needed, then clears
    pub fn reset(&mut self, width: usize, height: usize, background: Rgba) {
        if width != self.width || height != self.height {
            *self = Canvas::new(width, height, background);
        } else {
            self.clear(background);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let offset = y * self.width + x;
        self.pixels[offset] = color.over(self.pixels[offset]);
    }
}

/// Draws a triangle with per-pixel lighting
pub fn draw_triangle(
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    canvas: &mut Canvas,
    light_pos: &[f64; 3],
    base_color: Rgba,
) {
    if canvas.width == 0 || canvas.height == 0 {
        return;
    }
    let (width, height) = (canvas.width, canvas.height);

    // Compute bounding box of the triangle
    let min_x = v0.screen_position[0]
        .min(v1.screen_position[0])
        .min(v2.screen_position[0])
        .floor()
        .max(0.0) as usize;
    let max_x = v0.screen_position[0]
        .max(v1.screen_position[0])
        .max(v2.screen_position[0])
        .ceil()
        .min(width as f64 - 1.0);
    let min_y = v0.screen_position[1]
        .min(v1.screen_position[1])
        .min(v2.screen_position[1])
        .floor()
        .max(0.0) as usize;
    let max_y = v0.screen_position[1]
        .max(v1.screen_position[1])
        .max(v2.screen_position[1])
        .ceil()
        .min(height as f64 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let (max_x, max_y) = (max_x as usize, max_y as usize);

    // Precompute area of the triangle
    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area == 0.0 {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];

            let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p);
            let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p);
            let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p);

            // Inside when every edge agrees with the triangle's winding
            if w0 * area >= 0.0 && w1 * area >= 0.0 && w2 * area >= 0.0 {
                // Normalize barycentric coordinates
                let w0 = w0 / area;
                let w1 = w1 / area;
                let w2 = w2 / area;

                let px3d = v0.position[0] * w0 + v1.position[0] * w1 + v2.position[0] * w2;
                let py3d = v0.position[1] * w0 + v1.position[1] * w1 + v2.position[1] * w2;
                let pz3d = v0.position[2] * w0 + v1.position[2] * w1 + v2.position[2] * w2;

                // Depth test
                let offset = y * width + x;
                if pz3d < canvas.z_buffer[offset] {
                    canvas.z_buffer[offset] = pz3d;

                    let nx = v0.normal[0] * w0 + v1.normal[0] * w1 + v2.normal[0] * w2;
                    let ny = v0.normal[1] * w0 + v1.normal[1] * w1 + v2.normal[1] * w2;
                    let nz = v0.normal[2] * w0 + v1.normal[2] * w1 + v2.normal[2] * w2;
                    let length = (nx * nx + ny * ny + nz * nz).sqrt();
                    let interpolated_normal = [nx / length, ny / length, nz / length];

                    let light_intensity = calculate_light_intensity(
                        &interpolated_normal,
                        &[px3d, py3d, pz3d],
                        light_pos,
                    );
                    canvas.pixels[offset] = apply_lighting(base_color, light_intensity);
                }
            }
        }
    }
}

/// Draws a line between two points using Bresenham's algorithm, blending
/// `color` over whatever is already there
pub fn draw_line(x0: f64, y0: f64, x1: f64, y1: f64, canvas: &mut Canvas, color: Rgba) {
    let (width, height) = (canvas.width as isize, canvas.height as isize);
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        if x0 >= 0 && x0 < width && y0 >= 0 && y0 < height {
            canvas.blend(x0 as usize, y0 as usize, color);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(x: f64, y: f64) -> Vertex {
        Vertex {
            position: [x, y, 0.0],
            screen_position: [x, y],
            normal: [0.0, 0.0, -1.0],
        }
    }

    #[test]
    fn fills_inside_triangle_only() {
        let mut canvas = Canvas::new(10, 10, Rgba::rgb(0, 0, 0));
        let light = [5.0, 5.0, -100.0];
        draw_triangle(
            &flat(0.0, 0.0),
            &flat(10.0, 0.0),
            &flat(0.0, 10.0),
            &mut canvas,
            &light,
            Rgba::rgb(200, 200, 200),
        );
        assert_ne!(canvas.pixel(1, 1), Rgba::rgb(0, 0, 0));
        assert_eq!(canvas.pixel(9, 9), Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn accepts_either_winding() {
        let mut canvas = Canvas::new(10, 10, Rgba::rgb(0, 0, 0));
        let light = [5.0, 5.0, -100.0];
        draw_triangle(
            &flat(0.0, 0.0),
            &flat(0.0, 10.0),
            &flat(10.0, 0.0),
            &mut canvas,
            &light,
            Rgba::rgb(200, 200, 200),
        );
        assert_ne!(canvas.pixel(1, 1), Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn line_clips_to_canvas() {
        let mut canvas = Canvas::new(4, 4, Rgba::rgb(0, 0, 0));
        draw_line(-2.0, 1.0, 10.0, 1.0, &mut canvas, Rgba::rgb(255, 0, 0));
        for x in 0..4 {
            assert_eq!(canvas.pixel(x, 1), Rgba::rgb(255, 0, 0));
        }
        assert_eq!(canvas.pixel(0, 0), Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn reset_resizes() {
        let mut canvas = Canvas::new(2, 2, Rgba::rgb(0, 0, 0));
        canvas.reset(3, 5, Rgba::rgb(1, 2, 3));
        assert_eq!((canvas.width(), canvas.height()), (3, 5));
        assert_eq!(canvas.pixel(2, 4), Rgba::rgb(1, 2, 3));
    }
}
