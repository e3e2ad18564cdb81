use crate::faces::Rgba;

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Rotation about the X axis by `degrees`
pub fn rotation_x(degrees: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]]
}

/// Rotation about the Y axis by `degrees`
pub fn rotation_y(degrees: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]]
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> [f64; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let normal = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let length = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
    [normal[0] / length, normal[1] / length, normal[2] / length]
}

/// Calculates the light intensity based on the normal vector and light position
pub fn calculate_light_intensity(
    normal: &[f64; 3],
    position: &[f64; 3],
    light_pos: &[f64; 3],
) -> f64 {
    let light_dir = [
        light_pos[0] - position[0],
        light_pos[1] - position[1],
        light_pos[2] - position[2],
    ];
    let length = (light_dir[0] * light_dir[0]
        + light_dir[1] * light_dir[1]
        + light_dir[2] * light_dir[2])
        .sqrt();
    let light_dir = [
        light_dir[0] / length,
        light_dir[1] / length,
        light_dir[2] / length,
    ];
    let dot_product =
        normal[0] * light_dir[0] + normal[1] * light_dir[1] + normal[2] * light_dir[2];
    dot_product.max(0.1) // Ensure a minimum ambient light
}

/// Applies lighting to a color
pub fn apply_lighting(color: Rgba, intensity: f64) -> Rgba {
    let scale = |c: u8| (c as f64 * intensity).min(255.0) as u8;
    Rgba::rgb(scale(color.r), scale(color.g), scale(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_rotation_is_identity() {
        let v = [0.3, -1.0, 2.0];
        assert_eq!(multiply_matrix_vector(&rotation_x(0.0), &v), v);
        assert_eq!(multiply_matrix_vector(&rotation_y(0.0), &v), v);
    }

    #[test]
    fn quarter_turns() {
        let x = multiply_matrix_vector(&rotation_y(90.0), &[1.0, 0.0, 0.0]);
        assert_abs_diff_eq!(x[2], -1.0, epsilon = 1e-12);
        let y = multiply_matrix_vector(&rotation_x(90.0), &[0.0, 1.0, 0.0]);
        assert_abs_diff_eq!(y[2], 1.0, epsilon = 1e-12);

        let combined = multiply_matrices(&rotation_y(30.0), &rotation_y(60.0));
        let expected = rotation_y(90.0);
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(combined[i][j], expected[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn lighting_has_ambient_floor() {
        let n = [0.0, 0.0, -1.0];
        assert_abs_diff_eq!(calculate_light_intensity(&n, &[0.0; 3], &[0.0, 0.0, -5.0]), 1.0);
        assert_abs_diff_eq!(calculate_light_intensity(&n, &[0.0; 3], &[0.0, 0.0, 5.0]), 0.1);
        let lit = apply_lighting(Rgba::rgb(200, 100, 10), 0.5);
        assert_eq!(lit, Rgba::rgb(100, 50, 5));
    }
}
