use super::Shape;

/// Square in the XZ plane facing +Y, split into `subdivisions`² cells.
///
/// Indexed. `subdivisions` is clamped to at least 1. Vertices run row by row
/// from the +Z edge towards -Z, left to right within a row.
pub fn plane(subdivisions: u32) -> Shape {
    let n = subdivisions.max(1);
    let step = 1.0 / n as f32;
    let normal = [0.0, 1.0, 0.0];

    let mut shape = Shape::default();
    for row in 0..=n {
        for col in 0..=n {
            let u = col as f32 * step;
            let v = row as f32 * step;
            shape.push([u - 0.5, 0.0, 0.5 - v], [u, 1.0 - v], normal);
        }
    }

    let stride = n + 1;
    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for row in 0..n {
        for col in 0..n {
            let bl = row * stride + col;
            let br = bl + 1;
            let tl = bl + stride;
            let tr = tl + 1;
            indices.extend_from_slice(&[bl, br, tr, bl, tr, tl]);
        }
    }
    shape.indices = Some(indices);
    shape
}
