use std::f32::consts::PI;

use super::Shape;

/// UV sphere of radius 0.5.
///
/// `segments` slices around the Y axis (clamped to ≥ 3), `rings` stacks from
/// pole to pole (clamped to ≥ 2). Indexed; the seam column is duplicated so
/// texture coordinates wrap cleanly.
pub fn sphere(segments: u32, rings: u32) -> Shape {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut shape = Shape::default();
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let (sin_theta, cos_theta) = (u * 2.0 * PI).sin_cos();
            let normal = [sin_phi * sin_theta, cos_phi, sin_phi * cos_theta];
            let position = [normal[0] * 0.5, normal[1] * 0.5, normal[2] * 0.5];
            shape.push(position, [u, v], normal);
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            let c = a + 1;
            let d = b + 1;
            if ring != 0 {
                indices.extend_from_slice(&[a, b, c]);
            }
            if ring != rings - 1 {
                indices.extend_from_slice(&[c, b, d]);
            }
        }
    }
    shape.indices = Some(indices);
    shape
}
