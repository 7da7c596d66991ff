use super::Shape;
use crate::math::{vec, Vec3};

/// Faces as (normal, u axis, v axis) with `u × v == normal`, which keeps every
/// face counter-clockwise from outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// Corner offsets (along u, along v) of the two triangles of a face.
const CORNERS: [(f32, f32); 6] = [
    (-0.5, -0.5),
    (0.5, -0.5),
    (0.5, 0.5),
    (-0.5, -0.5),
    (0.5, 0.5),
    (-0.5, 0.5),
];

/// Unit cube, 36 non-indexed vertices with flat per-face normals.
pub fn cube() -> Shape {
    let mut shape = Shape::default();
    for (normal, u_axis, v_axis) in FACES {
        let center = vec::scale(normal, 0.5);
        for (a, b) in CORNERS {
            let position = vec::add(center, vec::add(vec::scale(u_axis, a), vec::scale(v_axis, b)));
            shape.push(position, [a + 0.5, 0.5 - b], normal);
        }
    }
    shape
}
