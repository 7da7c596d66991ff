//! Procedural shapes.
//!
//! Conventions shared by every generator:
//! - unit extents centred at the origin (side 1, sphere radius 0.5)
//! - counter-clockwise winding seen from outside, so back-face culling works
//! - output is a pure function of the parameters (no randomness)

mod cube;
mod plane;
mod shape;
mod sphere;
mod triangle;

pub use cube::cube;
pub use plane::plane;
pub use shape::Shape;
pub use sphere::sphere;
pub use triangle::triangle;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec;

    fn all_shapes() -> Vec<(&'static str, Shape)> {
        vec![
            ("triangle", triangle()),
            ("plane", plane(3)),
            ("cube", cube()),
            ("sphere", sphere(12, 8)),
        ]
    }

    /// Triangles as vertex index triples, whether or not the shape is indexed.
    fn triangles(shape: &Shape) -> Vec<[usize; 3]> {
        match &shape.indices {
            Some(idx) => idx
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                .collect(),
            None => (0..shape.vertices.len() / 3).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]).collect(),
        }
    }

    #[test]
    fn generators_are_deterministic() {
        assert_eq!(triangle(), triangle());
        assert_eq!(plane(4), plane(4));
        assert_eq!(cube(), cube());
        assert_eq!(sphere(16, 9), sphere(16, 9));
    }

    #[test]
    fn generators_satisfy_shape_invariants() {
        for (name, shape) in all_shapes() {
            assert!(shape.validate().is_ok(), "{name} failed validation");
            let tri_verts = shape.index_count().unwrap_or(shape.vertex_count());
            assert_eq!(tri_verts % 3, 0, "{name} is not a triangle list");
        }
    }

    #[test]
    fn winding_is_counter_clockwise_from_outside() {
        for (name, shape) in all_shapes() {
            for [a, b, c] in triangles(&shape) {
                let (pa, pb, pc) = (shape.vertices[a], shape.vertices[b], shape.vertices[c]);
                let face = vec::cross(vec::sub(pb, pa), vec::sub(pc, pa));
                if vec::is_zero(face) {
                    // Pole triangles of the sphere collapse to a line.
                    continue;
                }
                let normal = vec::add(vec::add(shape.normals[a], shape.normals[b]), shape.normals[c]);
                assert!(vec::dot(face, normal) > 0.0, "{name}: triangle {a},{b},{c} winds clockwise");
            }
        }
    }

    #[test]
    fn normals_are_unit_length() {
        for (name, shape) in all_shapes() {
            for n in &shape.normals {
                assert!((vec::length(*n) - 1.0).abs() < 1e-5, "{name}: normal {n:?}");
            }
        }
    }

    #[test]
    fn cube_is_non_indexed_and_plane_is_indexed() {
        assert!(!cube().is_indexed());
        assert_eq!(cube().vertex_count(), 36);
        assert_eq!(plane(2).vertex_count(), 9);
        assert_eq!(plane(2).index_count(), Some(24));
    }

    #[test]
    fn subdivisions_are_clamped() {
        assert_eq!(plane(0), plane(1));
        assert_eq!(sphere(0, 0), sphere(3, 2));
    }
}
