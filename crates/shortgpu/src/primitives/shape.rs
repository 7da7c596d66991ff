use crate::error::{Error, Result};
use crate::math::{Vec2, Vec3};

/// Triangle-list geometry consumed by [`Renderer::add_object`](crate::render::Renderer::add_object).
///
/// Invariants (checked by [`Shape::validate`]):
/// - `vertices`, `uvs` and `normals` have the same length
/// - every entry of `indices` is `< vertices.len()`
///
/// Shapes come from the generators in this module or from an external model
/// loader; the layout is identical either way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub indices: Option<Vec<u32>>,
}

impl Shape {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> Option<usize> {
        self.indices.as_ref().map(Vec::len)
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.vertices.len();
        if self.uvs.len() != n || self.normals.len() != n {
            return Err(Error::invalid(format!(
                "shape attribute lengths differ (vertices {n}, uvs {}, normals {})",
                self.uvs.len(),
                self.normals.len()
            )));
        }

        if let Some(indices) = &self.indices {
            if let Some(&bad) = indices.iter().find(|&&i| i as usize >= n) {
                return Err(Error::invalid(format!(
                    "shape index {bad} out of range for {n} vertices"
                )));
            }
        }

        Ok(())
    }

    /// Appends one vertex with all of its attributes.
    pub(super) fn push(&mut self, position: Vec3, uv: Vec2, normal: Vec3) {
        self.vertices.push(position);
        self.uvs.push(uv);
        self.normals.push(normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Shape {
        Shape {
            vertices: vec![[0.0; 3]; 3],
            uvs: vec![[0.0; 2]; 3],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: None,
        }
    }

    #[test]
    fn valid_shape_passes() {
        assert!(tri().validate().is_ok());
        let indexed = Shape { indices: Some(vec![0, 1, 2]), ..tri() };
        assert!(indexed.validate().is_ok());
        assert_eq!(indexed.index_count(), Some(3));
    }

    #[test]
    fn mismatched_attributes_fail() {
        let mut s = tri();
        s.uvs.pop();
        assert!(matches!(s.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn out_of_range_index_fails() {
        let s = Shape { indices: Some(vec![0, 1, 3]), ..tri() };
        assert!(matches!(s.validate(), Err(Error::InvalidParameter(_))));
    }
}
