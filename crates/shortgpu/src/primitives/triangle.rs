use super::Shape;

/// Single triangle in the XY plane facing +Z.
pub fn triangle() -> Shape {
    let mut shape = Shape::default();
    let normal = [0.0, 0.0, 1.0];
    shape.push([-0.5, -0.5, 0.0], [0.0, 1.0], normal);
    shape.push([0.5, -0.5, 0.0], [1.0, 1.0], normal);
    shape.push([0.0, 0.5, 0.0], [0.5, 0.0], normal);
    shape
}
