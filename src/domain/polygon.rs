use super::Coordinate;

/// An open ring of coordinates as drawn by the user.
///
/// The last vertex implicitly connects back to the first. Consecutive
/// duplicate vertices are collapsed on construction, and a trailing copy of
/// the first vertex is dropped, so the stored ring is always open.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Coordinate>,
}

impl Polygon {
    pub fn new(points: impl IntoIterator<Item = Coordinate>) -> Self {
        let mut vertices: Vec<Coordinate> = Vec::new();
        for point in points {
            if vertices.last() != Some(&point) {
                vertices.push(point);
            }
        }
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over the edges of the implicitly closed ring
    pub fn edges(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl From<Vec<Coordinate>> for Polygon {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}
