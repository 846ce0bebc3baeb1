//! Polygon to triangle decomposition
//!
//! Faces are split with a fan anchored at their first corner. For a
//! quadrilateral this is the `v0-v2` diagonal: `(v0, v1, v2)` and
//! `(v0, v2, v3)`. The split is fixed rather than area or angle optimized, so
//! the same face always produces the same triangles regardless of which
//! assembly mode asks for them.

use crate::model::{Face, Triangle};

/// Triangulate a single face
///
/// A face with `n` corners yields exactly `n - 2` triangles, all of which use
/// only the face's own indices.
///
/// # Example
///
/// ```
/// use roomglb::model::{Face, Triangle};
/// use roomglb::triangulation::triangulate;
///
/// let quad = Face::new(vec![0, 1, 2, 3]).unwrap();
/// assert_eq!(
///     triangulate(&quad),
///     vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)]
/// );
/// ```
pub fn triangulate(face: &Face) -> Vec<Triangle> {
    let indices = face.indices();
    let Some((&origin, rest)) = indices.split_first() else {
        return Vec::new();
    };
    rest.windows(2)
        .map(|pair| Triangle::new(origin, pair[0], pair[1]))
        .collect()
}

/// Triangulate a sequence of faces, concatenating the results in order
pub fn triangulate_all<'a>(faces: impl IntoIterator<Item = &'a Face>) -> Vec<Triangle> {
    faces.into_iter().flat_map(triangulate).collect()
}
