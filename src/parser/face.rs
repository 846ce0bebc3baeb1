//! Face directive resolution
//!
//! A face token is either a bare 1-based vertex reference (`7`) or a compound
//! reference (`7/3/2`, `7//2`) whose auxiliary texture and normal indices are
//! ignored. References are checked against the vertex count at the point the
//! face line is read; rejected references are dropped one at a time.

/// Why a single face token was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RejectedReference {
    /// Token is not an integer
    NotAnIndex(String),
    /// Integer that does not name an existing vertex
    OutOfRange(i64),
}

/// Resolve one face token to a zero-based vertex index
pub(super) fn resolve_reference(
    token: &str,
    vertex_count: usize,
) -> Result<usize, RejectedReference> {
    let head = token.split('/').next().unwrap_or_default();
    let one_based = head
        .parse::<i64>()
        .map_err(|_| RejectedReference::NotAnIndex(token.to_string()))?;

    if one_based < 1 {
        return Err(RejectedReference::OutOfRange(one_based));
    }
    let index = (one_based - 1) as usize;
    if index >= vertex_count {
        return Err(RejectedReference::OutOfRange(one_based));
    }
    Ok(index)
}

/// Resolve every token of a face line, keeping valid indices in order
pub(super) fn resolve_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    vertex_count: usize,
) -> (Vec<usize>, Vec<RejectedReference>) {
    let mut indices = Vec::new();
    let mut rejected = Vec::new();
    for token in tokens {
        match resolve_reference(token, vertex_count) {
            Ok(index) => indices.push(index),
            Err(reason) => rejected.push(reason),
        }
    }
    (indices, rejected)
}
