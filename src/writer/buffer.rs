//! Binary chunk assembly

use super::document::{
    ARRAY_BUFFER, Accessor, BufferView, ELEMENT_ARRAY_BUFFER, FLOAT, UNSIGNED_BYTE, UNSIGNED_INT,
};
use crate::error::EncodeError;

/// Accumulates the binary chunk together with its views and accessors
#[derive(Debug, Default)]
pub(super) struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<BufferView>,
    accessors: Vec<Accessor>,
}

impl BufferBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Append vertex positions; min/max bounds are recorded on the accessor
    pub(super) fn push_positions(&mut self, positions: &[[f32; 3]]) -> Result<usize, EncodeError> {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        let mut bytes = Vec::with_capacity(positions.len() * 12);
        for position in positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
                bytes.extend_from_slice(&position[axis].to_le_bytes());
            }
        }

        let view = self.push_view(&bytes, ARRAY_BUFFER)?;
        Ok(self.push_accessor(Accessor {
            buffer_view: view,
            component_type: FLOAT,
            normalized: None,
            count: positions.len(),
            kind: "VEC3".to_string(),
            min: Some(min.to_vec()),
            max: Some(max.to_vec()),
        }))
    }

    /// Append triangle indices
    pub(super) fn push_indices(&mut self, indices: &[u32]) -> Result<usize, EncodeError> {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, ELEMENT_ARRAY_BUFFER)?;
        Ok(self.push_accessor(Accessor {
            buffer_view: view,
            component_type: UNSIGNED_INT,
            normalized: None,
            count: indices.len(),
            kind: "SCALAR".to_string(),
            min: None,
            max: None,
        }))
    }

    /// Append normalized 8-bit RGBA vertex colors
    pub(super) fn push_colors(&mut self, colors: &[[u8; 4]]) -> Result<usize, EncodeError> {
        let bytes: Vec<u8> = colors.iter().flatten().copied().collect();
        let view = self.push_view(&bytes, ARRAY_BUFFER)?;
        Ok(self.push_accessor(Accessor {
            buffer_view: view,
            component_type: UNSIGNED_BYTE,
            normalized: Some(true),
            count: colors.len(),
            kind: "VEC4".to_string(),
            min: None,
            max: None,
        }))
    }

    /// Finish, returning the padded binary chunk, its views and accessors
    pub(super) fn finish(mut self) -> (Vec<u8>, Vec<BufferView>, Vec<Accessor>) {
        self.align();
        (self.data, self.views, self.accessors)
    }

    fn push_view(&mut self, bytes: &[u8], target: u32) -> Result<usize, EncodeError> {
        self.align();
        let byte_offset = self.data.len();
        if u32::try_from(byte_offset + bytes.len()).is_err() {
            return Err(EncodeError::BufferTooLarge(format!(
                "{} bytes exceeds the 4 GiB container limit",
                byte_offset + bytes.len()
            )));
        }
        self.data.extend_from_slice(bytes);
        self.views.push(BufferView {
            buffer: 0,
            byte_offset,
            byte_length: bytes.len(),
            target: Some(target),
        });
        Ok(self.views.len() - 1)
    }

    fn push_accessor(&mut self, accessor: Accessor) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    /// Pad to a 4-byte boundary
    fn align(&mut self) {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
    }
}
