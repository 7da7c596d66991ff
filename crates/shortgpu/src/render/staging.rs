use std::ops::Range;

use crate::device::{BufferDesc, BufferUsage, GraphicsDevice};

/// A uniform buffer with a CPU-side copy.
///
/// Writes land in the copy and widen a single dirty range; [`flush`] uploads
/// that range in one device write.
///
/// [`flush`]: StagedBuffer::flush
pub(crate) struct StagedBuffer<B> {
    buffer: B,
    bytes: Vec<u8>,
    dirty: Option<Range<usize>>,
}

impl<B> StagedBuffer<B> {
    /// Allocates `len` zeroed bytes on the device.
    pub fn new<D>(device: &mut D, label: &str, len: usize) -> Self
    where
        D: GraphicsDevice<Buffer = B> + ?Sized,
    {
        let bytes = vec![0u8; len];
        let buffer = device.create_buffer(&BufferDesc {
            label,
            usage: BufferUsage::Uniform,
            contents: &bytes,
        });
        Self {
            buffer,
            bytes,
            dirty: None,
        }
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn read(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Callers guarantee `offset + data.len() <= self.len()`.
    pub fn write(&mut self, offset: usize, data: &[u8]) {
        let end = offset + data.len();
        self.bytes[offset..end].copy_from_slice(data);
        self.dirty = Some(match self.dirty.take() {
            Some(range) => range.start.min(offset)..range.end.max(end),
            None => offset..end,
        });
    }

    /// Uploads pending bytes. Returns whether a write was issued.
    pub fn flush<D>(&mut self, device: &mut D) -> bool
    where
        D: GraphicsDevice<Buffer = B> + ?Sized,
    {
        match self.dirty.take() {
            Some(range) => {
                device.write_buffer(&self.buffer, range.start as u64, &self.bytes[range]);
                true
            }
            None => false,
        }
    }
}
