//! Texture atlas dictionaries: named sub-rectangles of a packed image.

use thiserror::Error;

use super::layout;

/// One packed sub-rectangle, as stored on disk: four little-endian
/// `u16` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasEntry {
    /// Absolute x-coordinate of the upper-left corner, in pixels.
    pub x: u16,
    /// Absolute y-coordinate of the upper-left corner, in pixels.
    pub y: u16,
    /// Width, in pixels.
    pub width: u16,
    /// Height, in pixels.
    pub height: u16,
}

impl AtlasEntry {
    /// Serialized size of one entry, in bytes.
    pub const SIZE: usize = 8;

    fn to_bytes(self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..2].copy_from_slice(&self.x.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.y.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.width.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.height.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            x: u16::from_le_bytes([bytes[0], bytes[1]]),
            y: u16::from_le_bytes([bytes[2], bytes[3]]),
            width: u16::from_le_bytes([bytes[4], bytes[5]]),
            height: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }
}

/// A malformed atlas blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    /// Blob shorter than its own entry count requires.
    #[error("atlas data needs {expected} bytes for {entries} entries, got {actual}")]
    Truncated {
        entries: usize,
        expected: usize,
        actual: usize,
    },
}

/// An atlas dictionary: integer name ids mapped to bounding
/// rectangles.
///
/// Names are kept sorted so lookups are a binary search, matching the
/// on-disk ordering. `names[i]` corresponds to `rects[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Atlas {
    names: Vec<u32>,
    rects: Vec<AtlasEntry>,
}

impl Atlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_count(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Insert or replace the rectangle for `name_id`, keeping the name
    /// array sorted.
    pub fn insert(&mut self, name_id: u32, entry: AtlasEntry) {
        match self.names.binary_search(&name_id) {
            Ok(index) => self.rects[index] = entry,
            Err(index) => {
                self.names.insert(index, name_id);
                self.rects.insert(index, entry);
            }
        }
    }

    /// Look up the rectangle for `name_id`.
    pub fn find(&self, name_id: u32) -> Option<AtlasEntry> {
        self.names
            .binary_search(&name_id)
            .ok()
            .map(|index| self.rects[index])
    }

    /// Iterate entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, AtlasEntry)> + '_ {
        self.names.iter().copied().zip(self.rects.iter().copied())
    }

    /// Serialized size in bytes: count, sorted names, rectangles.
    pub fn byte_size(&self) -> usize {
        layout::atlas_size(self.entry_count())
    }

    /// Serialize: entry count, then the sorted name ids, then the
    /// rectangles, all little-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_size());
        bytes.extend_from_slice(&(self.entry_count() as u32).to_le_bytes());
        for name in &self.names {
            bytes.extend_from_slice(&name.to_le_bytes());
        }
        for rect in &self.rects {
            bytes.extend_from_slice(&rect.to_bytes());
        }
        bytes
    }

    /// Parse an atlas from the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AtlasError> {
        let truncated = |entries: usize| AtlasError::Truncated {
            entries,
            expected: layout::atlas_size(entries),
            actual: bytes.len(),
        };
        if bytes.len() < 4 {
            return Err(truncated(0));
        }
        let count = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        if bytes.len() < layout::atlas_size(count) {
            return Err(truncated(count));
        }
        let names_base = 4;
        let rects_base = names_base + count * 4;
        let mut atlas = Self::new();
        for i in 0..count {
            let name_offset = names_base + i * 4;
            let name = u32::from_le_bytes([
                bytes[name_offset],
                bytes[name_offset + 1],
                bytes[name_offset + 2],
                bytes[name_offset + 3],
            ]);
            let rect_offset = rects_base + i * AtlasEntry::SIZE;
            atlas.insert(
                name,
                AtlasEntry::from_bytes(&bytes[rect_offset..rect_offset + AtlasEntry::SIZE]),
            );
        }
        Ok(atlas)
    }
}
