//! Container file header construction and serialization.

use thiserror::Error;

use super::attributes::Attributes;
use super::format::ImageFormat;
use super::layout;

/// Serialized size of a container header, in bytes.
pub const HEADER_SIZE: usize = 64;

/// Values carried in the reserved words; doubles as a signature when
/// inspecting files.
const RESERVED_SIGNATURE: [u32; 5] = [b'I' as u32, b'M' as u32, b'G' as u32, b'C' as u32, b'F' as u32];

/// A malformed header blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Fewer than [`HEADER_SIZE`] bytes.
    #[error("container header needs {HEADER_SIZE} bytes, got {0}")]
    Truncated(usize),
    /// Unrecognized format code.
    #[error("unknown container format code {0}")]
    UnknownFormat(i32),
}

/// Fixed 64-byte record at the start of a container file.
///
/// The header carries everything needed to reconstruct the layout of
/// the image data that follows it; readers never re-derive these
/// fields. Image data follows immediately, then an optional atlas
/// section of `atlas_size` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// On-disk code of the stored [`ImageFormat`].
    pub format: i32,
    /// Combination of attribute flags.
    pub flags: Attributes,
    /// Number of items in the image array.
    pub items: u32,
    /// Number of mip levels in each item.
    pub levels: u32,
    /// Width in pixels of level 0 of each item.
    pub width: u32,
    /// Height in pixels of level 0 of each item.
    pub height: u32,
    /// Number of slices in level 0 of each item.
    pub slices: u32,
    /// Total size of all image data, in bytes.
    pub image_size: u64,
    /// Total size of all atlas data, in bytes.
    pub atlas_size: u64,
    /// Reserved for future expansion.
    pub reserved: [u32; 5],
}

impl ContainerHeader {
    /// Build a header for an image array, computing `image_size` from
    /// the layout arithmetic. `atlas_size` starts at zero.
    pub fn new(
        format: ImageFormat,
        flags: Attributes,
        items: u32,
        levels: u32,
        width: u32,
        height: u32,
        slices: u32,
    ) -> Self {
        let image_size = layout::image_size(
            format,
            flags,
            items as usize,
            width as usize,
            height as usize,
            slices as usize,
            levels as usize,
        ) as u64;
        Self {
            format: format.code(),
            flags,
            items,
            levels,
            width,
            height,
            slices,
            image_size,
            atlas_size: 0,
            reserved: RESERVED_SIGNATURE,
        }
    }

    /// Record the size of a trailing atlas section.
    pub fn with_atlas_size(mut self, atlas_size: u64) -> Self {
        self.atlas_size = atlas_size;
        self
    }

    /// The stored format, if the code is recognized.
    pub fn image_format(&self) -> Option<ImageFormat> {
        ImageFormat::from_code(self.format)
    }

    /// Serialize to the fixed 64-byte little-endian wire layout.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        let mut cursor = 0;
        let mut put = |field: &[u8]| {
            bytes[cursor..cursor + field.len()].copy_from_slice(field);
            cursor += field.len();
        };
        put(&self.format.to_le_bytes());
        put(&self.flags.to_le_bytes());
        put(&self.items.to_le_bytes());
        put(&self.levels.to_le_bytes());
        put(&self.width.to_le_bytes());
        put(&self.height.to_le_bytes());
        put(&self.slices.to_le_bytes());
        put(&self.image_size.to_le_bytes());
        put(&self.atlas_size.to_le_bytes());
        for word in &self.reserved {
            put(&word.to_le_bytes());
        }
        bytes
    }

    /// Parse a header from the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < HEADER_SIZE {
            return Err(HeaderError::Truncated(bytes.len()));
        }
        let u32_at = |offset: usize| {
            u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        let u64_at = |offset: usize| {
            let mut field = [0u8; 8];
            field.copy_from_slice(&bytes[offset..offset + 8]);
            u64::from_le_bytes(field)
        };
        let format = u32_at(0) as i32;
        if ImageFormat::from_code(format).is_none() {
            return Err(HeaderError::UnknownFormat(format));
        }
        let mut reserved = [0u32; 5];
        for (i, word) in reserved.iter_mut().enumerate() {
            *word = u32_at(44 + i * 4);
        }
        Ok(Self {
            format,
            flags: u32_at(4) as i32,
            items: u32_at(8),
            levels: u32_at(12),
            width: u32_at(16),
            height: u32_at(20),
            slices: u32_at(24),
            image_size: u64_at(28),
            atlas_size: u64_at(36),
            reserved,
        })
    }
}
