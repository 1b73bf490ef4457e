//! Byte layout arithmetic for packed container image data.
//!
//! Image data is stored tightly packed as
//! items × faces × mip-levels × slices. These functions compute the
//! exact size and offset of any sub-range so callers can slice byte
//! ranges straight out of a container blob. Everything is integer
//! arithmetic; callers rely on the results being exact.

use super::attributes::{self, Attributes};
use super::format::{FormatFamily, ImageFormat};
use super::AtlasEntry;

/// Number of mip levels from `level0` dimensions down to 1x1x1.
pub fn miplevel_count(level0_width: usize, level0_height: usize, level0_slices: usize) -> usize {
    let mut major = level0_width.max(level0_height).max(level0_slices);
    let mut count = 0;
    while major > 0 {
        major >>= 1;
        count += 1;
    }
    count
}

/// Width of mip level `level_index`, never below one texel.
pub fn miplevel_width(level0_width: usize, level_index: usize) -> usize {
    (level0_width >> level_index).max(1)
}

/// Height of mip level `level_index`, never below one texel.
pub fn miplevel_height(level0_height: usize, level_index: usize) -> usize {
    (level0_height >> level_index).max(1)
}

/// Slice count of mip level `level_index`, never below one slice.
pub fn miplevel_slices(level0_slices: usize, level_index: usize) -> usize {
    (level0_slices >> level_index).max(1)
}

/// Bytes for one 2-D slice of a mip level.
///
/// Block-compressed levels round up to whole 4x4 blocks, so degenerate
/// 1x1 and 2x2 levels still occupy one full block. PVRTC applies the
/// minimum footprints from the IMG_texture_compression_pvrtc spec.
pub fn miplevel_slice_size(
    format: ImageFormat,
    level0_width: usize,
    level0_height: usize,
    level_index: usize,
) -> usize {
    let width = miplevel_width(level0_width, level_index);
    let height = miplevel_height(level0_height, level_index);
    match format.family() {
        FormatFamily::Plain { bytes_per_pixel } => width * height * bytes_per_pixel,
        FormatFamily::Block { bytes_per_block } => {
            width.div_ceil(4) * height.div_ceil(4) * bytes_per_block
        }
        FormatFamily::Pvrtc1 => (width.max(16) * height.max(8) * 2 + 7) / 8,
        FormatFamily::Pvrtc2 => (width.max(8) * height.max(8) * 4 + 7) / 8,
    }
}

/// Bytes for a whole mip level (every slice).
pub fn miplevel_size(
    format: ImageFormat,
    level0_width: usize,
    level0_height: usize,
    level0_slices: usize,
    level_index: usize,
) -> usize {
    miplevel_slice_size(format, level0_width, level0_height, level_index)
        * miplevel_slices(level0_slices, level_index)
}

/// Byte offset of a mip level from the start of its face: the prefix
/// sum of every preceding level's size.
pub fn miplevel_offset(
    format: ImageFormat,
    level0_width: usize,
    level0_height: usize,
    level0_slices: usize,
    level_index: usize,
) -> usize {
    (0..level_index)
        .map(|i| miplevel_size(format, level0_width, level0_height, level0_slices, i))
        .sum()
}

/// Byte offset of a slice from the start of its mip level.
pub fn miplevel_slice_offset(
    format: ImageFormat,
    level0_width: usize,
    level0_height: usize,
    level_index: usize,
    slice_index: usize,
) -> usize {
    miplevel_slice_size(format, level0_width, level0_height, level_index) * slice_index
}

/// Bytes for one face of a sub-image: all requested mip levels.
///
/// A `mipmap_count` of 0 means every level down to 1x1x1.
pub fn subimage_face_size(
    format: ImageFormat,
    level0_width: usize,
    level0_height: usize,
    level0_slices: usize,
    mipmap_count: usize,
) -> usize {
    let count = if mipmap_count == 0 {
        miplevel_count(level0_width, level0_height, level0_slices)
    } else {
        mipmap_count
    };
    (0..count)
        .map(|i| miplevel_size(format, level0_width, level0_height, level0_slices, i))
        .sum()
}

/// Bytes for one sub-image: one face for standard images, six for
/// cubemaps.
pub fn subimage_size(
    format: ImageFormat,
    flags: Attributes,
    level0_width: usize,
    level0_height: usize,
    level0_slices: usize,
    mipmap_count: usize,
) -> usize {
    subimage_face_size(format, level0_width, level0_height, level0_slices, mipmap_count)
        * attributes::face_count(flags)
}

/// Byte offset of a sub-image from the start of image data.
pub fn subimage_offset(
    format: ImageFormat,
    flags: Attributes,
    level0_width: usize,
    level0_height: usize,
    level0_slices: usize,
    mipmap_count: usize,
    image_index: usize,
) -> usize {
    subimage_size(
        format,
        flags,
        level0_width,
        level0_height,
        level0_slices,
        mipmap_count,
    ) * image_index
}

/// Byte offset of a face from the start of its sub-image.
pub fn subimage_face_offset(
    format: ImageFormat,
    level0_width: usize,
    level0_height: usize,
    level0_slices: usize,
    mipmap_count: usize,
    face_index: usize,
) -> usize {
    subimage_face_size(format, level0_width, level0_height, level0_slices, mipmap_count)
        * face_index
}

/// Bytes for the whole image array.
pub fn image_size(
    format: ImageFormat,
    flags: Attributes,
    image_count: usize,
    level0_width: usize,
    level0_height: usize,
    level0_slices: usize,
    mipmap_count: usize,
) -> usize {
    subimage_size(
        format,
        flags,
        level0_width,
        level0_height,
        level0_slices,
        mipmap_count,
    ) * image_count
}

/// Total texels in the pyramid from `level_index` through the last
/// requested level. A `mipmap_count` of 0 means every level.
pub fn pixel_count(
    level0_width: usize,
    level0_height: usize,
    level0_slices: usize,
    level_index: usize,
    mipmap_count: usize,
) -> usize {
    let count = if mipmap_count == 0 {
        miplevel_count(level0_width, level0_height, level0_slices)
    } else {
        mipmap_count
    };
    (level_index..count)
        .map(|i| {
            miplevel_width(level0_width, i)
                * miplevel_height(level0_height, i)
                * miplevel_slices(level0_slices, i)
        })
        .sum()
}

/// Bytes for an atlas dictionary: the sorted name ids, the entry
/// rectangles, and the leading entry count.
pub fn atlas_size(entry_count: usize) -> usize {
    entry_count * std::mem::size_of::<u32>()
        + entry_count * AtlasEntry::SIZE
        + std::mem::size_of::<u32>()
}
