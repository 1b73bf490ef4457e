//! Attribute flags describing the shape and interpretation of a
//! container's image data.

/// Combination of `ATTRIBUTES_*` flags, stored in the container header.
pub type Attributes = i32;

/// Interpret as a 1-D image.
pub const ATTRIBUTES_1D: Attributes = 1 << 0;
/// Interpret as a 2-D image.
pub const ATTRIBUTES_2D: Attributes = 1 << 1;
/// Interpret as a 3-D volume image.
pub const ATTRIBUTES_3D: Attributes = 1 << 2;
/// Six square faces.
pub const ATTRIBUTES_CUBEMAP: Attributes = 1 << 3;
/// An image array: like a volume, but mip levels do not shrink along
/// the depth axis.
pub const ATTRIBUTES_ARRAY: Attributes = 1 << 4;
/// Carries an atlas data section after the image data.
pub const ATTRIBUTES_ATLAS: Attributes = 1 << 5;
/// Samples are color values.
pub const ATTRIBUTES_COLOR: Attributes = 1 << 6;
/// Samples are depth values.
pub const ATTRIBUTES_DEPTH: Attributes = 1 << 7;
/// Samples are height values.
pub const ATTRIBUTES_HEIGHT: Attributes = 1 << 8;
/// Samples are vector components.
pub const ATTRIBUTES_VECTOR: Attributes = 1 << 9;
/// Data is stored in linear color space rather than gamma.
pub const ATTRIBUTES_LINEAR: Attributes = 1 << 10;
/// Color values are premultiplied by alpha.
pub const ATTRIBUTES_PREMULTIPLIED: Attributes = 1 << 11;

/// Cube faces of a cubemap image, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CubeFace {
    PositiveX = 0,
    NegativeX = 1,
    PositiveY = 2,
    NegativeY = 3,
    PositiveZ = 4,
    NegativeZ = 5,
}

/// Number of faces implied by a flag set: 6 for cubemaps, else 1.
pub fn face_count(flags: Attributes) -> usize {
    if flags & ATTRIBUTES_CUBEMAP != 0 {
        6
    } else {
        1
    }
}

/// Derive the dimensionality flags for a set of image properties,
/// sanitizing degenerate counts to their minimums.
///
/// The caller still sets data-interpretation flags (color, depth, ...)
/// which are not a function of size.
pub fn basic_attributes(
    image_count: usize,
    pixel_width: usize,
    pixel_height: usize,
    slice_count: usize,
    faces_count: usize,
) -> Attributes {
    let image_count = image_count.max(1);
    let pixel_width = pixel_width.max(1);
    let pixel_height = pixel_height.max(1);
    let slice_count = slice_count.max(1);
    // Any face count above one is forced to a full cubemap.
    let faces_count = if faces_count > 1 { 6 } else { faces_count.max(1) };

    let mut flags = 0;
    if image_count > 1 {
        flags |= ATTRIBUTES_ARRAY;
    }
    if faces_count == 6 {
        return flags | ATTRIBUTES_CUBEMAP;
    }
    if slice_count > 1 {
        return flags | ATTRIBUTES_3D;
    }
    if pixel_width > 1 && pixel_height > 1 {
        return flags | ATTRIBUTES_2D;
    }
    flags | ATTRIBUTES_1D
}
