//! End-to-end compiler scenarios.

use mipforge::buffer::PixelBuffer;
use mipforge::compiler::{compile, CompileRequest};
use mipforge::container::{layout, ImageFormat};
use mipforge::pack::{PackError, PixelFormat};

fn checkered_source(width: usize, height: usize, channels: usize) -> PixelBuffer {
    let mut buffer = PixelBuffer::allocate(width, height, channels).unwrap();
    for c in 0..channels {
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 8 + y / 8) % 2 == 0 { 0.9 } else { 0.1 };
                buffer.channel_mut(c)[y * width + x] = v;
            }
        }
    }
    buffer
}

#[test]
fn rgb_source_with_mipmaps_rounds_to_power_of_two() {
    // A 300x200 RGB source with mipmaps requested: dimensions round up
    // to 512x256 and the chain runs down to 1x1.
    let source = checkered_source(300, 200, 3);
    let request = CompileRequest::default().with_mipmaps(0);
    let texture = compile(&source, &request).unwrap();

    assert_eq!(texture.dimensions(), (512, 256));
    assert_eq!(texture.level_count(), 10);
    assert_eq!(texture.channel_count(), 3);

    // Each level halves the previous one, floored, never below 1.
    let mut expected_w = 512;
    let mut expected_h = 256;
    for level in texture.levels() {
        assert_eq!(level.width(), expected_w);
        assert_eq!(level.height(), expected_h);
        expected_w = (expected_w / 2).max(1);
        expected_h = (expected_h / 2).max(1);
    }
}

#[test]
fn premultiplied_single_level_multiplies_color_by_alpha() {
    // 64x64 RGBA, premultiply on, no mipmaps: one level whose color
    // channels equal source color times source alpha.
    let mut source = checkered_source(64, 64, 4);
    for (i, a) in source.channel_mut(3).iter_mut().enumerate() {
        *a = (i % 64) as f32 / 63.0;
    }
    let original = source.clone();

    let request = CompileRequest::default().with_premultiplied_alpha();
    let texture = compile(&source, &request).unwrap();

    assert_eq!(texture.level_count(), 1);
    let level = texture.level(0);
    for c in 0..3 {
        for i in 0..64 * 64 {
            let expected = original.channel(c)[i] * original.channel(3)[i];
            assert!(
                (level.channel(c)[i] - expected).abs() < 1e-5,
                "channel {} sample {}",
                c,
                i
            );
        }
    }
    // Alpha itself is carried through unchanged.
    for i in 0..64 * 64 {
        assert!((level.channel(3)[i] - original.channel(3)[i]).abs() < 1e-6);
    }
}

#[test]
fn packing_two_channel_buffer_to_rgb565_fails() {
    let source = checkered_source(16, 16, 2);
    let texture = compile(&source, &CompileRequest::default()).unwrap();
    let result = texture.pack_levels(PixelFormat::Rgb565);
    assert!(matches!(
        result,
        Err(PackError::ChannelMismatch {
            required: 3,
            actual: 2,
            ..
        })
    ));

    // Four channels satisfy the same format.
    let source = checkered_source(16, 16, 4);
    let texture = compile(&source, &CompileRequest::default()).unwrap();
    assert!(texture.pack_levels(PixelFormat::Rgb565).is_ok());
}

#[test]
fn packed_descriptors_match_container_layout() {
    // The headerless dump descriptors must agree with the container
    // layout arithmetic for the matching plain format.
    let source = checkered_source(64, 64, 4);
    let request = CompileRequest::default().with_mipmaps(0);
    let texture = compile(&source, &request).unwrap();
    let packed = texture
        .pack_levels(PixelFormat::Uint8 { channels: 4 })
        .unwrap();

    let format = ImageFormat::Rgba8;
    assert_eq!(packed.descriptors.len(), layout::miplevel_count(64, 64, 1));
    for (i, descriptor) in packed.descriptors.iter().enumerate() {
        assert_eq!(descriptor.width, layout::miplevel_width(64, i));
        assert_eq!(descriptor.height, layout::miplevel_height(64, i));
        assert_eq!(descriptor.byte_size, layout::miplevel_size(format, 64, 64, 1, i));
        assert_eq!(
            descriptor.byte_offset,
            layout::miplevel_offset(format, 64, 64, 1, i)
        );
    }
    assert_eq!(
        packed.byte_size(),
        layout::subimage_face_size(format, 64, 64, 1, 0)
    );
}

#[test]
fn mip_chain_blends_toward_mid_range() {
    // Downsampling a checkerboard must blend, not pick one cell color:
    // the 1x1 tail of the chain lands strictly between the two source
    // values, and no level escapes the source value range.
    let source = checkered_source(64, 64, 3);
    let request = CompileRequest::default().with_mipmaps(0);
    let texture = compile(&source, &request).unwrap();

    let tail = texture.levels().last().unwrap();
    assert_eq!((tail.width(), tail.height()), (1, 1));
    let blended = tail.channel(0)[0];
    assert!(
        blended > 0.2 && blended < 0.8,
        "1x1 level should be mid-range, got {}",
        blended
    );
    for level in texture.levels() {
        assert!(level.channel_minimum(0) > -0.05);
        assert!(level.channel_maximum(0) < 1.05);
    }
}

#[test]
fn resize_without_mipmaps_keeps_requested_dimensions() {
    let source = checkered_source(128, 128, 3);
    let request = CompileRequest::default().with_target_size(48, 96);
    let texture = compile(&source, &request).unwrap();
    assert_eq!(texture.dimensions(), (48, 96));
    assert_eq!(texture.level_count(), 1);
}
