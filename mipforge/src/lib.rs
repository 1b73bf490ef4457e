//! mipforge - texture compilation for GPU consumption
//!
//! This library turns a decoded raster image into a gamma-correct,
//! mip-mapped pixel pyramid and packs it into wire pixel formats, along
//! with exact byte-layout arithmetic for a generic image container that
//! stores items × faces × mip-levels × slices in one packed blob.
//!
//! # High-Level API
//!
//! Most callers go through the [`compiler`] module:
//!
//! ```no_run
//! use mipforge::buffer::PixelBuffer;
//! use mipforge::compiler::{compile, CompileRequest};
//! use mipforge::pack::PixelFormat;
//!
//! let source = PixelBuffer::from_image(&image::open("albedo.png").unwrap()).unwrap();
//! let request = CompileRequest::default().with_mipmaps(0);
//! let texture = compile(&source, &request).unwrap();
//! let packed = texture.pack_levels(PixelFormat::Uint8 { channels: 4 }).unwrap();
//! std::fs::write("albedo.tex", packed.concat()).unwrap();
//! ```
//!
//! The [`container`] module is independent of the compiler and provides
//! the pure layout arithmetic (level sizes, offsets, header and atlas
//! records) used when slicing sub-images out of a container file.

pub mod buffer;
pub mod compiler;
pub mod container;
pub mod filter;
pub mod logging;
pub mod mipmap;
pub mod pack;

/// Version of the mipforge library and CLI.
///
/// Synchronized across all workspace members; defined in `Cargo.toml`
/// and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
