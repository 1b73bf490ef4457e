//! Resampling filters and their application.
//!
//! The filtering toolkit has three layers:
//!
//! - [`Filter`] evaluates a windowed filter function (box, Kaiser,
//!   Lanczos) at a sample offset, with box-integrated anti-aliasing via
//!   [`sample_box`].
//! - [`PolyphaseKernel`] precomputes one normalized tap column per output
//!   sample for a 1-D resize, applied separably (horizontal pass, then
//!   vertical) by the [`crate::mipmap`] module.
//! - [`FilterKernel1d`] and [`ConvolutionKernel`] cover fixed-footprint
//!   filtering at unchanged dimensions.
//!
//! Out-of-range taps are resolved by a [`BorderMode`].

mod border;
mod convolution;
mod kernel;
mod polyphase;
mod window;

pub use border::{BorderMode, ParseBorderModeError};
pub use convolution::ConvolutionKernel;
pub use kernel::{bessel_i0, sample_box, sample_delta, sample_triangle, sinc, Filter};
pub use polyphase::PolyphaseKernel;
pub use window::FilterKernel1d;
