//! Hestia Processing Library
//!
//! Pure image plumbing used around the generator: data-URL decoding, quality-profile
//! downscaling, CSS-style pixel filters and the local fallback renderer.

pub mod data_url;
pub mod error;
pub mod fallback;
pub mod filters;
pub mod resize;

pub use data_url::{decode_base64_payload, encode_base64, parse_data_url, DataUrl};
pub use error::{ProcessingError, ProcessingResult};
pub use fallback::{FallbackRenderer, FallbackStyle};
pub use filters::{FilterOp, ImageFilters};
pub use resize::{downscale_for_profile, inspect_raster, Prepared};
