//! Backend-independent data model for textplace-rs.
//!
//! This crate provides the foundational types used by the placement
//! extraction pipeline: affine matrices and boxes ([`Matrix`], [`Rect`]),
//! the output records ([`TextPlacement`], [`FontInfo`]), the standard PDF
//! text encodings ([`StandardEncoding`], [`FontEncoding`]), and the error
//! and warning types ([`ExtractError`], [`ExtractWarning`]).
//!
//! It has no required external dependencies — `serde` derives for the
//! output records are available behind the optional `serde` feature.

#![deny(missing_docs)]

/// Standard PDF text encodings, Differences handling, and the glyph list.
pub mod encoding;
/// Error, warning, and option types for extraction.
pub mod error;
/// Geometric primitives: points, affine matrices, min/max boxes.
pub mod geometry;
/// Output records: text placements and font descriptions.
pub mod placement;

pub use encoding::{FontEncoding, StandardEncoding, glyph_name_to_char};
pub use error::{ExtractError, ExtractOptions, ExtractWarning, WarningCode};
pub use geometry::{Matrix, Point, Rect};
pub use placement::{FontInfo, TextPlacement};
