//! Content stream interpretation and font decoding for textplace-rs.
//!
//! This crate implements the text-placement pipeline on top of the
//! [lopdf](https://crates.io/crates/lopdf) object model:
//!
//! - [`tokenizer`] — pull lexer turning content-stream bytes into
//!   operator events,
//! - [`interpreter`] — operator dispatch, resource scopes, and Form
//!   XObject recursion,
//! - [`font`] / [`cmap`] / [`standard_fonts`] — byte-string → UTF-8
//!   translation and glyph advance widths,
//! - [`collector`] — the graphics-state machine that folds operator
//!   events into positioned [`PlacedText`] records,
//! - [`provider`] — the document/object provider over `lopdf`.

pub mod cmap;
pub mod collector;
pub mod error;
pub mod font;
pub mod interpreter;
pub mod provider;
pub mod standard_fonts;
pub mod state;
pub mod tokenizer;

pub use cmap::ToUnicodeCMap;
pub use collector::{PlacedText, PlacementCollector};
pub use error::BackendError;
pub use font::{Displacement, FontDecoder, TranslationMethod};
pub use interpreter::{Interpreter, ResourceScope, StreamHandler};
pub use provider::DocumentProvider;
pub use state::{GraphicsState, RenderMode, TextObject};
pub use tokenizer::{Operand, Operation, OperationReader};
