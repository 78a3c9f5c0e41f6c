//! bookfold - page composition for paginated book viewers.
//!
//! Computes which pages a book view shows together, how each page is drawn
//! into its slot, and which page resources stay resident around the focus.

pub mod api;
pub mod cache;
pub mod document;
pub mod error;
pub mod geometry;
pub mod layout;

pub use api::{BookView, SlotLayout};
pub use error::{LayoutError, Result};
