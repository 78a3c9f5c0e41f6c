//! High-level API module for book views.
//!
//! # Example
//!
//! ```ignore
//! use bookfold_core::api::BookView;
//! use bookfold_core::layout::ViewerParams;
//!
//! let mut view = BookView::new(document, factory, ViewerParams::default())?;
//! while view.next().is_some() {}
//! ```

pub mod book;

pub use book::{BookView, SlotLayout};
