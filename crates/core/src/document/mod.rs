//! Document module - capability traits the engine consumes.
//!
//! This module contains:
//! - `page` - page and document traits, box kinds, resolved page geometry
//! - `memory` - an in-memory document adapter

pub mod memory;
pub mod page;

pub use memory::{StaticDocument, StaticPage};
pub use page::{BoxKind, DocumentProvider, PageGeometry, PageSource, Rotation, resolve_box};
