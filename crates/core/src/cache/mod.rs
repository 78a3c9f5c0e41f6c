//! Page resource caching.
//!
//! This module contains:
//! - `window` - the windowed cache keyed by page index
//! - `pool` - a rayon worker pool for deferred resource creation

pub mod pool;
pub mod window;

pub use pool::{Completion, DrainReport, RenderPool};
pub use window::{CacheWindow, PageResourceCache, Publish, ResourceFactory, Ticket, WindowUpdate};
