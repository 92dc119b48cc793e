//! Content-block document model for the page builder.
//!
//! - [`document`]: block schema, legacy content normalizer, invariants
//! - [`repository`]: in-memory CRUD and reorder engine
//! - [`layout`]: floating-image layout contract for rich text
//! - [`persistence`]: gateway client, debounced autosave, editing session
//! - [`page`]: server-side page content storage
//! - [`events`]: editor event bus

pub mod document;
pub mod events;
pub mod layout;
pub mod page;
pub mod persistence;
pub mod repository;

pub use document::{normalize, Block, BlockConfig, BlockKind, ContentDocument};
pub use repository::{BlockPatch, BlockRepository};
