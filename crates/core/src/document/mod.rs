pub mod config;
pub mod id;
mod lenient;
pub mod model;
pub mod normalize;
pub mod validate;

pub use config::{BlockConfig, BlockKind};
pub use model::{Block, ContentDocument, DOCUMENT_VERSION};
pub use normalize::normalize;
