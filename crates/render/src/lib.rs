//! Public renderer for block documents.
//!
//! Takes a normalized [`blockpage_core::ContentDocument`] and produces the
//! markup shown to visitors: active blocks only, in `order` sequence, rich
//! text sanitized and laid out with the same floating-image styles the editor
//! writes.

mod blocks;
pub mod engine;
pub mod html;
pub mod media;
pub mod video;

pub use engine::{RenderedBlock, RenderedPage, Renderer};
pub use media::MediaResolver;
pub use video::VideoSource;
