//! Client side of the persistence gateway: load/overwrite page content,
//! debounced autosave, and the editing session tying them to a repository.

pub mod debounce;
pub mod gateway;
pub mod http;
pub mod session;

pub use debounce::Debouncer;
pub use gateway::{PageGateway, PersistenceError};
pub use http::HttpPageGateway;
pub use session::EditorSession;
