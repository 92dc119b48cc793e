pub mod model;
pub mod store;

pub use model::{ApiResponse, PageRecord, SaveContentRequest};
pub use store::{PageStore, StoreError};
