//! Client side of the fintrack REST service: the session store, the HTTP
//! gateway and one typed client per backend resource.

pub mod api;
pub mod error;
pub mod gateway;
pub mod session;
pub mod storage;
pub mod validation;

pub use api::Api;
pub use error::{ClientError, FieldErrors, Result};
pub use gateway::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, Gateway};
pub use session::SessionStore;
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
