//! Session persistence over two key/value scopes.

mod storage;
mod store;

pub use storage::{KeyValueStore, MemoryKeyValueStore};
pub use store::{ROLE_KEY, SessionState, SessionStore, TOKEN_KEY, USER_KEY};
