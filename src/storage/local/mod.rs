//! Key-value fallback backend, used when no database is configured.

mod backend;
mod kv;

pub use backend::LocalStore;
pub use kv::{Key, KvStore, APP_PREFIX};
