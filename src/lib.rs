//! Persistence and aggregation core for the godsaeng school tracker.
//!
//! One facade, [`Storage`], over two interchangeable backends: a relational
//! store when a database is configured, and a namespaced key-value store on
//! local disk otherwise. The choice is made once at startup from
//! [`StorageConfig`]; the single cross-backend path after that is login,
//! which degrades to a local session when the remote store is unreachable.
//!
//! ```no_run
//! use godsaeng_store::{Storage, StorageConfig, UserRole};
//!
//! # async fn run() -> Result<(), godsaeng_store::StorageError> {
//! let storage = Storage::connect(&StorageConfig::from_env()).await?;
//! let user = storage
//!     .login_or_create_user("st1", "Seo", UserRole::Student)
//!     .await?;
//! let courses = storage.list_courses().await?;
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod config;
pub mod model;
pub mod service;
pub mod storage;

pub use config::StorageConfig;
pub use model::{
    Challenge, Course, EffortRow, GrowthRow, HandwritingEntry, RankedCourse, Reflection, User,
    UserRole,
};
pub use service::{Storage, StorageService};
pub use storage::{AnyBackend, LocalStore, StorageBackend, StorageError};
