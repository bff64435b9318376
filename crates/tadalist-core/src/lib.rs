//! # Tadalist Core Library
//!
//! This library provides the core business logic for Tadalist, a habit
//! tracker that organizes tasks into named groups, each with a daily
//! completion goal driving a consecutive-day streak counter. All operations
//! are available through this library, with the CLI binary being a thin
//! presentation layer over the same core.
//!
//! ## Architecture
//!
//! - **Streak Engine**: a pure reconciliation function invoked after every
//!   task or threshold mutation; the sole authority over a group's streak,
//!   streak anchor date, and daily progress history
//! - **Store**: an explicit state container owning the group collection,
//!   persisting the whole collection as a single JSON blob after each
//!   mutation
//! - **Storage**: key-value blob store seam with a file-backed
//!   implementation under `~/.config/tadalist/`
//! - **Clock**: injectable day-boundary source so "today" can be simulated
//!   deterministically in tests
//!
//! ## Key Components
//!
//! - [`reconcile`]: the streak reconciliation engine
//! - [`AppStore`]: group collection and mutation operations
//! - [`BlobStore`]: persistence seam
//! - [`Clock`]: day-boundary source

pub mod dates;
pub mod error;
pub mod model;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;

pub use dates::{are_consecutive_days, yesterday, Clock, FixedClock, LocalClock};
pub use error::{CoreError, Result, StorageError};
pub use model::{DailyProgress, Group, Task, MIN_STREAK_THRESHOLD};
pub use stats::{CollectionStats, GroupToday};
pub use storage::{data_dir, BlobStore, FileBlobStore, MemoryBlobStore};
pub use store::{AppStore, STORAGE_KEY};
pub use streak::{reconcile, RETENTION_DAYS};
