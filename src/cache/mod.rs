//! # Cache Store
//!
//! The only shared resource of the workflow core: a key/value store that also
//! offers publish/subscribe.
//!
//! ## Architecture
//!
//! ```text
//! Arc<dyn CacheStore>
//!   ├── get / set                       <- workflow snapshots, one key per instance
//!   └── subscribe / publish / unsubscribe <- reply correlation channels
//! ```
//!
//! Each workflow instance owns exactly one key, so writes never race on a
//! key. Subscriptions are ephemeral and owned by the correlator that created
//! them.

pub mod errors;
pub mod providers;
pub mod traits;

pub use errors::{CacheError, CacheResult};
pub use providers::InMemoryCache;
pub use traits::{CacheStore, MessageHandler, SubscriptionId};
