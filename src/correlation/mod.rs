//! # Reply Correlation
//!
//! Request/reply on top of publish/subscribe. A [`DeferredJob`] subscribes to a
//! channel, optionally issues the outbound request, then waits for exactly one
//! published reply or a timeout. The subscription is released exactly once on
//! every exit path.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use switch_adapter_core::cache::{CacheStore, InMemoryCache};
//! use switch_adapter_core::correlation::DeferredJob;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache: Arc<dyn CacheStore> = Arc::new(InMemoryCache::new());
//! let reply = DeferredJob::listen_on(cache, "transfers-abc")
//!     .wait(Duration::from_secs(30))
//!     .await?;
//! println!("reply: {reply}");
//! # Ok(())
//! # }
//! ```

pub mod deferred_job;
pub mod errors;

pub use deferred_job::DeferredJob;
pub use errors::{CorrelationError, CorrelationResult};
