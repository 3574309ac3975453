//! # Outbound Protocol Client
//!
//! The interface the workflows use to talk to the payment switch. Concrete
//! HTTP implementations live outside this crate; the workflows only depend on
//! [`SwitchClient`] and the errors it can raise.

pub mod errors;
pub mod traits;

pub use errors::{ClientError, ClientResult};
pub use traits::SwitchClient;
