//! Backend integration
//!
//! Commands flow out through `CoreClient`; updates flow back in through the
//! update stream.

pub mod mock;
pub mod traits;

pub use mock::MockCoreClient;
pub use traits::{CoreClient, CoreError, CoreResult, Endpoint};
