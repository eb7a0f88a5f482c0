//! Network clients and the cache/retry collaborators they compose.

pub mod cache;
pub mod edsm;
pub mod edtools;
pub mod retry;

pub use cache::{CacheStatus, CachedPayload, TtlCache};
pub use edsm::{EdsmClient, EdsmError};
pub use edtools::{EdtoolsClient, EdtoolsError};
pub use retry::with_retry;
