pub mod adapters;
pub mod cache;
pub mod error;
pub mod pipeline;
pub mod rate_limit;
pub mod retry;
pub mod router;
pub mod text;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use adapters::cardhobby::CardHobbyAdapter;
pub use adapters::{RateLimit, SourceAdapter};
pub use cache::ItemCache;
pub use error::{FetchError, Result, TransportError};
pub use pipeline::{FetchPipeline, PipelineSettings};
pub use rate_limit::RateLimiter;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use router::AdapterRegistry;
pub use transport::{FetchRequest, HttpTransport, ReqwestTransport, TransportResponse};
