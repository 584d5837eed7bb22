pub mod error;
pub mod exchange;
pub mod merge;
pub mod scheduler;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use exchange::{ExchangeRateService, RateSource, FALLBACK_USD_PER_CAD};
pub use merge::merge_refreshed;
pub use scheduler::start_refresh_interval;
pub use tracker::{RefreshFailure, RefreshSummary, TrackRequest, Tracker};
