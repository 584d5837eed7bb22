pub mod config;
pub mod grouping;
pub mod sellers;
pub mod types;

pub use config::Config;
pub use grouping::{flatten_groups, group_by_seller};
pub use sellers::{known_sellers, seller_for_url, Seller};
pub use types::*;
