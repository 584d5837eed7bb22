//! Orchestration over the fetch pipeline and the item store.

use std::sync::Arc;

use bidwatch_common::{group_by_seller, GroupedItem, Item, ItemFilter};
use bidwatch_fetch::FetchPipeline;
use bidwatch_store::ItemStore;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::merge::merge_refreshed;

/// Refreshes in flight at once. The pipeline's rate limiter still applies.
const REFRESH_CONCURRENCY: usize = 4;

/// A listing URL to start tracking, with the user's own numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub url: String,
    #[serde(default)]
    pub my_bid: f64,
    #[serde(default)]
    pub reference_value: f64,
    /// Overrides the seller the source reports.
    #[serde(default)]
    pub seller_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshFailure {
    pub id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: Vec<RefreshFailure>,
}

pub struct Tracker {
    pipeline: Arc<FetchPipeline>,
    store: Arc<dyn ItemStore>,
}

impl Tracker {
    pub fn new(pipeline: Arc<FetchPipeline>, store: Arc<dyn ItemStore>) -> Self {
        Self { pipeline, store }
    }

    pub fn pipeline(&self) -> &Arc<FetchPipeline> {
        &self.pipeline
    }

    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Fetch a listing without persisting it.
    pub async fn scrape(&self, url: &str) -> Result<Item> {
        Ok(self.pipeline.fetch_item(url).await?)
    }

    /// Fetch a listing and store it with the user's bid and market value.
    pub async fn track_url(&self, request: TrackRequest) -> Result<i64> {
        let mut item = self.pipeline.fetch_item(&request.url).await?;
        item.my_bid = request.my_bid;
        item.reference_value = request.reference_value;
        if let Some(seller_ref) = request.seller_ref.filter(|s| !s.trim().is_empty()) {
            item.seller_ref = seller_ref;
        }

        let id = self.store.insert(item).await?;
        info!(id, url = request.url.as_str(), "Tracking new item");
        Ok(id)
    }

    /// Re-fetch one stored item and write back the merged record.
    ///
    /// The fetch can take a while, so the merge runs against the item as it is
    /// stored when the fetch returns. Edits made in the meantime survive.
    pub async fn refresh_item(&self, id: i64) -> Result<Item> {
        let source_url = self.store.get(id).await?.source_url;
        let fresh = self.pipeline.fetch_item(&source_url).await?;
        let merged = self
            .store
            .modify(
                id,
                Box::new(move |stored: &mut Item| *stored = merge_refreshed(stored, fresh)),
            )
            .await?;
        info!(id, current_bid = merged.current_bid, "Item refreshed");
        Ok(merged)
    }

    /// Refresh every active item. Failures are collected, not propagated.
    pub async fn refresh_all(&self) -> Result<RefreshSummary> {
        let ids: Vec<i64> = self
            .store
            .list(ItemFilter::active())
            .await?
            .into_iter()
            .filter_map(|item| item.id)
            .collect();

        let results: Vec<(i64, Result<Item>)> = stream::iter(ids)
            .map(|id| async move { (id, self.refresh_item(id).await) })
            .buffer_unordered(REFRESH_CONCURRENCY)
            .collect()
            .await;

        let mut summary = RefreshSummary::default();
        for (id, result) in results {
            match result {
                Ok(_) => summary.refreshed += 1,
                Err(e) => {
                    warn!(id, error = %e, "Refresh failed");
                    summary.failed.push(RefreshFailure {
                        id,
                        error: e.to_string(),
                    });
                }
            }
        }
        summary.failed.sort_by_key(|f| f.id);

        info!(
            refreshed = summary.refreshed,
            failed = summary.failed.len(),
            "Refresh pass complete"
        );
        Ok(summary)
    }

    /// Active items grouped by seller for the dashboard.
    pub async fn grouped(&self) -> Result<Vec<GroupedItem>> {
        let items = self.store.list(ItemFilter::active()).await?;
        Ok(group_by_seller(&items))
    }
}
