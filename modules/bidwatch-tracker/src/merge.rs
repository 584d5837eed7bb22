use bidwatch_common::Item;

/// Fold a freshly fetched listing into its stored record.
///
/// Listing data (name, image, current bid, closing time) comes from `fresh`.
/// The id, the user's bid and market value, and the archived flag stay as
/// stored. A stored seller ref is kept unless it is empty.
pub fn merge_refreshed(stored: &Item, fresh: Item) -> Item {
    let seller_ref = if stored.seller_ref.is_empty() {
        fresh.seller_ref
    } else {
        stored.seller_ref.clone()
    };

    Item {
        id: stored.id,
        name: fresh.name,
        source_url: stored.source_url.clone(),
        image_url: fresh.image_url,
        seller_ref,
        my_bid: stored.my_bid,
        current_bid: fresh.current_bid,
        reference_value: stored.reference_value,
        closes_at: fresh.closes_at,
        archived: stored.archived,
    }
}
