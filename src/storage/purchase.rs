//! Purchase record Redis operations.
//!
//! Redis key patterns:
//! - `purchase:{buyer}:{post_id}` — purchase record (JSON), no TTL, immutable
//!
//! The key shape carries the uniqueness invariant: at most one record per
//! (buyer, post) pair. Insertion uses SET NX so the storage layer, not the
//! application, arbitrates concurrent writers — exactly one wins, the other
//! observes the existing record.

use crate::models::StoredPurchase;
use redis::AsyncCommands;

/// Insert a purchase record if and only if none exists for this (buyer, post).
///
/// Returns true if this call created the record, false if one already existed.
/// Never overwrites: a purchase record is immutable once written.
pub async fn insert_purchase<C>(
    con: &mut C,
    purchase: &StoredPurchase,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("purchase:{}:{}", purchase.buyer_wallet, purchase.post_id);
    let json =
        serde_json::to_string(purchase).map_err(|e| super::json_error("JSON serialize", e))?;

    let created: bool = con.set_nx(&key, json).await?;
    Ok(created)
}

/// Get the purchase record for a (buyer, post) pair.
pub async fn get_purchase<C>(
    con: &mut C,
    buyer_wallet: &str,
    post_id: &str,
) -> Result<Option<StoredPurchase>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("purchase:{}:{}", buyer_wallet, post_id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let purchase = serde_json::from_str(&data)
                .map_err(|e| super::json_error("JSON deserialize", e))?;
            Ok(Some(purchase))
        }
        None => Ok(None),
    }
}

/// Whether a purchase record exists for a (buyer, post) pair.
pub async fn has_purchased<C>(
    con: &mut C,
    buyer_wallet: &str,
    post_id: &str,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("purchase:{}:{}", buyer_wallet, post_id);
    con.exists(&key).await
}
