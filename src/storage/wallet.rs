//! Wallet identity Redis operations.
//!
//! Redis key patterns:
//! - `wallet:{address}` — identity record (JSON), no TTL

use crate::models::StoredWallet;
use redis::AsyncCommands;

/// Ensure an identity record exists for a wallet address.
///
/// SET NX keeps the original record (and its first-seen timestamp) when one
/// already exists; this is an upsert, not a duplicate-error path.
pub async fn upsert_wallet<C>(con: &mut C, wallet_address: &str) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("wallet:{}", wallet_address);
    let record = StoredWallet {
        wallet_address: wallet_address.to_string(),
        created_at: super::unix_now(),
    };
    let json =
        serde_json::to_string(&record).map_err(|e| super::json_error("JSON serialize", e))?;

    let _: bool = con.set_nx(&key, json).await?;
    Ok(())
}

/// Get a wallet identity record by address.
pub async fn get_wallet<C>(
    con: &mut C,
    wallet_address: &str,
) -> Result<Option<StoredWallet>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("wallet:{}", wallet_address);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let wallet = serde_json::from_str(&data)
                .map_err(|e| super::json_error("JSON deserialize", e))?;
            Ok(Some(wallet))
        }
        None => Ok(None),
    }
}
