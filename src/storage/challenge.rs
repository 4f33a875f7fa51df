//! Login challenge Redis operations — the nonce store.
//!
//! Redis key patterns:
//! - `challenge:{wallet}` — outstanding challenge (JSON), short TTL
//!
//! One key per wallet means at most one outstanding challenge: storing a new
//! one overwrites (invalidates) any prior challenge, and the per-key TTL
//! keeps abandoned challenges from accumulating.
//!
//! ## Security: Zeroizing Sensitive Data
//!
//! The retrieved challenge JSON is wrapped in `Zeroizing` so the nonce is
//! cleared from application memory after verification. Redis keeps its own
//! copy until DEL/TTL; this is defense for the application layer only.

use crate::models::StoredChallenge;
use redis::AsyncCommands;
use zeroize::Zeroizing;

/// Store a challenge with TTL, replacing any outstanding one for this wallet.
pub async fn store_challenge<C>(
    con: &mut C,
    wallet_address: &str,
    challenge: &StoredChallenge,
    ttl_secs: u64,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("challenge:{}", wallet_address);
    let json =
        serde_json::to_string(challenge).map_err(|e| super::json_error("JSON serialize", e))?;

    con.set_ex::<_, _, ()>(&key, json, ttl_secs).await?;
    Ok(())
}

/// Atomically take (get and delete) the outstanding challenge for a wallet.
///
/// Uses a Lua script so that of two concurrent callers only one can ever
/// observe the challenge; the read removes the entry in the same step.
pub async fn take_challenge<C>(
    con: &mut C,
    wallet_address: &str,
) -> Result<Option<StoredChallenge>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("challenge:{}", wallet_address);

    // Lua script for atomic GET + DEL
    let script = redis::Script::new(
        r"
        local val = redis.call('GET', KEYS[1])
        if val then
            redis.call('DEL', KEYS[1])
        end
        return val
        ",
    );

    let json: Option<String> = script.key(&key).invoke_async(con).await?;

    match json {
        Some(data) => {
            // Wrap the JSON string in Zeroizing to clear it after use
            let zeroizing_data = Zeroizing::new(data);
            let challenge = serde_json::from_str(&zeroizing_data)
                .map_err(|e| super::json_error("JSON deserialize", e))?;
            Ok(Some(challenge))
        }
        None => Ok(None),
    }
}
