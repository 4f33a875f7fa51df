//! Redis storage layer for wallets, challenges, posts, and purchases.
//!
//! All functions are async and use redis::AsyncCommands.
//! Data is serialized to JSON for storage in Redis.

pub mod challenge;
pub mod post;
pub mod purchase;
pub mod wallet;

/// Wrap a serde_json failure in a RedisError so storage functions expose a
/// single error type.
pub(crate) fn json_error(context: &'static str, err: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, context, err.to_string()))
}

pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_wraps_serde_failure() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let redis_err = json_error("JSON deserialize", serde_err);
        assert_eq!(redis_err.kind(), redis::ErrorKind::TypeError);
        assert!(redis_err.to_string().contains("JSON deserialize"));
    }
}
