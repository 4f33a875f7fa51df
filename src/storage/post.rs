//! Locked post Redis operations.
//!
//! Redis key patterns:
//! - `post:{id}` — post data (JSON), no TTL
//! - `creator_posts:{wallet}` — SET of post ids owned by a creator

use crate::models::StoredPost;
use redis::AsyncCommands;

/// Store a post and index it in the creator's post set.
pub async fn store_post<C>(con: &mut C, post: &StoredPost) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let post_key = format!("post:{}", post.id);
    let creator_key = format!("creator_posts:{}", post.creator_wallet);

    let json = serde_json::to_string(post).map_err(|e| super::json_error("JSON serialize", e))?;

    con.set::<_, _, ()>(&post_key, json).await?;
    con.sadd::<_, _, ()>(&creator_key, &post.id).await?;

    Ok(())
}

/// Get a post by id.
pub async fn get_post<C>(con: &mut C, id: &str) -> Result<Option<StoredPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("post:{}", id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let post = serde_json::from_str(&data)
                .map_err(|e| super::json_error("JSON deserialize", e))?;
            Ok(Some(post))
        }
        None => Ok(None),
    }
}

/// List all posts by a creator, newest first.
pub async fn list_creator_posts<C>(
    con: &mut C,
    creator_wallet: &str,
) -> Result<Vec<StoredPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    let creator_key = format!("creator_posts:{}", creator_wallet);
    let ids: Vec<String> = con.smembers(&creator_key).await?;

    let mut posts = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(post) = get_post(con, &id).await? {
            posts.push(post);
        }
    }

    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(posts)
}
