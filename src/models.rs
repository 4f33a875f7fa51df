//! Request and response models for the API.
//!
//! All models use serde for serialization/deserialization.
//! Storage models represent Redis data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Request for a login challenge.
#[derive(Debug, Deserialize)]
pub struct ChallengeRequest {
    pub wallet_address: String,
}

/// Response containing the message the client must sign.
#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub message: String,
}

/// Request to verify a signed challenge.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub wallet_address: String,
    pub signature: String, // base64, 64-byte Ed25519 signature
}

/// Response after successful verification.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub token: String,
}

// ============================================================================
// Post Models
// ============================================================================

/// Request to create a locked post.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub image_url: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in SOL.
    pub price: f64,
}

/// A post as seen by a viewer. `image_url` is present only when the viewer
/// is the creator or has a purchase record for the post.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: String,
    pub creator_wallet: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: u64,
    pub is_purchased: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Request to verify an on-chain purchase.
#[derive(Debug, Deserialize)]
pub struct VerifyPurchaseRequest {
    pub post_id: String,
    pub transaction_signature: String,
}

/// Response after a successful purchase verification.
#[derive(Debug, Serialize)]
pub struct VerifyPurchaseResponse {
    pub success: bool,
    pub purchase: StoredPurchase,
}

// ============================================================================
// Storage Models
// ============================================================================

/// Wallet identity record as stored in Redis.
///
/// Created implicitly on first challenge request; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredWallet {
    pub wallet_address: String,
    pub created_at: u64,
}

/// Outstanding login challenge as stored in Redis.
///
/// Holds the full issued message so verification never depends on a
/// client-echoed copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChallenge {
    pub message: String,
    pub created_at: u64,
}

/// Locked post as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPost {
    pub id: String,
    pub creator_wallet: String,
    pub image_url: String,
    pub description: Option<String>,
    /// Price in SOL.
    pub price: f64,
    pub created_at: u64,
}

/// Purchase record as stored in Redis.
///
/// At most one per (buyer, post); immutable and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPurchase {
    pub buyer_wallet: String,
    pub post_id: String,
    pub transaction_signature: String,
    pub created_at: u64,
}

impl StoredPost {
    /// Render this post for a particular viewer, withholding the protected
    /// image URL unless the viewer is the creator or has purchased it.
    pub fn view_for(&self, viewer: Option<&str>, is_purchased: bool) -> PostView {
        let is_creator = viewer == Some(self.creator_wallet.as_str());
        let unlocked = is_creator || is_purchased;
        PostView {
            id: self.id.clone(),
            creator_wallet: self.creator_wallet.clone(),
            description: self.description.clone(),
            price: self.price,
            created_at: self.created_at,
            is_purchased,
            image_url: unlocked.then(|| self.image_url.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> StoredPost {
        StoredPost {
            id: "p1".to_string(),
            creator_wallet: "CreatorWallet111".to_string(),
            image_url: "https://cdn.example/locked.jpg".to_string(),
            description: Some("first post".to_string()),
            price: 0.1,
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_view_hides_image_for_stranger() {
        let view = sample_post().view_for(Some("SomeoneElse"), false);
        assert!(view.image_url.is_none());
        assert!(!view.is_purchased);
    }

    #[test]
    fn test_view_hides_image_for_anonymous() {
        let view = sample_post().view_for(None, false);
        assert!(view.image_url.is_none());
    }

    #[test]
    fn test_view_reveals_image_for_creator() {
        let view = sample_post().view_for(Some("CreatorWallet111"), false);
        assert_eq!(view.image_url.as_deref(), Some("https://cdn.example/locked.jpg"));
    }

    #[test]
    fn test_view_reveals_image_for_purchaser() {
        let view = sample_post().view_for(Some("SomeoneElse"), true);
        assert_eq!(view.image_url.as_deref(), Some("https://cdn.example/locked.jpg"));
        assert!(view.is_purchased);
    }

    #[test]
    fn test_locked_view_serialization_omits_image_url() {
        let view = sample_post().view_for(None, false);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("image_url").is_none());
        assert_eq!(json["price"], 0.1);
    }
}
