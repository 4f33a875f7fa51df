//! On-chain purchase verification.
//!
//! Payment validity is re-derived from ledger state, never taken from the
//! client's claim of success. The flow: load the post, fetch the referenced
//! transaction at confirmed commitment, check the parties and the transferred
//! amount, then insert the purchase record. The SET NX insert is the sole
//! concurrency guard — of two racing verifications for the same (buyer, post)
//! exactly one creates the record and the loser gets `AlreadyPurchased`.

use crate::error::AppError;
use crate::ledger::{LedgerClient, LedgerTransaction};
use crate::models::{StoredPost, StoredPurchase};
use crate::storage;
use redis::AsyncCommands;

/// Absolute tolerance when comparing the observed transfer to the post price,
/// in SOL. Absorbs lamport-conversion rounding plus the transaction fee the
/// buyer pays on top of the transfer; far below any meaningful underpayment.
pub const PRICE_TOLERANCE_SOL: f64 = 0.0001;

/// Structural and monetary checks against a fetched transaction.
///
/// The fee payer must be the buyer, the creator must be among the accounts
/// touched, and the fee payer's net balance decrease must match the post
/// price within [`PRICE_TOLERANCE_SOL`].
pub fn check_transaction(
    tx: &LedgerTransaction,
    buyer_wallet: &str,
    post: &StoredPost,
) -> Result<(), AppError> {
    if tx.fee_payer() != Some(buyer_wallet) || !tx.involves(&post.creator_wallet) {
        return Err(AppError::InvalidTransaction(
            "Invalid transaction parties.".to_string(),
        ));
    }

    // Balance arrays shorter than expected mean the ledger returned partial
    // data; indistinguishable from an unusable transaction.
    let sent = tx.net_debit_sol().ok_or_else(|| {
        AppError::NotFound("Transaction not found on-chain.".to_string())
    })?;

    if (sent - post.price).abs() > PRICE_TOLERANCE_SOL {
        return Err(AppError::InvalidTransaction(
            "Incorrect amount transferred.".to_string(),
        ));
    }

    Ok(())
}

/// Verify an on-chain payment and record the purchase exactly once.
pub async fn verify_purchase<C>(
    con: &mut C,
    ledger: &dyn LedgerClient,
    buyer_wallet: &str,
    post_id: &str,
    transaction_signature: &str,
) -> Result<StoredPurchase, AppError>
where
    C: AsyncCommands,
{
    let post = storage::post::get_post(con, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    // An absent or unconfirmed transaction is a legitimate outcome
    // (propagation delay, wrong or fabricated reference), not a fault.
    let tx = ledger
        .get_transaction(transaction_signature)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found on-chain.".to_string()))?;

    check_transaction(&tx, buyer_wallet, &post)?;

    let purchase = StoredPurchase {
        buyer_wallet: buyer_wallet.to_string(),
        post_id: post_id.to_string(),
        transaction_signature: transaction_signature.to_string(),
        created_at: storage::unix_now(),
    };

    // The NX refusal is the uniqueness constraint firing, a normal outcome
    let created = storage::purchase::insert_purchase(con, &purchase).await?;
    if !created {
        return Err(AppError::AlreadyPurchased);
    }

    tracing::info!(
        action = "purchase_verified",
        buyer = %buyer_wallet,
        post_id = %post_id,
        "Purchase recorded"
    );

    Ok(purchase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LAMPORTS_PER_SOL;

    fn post(price: f64) -> StoredPost {
        StoredPost {
            id: "post7".to_string(),
            creator_wallet: "CreatorWallet".to_string(),
            image_url: "https://cdn.example/7.jpg".to_string(),
            description: None,
            price,
            created_at: 1_700_000_000,
        }
    }

    fn transfer(buyer: &str, creator: &str, sol: f64, fee_lamports: u64) -> LedgerTransaction {
        let lamports = (sol * LAMPORTS_PER_SOL) as u64;
        LedgerTransaction {
            account_keys: vec![
                buyer.to_string(),
                creator.to_string(),
                "11111111111111111111111111111111".to_string(),
            ],
            pre_balances: vec![5 * LAMPORTS_PER_SOL as u64, 1_000_000, 1],
            post_balances: vec![
                5 * LAMPORTS_PER_SOL as u64 - lamports - fee_lamports,
                1_000_000 + lamports,
                1,
            ],
        }
    }

    #[test]
    fn test_exact_amount_passes() {
        let tx = transfer("Buyer", "CreatorWallet", 0.1, 0);
        assert!(check_transaction(&tx, "Buyer", &post(0.1)).is_ok());
    }

    #[test]
    fn test_amount_within_tolerance_passes() {
        // 5000-lamport fee on top of the transfer stays inside the tolerance
        let tx = transfer("Buyer", "CreatorWallet", 0.1, 5_000);
        assert!(check_transaction(&tx, "Buyer", &post(0.1)).is_ok());
    }

    #[test]
    fn test_underpayment_fails() {
        let tx = transfer("Buyer", "CreatorWallet", 0.05, 0);
        let err = check_transaction(&tx, "Buyer", &post(0.1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransaction(ref msg)
            if msg.contains("amount")));
    }

    #[test]
    fn test_overpayment_beyond_tolerance_fails() {
        let tx = transfer("Buyer", "CreatorWallet", 0.2, 0);
        let err = check_transaction(&tx, "Buyer", &post(0.1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransaction(_)));
    }

    #[test]
    fn test_wrong_fee_payer_fails() {
        let tx = transfer("SomeoneElse", "CreatorWallet", 0.1, 0);
        let err = check_transaction(&tx, "Buyer", &post(0.1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransaction(ref msg)
            if msg.contains("parties")));
    }

    #[test]
    fn test_creator_not_involved_fails() {
        let tx = transfer("Buyer", "SomeOtherRecipient", 0.1, 0);
        let err = check_transaction(&tx, "Buyer", &post(0.1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransaction(ref msg)
            if msg.contains("parties")));
    }

    #[test]
    fn test_partial_balance_data_reads_as_absent() {
        let tx = LedgerTransaction {
            account_keys: vec!["Buyer".to_string(), "CreatorWallet".to_string()],
            pre_balances: vec![],
            post_balances: vec![],
        };
        let err = check_transaction(&tx, "Buyer", &post(0.1)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_deviation_just_beyond_tolerance_fails() {
        let tx = transfer("Buyer", "CreatorWallet", 0.1 + PRICE_TOLERANCE_SOL * 2.0, 0);
        assert!(check_transaction(&tx, "Buyer", &post(0.1)).is_err());
    }
}
