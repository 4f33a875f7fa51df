//! Ledger access capability.
//!
//! The purchase verifier treats the blockchain as an external oracle behind
//! the [`LedgerClient`] trait, so it can be exercised against a scripted fake
//! in tests while production uses the JSON-RPC client in [`rpc`].

pub mod rpc;

pub use rpc::RpcLedgerClient;

use async_trait::async_trait;

/// Lamports per SOL (the ledger's base unit vs. its display unit).
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// A confirmed transaction as observed on the ledger, reduced to the fields
/// purchase verification needs.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerTransaction {
    /// Accounts touched by the transaction; index 0 is the fee payer.
    pub account_keys: Vec<String>,
    /// Lamport balances before execution, index-aligned with `account_keys`.
    pub pre_balances: Vec<u64>,
    /// Lamport balances after execution, index-aligned with `account_keys`.
    pub post_balances: Vec<u64>,
}

impl LedgerTransaction {
    /// The fee-payer (sender) account, if the transaction has one.
    pub fn fee_payer(&self) -> Option<&str> {
        self.account_keys.first().map(|s| s.as_str())
    }

    /// Whether `account` appears among the accounts touched.
    pub fn involves(&self, account: &str) -> bool {
        self.account_keys.iter().any(|k| k == account)
    }

    /// Net balance decrease of the fee payer, in SOL.
    ///
    /// Returns None when balance data does not cover the fee payer, which
    /// callers treat the same as an absent transaction.
    pub fn net_debit_sol(&self) -> Option<f64> {
        let pre = *self.pre_balances.first()?;
        let post = *self.post_balances.first()?;
        Some((pre as f64 - post as f64) / LAMPORTS_PER_SOL)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Malformed RPC response: {0}")]
    Malformed(String),
}

/// Read access to the external ledger.
///
/// `get_transaction` must request at least "confirmed" consistency and
/// return `None` both for transactions the ledger does not know and for
/// transactions lacking the metadata verification needs.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<LedgerTransaction>, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(pre: u64, post: u64) -> LedgerTransaction {
        LedgerTransaction {
            account_keys: vec!["Buyer".to_string(), "Creator".to_string()],
            pre_balances: vec![pre, 0],
            post_balances: vec![post, 0],
        }
    }

    #[test]
    fn test_fee_payer_is_first_account() {
        assert_eq!(tx(1, 0).fee_payer(), Some("Buyer"));
        let empty = LedgerTransaction {
            account_keys: vec![],
            pre_balances: vec![],
            post_balances: vec![],
        };
        assert_eq!(empty.fee_payer(), None);
    }

    #[test]
    fn test_involves() {
        let t = tx(1, 0);
        assert!(t.involves("Creator"));
        assert!(!t.involves("Stranger"));
    }

    #[test]
    fn test_net_debit_sol_converts_lamports() {
        // 0.1 SOL transfer plus no fee
        let t = tx(500_000_000, 400_000_000);
        assert!((t.net_debit_sol().unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_net_debit_sol_missing_balances() {
        let t = LedgerTransaction {
            account_keys: vec!["Buyer".to_string()],
            pre_balances: vec![],
            post_balances: vec![],
        };
        assert_eq!(t.net_debit_sol(), None);
    }
}
