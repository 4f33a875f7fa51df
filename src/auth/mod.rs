//! Authentication layer: wallet challenge/response and stateless sessions.

pub mod challenge;
pub mod middleware;
pub mod session;
pub mod verify;

pub use challenge::{challenge_message, generate_challenge_nonce};
pub use middleware::{AppState, AuthWallet, check_rate_limit};
pub use session::{issue_session, resolve_session};
pub use verify::verify_signature;
