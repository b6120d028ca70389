use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Mint a session id for one conversation: a millisecond timestamp prefix and
/// a short random suffix, e.g. `session_1718200000000_k3j9x0a`.
pub fn mint_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
    format!("session_{}_{}", millis, suffix)
}
