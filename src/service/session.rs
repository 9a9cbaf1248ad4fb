use tracing::instrument;

use super::backend::{Account, Identity};

/// Makes sure writes to the backend happen under some identity, signing in
/// anonymously when nobody is. Failing to do so only costs us the writes.
#[instrument(skip(identity))]
pub async fn ensure_anonymous_session(identity: &dyn Identity) -> Option<Account> {
    match identity.current().await {
        Ok(account) => {
            tracing::debug!(account = %account.id, "already signed in");
            return Some(account);
        }
        Err(error) => tracing::debug!(%error, "no current identity"),
    }

    match identity.create_anonymous().await {
        Ok(account) => {
            tracing::info!(account = %account.id, "created anonymous session");
            Some(account)
        }
        Err(error) => {
            tracing::warn!(%error, "failed to create anonymous session");
            None
        }
    }
}
