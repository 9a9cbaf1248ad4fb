use tracing::instrument;

use super::*;

#[derive(Debug, Deserialize)]
struct Session {
    #[serde(rename = "userId")]
    user_id: String,
}

impl Backend {
    #[instrument(skip(self))]
    pub async fn account(&self) -> Result<Account> {
        let url = self.url(&["account"]);
        let request = self.request(Method::GET, url.clone());
        self.send(request, url).await
    }

    /// The session cookie lands in the client's cookie store, so later
    /// requests from this backend carry it.
    #[instrument(skip(self))]
    pub async fn create_anonymous_session(&self) -> Result<Account> {
        let url = self.url(&["account", "sessions", "anonymous"]);
        let request = self.request(Method::POST, url.clone());
        let session: Session = self.send(request, url).await?;

        Ok(Account::new(session.user_id))
    }
}
