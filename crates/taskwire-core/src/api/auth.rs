use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, TokenPair};
use crate::error::CoreError;
use crate::session::Session;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Authenticates against `POST /auth/login` and installs the returned
    /// session into the manager (persisted through its store).
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let pair: TokenPair = self
            .execute(Method::POST, "auth/login", false, |request| {
                request.json(&LoginRequest { email, password })
            })
            .await?;

        let session = Session::new(pair.access_token, pair.refresh_token);
        self.session_manager().install(session.clone()).await?;
        tracing::info!("logged in");
        Ok(session)
    }

    /// Ends the session. The server call is best-effort; the local session
    /// is cleared unconditionally.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let result = self
            .execute_unit(Method::POST, "auth/logout", false, |request| request)
            .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "server-side logout failed; clearing local session anyway");
        }
        self.session_manager().logout().await?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Deletes the account and destroys the session.
    pub async fn delete_account(&self) -> Result<(), CoreError> {
        self.execute_unit(Method::DELETE, "auth/account", false, |request| request)
            .await?;
        self.session_manager().logout().await
    }
}
