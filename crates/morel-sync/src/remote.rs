//! HTTP implementation of [`ItemStore`] against a morel server

use crate::error::StoreError;
use crate::store::ItemStore;
use morel_core::wire::{Credentials, ErrorRow, ItemRow, SessionRow};
use morel_core::{ItemDraft, ItemId, ItemPatch, MenuItem};

/// [`ItemStore`] over the REST API.
///
/// Reads are public; mutations carry the bearer token obtained by
/// [`sign_in`](RemoteStore::sign_in). Rejections surface the server's
/// error body as [`StoreError::Rejected`].
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// The server this store talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when a session token is held.
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange credentials for the session token later mutations carry.
    pub async fn sign_in(&mut self, username: &str, password: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.url("/api/session"))
            .json(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let session: SessionRow = read_json(check(response).await?).await?;
        self.token = Some(session.token);
        Ok(())
    }

    /// Invalidate the session server-side and drop the token.
    pub async fn sign_out(&mut self) -> Result<(), StoreError> {
        let request = self.authorized(self.client.delete(self.url("/api/session")));
        check(request.send().await?).await?;
        self.token = None;
        Ok(())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl ItemStore for RemoteStore {
    async fn load_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        let response = check(self.client.get(self.url("/api/items")).send().await?).await?;
        let rows: Vec<ItemRow> = read_json(response).await?;
        rows.into_iter()
            .map(|row| row.into_item().map_err(StoreError::from))
            .collect()
    }

    async fn insert_item(&self, draft: &ItemDraft) -> Result<MenuItem, StoreError> {
        let request = self.authorized(self.client.post(self.url("/api/items")).json(draft));
        let row: ItemRow = read_json(check(request.send().await?).await?).await?;
        Ok(row.into_item()?)
    }

    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> Result<MenuItem, StoreError> {
        let request = self.authorized(
            self.client
                .patch(self.url(&format!("/api/items/{id}")))
                .json(patch),
        );
        let row: ItemRow = read_json(check(request.send().await?).await?).await?;
        Ok(row.into_item()?)
    }

    async fn delete_item(&self, id: &ItemId) -> Result<(), StoreError> {
        let request = self.authorized(self.client.delete(self.url(&format!("/api/items/{id}"))));
        check(request.send().await?).await?;
        Ok(())
    }
}

/// Map a non-success response to [`StoreError::Rejected`], taking the
/// message from the error body when one is present.
pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorRow>().await {
        Ok(row) => row.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StoreError> {
    response
        .json()
        .await
        .map_err(|e| StoreError::InvalidRow(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn test_check_passes_success_through() {
        assert!(check(response(200, "[]")).await.is_ok());
        assert!(check(response(204, "")).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_surfaces_error_body_message() {
        let err = check(response(404, "{\"error\":\"Item not found\"}"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, StoreError::Rejected { status: 404, message } if message == "Item not found")
        );
    }

    #[tokio::test]
    async fn test_check_falls_back_to_status_reason() {
        let err = check(response(500, "")).await.unwrap_err();
        assert!(
            matches!(err, StoreError::Rejected { status: 500, message } if message == "Internal Server Error")
        );
    }

    #[test]
    fn test_url_joins_base_without_doubling_slashes() {
        let store = RemoteStore::new("http://127.0.0.1:8420/");
        assert_eq!(store.url("/api/items"), "http://127.0.0.1:8420/api/items");
    }
}
