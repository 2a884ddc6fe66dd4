// SPDX-License-Identifier: MPL-2.0

use crate::config::USER_AGENT;
use crate::network::error::{ClientError, FetchAction, SyncError, ToggleKind};
use crate::network::types::{
    Filter, FollowDirection, FollowRelations, FollowToggleResponse, Page, Post, PostId, Profile,
    Reaction, ReactionToggleResponse, UserId,
};
use crate::state::Credentials;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

const CSRF_HEADER: &str = "x-csrftoken";

/// The authoritative store, seen from the client. Every call is a single
/// remote round trip with no local side effects and no retry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_posts(&self, filter: Filter, page: Page) -> Result<Vec<Post>, SyncError>;

    async fn toggle_follow(&self, target: UserId, page: Page) -> Result<Profile, SyncError>;

    async fn toggle_reaction(
        &self,
        target: PostId,
        reaction: Reaction,
        page: Page,
    ) -> Result<Vec<Post>, SyncError>;

    async fn submit_post(&self, body: &str, poster: &str, page: Page)
    -> Result<Vec<Post>, SyncError>;

    async fn list_follow_relations(
        &self,
        direction: FollowDirection,
    ) -> Result<FollowRelations, SyncError>;

    async fn fetch_profile(&self, user: UserId) -> Result<Profile, SyncError>;
}

/// HTTP implementation of [`RemoteStore`] against the feed server.
pub struct NetworkClient {
    http: reqwest::Client,
    base: Url,
    credentials: Credentials,
}

impl NetworkClient {
    pub fn new(server_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base: base_url(server_url)?,
            credentials,
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ClientError> {
        build_url(&self.base, path, query)
    }

    fn headers(&self, mutating: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if mutating {
            if let Some(token) = self.credentials.csrf_token.as_deref() {
                if let Ok(value) = HeaderValue::from_str(token) {
                    headers.insert(CSRF_HEADER, value);
                }
            }
        }

        if let Some(cookie) = self.credentials.cookie_header() {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.insert(COOKIE, value);
            }
        }

        headers
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        log::debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .headers(self.headers(false))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        read_json(response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        log::debug!("POST {url}");
        let mut request = self.http.post(url).headers(self.headers(true));
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        read_json(response).await
    }
}

#[async_trait]
impl RemoteStore for NetworkClient {
    async fn list_posts(&self, filter: Filter, page: Page) -> Result<Vec<Post>, SyncError> {
        let url = self
            .endpoint(
                "posts-data",
                &[
                    ("filter", filter.as_query().to_string()),
                    ("offset", page.offset.to_string()),
                    ("batchSize", page.size.to_string()),
                ],
            )
            .map_err(SyncError::fetch(FetchAction::Posts))?;

        self.get(url)
            .await
            .map_err(SyncError::fetch(FetchAction::Posts))
    }

    async fn toggle_follow(&self, target: UserId, page: Page) -> Result<Profile, SyncError> {
        let url = self
            .endpoint(&format!("follow-status/{target}"), &page_query(page))
            .map_err(SyncError::toggle(ToggleKind::Follow))?;

        self.post::<FollowToggleResponse>(url, None)
            .await
            .map(|r| r.profile)
            .map_err(SyncError::toggle(ToggleKind::Follow))
    }

    async fn toggle_reaction(
        &self,
        target: PostId,
        reaction: Reaction,
        page: Page,
    ) -> Result<Vec<Post>, SyncError> {
        let kind = ToggleKind::Reaction(reaction);
        let url = self
            .endpoint(
                &format!("{}/{target}", reaction.endpoint()),
                &page_query(page),
            )
            .map_err(SyncError::toggle(kind))?;

        self.post::<ReactionToggleResponse>(url, None)
            .await
            .map(|r| r.posts)
            .map_err(SyncError::toggle(kind))
    }

    async fn submit_post(
        &self,
        body: &str,
        poster: &str,
        page: Page,
    ) -> Result<Vec<Post>, SyncError> {
        let url = self
            .endpoint("new-post", &page_query(page))
            .map_err(SyncError::submit)?;

        let payload = serde_json::json!({ "body": body, "poster": poster });
        self.post(url, Some(payload))
            .await
            .map_err(SyncError::submit)
    }

    async fn list_follow_relations(
        &self,
        direction: FollowDirection,
    ) -> Result<FollowRelations, SyncError> {
        let url = self
            .endpoint(&format!("follow-usernames/{}", direction.as_str()), &[])
            .map_err(SyncError::fetch(FetchAction::FollowRelations))?;

        let relations: FollowRelations = self
            .get(url)
            .await
            .map_err(SyncError::fetch(FetchAction::FollowRelations))?;

        check_aligned(relations).map_err(SyncError::fetch(FetchAction::FollowRelations))
    }

    async fn fetch_profile(&self, user: UserId) -> Result<Profile, SyncError> {
        let url = self
            .endpoint(&format!("profile-data/{user}"), &[])
            .map_err(SyncError::fetch(FetchAction::Profile))?;

        self.get(url)
            .await
            .map_err(SyncError::fetch(FetchAction::Profile))
    }
}

fn page_query(page: Page) -> [(&'static str, String); 2] {
    [
        ("offset", page.offset.to_string()),
        ("batchSize", page.size.to_string()),
    ]
}

/// Parse the server address so relative endpoint paths join beneath it.
fn base_url(server_url: &str) -> Result<Url, ClientError> {
    let mut normalized = server_url.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| ClientError::InvalidUrl(format!("{server_url}: {e}")))
}

fn build_url(base: &Url, path: &str, query: &[(&str, String)]) -> Result<Url, ClientError> {
    let mut url = base
        .join(path)
        .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;

    decode(status, &body)
}

/// Decode a response body, treating any non-2xx status as a failure.
fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ClientError> {
    if !(200..300).contains(&status) {
        return Err(ClientError::Status(status));
    }

    serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

fn check_aligned(relations: FollowRelations) -> Result<FollowRelations, ClientError> {
    if relations.is_aligned() {
        Ok(relations)
    } else {
        Err(ClientError::InvalidResponse(format!(
            "{} usernames but {} ids",
            relations.usernames.len(),
            relations.ids.len()
        )))
    }
}
