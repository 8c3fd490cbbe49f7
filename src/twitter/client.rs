// Twitter v1.1 REST client: app-only bearer auth over reqwest.
//
// Only the two read endpoints the collectors need are wrapped. Responses are
// kept as raw JSON values so the files written to disk carry every field the
// API returned; the feature extractor picks out what it needs later.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use super::credentials::Credential;
use super::error::TwitterError;

/// Default Twitter API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

/// Largest page `statuses/user_timeline` will return.
pub const TIMELINE_PAGE_MAX: usize = 200;

/// Largest page `friends/list` will return.
pub const FRIENDS_PAGE_MAX: usize = 200;

/// One page of `friends/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct FriendsPage {
    #[serde(default)]
    pub users: Vec<Value>,
    /// 0 when there are no more pages
    #[serde(default)]
    pub next_cursor: i64,
}

/// The read operations the collectors depend on.
///
/// `TwitterClient` is the real implementation; tests substitute a fake.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    /// Fetch one page of a user's timeline, newest first. `max_id` restricts
    /// the page to statuses with an ID at or below it.
    async fn user_timeline(
        &self,
        screen_name: &str,
        count: usize,
        max_id: Option<u64>,
    ) -> Result<Vec<Value>, TwitterError>;

    /// Fetch one page of the accounts a user follows. Start with cursor -1.
    async fn friends(&self, screen_name: &str, cursor: i64) -> Result<FriendsPage, TwitterError>;
}

/// HTTP client bound to one credential.
pub struct TwitterClient {
    client: reqwest::Client,
    base_url: String,
    credential: Credential,
    bearer: OnceCell<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
}

impl TwitterClient {
    pub fn new(base_url: &str, credential: Credential) -> Result<Self, TwitterError> {
        let client = reqwest::Client::builder()
            .user_agent("buzzer/0.1 (research timeline collector)")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let bearer = OnceCell::new_with(credential.bearer_token.clone());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
            bearer,
        })
    }

    /// The app-only bearer token, exchanging the key/secret pair on first use.
    async fn bearer_token(&self) -> Result<&str, TwitterError> {
        let token = self
            .bearer
            .get_or_try_init(|| async {
                let url = format!("{}/oauth2/token", self.base_url);
                debug!("Requesting app-only bearer token");

                let response = self
                    .client
                    .post(&url)
                    .basic_auth(
                        &self.credential.api_key,
                        Some(&self.credential.api_secret_key),
                    )
                    .form(&[("grant_type", "client_credentials")])
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(TwitterError::Auth(format!("{status}: {body}")));
                }

                let token: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| TwitterError::Parse(e.to_string()))?;
                if !token.token_type.eq_ignore_ascii_case("bearer") {
                    return Err(TwitterError::Auth(format!(
                        "unexpected token type {}",
                        token.token_type
                    )));
                }
                Ok(token.access_token)
            })
            .await?;
        Ok(token.as_str())
    }

    /// GET a v1.1 endpoint and deserialize the JSON body.
    ///
    /// `path` is relative to `/1.1/`, e.g. `statuses/user_timeline.json`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TwitterError> {
        let url = format!("{}/1.1/{}", self.base_url, path);
        let token = self.bearer_token().await?;

        debug!(path = path, "Twitter GET request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TwitterError::from_status(status.as_u16(), body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TimelineSource for TwitterClient {
    async fn user_timeline(
        &self,
        screen_name: &str,
        count: usize,
        max_id: Option<u64>,
    ) -> Result<Vec<Value>, TwitterError> {
        let mut params = vec![
            ("screen_name", screen_name.to_string()),
            ("count", count.min(TIMELINE_PAGE_MAX).to_string()),
            ("tweet_mode", "extended".to_string()),
            ("include_rts", "true".to_string()),
        ];
        if let Some(id) = max_id {
            params.push(("max_id", id.to_string()));
        }
        self.get_json("statuses/user_timeline.json", &params).await
    }

    async fn friends(&self, screen_name: &str, cursor: i64) -> Result<FriendsPage, TwitterError> {
        let params = [
            ("screen_name", screen_name.to_string()),
            ("count", FRIENDS_PAGE_MAX.to_string()),
            ("cursor", cursor.to_string()),
            ("skip_status", "true".to_string()),
        ];
        self.get_json("friends/list.json", &params).await
    }
}
