use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::BackendClient;

use crate::models::AuthError;
use crate::services::extract_token;

/// Backends expose the Google code exchange under different routes and
/// methods depending on their vintage. The candidates are tried in order;
/// the first one that yields a token wins.
fn exchange_candidates() -> [(Method, &'static str); 4] {
    [
        (Method::POST, "/auth/google/callback"),
        (Method::GET, "/auth/google/callback"),
        (Method::POST, "/api/auth/google"),
        (Method::GET, "/api/auth/google"),
    ]
}

pub struct GoogleExchangeService {
    client: BackendClient,
}

impl GoogleExchangeService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: BackendClient::new(config),
        }
    }

    /// Trade the authorization code for a session token. Every candidate
    /// failing surfaces the last failure; a candidate that answers 2xx
    /// without a token counts as a failure too.
    pub async fn exchange(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<String, AuthError> {
        let mut last_failure = "no exchange endpoint available".to_string();

        for (method, path) in exchange_candidates() {
            let (path, body) = if method == Method::GET {
                (Self::query_path(path, code, redirect_uri), None)
            } else {
                (path.to_string(), Some(Self::exchange_body(code, redirect_uri)))
            };

            debug!("Trying OAuth exchange via {} {}", method, path);
            match self.client.request::<Value>(method, &path, None, body).await {
                Ok(response) => match extract_token(&response) {
                    Some(token) => return Ok(token),
                    None => {
                        last_failure = "exchange response carried no token".to_string();
                    }
                },
                Err(err) => {
                    warn!("OAuth exchange candidate {} failed: {}", path, err);
                    last_failure = err.to_string();
                }
            }
        }

        Err(AuthError::Exchange(last_failure))
    }

    fn query_path(path: &str, code: &str, redirect_uri: Option<&str>) -> String {
        let mut query = format!("{}?code={}", path, urlencoding::encode(code));
        if let Some(uri) = redirect_uri {
            query.push_str(&format!("&redirect_uri={}", urlencoding::encode(uri)));
        }
        query
    }

    fn exchange_body(code: &str, redirect_uri: Option<&str>) -> Value {
        let mut body = json!({ "code": code });
        if let Some(uri) = redirect_uri {
            body["redirect_uri"] = json!(uri);
        }
        body
    }
}
