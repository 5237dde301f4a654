use crate::config::Config;
use crate::error::{ClientError, RECOMMENDATION_FAILED};
use crate::models::{
    AuthResponse, LoginRequest, RecommendationRequest, RecommendationResponse, RegisterRequest,
    ResetPasswordRequest,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use ureq::Agent;

/// Sends a JSON body to a backend path and hands back the raw response text
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<String, ClientError>;
}

/// Blocking HTTP transport; the agent keeps the login cookie between calls
pub struct HttpTransport {
    agent: Agent,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        HttpTransport {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");

        match self
            .agent
            .post(&url)
            .set("Accept", "application/json")
            .send_json(body)
        {
            Ok(response) => response
                .into_string()
                .map_err(|e| ClientError::Transport(e.to_string())),
            // Flask answers server errors with a JSON body worth reading
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(ClientError::Status { status, body })
            }
            Err(ureq::Error::Transport(e)) => Err(ClientError::Transport(e.to_string())),
        }
    }
}

/// Client for the SWARA backend endpoints
pub struct SwaraClient<T: Transport> {
    transport: T,
}

impl SwaraClient<HttpTransport> {
    /// Create a new client with configuration from environment
    pub fn new(config: &Config) -> Self {
        Self::with_transport(HttpTransport::new(&config.base_url, config.timeout))
    }
}

impl<T: Transport> SwaraClient<T> {
    pub fn with_transport(transport: T) -> Self {
        SwaraClient { transport }
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ClientError> {
        let value = serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.transport.post_json(path, &value)
    }

    /// Auth endpoints: undecodable replies count as a failed attempt
    fn post_auth<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthResponse, ClientError> {
        let text = match self.post(path, body) {
            Ok(text) => text,
            Err(ClientError::Status { body, .. }) => body,
            Err(e) => return Err(e),
        };
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(path, "Auth response was not JSON: {e}");
            AuthResponse {
                success: false,
                message: Some("Invalid server response".to_string()),
            }
        }))
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.post_auth("/register", request)
    }

    pub fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.post_auth("/login", request)
    }

    pub fn reset_password(&self, request: &ResetPasswordRequest) -> Result<AuthResponse, ClientError> {
        self.post_auth("/reset_password", request)
    }

    /// Fetch mood-tagged songs; `success: false` becomes `ClientError::Rejected`
    pub fn get_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, ClientError> {
        debug!(
            mood = %request.mood,
            module = request.module_type.as_str(),
            "Requesting recommendations"
        );

        let text = match self.post("/get_recommendations", request) {
            Ok(text) => text,
            Err(ClientError::Status { status, body }) => {
                // a JSON error body still explains the failure
                let error = serde_json::from_str::<RecommendationResponse>(&body)
                    .ok()
                    .and_then(|parsed| parsed.error);
                return Err(match error {
                    Some(message) => ClientError::Rejected(message),
                    None => ClientError::Status { status, body },
                });
            }
            Err(e) => return Err(e),
        };

        let parsed: RecommendationResponse = serde_json::from_str(&text)
            .map_err(|e| ClientError::Decode(format!("Failed to parse JSON response: {e}")))?;

        if !parsed.success {
            return Err(ClientError::Rejected(
                parsed
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| RECOMMENDATION_FAILED.to_string()),
            ));
        }

        Ok(parsed)
    }
}
