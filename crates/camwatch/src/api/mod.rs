//! HTTP client for the dashboard backend.
//!
//! The [`AuthApi`] trait is the seam between the login/device logic and the
//! network: production code uses [`HttpClient`] (reqwest), tests substitute
//! an in-process fake. Every request carries the configured timeout, and a
//! 401 from any authenticated endpoint is classified centrally as
//! [`Error::Unauthorized`].

pub mod models;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};

pub use models::{
    DeviceRecord, DeviceRegisterResponse, LoginRequest, LoginResponse, MessageBody, RtpsEntry,
    RtpsOption, SignupRequest, User,
};

/// Client-side view of the auth and device endpoints.
///
/// All operations are single-attempt: there is no retry policy anywhere in
/// this client, and every failure is terminal for the triggering action.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/login`. Non-2xx is an authentication failure.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;

    /// `GET /api/DeviceRegister/{device_id}`.
    ///
    /// Any transport error, non-2xx status, or response missing
    /// `data.device` is reported as [`Error::DeviceNotRegistered`].
    async fn fetch_device(&self, device_id: &str) -> Result<DeviceRecord>;

    /// `POST /api/auth/signup`.
    async fn signup(&self, request: &SignupRequest) -> Result<()>;

    /// `POST /api/auth/forgot-password`. Returns the server message.
    async fn forgot_password(&self, email: &str) -> Result<String>;

    /// `POST /api/auth/reset-password`. Returns the server message.
    async fn reset_password(&self, token: &str, password: &str) -> Result<String>;

    /// `GET /rtps`: the stream options offered at signup.
    async fn fetch_rtps_options(&self) -> Result<Vec<RtpsOption>>;
}

/// reqwest-backed implementation of [`AuthApi`].
///
/// Holds one shared connection pool and the single configured base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: Url,
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client from the API configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the underlying
    /// client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| Error::ConfigValidation {
            message: format!("invalid base_url '{}': {e}", config.base_url),
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { base, client })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::api(format!("invalid endpoint path '{path}': {e}")))
    }

    /// Map a transport error, distinguishing timeouts.
    fn transport_error(operation: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                operation: operation.to_string(),
            }
        } else {
            Error::Http(err)
        }
    }

    /// Extract the server's failure message from a non-2xx response body,
    /// falling back to the status code.
    async fn failure_message(response: reqwest::Response) -> String {
        let status = response.status();
        let body: MessageBody = response.json().await.unwrap_or_default();
        body.text()
            .map_or_else(|| format!("server returned {status}"), ToOwned::to_owned)
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint("/api/auth/login")?;
        debug!("POST {url}");

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::transport_error("login request", e))?;

        if !response.status().is_success() {
            let message = Self::failure_message(response).await;
            warn!("login rejected: {message}");
            return Err(Error::auth_failed(message));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| Error::api(format!("malformed login response: {e}")))?;
        Ok(body)
    }

    async fn fetch_device(&self, device_id: &str) -> Result<DeviceRecord> {
        let url = self.endpoint(&format!("/api/DeviceRegister/{device_id}"))?;
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::device_not_registered(device_id, e.to_string()))?;

        if !response.status().is_success() {
            let message = Self::failure_message(response).await;
            return Err(Error::device_not_registered(device_id, message));
        }

        let body: DeviceRegisterResponse = response
            .json()
            .await
            .map_err(|e| Error::device_not_registered(device_id, format!("malformed response: {e}")))?;

        if body.status != "success" {
            return Err(Error::device_not_registered(
                device_id,
                format!("status was '{}'", body.status),
            ));
        }

        body.data
            .and_then(|d| d.device)
            .ok_or_else(|| Error::device_not_registered(device_id, "response missing data.device"))
    }

    async fn signup(&self, request: &SignupRequest) -> Result<()> {
        let url = self.endpoint("/api/auth/signup")?;
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| Self::transport_error("signup request", e))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(Error::api(Self::failure_message(response).await));
        }
        Ok(())
    }

    async fn forgot_password(&self, email: &str) -> Result<String> {
        let url = self.endpoint("/api/auth/forgot-password")?;
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| Self::transport_error("forgot-password request", e))?;

        if !response.status().is_success() {
            return Err(Error::api(Self::failure_message(response).await));
        }

        let body: MessageBody = response.json().await.unwrap_or_default();
        Ok(body
            .text()
            .unwrap_or("Check your email for the reset link.")
            .to_string())
    }

    async fn reset_password(&self, token: &str, password: &str) -> Result<String> {
        let url = self.endpoint("/api/auth/reset-password")?;
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "token": token, "password": password }))
            .send()
            .await
            .map_err(|e| Self::transport_error("reset-password request", e))?;

        if !response.status().is_success() {
            return Err(Error::api(Self::failure_message(response).await));
        }

        let body: MessageBody = response.json().await.unwrap_or_default();
        Ok(body.text().unwrap_or("Password has been reset.").to_string())
    }

    async fn fetch_rtps_options(&self) -> Result<Vec<RtpsOption>> {
        let url = self.endpoint("/rtps")?;
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_error("rtps options request", e))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(Error::api(Self::failure_message(response).await));
        }

        let options: Vec<RtpsOption> = response
            .json()
            .await
            .map_err(|e| Error::api(format!("malformed rtps options: {e}")))?;
        Ok(options)
    }
}
