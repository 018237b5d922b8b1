//! Wire types for the dashboard backend API.
//!
//! Field names mirror the JSON the backend actually speaks, including its
//! mixed naming conventions (`rtpsNames`, `ip_address`). The server is
//! authoritative for all of these; the client treats them as read-only.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// A named stream-credential pair attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpsEntry {
    /// Stream name.
    pub name: String,
    /// Opaque credential/connection data.
    pub data: String,
}

/// A user record as returned by the auth endpoints.
///
/// The backend may echo the password hash back in the login response;
/// it is never serialized out of this type, so it cannot reach storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Role string; free-form on the wire, parsed into a closed set
    /// by the navigation layer.
    pub role: String,
    /// Identifiers of the devices registered to this user.
    #[serde(default)]
    pub devices: Vec<String>,
    /// Stream-credential pairs.
    #[serde(default)]
    pub rtps: Vec<RtpsEntry>,
    /// Password field echoed by the server. Never serialized.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl User {
    /// Return a copy with the password field stripped.
    ///
    /// Call this before handing the record to anything that persists it.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            password: None,
            ..self.clone()
        }
    }
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Opaque session token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// A device record as returned by `GET /api/DeviceRegister/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Network address of the device.
    pub ip_address: String,
    /// Primary stream URL.
    pub rtsp_url1: String,
    /// Secondary stream URL, often empty.
    #[serde(default)]
    pub rtsp_url2: String,
}

/// Envelope of `GET /api/DeviceRegister/{id}`.
///
/// Anything other than `status == "success"` with a present
/// `data.device` is a device-resolution failure.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRegisterResponse {
    /// `"success"` on the happy path.
    pub status: String,
    /// Payload wrapper; may be missing on error responses.
    #[serde(default)]
    pub data: Option<DeviceRegisterData>,
}

/// Payload wrapper inside [`DeviceRegisterResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRegisterData {
    /// The resolved device, when present.
    #[serde(default)]
    pub device: Option<DeviceRecord>,
}

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Names of the RTPS streams to associate with the account.
    #[serde(rename = "rtpsNames")]
    pub rtps_names: Vec<String>,
}

/// An RTPS option as listed by `GET /rtps`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RtpsOption {
    /// Server-assigned identifier.
    pub id: i64,
    /// Stream name.
    pub name: String,
}

/// Generic message body used by the password-reset endpoints and by
/// error responses. The message is surfaced to the user verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBody {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Alternative error field some endpoints use.
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageBody {
    /// The best available message, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            role: "user".to_string(),
            devices: vec!["dev1".to_string()],
            rtps: vec![],
            password: Some("hash".to_string()),
        }
    }

    #[test]
    fn test_user_sanitized_strips_password() {
        let user = sample_user();
        let clean = user.sanitized();
        assert!(clean.password.is_none());
        assert_eq!(clean.email, user.email);
        assert_eq!(clean.devices, user.devices);
    }

    #[test]
    fn test_user_password_never_serialized() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_user_deserializes_with_password() {
        let json = r#"{"id":1,"name":"A","email":"a@b.com","role":"user",
                       "devices":["dev1"],"rtps":[],"password":"hash"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.password.as_deref(), Some("hash"));
    }

    #[test]
    fn test_user_deserializes_without_optional_fields() {
        let json = r#"{"id":2,"name":"B","email":"b@c.com","role":"admin"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.devices.is_empty());
        assert!(user.rtps.is_empty());
        assert!(user.password.is_none());
    }

    #[test]
    fn test_login_response_deserialize() {
        let json = r#"{"token":"tok123","user":{"id":1,"name":"A","email":"a@b.com",
                       "role":"user","devices":["dev1"],"rtps":[]}}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "tok123");
        assert_eq!(resp.user.devices, vec!["dev1"]);
    }

    #[test]
    fn test_device_register_response_success() {
        let json = r#"{"status":"success","data":{"device":
                       {"ip_address":"10.0.0.5","rtsp_url1":"rtsp://x","rtsp_url2":""}}}"#;
        let resp: DeviceRegisterResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "success");
        let device = resp.data.unwrap().device.unwrap();
        assert_eq!(device.ip_address, "10.0.0.5");
        assert_eq!(device.rtsp_url2, "");
    }

    #[test]
    fn test_device_register_response_missing_device() {
        let json = r#"{"status":"success","data":{}}"#;
        let resp: DeviceRegisterResponse = serde_json::from_str(json).unwrap();
        assert!(resp.data.unwrap().device.is_none());
    }

    #[test]
    fn test_device_record_default_rtsp_url2() {
        let json = r#"{"ip_address":"10.0.0.5","rtsp_url1":"rtsp://x"}"#;
        let device: DeviceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(device.rtsp_url2, "");
    }

    #[test]
    fn test_signup_request_uses_camel_case_rtps_names() {
        let req = SignupRequest {
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            rtps_names: vec!["north-gate".to_string()],
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("rtpsNames"));
        assert!(!json.contains("rtps_names"));
    }

    #[test]
    fn test_message_body_prefers_message_over_error() {
        let body = MessageBody {
            message: Some("check your email".to_string()),
            error: Some("ignored".to_string()),
        };
        assert_eq!(body.text(), Some("check your email"));
    }

    #[test]
    fn test_message_body_falls_back_to_error() {
        let body = MessageBody {
            message: None,
            error: Some("user not found".to_string()),
        };
        assert_eq!(body.text(), Some("user not found"));
    }

    #[test]
    fn test_message_body_empty() {
        let body = MessageBody::default();
        assert!(body.text().is_none());
    }
}
