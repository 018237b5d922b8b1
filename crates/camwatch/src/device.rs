//! Device binding: resolving a user's registered camera device.
//!
//! After a successful credential check, the first entry of the user's device
//! list is resolved against the registration endpoint and its connection
//! parameters are cached alongside the session. A session is never left
//! active without a resolved device; failure here is fatal to the login
//! attempt and the caller rolls the session back.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::models::DeviceRecord;
use crate::api::AuthApi;
use crate::error::{Error, Result};
use crate::session::SessionStore;

/// The cached mapping from a registered device to its network address and
/// stream URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBinding {
    /// The registered device identifier.
    pub device_id: String,
    /// Network address of the device.
    pub ip: String,
    /// Primary stream URL.
    pub rtsp_url1: String,
    /// Secondary stream URL, often empty.
    pub rtsp_url2: String,
}

impl DeviceBinding {
    /// Build a binding from a device identifier and its resolved record.
    #[must_use]
    pub fn from_record(device_id: impl Into<String>, record: &DeviceRecord) -> Self {
        Self {
            device_id: device_id.into(),
            ip: record.ip_address.clone(),
            rtsp_url1: record.rtsp_url1.clone(),
            rtsp_url2: record.rtsp_url2.clone(),
        }
    }
}

/// Resolve the first device in the list against the registration endpoint.
///
/// Single attempt, no retry: failure is terminal for the login attempt that
/// triggered it. Does not touch storage; see [`bind`].
///
/// # Errors
///
/// Returns [`Error::DeviceNotRegistered`] when the list is empty, the
/// endpoint fails, or the response is malformed.
pub async fn resolve(api: &dyn AuthApi, devices: &[String]) -> Result<DeviceBinding> {
    let Some(device_id) = devices.first() else {
        warn!("Device resolution failed: account has no registered devices");
        return Err(Error::device_not_registered(
            "",
            "account has no registered devices",
        ));
    };

    debug!("Resolving device {device_id}");
    let record = api.fetch_device(device_id).await?;
    Ok(DeviceBinding::from_record(device_id, &record))
}

/// Resolve the device and cache the binding in both storage scopes plus the
/// in-memory cell.
///
/// # Errors
///
/// Returns an error if resolution or the storage write fails. On resolution
/// failure nothing is written; rollback of the surrounding session is the
/// caller's responsibility.
pub async fn bind(
    api: &dyn AuthApi,
    store: &SessionStore,
    devices: &[String],
) -> Result<DeviceBinding> {
    let binding = resolve(api, devices).await?;
    store.write_device(&binding)?;
    Ok(binding)
}
