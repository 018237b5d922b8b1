//! `camwatch` - client core for a security-camera dashboard
//!
//! This library implements the session and device layer every protected view
//! of the dashboard depends on: credential submission, dual-scope session
//! persistence, device binding, route guarding, and role-filtered navigation.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod guard;
pub mod logging;
pub mod nav;
pub mod session;

pub use api::{AuthApi, HttpClient};
pub use auth::{Authenticator, LoginOutcome};
pub use config::Config;
pub use device::DeviceBinding;
pub use error::{Error, Result};
pub use guard::{GuardDecision, GuardState, RouteGuard};
pub use logging::init_logging;
pub use nav::{default_nav, filter_nav, NavItem, Role};
pub use session::{Scope, Session, SessionStore};
