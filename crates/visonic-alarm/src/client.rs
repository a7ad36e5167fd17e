//! Seam to the external Visonic cloud client
//!
//! The real client speaks HTTPS to the PowerManage REST API and exposes
//! blocking calls. Everything the flows need from it sits behind
//! [`VisonicClient`], so tests substitute a fake and the flows run the
//! calls on the blocking thread pool via `tokio::task::spawn_blocking`.

use std::sync::Arc;
use thiserror::Error;

/// Client errors
///
/// The flows only distinguish a temporary lockout from everything else;
/// any other failure surfaces to the user as "unknown" and is logged.
#[derive(Debug, Error, Clone)]
pub enum ClientError {
    /// The account or panel is temporarily locked out after too many
    /// failed attempts
    #[error("login temporarily blocked by the remote service")]
    TemporaryBlocked,

    /// Anything else the client can fail with
    #[error("{0}")]
    Other(String),
}

/// Opaque session token returned by the cloud on successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

/// Descriptor for one alarm panel tied to an account
#[derive(Debug, Clone)]
pub struct PanelInfo {
    pub alias: String,
    pub panel_serial: String,
}

impl PanelInfo {
    /// Display label shown in the panel selector
    pub fn label(&self) -> String {
        format!("{}({})", self.alias, self.panel_serial)
    }
}

/// Blocking interface to the cloud client
///
/// One instance is bound to a host address and installation id; the
/// config flow creates it during the `user` step and reuses it for the
/// `panel` step.
pub trait VisonicClient: Send + Sync {
    /// Account-level login
    fn authenticate(&self, email: &str, password: &str) -> Result<SessionToken, ClientError>;

    /// Panel-level login with the panel's numeric access code
    fn panel_login(&self, panel_id: &str, code: &str) -> Result<SessionToken, ClientError>;

    /// Panels tied to the authenticated account, in API order
    fn get_panels(&self) -> Result<Vec<PanelInfo>, ClientError>;
}

/// Builds a client bound to one host and installation id
pub trait VisonicClientFactory: Send + Sync {
    fn setup(&self, host: &str, installation_id: &str) -> Arc<dyn VisonicClient>;
}
