//! Visonic Alarm integration
//!
//! Cloud-polling integration for Visonic/PowerManage alarm systems. This
//! crate provides the two-step config flow that onboards a cloud account
//! and panel, the options flow for per-entry tuning, and the constant
//! tables shared with the entity platforms. All panel communication is
//! delegated to the external client behind [`VisonicClient`].

pub mod client;
pub mod config_flow;
pub mod consts;
pub mod options_flow;

pub use client::{ClientError, PanelInfo, SessionToken, VisonicClient, VisonicClientFactory};
pub use config_flow::{VisonicAlarmConfigFlow, ERROR_TEMPORARY_BLOCK, ERROR_UNKNOWN};
pub use options_flow::VisonicAlarmOptionsFlow;
