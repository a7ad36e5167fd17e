//! Data Entry Flow
//!
//! The host-side framework that drives multi-step configuration wizards.
//! Integrations implement [`ConfigFlow`]; the [`FlowManager`] owns the
//! in-progress flows, validates each submission against the form schema
//! currently shown, and persists the finished result as a config entry
//! (or, for options flows, as the entry's new options map).
//!
//! # Key Types
//!
//! - [`FormSchema`] - Declarative form field descriptions with validation
//! - [`FlowStep`] - What a flow handler returns from one step
//! - [`FlowResult`] - What the host (frontend) receives
//! - [`FlowManager`] - Tracks and drives active flows

pub mod manager;
pub mod result;
pub mod schema;

pub use manager::{ConfigFlow, FlowError, FlowManager, ABORT_ALREADY_CONFIGURED};
pub use result::{FlowResult, FlowResultType, FlowStep};
pub use schema::{FormField, FormSchema, SchemaError, SelectOption, Selector};
