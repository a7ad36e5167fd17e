//! Flow Manager
//!
//! Drives active configuration flows. The manager owns one state record
//! per in-progress flow, validates each submission against the schema of
//! the form currently shown, and turns a finished flow into a persisted
//! config entry (setup flows) or an options update (options flows).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use ulid::Ulid;

use visonic_config_entries::{
    ConfigEntries, ConfigEntriesError, ConfigEntry, ConfigEntryUpdate,
};

use crate::result::{FlowResult, FlowResultType, FlowStep};
use crate::schema::{FormSchema, SchemaError};

/// Abort reason when a `(domain, unique_id)` pair is already configured
pub const ABORT_ALREADY_CONFIGURED: &str = "already_configured";

/// Flow errors
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("no flow in progress with id {0}")]
    UnknownFlow(String),

    #[error("unknown step: {0}")]
    UnknownStep(String),

    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error("config entries error: {0}")]
    Entries(#[from] ConfigEntriesError),

    #[error("flow failed: {0}")]
    Internal(String),
}

/// Trait for configuration flow handlers
///
/// A flow is a small state machine: the manager calls [`handle_step`]
/// with the current step id and the validated user input (None on first
/// render) and the flow answers with the next [`FlowStep`].
///
/// [`handle_step`]: ConfigFlow::handle_step
#[async_trait]
pub trait ConfigFlow: Send {
    /// Integration domain this flow configures
    fn domain(&self) -> &str;

    /// Step the flow starts on
    fn initial_step(&self) -> &'static str {
        "user"
    }

    /// Run one step with optional submitted input
    async fn handle_step(
        &mut self,
        step_id: &str,
        user_input: Option<HashMap<String, Value>>,
    ) -> Result<FlowStep, FlowError>;
}

/// What a finished flow does with its collected data
enum FlowKind {
    /// Create a new config entry
    Config,
    /// Replace the options map of an existing entry
    Options { entry_id: String },
}

/// State for one in-progress flow
struct ActiveFlow {
    domain: String,
    kind: FlowKind,
    flow: Box<dyn ConfigFlow>,
    current_step: String,
    /// Schema of the form currently shown; submitted input validates
    /// against it before it reaches the handler
    schema: Option<FormSchema>,
}

/// Manages active configuration flows
pub struct FlowManager {
    entries: Arc<ConfigEntries>,
    /// Active flows: flow_id -> flow state. The per-flow mutex serializes
    /// step invocations for one flow.
    flows: RwLock<HashMap<String, Arc<Mutex<ActiveFlow>>>>,
}

impl FlowManager {
    pub fn new(entries: Arc<ConfigEntries>) -> Self {
        Self {
            entries,
            flows: RwLock::new(HashMap::new()),
        }
    }

    /// Start a setup flow; the finished flow creates a config entry
    pub async fn start_flow(&self, flow: Box<dyn ConfigFlow>) -> Result<FlowResult, FlowError> {
        self.begin(flow, FlowKind::Config).await
    }

    /// Start an options flow scoped to an existing entry; the finished
    /// flow replaces that entry's options map
    pub async fn start_options_flow(
        &self,
        entry_id: &str,
        flow: Box<dyn ConfigFlow>,
    ) -> Result<FlowResult, FlowError> {
        self.entries
            .get(entry_id)
            .ok_or_else(|| ConfigEntriesError::NotFound(entry_id.to_string()))?;

        self.begin(
            flow,
            FlowKind::Options {
                entry_id: entry_id.to_string(),
            },
        )
        .await
    }

    async fn begin(
        &self,
        mut flow: Box<dyn ConfigFlow>,
        kind: FlowKind,
    ) -> Result<FlowResult, FlowError> {
        let flow_id = Ulid::new().to_string().to_lowercase();
        let initial = flow.initial_step();
        info!(
            "Starting config flow for {} with flow_id {}",
            flow.domain(),
            flow_id
        );

        let step = flow.handle_step(initial, None).await?;

        let mut active = ActiveFlow {
            domain: flow.domain().to_string(),
            kind,
            flow,
            current_step: initial.to_string(),
            schema: None,
        };

        let result = self.apply_step(&flow_id, &mut active, step).await?;

        if result.result_type == FlowResultType::Form {
            let mut flows = self.flows.write().await;
            flows.insert(flow_id, Arc::new(Mutex::new(active)));
        }

        Ok(result)
    }

    /// Continue a flow with user input
    pub async fn progress_flow(
        &self,
        flow_id: &str,
        user_input: Option<HashMap<String, Value>>,
    ) -> Result<FlowResult, FlowError> {
        let active = {
            let flows = self.flows.read().await;
            flows
                .get(flow_id)
                .cloned()
                .ok_or_else(|| FlowError::UnknownFlow(flow_id.to_string()))?
        };
        let mut active = active.lock().await;

        // Validation failures keep the flow alive; the user resubmits.
        let input = match (user_input, &active.schema) {
            (Some(input), Some(schema)) => Some(schema.validate(&input)?),
            (input, _) => input,
        };

        let step_id = active.current_step.clone();
        debug!(
            "Progressing flow {} for {} at step {}",
            flow_id, active.domain, step_id
        );

        let step = active.flow.handle_step(&step_id, input).await?;
        let result = self.apply_step(flow_id, &mut active, step).await?;

        if result.result_type != FlowResultType::Form {
            let mut flows = self.flows.write().await;
            flows.remove(flow_id);
            info!(
                "Flow {} completed with result type: {:?}",
                flow_id, result.result_type
            );
        }

        Ok(result)
    }

    /// Turn a handler-produced step into a host-facing result, persisting
    /// finished flows
    async fn apply_step(
        &self,
        flow_id: &str,
        active: &mut ActiveFlow,
        step: FlowStep,
    ) -> Result<FlowResult, FlowError> {
        match step {
            FlowStep::Form {
                step_id,
                data_schema,
                errors,
            } => {
                active.current_step = step_id.to_string();
                let result =
                    FlowResult::form(flow_id, &active.domain, step_id, data_schema.clone(), errors);
                active.schema = Some(data_schema);
                Ok(result)
            }

            FlowStep::Abort { reason } => {
                info!("Flow {} aborted: {}", flow_id, reason);
                Ok(FlowResult::abort(flow_id, &active.domain, reason))
            }

            FlowStep::CreateEntry {
                title,
                data,
                unique_id,
            } => match &active.kind {
                FlowKind::Config => {
                    if let Some(ref uid) = unique_id {
                        if self.entries.get_by_unique_id(&active.domain, uid).is_some() {
                            info!(
                                "Flow {} aborted: {} already configured for {}",
                                flow_id, uid, active.domain
                            );
                            return Ok(FlowResult::abort(
                                flow_id,
                                &active.domain,
                                ABORT_ALREADY_CONFIGURED,
                            ));
                        }
                    }

                    let mut entry =
                        ConfigEntry::new(active.domain.as_str(), title.as_str()).with_data(data);
                    if let Some(uid) = unique_id {
                        entry = entry.with_unique_id(uid);
                    }
                    let entry = self.entries.add(entry).await?;

                    Ok(FlowResult::create_entry(
                        flow_id,
                        &active.domain,
                        &title,
                        &entry.entry_id,
                    ))
                }
                FlowKind::Options { entry_id } => {
                    let entry = self
                        .entries
                        .update(entry_id, ConfigEntryUpdate::new().options(data))
                        .await?;
                    debug!(
                        "Flow {} replaced options for entry {}",
                        flow_id, entry.entry_id
                    );

                    Ok(FlowResult::create_entry(
                        flow_id,
                        &active.domain,
                        &title,
                        &entry.entry_id,
                    ))
                }
            },
        }
    }

    /// Get list of active flows
    pub async fn list_flows(&self) -> Vec<Value> {
        // snapshot the handles so no flow mutex is taken while the map
        // lock is held
        let snapshot: Vec<(String, Arc<Mutex<ActiveFlow>>)> = {
            let flows = self.flows.read().await;
            flows
                .iter()
                .map(|(id, active)| (id.clone(), active.clone()))
                .collect()
        };

        let mut listed = Vec::new();
        for (flow_id, active) in snapshot {
            let active = active.lock().await;
            listed.push(serde_json::json!({
                "flow_id": flow_id,
                "handler": active.domain,
                "step_id": active.current_step,
            }));
        }
        listed
    }
}
