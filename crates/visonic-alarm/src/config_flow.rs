//! Config flow for Visonic Alarm
//!
//! Two-step wizard: `user` collects the cloud credentials and verifies
//! the account login, `panel` picks one of the account's panels and
//! verifies the panel login. Both network calls are blocking library
//! calls and run on the blocking thread pool.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::error;
use uuid::Uuid;

use visonic_data_entry_flow::{
    ConfigFlow, FlowError, FlowStep, FormSchema, SelectOption, Selector,
};

use crate::client::{ClientError, PanelInfo, SessionToken, VisonicClient, VisonicClientFactory};
use crate::consts::{
    CONF_CODE, CONF_EMAIL, CONF_HOST, CONF_PANEL_ID, CONF_PASSWORD, CONF_UUID, DEFAULT_CODE,
    DOMAIN,
};

/// Error key for a remote-service lockout
pub const ERROR_TEMPORARY_BLOCK: &str = "temporary_block";
/// Error key for any other failure
pub const ERROR_UNKNOWN: &str = "unknown";
/// Abort reason when the account has no panels to configure
pub const ABORT_NO_PANELS: &str = "no_panels";

pub const STEP_USER: &str = "user";
pub const STEP_PANEL: &str = "panel";

/// Two-step setup wizard for a Visonic cloud account
pub struct VisonicAlarmConfigFlow {
    factory: Arc<dyn VisonicClientFactory>,
    /// Live client handle, created in the `user` step and reused in `panel`
    client: Option<Arc<dyn VisonicClient>>,
    /// Validated credentials from the `user` step (incl. installation id)
    credentials: HashMap<String, Value>,
    /// Panels fetched for the `panel` step, kept for error redisplay
    panels: Vec<PanelInfo>,
}

impl VisonicAlarmConfigFlow {
    pub fn new(factory: Arc<dyn VisonicClientFactory>) -> Self {
        Self {
            factory,
            client: None,
            credentials: HashMap::new(),
            panels: Vec::new(),
        }
    }

    fn user_schema() -> FormSchema {
        FormSchema::new()
            .required_with_default(CONF_HOST, Selector::Text, json!(""))
            .required_with_default(CONF_EMAIL, Selector::Text, json!(""))
            .required(CONF_PASSWORD, Selector::Password)
    }

    fn panel_schema(panels: &[PanelInfo]) -> FormSchema {
        let options = panels
            .iter()
            .map(|p| SelectOption {
                label: p.label(),
                value: p.panel_serial.clone(),
            })
            .collect();
        let first = panels.first().map(|p| p.panel_serial.as_str()).unwrap_or("");

        FormSchema::new()
            .required_with_default(CONF_PANEL_ID, Selector::Select { options }, json!(first))
            .required_with_default(CONF_CODE, Selector::Password, json!(DEFAULT_CODE))
    }

    fn field(input: &HashMap<String, Value>, key: &str) -> String {
        input
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Build the client handle and verify the account login off-thread
    async fn validate_user_login(
        &mut self,
        input: &HashMap<String, Value>,
    ) -> Result<SessionToken, ClientError> {
        let host = Self::field(input, CONF_HOST);
        let installation_id = Self::field(input, CONF_UUID);
        let email = Self::field(input, CONF_EMAIL);
        let password = Self::field(input, CONF_PASSWORD);

        let client = self.factory.setup(&host, &installation_id);
        self.client = Some(client.clone());

        run_blocking(move || client.authenticate(&email, &password)).await
    }

    /// Verify the panel login off-thread
    async fn validate_panel_login(
        &self,
        client: Arc<dyn VisonicClient>,
        input: &HashMap<String, Value>,
    ) -> Result<SessionToken, ClientError> {
        let panel_id = Self::field(input, CONF_PANEL_ID);
        let code = Self::field(input, CONF_CODE);

        run_blocking(move || client.panel_login(&panel_id, &code)).await
    }

    async fn step_user(
        &mut self,
        user_input: Option<HashMap<String, Value>>,
    ) -> Result<FlowStep, FlowError> {
        if let Some(mut input) = user_input {
            // A fresh installation id for every wizard run
            input.insert(CONF_UUID.to_string(), json!(Uuid::new_v4().to_string()));

            let mut errors = HashMap::new();
            match self.validate_user_login(&input).await {
                Ok(_) => {
                    self.credentials = input;
                    return self.step_panel(None).await;
                }
                Err(ClientError::TemporaryBlocked) => {
                    errors.insert("base".to_string(), ERROR_TEMPORARY_BLOCK.to_string());
                }
                Err(err) => {
                    error!("Unable to connect to the alarm cloud: {}", err);
                    errors.insert("base".to_string(), ERROR_UNKNOWN.to_string());
                }
            }

            return Ok(FlowStep::form_with_errors(
                STEP_USER,
                Self::user_schema(),
                errors,
            ));
        }

        Ok(FlowStep::form(STEP_USER, Self::user_schema()))
    }

    async fn step_panel(
        &mut self,
        user_input: Option<HashMap<String, Value>>,
    ) -> Result<FlowStep, FlowError> {
        let Some(client) = self.client.clone() else {
            // the panel step is only reachable after a successful login
            return Box::pin(self.step_user(None)).await;
        };

        if let Some(input) = user_input {
            let mut errors = HashMap::new();
            match self.validate_panel_login(client, &input).await {
                Ok(_) => {
                    let email = Self::field(&self.credentials, CONF_EMAIL);
                    let panel_id = Self::field(&input, CONF_PANEL_ID);
                    let unique_id = format!("{email}-{panel_id}");

                    let mut data = self.credentials.clone();
                    data.extend(input);

                    return Ok(FlowStep::CreateEntry {
                        title: panel_id,
                        data,
                        unique_id: Some(unique_id),
                    });
                }
                Err(ClientError::TemporaryBlocked) => {
                    errors.insert("base".to_string(), ERROR_TEMPORARY_BLOCK.to_string());
                }
                Err(err) => {
                    error!("Unable to connect to the alarm panel: {}", err);
                    errors.insert("base".to_string(), ERROR_UNKNOWN.to_string());
                }
            }

            return Ok(FlowStep::form_with_errors(
                STEP_PANEL,
                Self::panel_schema(&self.panels),
                errors,
            ));
        }

        self.panels = run_blocking(move || client.get_panels())
            .await
            .map_err(|err| FlowError::Internal(format!("listing panels failed: {err}")))?;

        if self.panels.is_empty() {
            return Ok(FlowStep::Abort {
                reason: ABORT_NO_PANELS,
            });
        }

        Ok(FlowStep::form(STEP_PANEL, Self::panel_schema(&self.panels)))
    }
}

#[async_trait]
impl ConfigFlow for VisonicAlarmConfigFlow {
    fn domain(&self) -> &str {
        DOMAIN
    }

    async fn handle_step(
        &mut self,
        step_id: &str,
        user_input: Option<HashMap<String, Value>>,
    ) -> Result<FlowStep, FlowError> {
        match step_id {
            STEP_USER => self.step_user(user_input).await,
            STEP_PANEL => self.step_panel(user_input).await,
            other => Err(FlowError::UnknownStep(other.to_string())),
        }
    }
}

/// Run a blocking client call on the worker pool
async fn run_blocking<T, F>(call: F) -> Result<T, ClientError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ClientError> + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|err| ClientError::Other(format!("worker task failed: {err}")))?
}
