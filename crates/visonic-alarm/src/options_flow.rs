//! Options flow for Visonic Alarm
//!
//! Single-step editor for the per-entry settings: poll interval and the
//! two PIN-requirement flags. Submitted keys overwrite the entry's
//! current options; untouched keys survive.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use visonic_config_entries::ConfigEntry;
use visonic_data_entry_flow::{ConfigFlow, FlowError, FlowStep, FormSchema, Selector};

use crate::consts::{
    CONF_PIN_REQUIRED_ARM, CONF_PIN_REQUIRED_DISARM, CONF_SCAN_INTERVAL, DEFAULT_PIN_REQUIRED_ARM,
    DEFAULT_PIN_REQUIRED_DISARM, DEFAULT_SCAN_INTERVAL, DOMAIN, SCAN_INTERVAL_MAX,
    SCAN_INTERVAL_MIN,
};

pub const STEP_INIT: &str = "init";

/// Options editor scoped to one existing config entry
pub struct VisonicAlarmOptionsFlow {
    /// Snapshot of the entry being edited
    entry: ConfigEntry,
}

impl VisonicAlarmOptionsFlow {
    pub fn new(entry: ConfigEntry) -> Self {
        Self { entry }
    }

    /// Current option value, falling back to the documented default
    fn current(&self, key: &str, default: Value) -> Value {
        self.entry.options.get(key).cloned().unwrap_or(default)
    }

    fn options_schema(&self) -> FormSchema {
        FormSchema::new()
            .required_with_default(
                CONF_SCAN_INTERVAL,
                Selector::Number {
                    min: SCAN_INTERVAL_MIN,
                    max: SCAN_INTERVAL_MAX,
                    unit: Some("s".to_string()),
                },
                self.current(CONF_SCAN_INTERVAL, json!(DEFAULT_SCAN_INTERVAL)),
            )
            .required_with_default(
                CONF_PIN_REQUIRED_ARM,
                Selector::Boolean,
                self.current(CONF_PIN_REQUIRED_ARM, json!(DEFAULT_PIN_REQUIRED_ARM)),
            )
            .required_with_default(
                CONF_PIN_REQUIRED_DISARM,
                Selector::Boolean,
                self.current(CONF_PIN_REQUIRED_DISARM, json!(DEFAULT_PIN_REQUIRED_DISARM)),
            )
    }
}

#[async_trait]
impl ConfigFlow for VisonicAlarmOptionsFlow {
    fn domain(&self) -> &str {
        DOMAIN
    }

    fn initial_step(&self) -> &'static str {
        STEP_INIT
    }

    async fn handle_step(
        &mut self,
        step_id: &str,
        user_input: Option<HashMap<String, Value>>,
    ) -> Result<FlowStep, FlowError> {
        if step_id != STEP_INIT {
            return Err(FlowError::UnknownStep(step_id.to_string()));
        }

        if let Some(input) = user_input {
            // submitted keys win over the current options
            let mut options = self.entry.options.clone();
            options.extend(input);

            return Ok(FlowStep::CreateEntry {
                title: String::new(),
                data: options,
                unique_id: None,
            });
        }

        Ok(FlowStep::form(STEP_INIT, self.options_schema()))
    }
}
