//! Flow step outcomes and host-facing flow results

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::FormSchema;

/// Outcome of a single step, produced by a flow handler.
#[derive(Debug)]
pub enum FlowStep {
    /// Show (or redisplay) a form.
    Form {
        step_id: &'static str,
        data_schema: FormSchema,
        /// Error annotations keyed by field, or "base" for the whole form
        errors: HashMap<String, String>,
    },
    /// Finish the flow and hand the collected data to the host.
    CreateEntry {
        title: String,
        data: HashMap<String, Value>,
        /// Duplicate-prevention key; None for options flows
        unique_id: Option<String>,
    },
    /// Stop the flow without creating anything.
    Abort { reason: &'static str },
}

impl FlowStep {
    /// A form with no error annotations
    pub fn form(step_id: &'static str, data_schema: FormSchema) -> Self {
        FlowStep::Form {
            step_id,
            data_schema,
            errors: HashMap::new(),
        }
    }

    /// A form redisplayed with error annotations
    pub fn form_with_errors(
        step_id: &'static str,
        data_schema: FormSchema,
        errors: HashMap<String, String>,
    ) -> Self {
        FlowStep::Form {
            step_id,
            data_schema,
            errors,
        }
    }
}

/// Result type for a config flow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowResultType {
    Form,
    CreateEntry,
    Abort,
}

/// Result of a config flow step as handed to the host
#[derive(Debug, Clone, Serialize)]
pub struct FlowResult {
    /// Flow ID
    pub flow_id: String,
    /// Handler (integration domain)
    pub handler: String,
    /// Result type
    #[serde(rename = "type")]
    pub result_type: FlowResultType,
    /// Current step ID (for form type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    /// Data schema for the form (for form type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_schema: Option<FormSchema>,
    /// Errors from the previous submission (always present, null if none)
    pub errors: Option<HashMap<String, String>>,
    /// Title (for create_entry type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Abort reason (for abort type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Id of the created/updated entry (for create_entry type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl FlowResult {
    pub fn form(
        flow_id: &str,
        handler: &str,
        step_id: &str,
        data_schema: FormSchema,
        errors: HashMap<String, String>,
    ) -> Self {
        Self {
            flow_id: flow_id.to_string(),
            handler: handler.to_string(),
            result_type: FlowResultType::Form,
            step_id: Some(step_id.to_string()),
            data_schema: Some(data_schema),
            errors: if errors.is_empty() {
                None
            } else {
                Some(errors)
            },
            title: None,
            reason: None,
            result: None,
        }
    }

    pub fn create_entry(flow_id: &str, handler: &str, title: &str, entry_id: &str) -> Self {
        Self {
            flow_id: flow_id.to_string(),
            handler: handler.to_string(),
            result_type: FlowResultType::CreateEntry,
            step_id: None,
            data_schema: None,
            errors: None,
            title: Some(title.to_string()),
            reason: None,
            result: Some(serde_json::json!({ "entry_id": entry_id })),
        }
    }

    pub fn abort(flow_id: &str, handler: &str, reason: &str) -> Self {
        Self {
            flow_id: flow_id.to_string(),
            handler: handler.to_string(),
            result_type: FlowResultType::Abort,
            step_id: None,
            data_schema: None,
            errors: None,
            title: None,
            reason: Some(reason.to_string()),
            result: None,
        }
    }

    /// Error annotation for a field, if any
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|e| e.get(field))
            .map(String::as_str)
    }
}
