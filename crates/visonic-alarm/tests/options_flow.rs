//! Options editor tests: prefill, merge semantics, range validation

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use common::harness;
use visonic_alarm::consts::{
    CONF_PIN_REQUIRED_ARM, CONF_PIN_REQUIRED_DISARM, CONF_SCAN_INTERVAL, DOMAIN,
};
use visonic_alarm::options_flow::STEP_INIT;
use visonic_alarm::VisonicAlarmOptionsFlow;
use visonic_config_entries::{ConfigEntries, ConfigEntry};
use visonic_data_entry_flow::{FlowError, FlowManager, FlowResultType, SchemaError};

async fn seeded_entry(
    entries: &Arc<ConfigEntries>,
    options: HashMap<String, serde_json::Value>,
) -> ConfigEntry {
    entries
        .add(
            ConfigEntry::new(DOMAIN, "123ABC")
                .with_unique_id("user@example.com-123ABC")
                .with_options(options),
        )
        .await
        .unwrap()
}

async fn start_options(
    manager: &FlowManager,
    entries: &Arc<ConfigEntries>,
    entry: &ConfigEntry,
) -> visonic_data_entry_flow::FlowResult {
    let current = entries.get(&entry.entry_id).unwrap();
    manager
        .start_options_flow(&entry.entry_id, Box::new(VisonicAlarmOptionsFlow::new(current)))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_prefill_defaults_when_no_options() {
    let (_dir, entries, manager) = harness();
    let entry = seeded_entry(&entries, HashMap::new()).await;

    let result = start_options(&manager, &entries, &entry).await;
    assert_eq!(result.result_type, FlowResultType::Form);
    assert_eq!(result.step_id.as_deref(), Some(STEP_INIT));

    let schema = result.data_schema.as_ref().unwrap();
    assert_eq!(
        schema.fields().get(CONF_SCAN_INTERVAL).unwrap().default,
        Some(json!(30))
    );
    assert_eq!(
        schema.fields().get(CONF_PIN_REQUIRED_ARM).unwrap().default,
        Some(json!(true))
    );
    assert_eq!(
        schema.fields().get(CONF_PIN_REQUIRED_DISARM).unwrap().default,
        Some(json!(true))
    );
}

#[tokio::test]
async fn test_prefill_from_existing_options() {
    let (_dir, entries, manager) = harness();
    let entry = seeded_entry(
        &entries,
        HashMap::from([
            (CONF_SCAN_INTERVAL.to_string(), json!(120)),
            (CONF_PIN_REQUIRED_ARM.to_string(), json!(false)),
        ]),
    )
    .await;

    let result = start_options(&manager, &entries, &entry).await;
    let schema = result.data_schema.as_ref().unwrap();
    assert_eq!(
        schema.fields().get(CONF_SCAN_INTERVAL).unwrap().default,
        Some(json!(120))
    );
    assert_eq!(
        schema.fields().get(CONF_PIN_REQUIRED_ARM).unwrap().default,
        Some(json!(false))
    );
    // untouched option still falls back to the documented default
    assert_eq!(
        schema.fields().get(CONF_PIN_REQUIRED_DISARM).unwrap().default,
        Some(json!(true))
    );
}

#[tokio::test]
async fn test_partial_submission_overwrites_only_submitted_keys() {
    let (_dir, entries, manager) = harness();
    let entry = seeded_entry(
        &entries,
        HashMap::from([
            (CONF_SCAN_INTERVAL.to_string(), json!(30)),
            (CONF_PIN_REQUIRED_ARM.to_string(), json!(true)),
            (CONF_PIN_REQUIRED_DISARM.to_string(), json!(true)),
        ]),
    )
    .await;

    let result = start_options(&manager, &entries, &entry).await;
    let input = HashMap::from([(CONF_SCAN_INTERVAL.to_string(), json!(45))]);
    let result = manager
        .progress_flow(&result.flow_id, Some(input))
        .await
        .unwrap();
    assert_eq!(result.result_type, FlowResultType::CreateEntry);

    let updated = entries.get(&entry.entry_id).unwrap();
    assert_eq!(updated.options.get(CONF_SCAN_INTERVAL), Some(&json!(45)));
    assert_eq!(updated.options.get(CONF_PIN_REQUIRED_ARM), Some(&json!(true)));
    assert_eq!(
        updated.options.get(CONF_PIN_REQUIRED_DISARM),
        Some(&json!(true))
    );
}

#[tokio::test]
async fn test_full_submission_replaces_options() {
    let (_dir, entries, manager) = harness();
    let entry = seeded_entry(&entries, HashMap::new()).await;

    let result = start_options(&manager, &entries, &entry).await;
    let input = HashMap::from([
        (CONF_SCAN_INTERVAL.to_string(), json!(60)),
        (CONF_PIN_REQUIRED_ARM.to_string(), json!(false)),
        (CONF_PIN_REQUIRED_DISARM.to_string(), json!(false)),
    ]);
    manager
        .progress_flow(&result.flow_id, Some(input))
        .await
        .unwrap();

    let updated = entries.get(&entry.entry_id).unwrap();
    assert_eq!(updated.options.get(CONF_SCAN_INTERVAL), Some(&json!(60)));
    assert_eq!(
        updated.options.get(CONF_PIN_REQUIRED_ARM),
        Some(&json!(false))
    );
    assert_eq!(
        updated.options.get(CONF_PIN_REQUIRED_DISARM),
        Some(&json!(false))
    );
    // setup data survives an options update
    assert_eq!(updated.title, "123ABC");
    assert_eq!(updated.unique_id, entry.unique_id);
}

#[tokio::test]
async fn test_scan_interval_out_of_range_rejected() {
    let (_dir, entries, manager) = harness();
    let entry = seeded_entry(
        &entries,
        HashMap::from([(CONF_SCAN_INTERVAL.to_string(), json!(30))]),
    )
    .await;

    let result = start_options(&manager, &entries, &entry).await;
    let flow_id = result.flow_id.clone();

    for bad in [json!(4), json!(601), json!(900)] {
        let input = HashMap::from([(CONF_SCAN_INTERVAL.to_string(), bad)]);
        let err = manager.progress_flow(&flow_id, Some(input)).await;
        assert!(matches!(
            err,
            Err(FlowError::Validation(SchemaError::OutOfRange { .. }))
        ));
    }

    // nothing was merged
    let unchanged = entries.get(&entry.entry_id).unwrap();
    assert_eq!(unchanged.options.get(CONF_SCAN_INTERVAL), Some(&json!(30)));

    // bounds are inclusive; a valid resubmission still works
    let input = HashMap::from([(CONF_SCAN_INTERVAL.to_string(), json!(600))]);
    let result = manager.progress_flow(&flow_id, Some(input)).await.unwrap();
    assert_eq!(result.result_type, FlowResultType::CreateEntry);
    let updated = entries.get(&entry.entry_id).unwrap();
    assert_eq!(updated.options.get(CONF_SCAN_INTERVAL), Some(&json!(600)));
}

#[tokio::test]
async fn test_options_flow_requires_existing_entry() {
    let (_dir, entries, manager) = harness();
    let entry = ConfigEntry::new(DOMAIN, "ghost");
    let entry_id = entry.entry_id.clone();

    let result = manager
        .start_options_flow(&entry_id, Box::new(VisonicAlarmOptionsFlow::new(entry)))
        .await;

    assert!(matches!(result, Err(FlowError::Entries(_))));
    assert!(entries.is_empty());
}
