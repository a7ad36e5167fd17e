//! Domain constants
//!
//! Shared between the config/options flows and the entity platforms.

/// Integration domain
pub const DOMAIN: &str = "visonicalarm";

// Configuration keys
pub const CONF_HOST: &str = "host";
pub const CONF_EMAIL: &str = "email";
pub const CONF_PASSWORD: &str = "password";
pub const CONF_CODE: &str = "code";
pub const CONF_UUID: &str = "uuid";
pub const CONF_PANEL_ID: &str = "panel_id";
pub const CONF_SCAN_INTERVAL: &str = "scan_interval";
pub const CONF_PIN_REQUIRED_ARM: &str = "pin_required_arm";
pub const CONF_PIN_REQUIRED_DISARM: &str = "pin_required_disarm";

// Option defaults and bounds
pub const DEFAULT_SCAN_INTERVAL: i64 = 30;
pub const SCAN_INTERVAL_MIN: i64 = 5;
pub const SCAN_INTERVAL_MAX: i64 = 600;
pub const DEFAULT_CODE: &str = "0000";
pub const DEFAULT_PIN_REQUIRED_ARM: bool = true;
pub const DEFAULT_PIN_REQUIRED_DISARM: bool = true;

/// Platforms set up for each config entry
pub const PLATFORMS: &[&str] = &["alarm_control_panel", "sensor", "switch"];

// Device type catalog as reported by the cloud API
pub const PANELS: &[&str] = &["VISONIC_PANEL"];
pub const CONTACT_SENSORS: &[&str] = &["CONTACT", "MC303_VANISH"];
pub const MOTION_SENSORS: &[&str] = &[
    "FLAT_PIR_SMART",
    "MOTION",
    "MOTION_DUAL",
    "MOTION_V_ANTIMASK",
    "MOTION_CAMERA",
    "CURTAIN",
];
pub const OTHER_SENSORS: &[&str] = &["KEYFOB_ARM_LED", "OUTDOOR"];

/// Whether a reported device type maps to an entity we create
pub fn is_supported_sensor(device_type: &str) -> bool {
    PANELS.contains(&device_type)
        || CONTACT_SENSORS.contains(&device_type)
        || MOTION_SENSORS.contains(&device_type)
        || OTHER_SENSORS.contains(&device_type)
}

/// Human-readable label for a reported device type
pub fn sensor_friendly_name(device_type: &str) -> Option<&'static str> {
    match device_type {
        "CONTACT" | "MC303_VANISH" => Some("Contact Sensor"),
        "CURTAIN" => Some("Curtain Motion Sensor"),
        "FLAT_PIR_SMART" => Some("Smart PIR Sensor"),
        "MOTION" => Some("Motion Sensor"),
        "MOTION_DUAL" => Some("Motion Dual Sensor"),
        "MOTION_V_ANTIMASK" => Some("Motion Sensor"),
        "MOTION_CAMERA" => Some("Motion Camera"),
        "KEYFOB_ARM_LED" => Some("Keyfob"),
        "OUTDOOR" => Some("Outdoor"),
        "VISONIC_PANEL" => Some("Alarm Panel"),
        _ => None,
    }
}
