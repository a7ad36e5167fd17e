//! Shared test helpers: a scriptable fake cloud client and a flow harness
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tempfile::TempDir;

use visonic_alarm::client::{
    ClientError, PanelInfo, SessionToken, VisonicClient, VisonicClientFactory,
};
use visonic_alarm::consts::{CONF_EMAIL, CONF_HOST, CONF_PASSWORD};
use visonic_config_entries::{ConfigEntries, Storage};
use visonic_data_entry_flow::FlowManager;

/// How a fake call should behave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    TemporaryBlocked,
    Fail,
}

impl Behavior {
    fn apply(self) -> Result<SessionToken, ClientError> {
        match self {
            Behavior::Succeed => Ok(SessionToken("session".to_string())),
            Behavior::TemporaryBlocked => Err(ClientError::TemporaryBlocked),
            Behavior::Fail => Err(ClientError::Other("connection refused".to_string())),
        }
    }
}

/// Scriptable fake for the external cloud client
pub struct MockClient {
    pub auth: Mutex<Behavior>,
    pub login: Mutex<Behavior>,
    pub list: Mutex<Behavior>,
    pub panels: Mutex<Vec<PanelInfo>>,
    pub auth_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
}

impl MockClient {
    pub fn new(panels: Vec<PanelInfo>) -> Arc<Self> {
        Arc::new(Self {
            auth: Mutex::new(Behavior::Succeed),
            login: Mutex::new(Behavior::Succeed),
            list: Mutex::new(Behavior::Succeed),
            panels: Mutex::new(panels),
            auth_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_auth(&self, behavior: Behavior) {
        *self.auth.lock().unwrap() = behavior;
    }

    pub fn set_login(&self, behavior: Behavior) {
        *self.login.lock().unwrap() = behavior;
    }

    pub fn set_list(&self, behavior: Behavior) {
        *self.list.lock().unwrap() = behavior;
    }
}

impl VisonicClient for MockClient {
    fn authenticate(&self, _email: &str, _password: &str) -> Result<SessionToken, ClientError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.auth.lock().unwrap().apply()
    }

    fn panel_login(&self, _panel_id: &str, _code: &str) -> Result<SessionToken, ClientError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login.lock().unwrap().apply()
    }

    fn get_panels(&self) -> Result<Vec<PanelInfo>, ClientError> {
        self.list.lock().unwrap().apply()?;
        Ok(self.panels.lock().unwrap().clone())
    }
}

/// Factory returning the shared fake; records every installation id it
/// is handed so tests can assert uniqueness across wizard runs
pub struct MockFactory {
    pub client: Arc<MockClient>,
    pub installation_ids: Mutex<Vec<String>>,
}

impl MockFactory {
    pub fn new(client: Arc<MockClient>) -> Arc<Self> {
        Arc::new(Self {
            client,
            installation_ids: Mutex::new(Vec::new()),
        })
    }
}

impl VisonicClientFactory for MockFactory {
    fn setup(&self, _host: &str, installation_id: &str) -> Arc<dyn VisonicClient> {
        self.installation_ids
            .lock()
            .unwrap()
            .push(installation_id.to_string());
        self.client.clone()
    }
}

/// Fresh entries store and flow manager backed by a temp dir
pub fn harness() -> (TempDir, Arc<ConfigEntries>, FlowManager) {
    let dir = TempDir::new().unwrap();
    let entries = Arc::new(ConfigEntries::new(Arc::new(Storage::new(dir.path()))));
    let manager = FlowManager::new(entries.clone());
    (dir, entries, manager)
}

pub fn two_panels() -> Vec<PanelInfo> {
    vec![
        PanelInfo {
            alias: "Home".to_string(),
            panel_serial: "123ABC".to_string(),
        },
        PanelInfo {
            alias: "Cabin".to_string(),
            panel_serial: "456DEF".to_string(),
        },
    ]
}

pub fn credentials() -> HashMap<String, Value> {
    credentials_for("user@example.com")
}

pub fn credentials_for(email: &str) -> HashMap<String, Value> {
    HashMap::from([
        (CONF_HOST.to_string(), json!("visonic.tycomonitor.com")),
        (CONF_EMAIL.to_string(), json!(email)),
        (CONF_PASSWORD.to_string(), json!("hunter2")),
    ])
}
