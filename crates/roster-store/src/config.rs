use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

/// Default public endpoint of the document store's REST surface.
pub const DOCUMENT_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

/// Service-account-style credential file. Only `project_id` is required;
/// `database_url` overrides the derived real-time endpoint and `api_key`
/// is forwarded on every request when present.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub project_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub database_url: Option<String>,
}

impl Credentials {
    /// Read credentials from a JSON file. A missing or unreadable file is
    /// not an error: it puts the caller in unconfigured mode, where every
    /// store operation reports failure instead of panicking.
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("credential file {} unavailable ({}), running unconfigured", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<Credentials>(&raw) {
            Ok(creds) => {
                info!("loaded credentials for project {} from {}", creds.project_id, path.display());
                Some(creds)
            }
            Err(e) => {
                warn!("credential file {} is not valid JSON ({}), running unconfigured", path.display(), e);
                None
            }
        }
    }
}

/// Everything a store client needs to talk to one project. Built once by
/// the composition root and handed to each client; there is no process-wide
/// singleton.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub api_key: Option<String>,
    pub document_endpoint: String,
    pub realtime_endpoint: String,
}

impl StoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        let realtime_endpoint = format!("https://{project_id}-default-rtdb.firebaseio.com");
        Self {
            project_id,
            api_key: None,
            document_endpoint: DOCUMENT_ENDPOINT.to_string(),
            realtime_endpoint,
        }
    }

    pub fn from_credentials(creds: &Credentials) -> Self {
        let mut config = Self::new(creds.project_id.clone());
        config.api_key = creds.api_key.clone();
        if let Some(url) = &creds.database_url {
            config.realtime_endpoint = url.trim_end_matches('/').to_string();
        }
        config
    }

    /// Point the document-store client somewhere else (emulator, tests).
    pub fn with_document_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.document_endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Point the real-time client somewhere else (emulator, tests).
    pub fn with_realtime_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.realtime_endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Root of this project's document tree.
    pub(crate) fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.document_endpoint, self.project_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_missing_file_yields_unconfigured() {
        assert!(Credentials::load("/definitely/not/here.json").is_none());
    }

    #[test]
    fn load_garbled_file_yields_unconfigured() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(Credentials::load(file.path()).is_none());
    }

    #[test]
    fn load_parses_minimal_credentials() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"project_id": "demo", "api_key": "k123"}"#)
            .unwrap();
        let creds = Credentials::load(file.path()).unwrap();
        assert_eq!(creds.project_id, "demo");
        assert_eq!(creds.api_key.as_deref(), Some("k123"));
        assert!(creds.database_url.is_none());
    }

    #[test]
    fn config_derives_endpoints_from_project() {
        let config = StoreConfig::new("demo");
        assert_eq!(config.realtime_endpoint, "https://demo-default-rtdb.firebaseio.com");
        assert_eq!(
            config.documents_url(),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents"
        );
    }

    #[test]
    fn database_url_override_wins() {
        let creds = Credentials {
            project_id: "demo".into(),
            api_key: None,
            database_url: Some("http://localhost:9000/".into()),
        };
        let config = StoreConfig::from_credentials(&creds);
        assert_eq!(config.realtime_endpoint, "http://localhost:9000");
    }
}
