use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Top-level application settings.
///
/// Sources, lowest precedence first: struct defaults, `config/default.*`,
/// `config/local.*`, `SPEAKCHECK__*` environment variables, then the legacy
/// credential variables (`ASSEMBLY_AI_KEY`, `AIRTABLE_API_KEY`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub airtable: AirtableSettings,
    pub vimeo: VimeoSettings,
    pub assembly_ai: AssemblyAiSettings,
    pub evaluation: EvaluationSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body for clip uploads.
    pub upload_body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            upload_body_limit_bytes: 200 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirtableSettings {
    pub api_key: String,
    pub base_id: String,
    pub api_url: String,
    pub participants_table: String,
    pub recordings_table: String,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_id: String::new(),
            api_url: "https://api.airtable.com".to_string(),
            participants_table: "Participants".to_string(),
            recordings_table: "Recordings".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VimeoSettings {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub folder_id: Option<String>,
    pub api_url: String,
}

impl Default for VimeoSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            access_token: String::new(),
            folder_id: None,
            api_url: "https://api.vimeo.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyAiSettings {
    pub api_key: String,
    pub api_url: String,
}

impl Default for AssemblyAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://api.assemblyai.com".to_string(),
        }
    }
}

/// Bounded polling of the speech collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub poll_interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_attempts: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "speakcheck=info,tower_http=info".to_string(),
            json: false,
        }
    }
}

const LEGACY_OVERRIDES: &[(&str, &str)] = &[
    ("ASSEMBLY_AI_KEY", "assembly_ai.api_key"),
    ("AIRTABLE_API_KEY", "airtable.api_key"),
    ("AIRTABLE_BASE_ID", "airtable.base_id"),
    ("VIMEO_CLIENT_ID", "vimeo.client_id"),
    ("VIMEO_CLIENT_SECRET", "vimeo.client_secret"),
    ("VIMEO_ACCESS_TOKEN", "vimeo.access_token"),
    ("VIMEO_FOLDER_ID", "vimeo.folder_id"),
];

impl Settings {
    /// Loads settings from files and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SPEAKCHECK")
                    .prefix_separator("__")
                    .separator("__"),
            );

        for (var, key) in LEGACY_OVERRIDES {
            let value = std::env::var(var).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Rejects settings that lack a credential required by a collaborator.
    ///
    /// A failure here is fatal at process start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("assembly_ai.api_key", &self.assembly_ai.api_key),
            ("airtable.api_key", &self.airtable.api_key),
            ("airtable.base_id", &self.airtable.base_id),
            ("vimeo.access_token", &self.vimeo.access_token),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(ConfigError::Message(format!(
                "missing required credential `{key}`"
            ))),
            None => Ok(()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
