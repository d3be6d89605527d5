use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use tracing::{info, warn};

use stailist_ai::models::{DEFAULT_TIMEOUT_SECS, ProviderConfig};
use stailist_ai::{Provider, StylistClient};
use stailist_common::traits::WardrobeBackend;
use stailist_core::{Error, JsonFileBackend, RestWardrobeBackend, StylistService};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Local JSON file
    File,
    /// Wardrobe REST API
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Gemini,
    Openai,
}

impl ProviderKind {
    fn type_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Openai => "openai",
        }
    }

    fn key_var(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Openai => "OPENAI_API_KEY",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => DEFAULT_GEMINI_MODEL,
            ProviderKind::Openai => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// Options shared by every subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Where the wardrobe is kept
    #[arg(long, value_enum, default_value = "file", global = true)]
    pub backend: BackendKind,

    /// JSON file used by the file backend (env: STAILIST_DATA_PATH)
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,

    /// Base URL of the wardrobe API (env: STAILIST_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Generative AI provider
    #[arg(long, value_enum, default_value = "gemini", global = true)]
    pub provider: ProviderKind,

    /// Model name; defaults depend on the provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Timeout for every network call, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,
}

/// Everything the commands need, resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub data_path: PathBuf,
    pub api_base: String,
    pub provider: ProviderConfig,
    pub timeout_secs: u64,
}

pub fn default_data_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("stailist").join("wardrobe.json"),
        None => {
            warn!("No user data directory, keeping the wardrobe in the working directory");
            PathBuf::from("wardrobe.json")
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Flags win over environment variables, which win over defaults.
    pub fn resolve(opts: &GlobalOpts, env: impl Fn(&str) -> Option<String>) -> Self {
        let data_path = opts
            .data_path
            .clone()
            .or_else(|| non_blank(env("STAILIST_DATA_PATH")).map(PathBuf::from))
            .unwrap_or_else(default_data_path);

        let api_base = non_blank(opts.api_base.clone())
            .or_else(|| non_blank(env("STAILIST_API_BASE")))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let mut provider = ProviderConfig::new(
            opts.provider.type_name(),
            non_blank(env(opts.provider.key_var())).unwrap_or_default(),
            non_blank(opts.model.clone()).unwrap_or_else(|| opts.provider.default_model().to_string()),
        );
        provider.api_base = non_blank(env("STAILIST_AI_BASE"));
        provider.timeout_secs = opts.timeout_secs;

        Self {
            backend: opts.backend,
            data_path,
            api_base,
            provider,
            timeout_secs: opts.timeout_secs,
        }
    }

    pub fn wardrobe_backend(&self) -> Result<Arc<dyn WardrobeBackend>, Error> {
        match self.backend {
            BackendKind::File => {
                info!("Using wardrobe file {}", self.data_path.display());
                Ok(Arc::new(JsonFileBackend::new(self.data_path.clone())))
            }
            BackendKind::Rest => Ok(Arc::new(RestWardrobeBackend::new(
                &self.api_base,
                self.timeout_secs,
            )?)),
        }
    }

    /// Build the stylist. Fails when no API key is configured for the provider.
    pub async fn stylist(&self) -> Result<StylistService, Error> {
        if self.provider.api_key.is_empty() {
            let var = match self.provider.provider_type.as_str() {
                "openai" => ProviderKind::Openai.key_var(),
                _ => ProviderKind::Gemini.key_var(),
            };
            return Err(Error::Config(format!(
                "no API key for {}; set {} in the environment or a .env file",
                self.provider.provider_type, var
            )));
        }

        let registry = Provider::new();
        registry
            .register_arc(Provider::from_config(self.provider.clone())?)
            .await;
        let client = StylistClient::new(Arc::new(registry), self.provider.provider_type.clone());
        Ok(StylistService::new(Arc::new(client)))
    }
}
