use crate::config::{BackendConfig, MemoryConfig};
use crate::core::Role;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "memlink")]
#[command(author, version, about = "Inspect and update externally-stored conversation memory", long_about = None)]
pub struct Cli {
    /// Memory API URL (overrides the configured backend)
    #[arg(long, global = true, conflicts_with = "workflow")]
    pub url: Option<String>,

    /// Workflow command line to invoke instead of an HTTP API
    #[arg(long, global = true)]
    pub workflow: Option<String>,

    /// Bearer credential for the memory API (falls back to the configured key,
    /// then to MEMORY_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Conversation session identifier
    #[arg(short = 's', long, global = true)]
    pub session_id: Option<String>,

    /// Number of trailing messages surfaced as context
    #[arg(short = 'w', long, global = true, allow_negative_numbers = true)]
    pub window: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Human,
    Ai,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Human => Role::Human,
            RoleArg::Ai => Role::Ai,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the context window the agent would see
    Window {
        /// Print the memory variables as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the full stored history
    History,

    /// Append a single message
    Add {
        #[arg(value_enum)]
        role: RoleArg,
        content: String,
    },

    /// Commit a finished turn (human input, then AI output)
    Turn { input: String, output: String },

    /// Delete the session's history
    Clear,
}

impl Cli {
    /// True when the command line alone selects a backend, so a broken or
    /// missing config file can be skipped (with a warning)
    pub fn names_backend(&self) -> bool {
        self.url.is_some() || self.workflow.is_some()
    }

    /// Apply command-line overrides on top of the configured memory
    ///
    /// Credential precedence: `--api-key`, then the configured key when the
    /// endpoint is unchanged, then `env_api_key`.
    pub fn apply_overrides(
        &self,
        mut config: MemoryConfig,
        env_api_key: Option<String>,
    ) -> MemoryConfig {
        let configured = match &config.backend {
            BackendConfig::Http { url, api_key } => Some((url.clone(), api_key.clone())),
            _ => None,
        };

        if let Some(ref url) = self.url {
            config.backend = BackendConfig::Http {
                url: url.clone(),
                api_key: None,
            };
        } else if let Some(ref target) = self.workflow {
            config.backend = BackendConfig::Workflow {
                target: target.clone(),
            };
        }

        if let BackendConfig::Http { url, api_key } = &mut config.backend {
            let configured_key = configured
                .filter(|(configured_url, _)| configured_url == url)
                .and_then(|(_, key)| key)
                .filter(|key| !key.is_empty());
            *api_key = self.api_key.clone().or(configured_key).or(env_api_key);
        }

        if let Some(ref session_id) = self.session_id {
            config.session_id = session_id.clone();
        }

        if let Some(window) = self.window {
            config.context_window_length = window;
        }

        config
    }
}
