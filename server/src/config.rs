use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Plaza community gateway server
#[derive(Parser, Serialize, Deserialize, Clone, Debug)]
#[command(name = "plaza-server", version, about = "Plaza community gateway server")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PLAZA_PORT", default_value = "5000")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "PLAZA_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Path to TOML config file
    #[arg(long, default_value = "./plaza.toml")]
    pub config: String,

    /// Deployed client origin admitted for cross-origin requests,
    /// in addition to the local dev origin
    #[arg(long, env = "PLAZA_CLIENT_ORIGIN")]
    pub client_origin: Option<String>,

    /// Production mode: serve the built client shell for unmatched routes
    #[arg(long, env = "PLAZA_PRODUCTION")]
    pub production: bool,

    /// Directory served under /uploads
    #[arg(long, env = "PLAZA_UPLOADS_DIR", default_value = "./uploads")]
    pub uploads_dir: String,

    /// Directory holding the built client assets served in production mode
    #[arg(long, env = "PLAZA_PUBLIC_DIR", default_value = "./public")]
    pub public_dir: String,

    /// Enable structured JSON logging (for Docker/production)
    #[arg(long, env = "PLAZA_JSON_LOGS")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    pub generate_config: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "0.0.0.0".to_string(),
            config: "./plaza.toml".to_string(),
            client_origin: None,
            production: false,
            uploads_dir: "./uploads".to_string(),
            public_dir: "./public".to_string(),
            json_logs: false,
            generate_config: false,
        }
    }
}

impl Config {
    /// Load config with layered precedence:
    /// built-in defaults < TOML file < env vars (PLAZA_*) < CLI args
    pub fn load() -> Result<Self, figment::Error> {
        let cli = Config::parse();
        let config_path = cli.config.clone();

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("PLAZA_"))
            .merge(Serialized::defaults(cli))
            .extract()
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# Plaza Gateway Server Configuration
# Place this file at ./plaza.toml or specify with --config <path>
# All settings can be overridden via environment variables (PLAZA_PORT, etc.)
# or CLI flags (--port, etc.)

# Server port (default: 5000)
# port = 5000

# Bind address (default: 0.0.0.0 — all interfaces)
# bind_address = "0.0.0.0"

# Deployed client origin admitted for cross-origin requests.
# The local dev origin (http://localhost:5173) is always admitted.
# client_origin = "https://app.example.com"

# Production mode: unmatched routes serve the built client shell from
# public_dir so client-side-routed deep links resolve.
# production = false

# Directory served under /uploads
# uploads_dir = "./uploads"

# Built client assets served in production mode
# public_dir = "./public"

# Enable structured JSON logging for Docker/production
# json_logs = false
"#
    .to_string()
}
