use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

/// Limits applied while expanding selections and resolving variables.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GenerationConfig {
    /// Upper bound on definitions emitted by one expansion.
    #[serde(default = "default_max_definitions")]
    pub max_definitions: usize,
    /// How many variable-to-variable hops are followed before giving up.
    #[serde(default = "default_max_variable_depth")]
    pub max_variable_depth: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_definitions: default_max_definitions(),
            max_variable_depth: default_max_variable_depth(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MockConfig {
    /// Cap on sampled dimension combinations per widget.
    #[serde(default = "default_max_combinations")]
    pub max_combinations: usize,
    /// Fixed seed for reproducible demo data.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            max_combinations: default_max_combinations(),
            seed: None,
        }
    }
}

fn default_max_definitions() -> usize {
    1000
}

fn default_max_variable_depth() -> usize {
    8
}

fn default_max_combinations() -> usize {
    100
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[generation]
max_definitions = 1000
max_variable_depth = 8

[mock]
max_combinations = 100
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::debug!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}
