use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use serde_yaml;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when neither `auth_token` nor
/// `credentials_file` yields a database secret.
pub const TOKEN_ENV_VAR: &str = "WISHLIST_DB_SECRET";

#[derive(Parser, Debug)]
#[command(name = "onskeliste")]
#[command(about = "Runs the onskeliste service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".onskeliste")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct App {
    database_url: String,
    port: i32,
    #[serde(default = "default_collection")]
    collection: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub credentials_file: Option<String>,
}

fn default_collection() -> String {
    "wishlist".to_string()
}

impl App {
    pub fn get_database_url(&self) -> &str {
        return &self.database_url;
    }

    pub fn get_port(&self) -> i32 {
        return self.port;
    }

    pub fn get_collection(&self) -> &str {
        return &self.collection;
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub app: App,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    /// Database secret, by precedence: inline `auth_token`, then the
    /// contents of `credentials_file` when that file exists, then
    /// `WISHLIST_DB_SECRET`. Blank values fall through; `None` means the
    /// store is queried without credentials.
    pub fn resolve_credentials(&self) -> Result<Option<String>> {
        if let Some(token) = &self.app.auth_token {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(Some(token.to_string()));
            }
        }

        if let Some(path) = &self.app.credentials_file {
            if Path::new(path).exists() {
                let token = fs::read_to_string(path)?;
                let token = token.trim();
                if !token.is_empty() {
                    return Ok(Some(token.to_string()));
                }
            }
        }

        if let Ok(token) = env::var(TOKEN_ENV_VAR) {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(Some(token.to_string()));
            }
        }

        Ok(None)
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        let yaml_with_env = Config::substitute_env_vars(&yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // Handle default values like ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        println!("Warning: Environment variable '{}' not found", var_name);
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
