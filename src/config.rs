// src/config.rs
// Configuration for the server and the public display client, loaded from
// simple key = value conf files with sane defaults.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub host: String,
    pub port: u16,
    pub timeout: u64,
    /// Seconds between public-view refreshes. Cosmetic only; game time is
    /// always recomputed from the stored timestamps.
    pub refresh_interval: u64,
    pub display_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            timeout: 30,
            refresh_interval: 1,
            display_name: "Public Display".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config_map = parse_config(&content)?;

        let host = config_map.get("host").unwrap_or(&"127.0.0.1".to_string()).clone();
        let port = config_map.get("port").and_then(|p| p.parse::<u16>().ok()).unwrap_or(3000);

        Ok(ServerConfig { host, port })
    }

    pub fn load_or_default() -> Self {
        let config_path = "conf/server.conf";

        match Self::from_file(config_path) {
            Ok(config) => {
                println!("📄 Loaded configuration from {config_path}");
                config
            }
            Err(e) => {
                println!("⚠️  Could not load config from {config_path}: {e}. Using defaults.");
                Self::default()
            }
        }
    }
}

impl DisplayConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config_map = parse_config(&content)?;

        let host = config_map.get("host").unwrap_or(&"127.0.0.1".to_string()).clone();
        let port = config_map.get("port").and_then(|p| p.parse::<u16>().ok()).unwrap_or(3000);
        let timeout = config_map.get("timeout").and_then(|t| t.parse::<u64>().ok()).unwrap_or(30);
        let refresh_interval = config_map
            .get("refresh_interval")
            .and_then(|r| r.parse::<u64>().ok())
            .unwrap_or(1);
        let display_name = config_map
            .get("display_name")
            .unwrap_or(&"Public Display".to_string())
            .clone();

        Ok(DisplayConfig { host, port, timeout, refresh_interval, display_name })
    }

    pub fn load_or_default() -> Self {
        let config_path = "conf/display.conf";

        match Self::from_file(config_path) {
            Ok(config) => {
                println!("📄 Loaded display configuration from {config_path}");
                config
            }
            Err(e) => {
                println!("⚠️  Could not load display config from {config_path}: {e}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_config(content: &str) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse key = value pairs
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            config.insert(key, value);
        }
    }

    Ok(config)
}
