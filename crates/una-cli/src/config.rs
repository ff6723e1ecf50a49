// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use una_app::{DEFAULT_ENDPOINT, PanelKind};

const APP_NAME: &str = "una";
const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub gateway: Gateway,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            gateway: Gateway::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gateway {
    pub endpoint: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Gateway {
    fn default() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_owned()),
            timeout: Some("30s".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_panel: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self { start_panel: None }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("UNA_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set UNA_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is missing `version = 1`; move values under [gateway] and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(endpoint) = &self.gateway.endpoint
            && endpoint.trim().is_empty()
        {
            bail!("gateway.endpoint in {} must not be empty", path.display());
        }

        if let Some(timeout) = &self.gateway.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "gateway.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(panel) = &self.ui.start_panel {
            self.start_panel().with_context(|| {
                format!("invalid ui.start_panel {:?} in {}", panel, path.display())
            })?;
        }

        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        self.gateway
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.gateway.timeout.as_deref().unwrap_or("30s"))
    }

    pub fn start_panel(&self) -> Result<PanelKind> {
        match self.ui.start_panel.as_deref() {
            None => Ok(PanelKind::Control),
            Some(name) => PanelKind::parse(name).ok_or_else(|| {
                anyhow!("unknown panel {name:?}; use control, code, knowledge, or filters")
            }),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# una config\n# Place this file at: {}\n\nversion = 1\n\n[gateway]\nendpoint = \"{}\"\ntimeout = \"30s\"\n\n[ui]\n# One of: control, code, knowledge, filters\nstart_panel = \"control\"\n",
            path.display(),
            DEFAULT_ENDPOINT,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 30s)")
}
