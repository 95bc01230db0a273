use crate::error::{CloudFilterError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_NAMESPACE: &str = "http://eop-cfi.esa.int/CFI";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scenes: SceneConfig,
    pub header: HeaderConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    pub header_suffix: String,
    pub archive_suffix: String,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub namespace: String,
    pub coverage_path: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub cloud_min: i64,
    pub cloud_max: i64,
    pub delete_unmatched: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            header_suffix: "HDR".to_string(),
            archive_suffix: "DBL".to_string(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            coverage_path: vec![
                "Variable_Header".to_string(),
                "Specific_Product_Header".to_string(),
                "Product_Information".to_string(),
                "Cloud_Percentage".to_string(),
            ],
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cloud_min: 0,
            cloud_max: 100,
            delete_unmatched: true,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CloudFilterError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CloudFilterError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| CloudFilterError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["cloud-filter.toml", ".cloud-filter.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(cloud_min) = cli_args.cloud_min {
            self.filter.cloud_min = cloud_min;
        }

        if let Some(cloud_max) = cli_args.cloud_max {
            self.filter.cloud_max = cloud_max;
        }

        if let Some(delete) = cli_args.delete_unmatched {
            self.filter.delete_unmatched = delete;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| CloudFilterError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| CloudFilterError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.scenes.header_suffix.is_empty() || self.scenes.archive_suffix.is_empty() {
            return Err(CloudFilterError::Config {
                message: "Header and archive suffixes must not be empty".to_string(),
            });
        }

        // A header would otherwise be its own archive
        if self.scenes.header_suffix == self.scenes.archive_suffix {
            return Err(CloudFilterError::Config {
                message: format!(
                    "Header and archive suffixes must differ (both are {:?})",
                    self.scenes.header_suffix
                ),
            });
        }

        if self.header.coverage_path.is_empty()
            || self.header.coverage_path.iter().any(|s| s.trim().is_empty())
        {
            return Err(CloudFilterError::Config {
                message: "coverage_path must list at least one non-empty element name".to_string(),
            });
        }

        for pattern in &self.scenes.exclude_patterns {
            Regex::new(pattern)?;
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub cloud_min: Option<i64>,
    pub cloud_max: Option<i64>,
    pub delete_unmatched: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cloud_min(mut self, cloud_min: Option<i64>) -> Self {
        self.cloud_min = cloud_min;
        self
    }

    pub fn with_cloud_max(mut self, cloud_max: Option<i64>) -> Self {
        self.cloud_max = cloud_max;
        self
    }

    pub fn with_delete_unmatched(mut self, delete: Option<bool>) -> Self {
        self.delete_unmatched = delete;
        self
    }
}
