/// Application configuration
///
/// Loaded from `config.json` (working directory first, then the user config
/// directory). When no file exists the image-generation credentials are read
/// from the environment and everything else uses defaults.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::cache::DEFAULT_CACHE_CAPACITY;
use crate::catalog::thumbnail::THUMBNAIL_MAX_SIZE;
use crate::error::{AppError, AppResult};
use crate::state::data::Category;

pub const CONFIG_FILE_NAME: &str = "config.json";

const ENV_RESOURCE: &str = "imagegen_aoai_resource";
const ENV_ENDPOINT: &str = "imagegen_aoai_endpoint";
const ENV_DEPLOYMENT: &str = "imagegen_aoai_deployment";
const ENV_API_KEY: &str = "imagegen_aoai_api_key";

/// Settings for the remote image-generation deployment
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ImageGenConfig {
    #[serde(rename = "imagegen_aoai_resource")]
    pub resource: String,
    #[serde(rename = "imagegen_aoai_endpoint")]
    pub endpoint: String,
    #[serde(rename = "imagegen_aoai_deployment")]
    pub deployment: String,
    #[serde(rename = "imagegen_aoai_api_key")]
    pub api_key: String,
    pub api_version: String,
    /// Output size, e.g. "1024x1536" for portrait
    pub image_size: String,
    pub quality: String,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            resource: String::new(),
            endpoint: String::new(),
            deployment: String::new(),
            api_key: String::new(),
            api_version: "2025-04-01-preview".to_string(),
            image_size: "1024x1536".to_string(),
            quality: "high".to_string(),
        }
    }
}

impl ImageGenConfig {
    /// Read the credentials from the environment, keeping defaults for the rest
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            resource: get(ENV_RESOURCE),
            endpoint: get(ENV_ENDPOINT),
            deployment: get(ENV_DEPLOYMENT),
            api_key: get(ENV_API_KEY),
            ..Self::default()
        }
    }

    /// Fail early with the first missing setting
    pub fn validate(&self) -> AppResult<()> {
        // An explicit endpoint replaces the resource-derived host
        if self.resource.trim().is_empty() && self.endpoint.trim().is_empty() {
            return Err(AppError::MissingSetting(ENV_RESOURCE));
        }
        if self.deployment.trim().is_empty() {
            return Err(AppError::MissingSetting(ENV_DEPLOYMENT));
        }
        if self.api_key.trim().is_empty() {
            return Err(AppError::MissingSetting(ENV_API_KEY));
        }
        Ok(())
    }
}

/// Whole-application settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub image_gen: ImageGenConfig,
    /// Root holding `clothing/` and `accessories/`
    pub catalog_root: PathBuf,
    pub items_per_page: usize,
    pub thumbnail_max_size: (u32, u32),
    pub cache_capacity: usize,
    /// Rescan a catalog once its cached listing is this old; `None` keeps
    /// listings until restart or a manual refresh
    pub catalog_max_age_secs: Option<u64>,
    /// Root holding `user_images/` and `user_items/`
    pub uploads_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_gen: ImageGenConfig::default(),
            catalog_root: PathBuf::from("catalog"),
            items_per_page: 6,
            thumbnail_max_size: THUMBNAIL_MAX_SIZE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            catalog_max_age_secs: None,
            uploads_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("generated_images"),
        }
    }
}

impl AppConfig {
    /// Load from the first config file found, or fall back to the environment
    pub fn load() -> AppResult<Self> {
        match Self::candidate_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => {
                info!("No {} found, reading API settings from environment", CONFIG_FILE_NAME);
                Ok(Self {
                    image_gen: ImageGenConfig::from_env(),
                    ..Self::default()
                })
            }
        }
    }

    /// Config file locations, in lookup order
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(mut dir) = dirs::config_dir() {
            dir.push("virtual-try-on");
            dir.push(CONFIG_FILE_NAME);
            paths.push(dir);
        }
        paths
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&raw).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("⚙️  Loaded config from {}", path.display());
        Ok(config)
    }

    /// Directory of the catalog for `category`
    pub fn catalog_dir(&self, category: Category) -> PathBuf {
        self.catalog_root.join(category.dir_name())
    }

    pub fn user_images_dir(&self) -> PathBuf {
        self.uploads_dir.join("user_images")
    }

    pub fn user_items_dir(&self) -> PathBuf {
        self.uploads_dir.join("user_items")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.items_per_page, 6);
        assert_eq!(config.thumbnail_max_size, (300, 300));
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.catalog_max_age_secs, None);
        assert_eq!(config.catalog_dir(Category::Clothing), PathBuf::from("catalog/clothing"));
        assert_eq!(
            config.catalog_dir(Category::Accessory),
            PathBuf::from("catalog/accessories")
        );
        assert_eq!(config.user_images_dir(), PathBuf::from("uploads/user_images"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{
                "imagegen_aoai_resource": "my-resource",
                "imagegen_aoai_deployment": "gpt-image-1",
                "imagegen_aoai_api_key": "secret",
                "items_per_page": 9
            }"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.image_gen.resource, "my-resource");
        assert_eq!(config.image_gen.deployment, "gpt-image-1");
        assert_eq!(config.image_gen.api_version, "2025-04-01-preview");
        assert_eq!(config.items_per_page, 9);
        assert_eq!(config.catalog_root, PathBuf::from("catalog"));
        assert!(config.image_gen.validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(AppError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_env_lookup_and_validation() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_RESOURCE, "res"),
            (ENV_API_KEY, "key"),
        ]);
        let config = ImageGenConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.resource, "res");
        assert_eq!(config.deployment, "");
        assert!(matches!(
            config.validate(),
            Err(AppError::MissingSetting(ENV_DEPLOYMENT))
        ));
    }
}
