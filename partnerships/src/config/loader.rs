//! Layered configuration loading
//!
//! Each call stacks one more provider on the figment; whatever is stacked
//! last wins on conflicting keys.

use super::{ConfigError, DEFAULT_CONFIG_FILES, ENV_PREFIX, Result, models::*, validation};
use figment::{
    Figment, Provider,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions tried for `config.*` in the user's config directory
const USER_CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// File syntaxes a configuration file may use, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn detect(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Builds a [`PartnershipsConfig`] out of stacked sources
///
/// ```no_run
/// use partnerships::config::ConfigLoader;
///
/// let config = ConfigLoader::layered().extract()?;
/// # Ok::<(), partnerships::config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Start from the built-in defaults only
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(PartnershipsConfig::default())),
            sources: Vec::new(),
        }
    }

    /// Defaults, then any discovered files, then the environment
    pub fn layered() -> Self {
        let mut loader = Self::new();
        loader.discover_files().load_env();
        loader
    }

    /// Stack a TOML, YAML or JSON file
    ///
    /// A missing file or an unknown extension leaves the loader untouched.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileLoadError(format!(
                "{} does not exist",
                path.display()
            )));
        }
        let format = FileFormat::detect(path).ok_or_else(|| {
            ConfigError::FileLoadError(format!("{} is not TOML, YAML or JSON", path.display()))
        })?;

        match format {
            FileFormat::Toml => self.stack(Toml::file(path)),
            FileFormat::Yaml => self.stack(Yaml::file(path)),
            FileFormat::Json => self.stack(Json::file(path)),
        };
        self.sources.push(path.to_path_buf());
        debug!(path = %path.display(), ?format, "Stacked configuration file");
        Ok(self)
    }

    /// Stack the first well-known file found in the working directory and
    /// the first `config.*` found in the user's config directory
    pub fn discover_files(&mut self) -> &mut Self {
        let local = DEFAULT_CONFIG_FILES.iter().map(PathBuf::from);
        self.load_first(local);

        if let Some(dirs) = directories::ProjectDirs::from("org", "partnerships", "partnerships") {
            let user = USER_CONFIG_EXTENSIONS
                .iter()
                .map(|ext| dirs.config_dir().join(format!("config.{ext}")));
            self.load_first(user);
        }
        self
    }

    /// Stack `PARTNERSHIPS_*` variables, `__` separating nested keys
    pub fn load_env(&mut self) -> &mut Self {
        self.stack(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Stack any other figment provider
    pub fn merge<T: Provider>(&mut self, provider: T) -> &mut Self {
        self.stack(provider)
    }

    /// Files stacked so far, in the order they were applied
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Resolve the stack into a validated configuration
    pub fn extract(&self) -> Result<PartnershipsConfig> {
        let config: PartnershipsConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    fn stack<T: Provider>(&mut self, provider: T) -> &mut Self {
        self.figment = std::mem::take(&mut self.figment).merge(provider);
        self
    }

    fn load_first(&mut self, candidates: impl IntoIterator<Item = PathBuf>) {
        let found = candidates
            .into_iter()
            .find(|path| path.is_file() && FileFormat::detect(path).is_some());
        if let Some(path) = found
            && let Err(err) = self.load_file(&path)
        {
            debug!(path = %path.display(), error = %err, "Skipped configuration file");
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
