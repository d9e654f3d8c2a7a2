//! Loader for Backstage configuration with YAML + environment overlays.
//!
//! Every section is optional; an empty source yields [`BackstageConfig::default`].
//! Environment variables use the `BACKSTAGE__` prefix with `__` between path segments
//! (`BACKSTAGE__HTTP__TIMEOUT_SECS=30`) and are applied after every file, so the
//! environment wins. `BACKSTAGE__EXTRACT__TAB_TITLES` takes a comma-separated list.
//! String values may reference `${VAR}` placeholders.
use backstage_common::observability::LogFormat;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "BACKSTAGE";
const ENV_SEPARATOR: &str = "__";
// Only keys named here are split on commas; `Accept-Language` values contain commas too.
const LIST_SEPARATOR: &str = ",";
const TAB_TITLES_KEY: &str = "extract.tab_titles";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackstageConfig {
    pub version: Option<String>,
    pub http: HttpSettings,
    pub extract: ExtractSettings,
    pub logging: LoggingSettings,
}

/// Page fetcher settings. `None` identity fields fall back to the fetcher defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub base_url: String,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub timeout_secs: u64,
    pub retries: usize,
    /// Upper bound on pages fetched at the same time.
    pub concurrency: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".into(),
            user_agent: None,
            accept_language: None,
            timeout_secs: 15,
            retries: 2,
            concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Tab titles accepted as the community tab, compared exactly.
    pub tab_titles: Vec<String>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            tab_titles: vec!["Comunidad".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub stderr: bool,
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            stderr: false,
            filter: "info".into(),
        }
    }
}

/// `<config_dir>/backstage/backstage.yaml`, when the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("backstage").join("backstage.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &BackstageConfig) -> Result<(), ConfigError> {
    if cfg.http.timeout_secs == 0 {
        return Err(ConfigError::Message("http.timeout_secs must be positive".into()));
    }
    if cfg.http.concurrency == 0 {
        return Err(ConfigError::Message("http.concurrency must be positive".into()));
    }
    if cfg.extract.tab_titles.iter().all(|t| t.trim().is_empty()) {
        return Err(ConfigError::Message(
            "extract.tab_titles needs at least one non-empty title".into(),
        ));
    }
    Ok(())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct BackstageConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    use_env: bool,
}

impl Default for BackstageConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BackstageConfigLoader {
    /// Start with no files and `BACKSTAGE__` env overrides enabled.
    ///
    /// ```
    /// use backstage_config::BackstageConfigLoader;
    ///
    /// let config = BackstageConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.extract.tab_titles, vec!["Comunidad".to_string()]);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            use_env: true,
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing, for deployments that rely on the environment.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use backstage_config::BackstageConfigLoader;
    ///
    /// let cfg = BackstageConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// http:
    ///   timeout_secs: 30
    /// extract:
    ///   tab_titles: ["Community", "Comunidad"]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.http.timeout_secs, 30);
    /// assert_eq!(cfg.http.retries, 2);
    /// assert_eq!(cfg.extract.tab_titles.len(), 2);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Skip the environment overlay.
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// Environment overrides are layered last, `${VAR}` placeholders are expanded, and
    /// the result is checked for values the fetcher cannot work with.
    pub fn load(self) -> Result<BackstageConfig, ConfigError> {
        let mut builder = self.builder;
        if self.use_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(LIST_SEPARATOR)
                    .with_list_parse_key(TAB_TITLES_KEY),
            );
        }
        let cfg = builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: BackstageConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("LANG_A", Some("Comunidad")), ("LANG_B", Some("Community"))], || {
            let mut v = json!({ "tab_titles": ["${LANG_A}", "$LANG_B"], "retries": 2 });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({ "tab_titles": ["Comunidad", "Community"], "retries": 2 })
            );
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST_BACKSTAGE}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST_BACKSTAGE}"));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = BackstageConfigLoader::new()
            .without_env()
            .with_yaml_str("http:\n  concurrency: 0\n")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn rejects_blank_tab_titles() {
        let err = BackstageConfigLoader::new()
            .without_env()
            .with_yaml_str("extract:\n  tab_titles: ['  ']\n")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("tab_titles"));
    }

    #[test]
    fn empty_sources_give_defaults() {
        let cfg = BackstageConfigLoader::new().without_env().load().unwrap();
        assert_eq!(cfg.http.base_url, "https://www.youtube.com");
        assert_eq!(cfg.http.timeout_secs, 15);
        assert_eq!(cfg.http.concurrency, 4);
        assert!(cfg.http.user_agent.is_none());
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert_eq!(cfg.logging.filter, "info");
    }
}
