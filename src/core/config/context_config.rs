use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;

pub const ENV_SITE: &str = "DD_SITE";
pub const ENV_API_KEY: &str = "DD_API_KEY";
pub const ENV_APP_KEY: &str = "DD_APP_KEY";

/// Context used when `--context` is not given and credentials come from YAML.
pub const DEFAULT_CONTEXT: &str = "prd";

/// Credentials and site for one invocation. Built once in `main`, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContext {
    pub site: String,
    pub api_key: Option<String>,
    pub app_key: Option<String>,
}

/// `~/.config/ddctl/config.yaml`:
///
/// ```yaml
/// contexts:
///   prd:
///     site: datadoghq.eu
///     api_key: ...
///     app_key: ...
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub contexts: BTreeMap<String, ContextEntry>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ContextEntry {
    pub site: Option<String>,
    pub api_key: Option<String>,
    pub app_key: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("ddctl").join("config.yaml"))
}

/// Reads the YAML context file. A missing file is an empty config.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, AppError> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => return Ok(ConfigFile::default()),
    };

    if !path.exists() {
        debug!("Config file {} not found", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("failed to parse YAML config {}: {}", path.display(), e)))
}

/// Resolves credentials from the process environment, then the YAML file.
pub fn resolve_context(
    context_name: Option<&str>,
    config_path: Option<&Path>,
) -> Result<ApiContext, AppError> {
    resolve_context_with(context_name, config_path, |key| std::env::var(key).ok())
}

/// Same as [`resolve_context`] with an injectable environment lookup.
///
/// If any of `DD_SITE`, `DD_API_KEY`, `DD_APP_KEY` is set, the environment wins
/// and only a missing site may still be taken from the named YAML context.
pub fn resolve_context_with<F>(
    context_name: Option<&str>,
    config_path: Option<&Path>,
    env: F,
) -> Result<ApiContext, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());
    let env_site = lookup(ENV_SITE);
    let env_api_key = lookup(ENV_API_KEY);
    let env_app_key = lookup(ENV_APP_KEY);

    if env_site.is_some() || env_api_key.is_some() || env_app_key.is_some() {
        debug!("Using credentials from environment");
        let site = match env_site {
            Some(site) => site,
            None => {
                let entry = match context_name {
                    Some(name) => load_config(config_path)?.contexts.remove(name),
                    None => None,
                };
                entry
                    .and_then(|ctx| ctx.site)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        AppError::Config(format!(
                            "could not resolve 'site'; set {ENV_SITE} or define it in the YAML context"
                        ))
                    })?
            }
        };
        return Ok(ApiContext {
            site,
            api_key: env_api_key,
            app_key: env_app_key,
        });
    }

    let mut config = load_config(config_path)?;
    if config.contexts.is_empty() {
        return Err(AppError::Config(format!(
            "no credentials in environment and no contexts in YAML; set {ENV_SITE}/{ENV_API_KEY}/{ENV_APP_KEY} or create the configuration file"
        )));
    }

    let selected = context_name.unwrap_or(DEFAULT_CONTEXT);
    let ctx = config
        .contexts
        .remove(selected)
        .ok_or_else(|| AppError::Config(format!("context '{selected}' not found in configuration file")))?;

    let site = ctx
        .site
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Config(format!("context '{selected}' is missing 'site'")))?;

    debug!("Using context '{}' (site={})", selected, site);
    Ok(ApiContext {
        site,
        api_key: ctx.api_key,
        app_key: ctx.app_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const YAML: &str = r#"
contexts:
  prd:
    site: datadoghq.eu
    api_key: prd-api
    app_key: prd-app
  dev:
    site: us5.datadoghq.com
    api_key: dev-api
  broken:
    api_key: nothing-else
"#;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn yaml_default_context_is_prd() {
        let file = config_file(YAML);
        let ctx = resolve_context_with(None, Some(file.path()), env_of(&[])).unwrap();
        assert_eq!(ctx.site, "datadoghq.eu");
        assert_eq!(ctx.api_key.as_deref(), Some("prd-api"));
        assert_eq!(ctx.app_key.as_deref(), Some("prd-app"));
    }

    #[test]
    fn named_context_is_selected() {
        let file = config_file(YAML);
        let ctx = resolve_context_with(Some("dev"), Some(file.path()), env_of(&[])).unwrap();
        assert_eq!(ctx.site, "us5.datadoghq.com");
        assert_eq!(ctx.app_key, None);
    }

    #[test]
    fn environment_takes_precedence() {
        let file = config_file(YAML);
        let env = env_of(&[(ENV_SITE, "datadoghq.com"), (ENV_API_KEY, "env-api")]);
        let ctx = resolve_context_with(Some("dev"), Some(file.path()), env).unwrap();
        assert_eq!(ctx.site, "datadoghq.com");
        assert_eq!(ctx.api_key.as_deref(), Some("env-api"));
        assert_eq!(ctx.app_key, None);
    }

    #[test]
    fn environment_keys_may_borrow_site_from_context() {
        let file = config_file(YAML);
        let env = env_of(&[(ENV_API_KEY, "env-api")]);
        let ctx = resolve_context_with(Some("dev"), Some(file.path()), env).unwrap();
        assert_eq!(ctx.site, "us5.datadoghq.com");
        assert_eq!(ctx.api_key.as_deref(), Some("env-api"));
    }

    #[test]
    fn environment_without_site_fails() {
        let file = config_file(YAML);
        let env = env_of(&[(ENV_API_KEY, "env-api")]);
        let err = resolve_context_with(None, Some(file.path()), env).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn missing_context_and_site_are_config_errors() {
        let file = config_file(YAML);
        let missing = resolve_context_with(Some("stg"), Some(file.path()), env_of(&[])).unwrap_err();
        assert!(missing.to_string().contains("'stg' not found"));

        let no_site = resolve_context_with(Some("broken"), Some(file.path()), env_of(&[])).unwrap_err();
        assert!(no_site.to_string().contains("missing 'site'"));
    }

    #[test]
    fn absent_file_without_env_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        let err = resolve_context_with(None, Some(&path), env_of(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn environment_keys_with_broken_yaml_report_the_parse_error() {
        let file = config_file("contexts: [unclosed");
        let env = env_of(&[(ENV_API_KEY, "env-api")]);
        let err = resolve_context_with(Some("dev"), Some(file.path()), env).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("failed to parse YAML"));
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let file = config_file("contexts: [unclosed");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("failed to parse YAML"));
    }
}
