use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::dot::DEFAULT_GRAPH_NAME;
use crate::graph::{DEFAULT_MAX_DEPTH, MAX_RECURSION_DEPTH, Representation, Traversal};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "KOSA_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "kosa.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KosaConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub dot: DotConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub representation: Representation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalStrategy {
    Recursive,
    #[default]
    Iterative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    #[serde(default)]
    pub strategy: TraversalStrategy,
    #[serde(default = "default_max_depth")]
    pub max_recursion_depth: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            strategy: TraversalStrategy::default(),
            max_recursion_depth: default_max_depth(),
        }
    }
}

impl TraversalConfig {
    /// The [`Traversal`] this config selects.
    #[must_use]
    pub const fn traversal(&self) -> Traversal {
        match self.strategy {
            TraversalStrategy::Recursive => Traversal::Recursive {
                max_depth: self.max_recursion_depth,
            },
            TraversalStrategy::Iterative => Traversal::Iterative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotConfig {
    #[serde(default = "default_graph_name")]
    pub graph_name: String,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            graph_name: default_graph_name(),
        }
    }
}

/// Parse one config file.
pub fn load_config_file(path: &Path) -> Result<KosaConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<KosaConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if config.traversal.max_recursion_depth > MAX_RECURSION_DEPTH {
        tracing::warn!(
            configured = config.traversal.max_recursion_depth,
            enforced = MAX_RECURSION_DEPTH,
            path = %path.display(),
            "max_recursion_depth clamped"
        );
    }
    Ok(config)
}

/// Load the effective config.
///
/// The first existing source wins: `explicit`, then `$KOSA_CONFIG`, then
/// `./kosa.toml`, then `<config dir>/kosa/config.toml`. With no source the
/// defaults are returned. An explicit path or `$KOSA_CONFIG` that does not
/// exist is an error rather than a silent fallback.
pub fn load_config(explicit: Option<&Path>) -> Result<KosaConfig> {
    let env_path = env::var_os(CONFIG_ENV).map(PathBuf::from);
    let cwd = env::current_dir().ok();
    let user_dir = dirs::config_dir();

    match resolve_config_path(explicit, env_path.as_deref(), cwd.as_deref(), user_dir.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_config_file(&path)
        }
        None => Ok(KosaConfig::default()),
    }
}

/// Core resolution logic, separated from the environment for testability.
fn resolve_config_path(
    explicit: Option<&Path>,
    env_path: Option<&Path>,
    cwd: Option<&Path>,
    user_config_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit.or(env_path) {
        return Some(path.to_path_buf());
    }

    let local = cwd.map(|dir| dir.join(LOCAL_CONFIG_FILE));
    let user = user_config_dir.map(|dir| dir.join("kosa/config.toml"));

    [local, user].into_iter().flatten().find(|path| path.is_file())
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_graph_name() -> String {
    DEFAULT_GRAPH_NAME.to_string()
}
