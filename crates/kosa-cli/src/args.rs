//! Flags shared by every tool, plus argument normalization.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use kosa_core::config::{KosaConfig, load_config};
use kosa_core::error::ErrorCode;
use kosa_core::graph::{Representation, Traversal};
use tracing::debug;

/// Long flags that may also be spelled with a single dash (`-start`).
const LONG_FLAGS: &[&str] = &[
    "start",
    "goal",
    "repr",
    "traversal",
    "config",
    "name",
    "json",
    "input",
    "output",
    "verbose",
];

/// Rewrite single-dash long flags to their `--` form.
///
/// Only exact names from the known flag set are rewritten, with or without
/// an attached `=value`. Everything else, including short flags and values
/// such as `-`, passes through untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}

/// Bad invocations that are not caught by clap.
#[derive(Debug, thiserror::Error)]
pub enum ArgError {
    /// Neither a vertex name nor an in-range handle.
    #[error("cannot resolve vertex {reference:?}: not a vertex name or a handle in [0, {size})")]
    UnknownVertex { reference: String, size: usize },

    /// An endpoint was omitted and could not be read from stdin.
    #[error("missing --{0}: pass it on the command line or on standard input")]
    MissingEndpoint(&'static str),

    /// Stdin already carries the graph, so it cannot also carry endpoints.
    #[error("--start and --goal are required when the graph is read from standard input")]
    EndpointsFromStdin,
}

impl ArgError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownVertex { .. } => ErrorCode::InvalidVertex,
            Self::MissingEndpoint(_) | Self::EndpointsFromStdin => ErrorCode::MissingEndpoint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReprArg {
    /// n × n bit table.
    Dense,
    /// Per-vertex successor lists.
    Sparse,
}

impl From<ReprArg> for Representation {
    fn from(arg: ReprArg) -> Self {
        match arg {
            ReprArg::Dense => Self::Dense,
            ReprArg::Sparse => Self::Sparse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraversalArg {
    /// Call-stack recursion, bounded by `max_recursion_depth`.
    Recursive,
    /// Explicit stack; no depth limit.
    Iterative,
}

/// Flags every tool accepts.
#[derive(Args, Debug, Default, Clone)]
pub struct CommonArgs {
    /// Graph file to read (`-` or omitted: standard input).
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Destination file (`-` or omitted: standard output).
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Graph backing; overrides the config file.
    #[arg(long, value_enum)]
    pub repr: Option<ReprArg>,

    /// Config file to use instead of the default lookup.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where the graph text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    #[must_use]
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path != Path::new("-") => Self::File(path.to_path_buf()),
            _ => Self::Stdin,
        }
    }

    #[must_use]
    pub const fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }
}

/// Effective settings after merging config and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub representation: Representation,
    pub traversal: Traversal,
    pub graph_name: String,
}

impl Settings {
    /// Load the config and apply flag overrides.
    ///
    /// # Errors
    ///
    /// Fails when the selected config file cannot be read or parsed.
    pub fn resolve(common: &CommonArgs, traversal: Option<TraversalArg>) -> anyhow::Result<Self> {
        let config = load_config(common.config.as_deref())?;
        let settings = Self::merge(&config, common.repr, traversal);
        debug!(?settings, "settings resolved");
        Ok(settings)
    }

    fn merge(config: &KosaConfig, repr: Option<ReprArg>, traversal: Option<TraversalArg>) -> Self {
        let traversal = match traversal {
            Some(TraversalArg::Recursive) => Traversal::Recursive {
                max_depth: config.traversal.max_recursion_depth,
            },
            Some(TraversalArg::Iterative) => Traversal::Iterative,
            None => config.traversal.traversal(),
        };

        Self {
            representation: repr.map_or(config.graph.representation, Representation::from),
            traversal,
            graph_name: config.dot.graph_name.clone(),
        }
    }
}
