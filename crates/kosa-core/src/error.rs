use std::fmt;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyInput,
    MalformedHeader,
    MissingNames,
    DuplicateName,
    InvalidEncoding,
    InvalidVertex,
    MissingEndpoint,
    VertexOutOfRange,
    NamesDisabled,
    EmptyGraph,
    ConfigParseError,
    AllocationFailed,
    RecursionLimit,
    IoFailure,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyInput => "E1001",
            Self::MalformedHeader => "E1002",
            Self::MissingNames => "E1003",
            Self::DuplicateName => "E1004",
            Self::InvalidEncoding => "E1005",
            Self::InvalidVertex => "E2001",
            Self::MissingEndpoint => "E2005",
            Self::VertexOutOfRange => "E2002",
            Self::NamesDisabled => "E2003",
            Self::EmptyGraph => "E2004",
            Self::ConfigParseError => "E3001",
            Self::AllocationFailed => "E4001",
            Self::RecursionLimit => "E4002",
            Self::IoFailure => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyInput => "Graph input is empty",
            Self::MalformedHeader => "Graph header is missing or unparsable",
            Self::MissingNames => "Not enough vertex names",
            Self::DuplicateName => "Vertex name used twice",
            Self::InvalidEncoding => "Graph header or name is not valid UTF-8",
            Self::InvalidVertex => "Vertex reference cannot be resolved",
            Self::MissingEndpoint => "Path endpoint not given",
            Self::VertexOutOfRange => "Vertex handle out of range",
            Self::NamesDisabled => "Graph was created without names",
            Self::EmptyGraph => "Graph must have at least one vertex",
            Self::ConfigParseError => "Config file parse error",
            Self::AllocationFailed => "Graph storage allocation failed",
            Self::RecursionLimit => "Traversal exceeded the recursion limit",
            Self::IoFailure => "Input/output failure",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EmptyInput => Some("Provide a graph file with a header line."),
            Self::MalformedHeader => {
                Some("The first non-blank line must be `N` (numbered) or `N n` (named).")
            }
            Self::MissingNames => Some("List exactly N vertex names after an `N n` header."),
            Self::DuplicateName => Some("Give every vertex a distinct name."),
            Self::InvalidEncoding => Some("Save the graph file as UTF-8."),
            Self::InvalidVertex => Some("Use a vertex name from the graph or a handle in [0, N)."),
            Self::MissingEndpoint => {
                Some("Pass --start and --goal, or read the graph with -i FILE and give them on stdin.")
            }
            Self::VertexOutOfRange | Self::NamesDisabled | Self::EmptyGraph => None,
            Self::ConfigParseError => Some("Fix syntax in the kosa config file and retry."),
            Self::AllocationFailed => Some("Use --repr sparse for large graphs."),
            Self::RecursionLimit => Some("Use --traversal iterative for deep graphs."),
            Self::IoFailure => Some("Check that the file exists and is readable/writable."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
