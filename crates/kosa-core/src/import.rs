//! Line-based graph text formats.
//!
//! # Formats
//!
//! Blank lines are ignored everywhere. The first non-blank line is the
//! header and selects the format:
//!
//! ```text
//! Numbered (header `N`)        Named (header `N n`)
//! ---------------------        --------------------
//! 3                            3 n
//! 0 1                          paris
//! 1 2                          lyon
//! 2 0                          nice
//!                              paris lyon
//!                              lyon nice
//! ```
//!
//! - **Numbered**: every line after the header is `from to`, two integer
//!   handles in `[0, N)`.
//! - **Named**: the next `N` non-blank lines name vertices `0..N` in order;
//!   every later line is `from to`, two names.
//!
//! Tokens after the second on an edge line are ignored.
//!
//! # Errors
//!
//! Structural problems (empty input, bad header, missing names, duplicate
//! names) abort the import with an [`ImportError`]. A single bad edge line is
//! skipped: it is logged with `tracing::warn!` and recorded in
//! [`ImportReport::skipped`], and parsing continues. Lines are decoded one
//! at a time, so an edge line that is not UTF-8 is skipped the same way.

use std::fmt;
use std::io::{self, BufRead};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::ErrorCode;
use crate::graph::{Graph, GraphError, Representation, Vertex};

/// Text format of a graph file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Header `N`, edges as integer handles.
    Numbered,
    /// Header `N n`, a name block, edges as names.
    Named,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbered => f.write_str("numbered"),
            Self::Named => f.write_str("named"),
        }
    }
}

/// Pick the format from a header line: `"<int> n"` (or `N`) is named,
/// anything else is numbered.
#[must_use]
pub fn detect_format(header: &str) -> Format {
    let mut tokens = header.split_whitespace();
    let count_ok = tokens.next().is_some_and(|t| t.parse::<i64>().is_ok());
    match tokens.next() {
        Some("n" | "N") if count_ok => Format::Named,
        _ => Format::Numbered,
    }
}

/// Why an edge line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than two tokens, not UTF-8, or (numbered) a token that is not
    /// an integer.
    Unparsable,
    /// (numbered) a handle outside `[0, N)`.
    OutOfRange,
    /// (named) a name that is not in the name block.
    UnknownName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparsable => f.write_str("unparsable edge"),
            Self::OutOfRange => f.write_str("edge out of range"),
            Self::UnknownName => f.write_str("unknown vertex name"),
        }
    }
}

/// An edge line that was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// 1-based line number in the input.
    pub line: usize,
    /// The line, trimmed.
    pub text: String,
    pub reason: SkipReason,
}

/// A successfully imported graph plus what was skipped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub graph: Graph,
    pub format: Format,
    pub skipped: Vec<SkippedRecord>,
}

/// Fatal import failures.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// No non-blank line at all.
    #[error("input is empty")]
    Empty,

    /// The header could not be read as a positive vertex count.
    #[error("line {line}: cannot read vertex count from header {text:?}")]
    MalformedHeader { line: usize, text: String },

    /// The name block ended early.
    #[error("expected {expected} vertex names, found {found}")]
    MissingNames { expected: usize, found: usize },

    /// The name block lists the same name twice.
    #[error("line {line}: vertex name {name:?} is listed twice")]
    DuplicateName { line: usize, name: String },

    /// The header or a name line is not valid UTF-8.
    #[error("line {line}: not valid UTF-8")]
    InvalidEncoding { line: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("failed to read graph input: {0}")]
    Io(#[from] io::Error),
}

impl ImportError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Empty => ErrorCode::EmptyInput,
            Self::MalformedHeader { .. } => ErrorCode::MalformedHeader,
            Self::MissingNames { .. } => ErrorCode::MissingNames,
            Self::DuplicateName { .. } => ErrorCode::DuplicateName,
            Self::InvalidEncoding { .. } => ErrorCode::InvalidEncoding,
            Self::Graph(err) => err.code(),
            Self::Io(_) => ErrorCode::IoFailure,
        }
    }
}

// ---------------------------------------------------------------------------
// Line source
// ---------------------------------------------------------------------------

struct NonBlankLines<R> {
    reader: R,
    buf: Vec<u8>,
    number: usize,
}

/// One non-blank input line, trimmed.
struct Line {
    /// 1-based line number.
    number: usize,
    /// The line text; lossily decoded when `utf8` is false.
    text: String,
    utf8: bool,
}

impl Line {
    /// The text, or [`ImportError::InvalidEncoding`] if it was not UTF-8.
    fn into_text(self) -> Result<(usize, String), ImportError> {
        if self.utf8 {
            Ok((self.number, self.text))
        } else {
            Err(ImportError::InvalidEncoding { line: self.number })
        }
    }
}

impl<R: BufRead> NonBlankLines<R> {
    const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            number: 0,
        }
    }

    /// Next non-blank line. Decoding happens per line so one bad record
    /// does not poison the rest of the stream.
    fn next_line(&mut self) -> io::Result<Option<Line>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.number += 1;

            let (text, utf8) = match std::str::from_utf8(&self.buf) {
                Ok(text) => (text.trim().to_string(), true),
                Err(_) => (String::from_utf8_lossy(&self.buf).trim().to_string(), false),
            };
            if !text.is_empty() {
                return Ok(Some(Line {
                    number: self.number,
                    text,
                    utf8,
                }));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Read a graph, detecting the format from the header.
///
/// # Errors
///
/// See [`ImportError`].
pub fn read_graph<R: BufRead>(
    reader: R,
    representation: Representation,
) -> Result<ImportReport, ImportError> {
    read(reader, representation, None)
}

/// Read a graph in a fixed format.
///
/// # Errors
///
/// See [`ImportError`].
pub fn read_graph_as<R: BufRead>(
    reader: R,
    representation: Representation,
    format: Format,
) -> Result<ImportReport, ImportError> {
    read(reader, representation, Some(format))
}

/// Convenience wrapper over [`read_graph`] for in-memory text.
///
/// # Errors
///
/// See [`ImportError`].
pub fn parse_graph(text: &str, representation: Representation) -> Result<ImportReport, ImportError> {
    read_graph(text.as_bytes(), representation)
}

#[instrument(level = "debug", skip(reader))]
fn read<R: BufRead>(
    reader: R,
    representation: Representation,
    forced: Option<Format>,
) -> Result<ImportReport, ImportError> {
    let mut lines = NonBlankLines::new(reader);
    let (header_line, header) = lines.next_line()?.ok_or(ImportError::Empty)?.into_text()?;
    let format = forced.unwrap_or_else(|| detect_format(&header));
    let size = parse_header(header_line, &header, format)?;

    debug!(%format, size, "graph header read");

    let mut skipped = Vec::new();
    let graph = match format {
        Format::Numbered => read_numbered(&mut lines, size, representation, &mut skipped)?,
        Format::Named => read_named(&mut lines, size, representation, &mut skipped)?,
    };

    debug!(
        edges = graph.edge_count(),
        skipped = skipped.len(),
        "graph import complete"
    );

    Ok(ImportReport {
        graph,
        format,
        skipped,
    })
}

fn parse_header(line: usize, text: &str, format: Format) -> Result<usize, ImportError> {
    let malformed = || ImportError::MalformedHeader {
        line,
        text: text.to_string(),
    };

    let mut tokens = text.split_whitespace();
    let size = tokens
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .ok_or_else(malformed)?;

    if format == Format::Named && tokens.next().is_some_and(|tag| tag != "n" && tag != "N") {
        return Err(malformed());
    }

    Ok(size)
}

fn skip(skipped: &mut Vec<SkippedRecord>, line: usize, text: String, reason: SkipReason) {
    warn!(line, text = %text, %reason, "skipping graph record");
    skipped.push(SkippedRecord { line, text, reason });
}

/// Edge-line text, or `None` after recording a line that was not UTF-8.
fn edge_text(line: Line, skipped: &mut Vec<SkippedRecord>) -> Option<(usize, String)> {
    if line.utf8 {
        Some((line.number, line.text))
    } else {
        skip(skipped, line.number, line.text, SkipReason::Unparsable);
        None
    }
}

fn two_tokens(text: &str) -> Option<(&str, &str)> {
    let mut tokens = text.split_whitespace();
    Some((tokens.next()?, tokens.next()?))
}

fn read_numbered<R: BufRead>(
    lines: &mut NonBlankLines<R>,
    size: usize,
    representation: Representation,
    skipped: &mut Vec<SkippedRecord>,
) -> Result<Graph, ImportError> {
    let mut graph = Graph::new(size, false, representation)?;

    while let Some(line) = lines.next_line()? {
        let Some((number, text)) = edge_text(line, skipped) else {
            continue;
        };
        let parsed = two_tokens(&text)
            .and_then(|(a, b)| Some((a.parse::<i64>().ok()?, b.parse::<i64>().ok()?)));
        let Some((from, to)) = parsed else {
            skip(skipped, number, text, SkipReason::Unparsable);
            continue;
        };

        match (handle(from, size), handle(to, size)) {
            (Some(from), Some(to)) => {
                graph.add_edge(from, to)?;
            }
            _ => skip(skipped, number, text, SkipReason::OutOfRange),
        }
    }

    Ok(graph)
}

fn handle(raw: i64, size: usize) -> Option<Vertex> {
    usize::try_from(raw).ok().filter(|&v| v < size)
}

fn read_named<R: BufRead>(
    lines: &mut NonBlankLines<R>,
    size: usize,
    representation: Representation,
    skipped: &mut Vec<SkippedRecord>,
) -> Result<Graph, ImportError> {
    let mut graph = Graph::new(size, true, representation)?;

    for v in 0..size {
        let Some(line) = lines.next_line()? else {
            return Err(ImportError::MissingNames {
                expected: size,
                found: v,
            });
        };
        let (number, name) = line.into_text()?;
        match graph.set_vertex_name(v, name) {
            Ok(()) => {}
            Err(GraphError::DuplicateName { name, .. }) => {
                return Err(ImportError::DuplicateName { line: number, name });
            }
            Err(err) => return Err(err.into()),
        }
    }

    while let Some(line) = lines.next_line()? {
        let Some((number, text)) = edge_text(line, skipped) else {
            continue;
        };
        let Some((a, b)) = two_tokens(&text) else {
            skip(skipped, number, text, SkipReason::Unparsable);
            continue;
        };

        match (graph.vertex_from_name(a), graph.vertex_from_name(b)) {
            (Some(from), Some(to)) => {
                graph.add_edge(from, to)?;
            }
            _ => skip(skipped, number, text, SkipReason::UnknownName),
        }
    }

    Ok(graph)
}
