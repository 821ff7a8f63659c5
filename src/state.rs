//! Parse state and snapshots
//!
//! One [`State`] exists per transpilation. It owns the input, the scanner
//! cursor, the pending INDENT/DEDENT queue, the output buffer, the
//! expected-token set and the accumulated errors. The parser mutates it for
//! the duration of the parse; the renderer then reads it without mutating.
//!
//! Snapshots
//!
//!     Backtracking works by value: [`State::snapshot`] captures every field
//!     a revert needs, and a snapshot is consumed by at most one call to
//!     [`State::revert`] or [`State::revert_output`]. `revert` restores the
//!     scanner and the output; `revert_output` restores only the output side
//!     and hands back the truncated tokens so callers can inspect what a
//!     speculative parse emitted.

use std::collections::{BTreeSet, VecDeque};

use tracing::trace;

use crate::error::{ErrorKind, ParseError};
use crate::output::{OutToken, OutputBuffer};
use crate::position::LineMap;

/// A queued synthetic indentation marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingIndent {
    Indent,
    Dedent,
}

/// All mutable parse state for one transpilation.
#[derive(Debug)]
pub struct State {
    input: String,
    line_map: LineMap,
    pub(crate) in_pos: usize,
    pub(crate) indent_level: usize,
    pub(crate) indents_pending: VecDeque<PendingIndent>,
    pub(crate) in_last_newline_pos: Option<usize>,
    pub(crate) out: OutputBuffer,
    pub(crate) out_target: Option<usize>,
    pub(crate) expected: BTreeSet<String>,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) debug: bool,
}

/// Captured fields for one revert. Valid until forward progress passes it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(crate) in_pos: usize,
    pub(crate) indent_level: usize,
    pub(crate) indents_pending: VecDeque<PendingIndent>,
    pub(crate) in_last_newline_pos: Option<usize>,
    pub(crate) out_target: Option<usize>,
    pub(crate) out_len: usize,
}

impl State {
    pub fn new(input: &str, debug: bool) -> Self {
        State {
            line_map: LineMap::new(input),
            input: input.to_string(),
            in_pos: 0,
            indent_level: 0,
            indents_pending: VecDeque::new(),
            in_last_newline_pos: None,
            out: OutputBuffer::new(),
            out_target: None,
            expected: BTreeSet::new(),
            errors: Vec::new(),
            debug,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    pub fn in_pos(&self) -> usize {
        self.in_pos
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// The output token stream, for the renderer.
    pub fn out_tokens(&self) -> &[OutToken] {
        self.out.tokens()
    }

    /// Whether the last emitted text ends with `suffix`, ignoring marks.
    pub fn out_ends_with(&self, suffix: &str) -> bool {
        self.out.ends_with(suffix)
    }

    pub fn push_error(&mut self, err: ParseError) {
        self.errors.push(err);
    }

    /// Input consumed and all pending indentation drained.
    pub fn at_eof(&self) -> bool {
        self.in_pos >= self.input.len() && self.indents_pending.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            in_pos: self.in_pos,
            indent_level: self.indent_level,
            indents_pending: self.indents_pending.clone(),
            in_last_newline_pos: self.in_last_newline_pos,
            out_target: self.out_target,
            out_len: self.out.len(),
        }
    }

    /// Restore every captured field.
    pub fn revert(&mut self, snap: &Snapshot) {
        if self.debug {
            trace!(from = self.in_pos, to = snap.in_pos, "revert");
        }
        self.in_pos = snap.in_pos;
        self.indent_level = snap.indent_level;
        self.indents_pending = snap.indents_pending.clone();
        self.in_last_newline_pos = snap.in_last_newline_pos;
        self.out_target = snap.out_target;
        self.out.truncate(snap.out_len);
    }

    /// Restore only the output side, returning the truncated tokens.
    pub fn revert_output(&mut self, snap: &Snapshot) -> Vec<OutToken> {
        self.out_target = snap.out_target;
        self.out.truncate(snap.out_len)
    }

    /// Whether any `Text` was appended since the snapshot.
    pub fn has_output(&self, snap: &Snapshot) -> bool {
        self.out.has_text_since(snap.out_len)
    }

    /// Convert a failed read into a syntax error listing the expected set.
    pub fn expectation_error(&self, rule: &str) -> ParseError {
        let (line, column) = self.line_map.resolve(self.in_pos);
        let window: String = self.input[self.in_pos..]
            .chars()
            .take(24)
            .map(|c| if c == '\n' { '\u{23ce}' } else { c })
            .collect();
        let expecting = self
            .expected
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!(
            "Could not parse {rule}\n  Input is: {window}\n  Expecting one of: {expecting}"
        );
        ParseError::new(ErrorKind::Syntax, self.in_pos, line, column, message)
    }

    /// Require a value; a `None` becomes a syntax error for `rule`.
    pub fn must<T>(&mut self, rule: &str, value: Option<T>) -> Result<T, ParseError> {
        match value {
            Some(v) => Ok(v),
            None => Err(self.expectation_error(rule)),
        }
    }

    /// Require a condition; `false` becomes a syntax error for `rule`.
    pub fn must_ok(&mut self, rule: &str, ok: bool) -> Result<(), ParseError> {
        if ok {
            Ok(())
        } else {
            Err(self.expectation_error(rule))
        }
    }

    /// Raise a fatal (non-recoverable) error at the current position.
    pub fn fatal(&self, kind: ErrorKind, message: String) -> ParseError {
        let (line, column) = self.line_map.resolve(self.in_pos);
        ParseError::new(kind, self.in_pos, line, column, message)
    }
}
