//! Output token buffer
//!
//! The parser does not build a tree; it appends output tokens as it goes.
//! The buffer is an append-only sequence of literal text and position marks,
//! and the only other mutation is truncation back to a recorded length when
//! a snapshot is reverted.

/// A source-position marker embedded in the output stream.
///
/// Positive marks (`map: true`) contribute an `(input, output)` pair to the
/// source map when rendered. Negative marks only reposition the render
/// target, which is how synthesized tokens such as closing braces land on
/// their own lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// Byte offset into the input.
    pub offset: usize,
    /// Whether this mark records a source-map pair.
    pub map: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutToken {
    Text(String),
    Mark(Mark),
}

/// Append-only sequence of output tokens, truncatable for backtracking.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    tokens: Vec<OutToken>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer { tokens: Vec::new() }
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.tokens.push(OutToken::Text(text));
        }
    }

    pub fn push_mark(&mut self, offset: usize, map: bool) {
        self.tokens.push(OutToken::Mark(Mark { offset, map }));
    }

    /// Snapshot boundary.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[OutToken] {
        &self.tokens
    }

    /// Revert to a recorded length, returning the removed tail.
    pub fn truncate(&mut self, len: usize) -> Vec<OutToken> {
        self.tokens.split_off(len)
    }

    /// Whether any `Text` was appended at or after `since`.
    pub fn has_text_since(&self, since: usize) -> bool {
        self.tokens[since.min(self.tokens.len())..]
            .iter()
            .any(|t| matches!(t, OutToken::Text(_)))
    }

    /// Whether the last `Text` token ends with `suffix`, ignoring any marks
    /// that were pushed after it.
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.tokens
            .iter()
            .rev()
            .find_map(|t| match t {
                OutToken::Text(s) => Some(s.ends_with(suffix)),
                OutToken::Mark(_) => None,
            })
            .unwrap_or(false)
    }
}
