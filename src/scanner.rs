//! Input scanner and indent engine
//!
//! The scanner is a set of operations on [`State`]: sticky pattern reads,
//! whitespace/comment skipping, and newline handling that synthesizes
//! INDENT/DEDENT markers from tab-level changes.
//!
//! Indentation handling
//!
//!     Indentation is not tokenized up front. When the parser asks for a
//!     newline, the scanner measures the tab level of the next line with
//!     real content and queues the difference to the current level as
//!     pending markers. While the queue is non-empty every pattern read
//!     fails; only [`State::read_indent`] and [`State::read_dedent`] drain
//!     it. This maps indented blocks onto open/close delimiters the same
//!     way braces would in a C-style syntax.
//!
//!     A `;` before a natural newline is a forced indent: the natural
//!     markers for the next line are queued first, then one extra INDENT.
//!     This is what lets an inline semicolon open a subordinate block.
//!
//!     Indentation is tabs only. A space at an indent position is a fatal
//!     error no matter what follows it.

use tracing::trace;

use crate::error::ErrorKind;
use crate::error::ParseError;
use crate::patterns::{Match, WHITESPACE};
use crate::state::{PendingIndent, State};

impl State {
    /// Consume horizontal whitespace and a trailing `#` comment.
    pub(crate) fn skip_whitespace(&mut self) {
        if let Some(len) = WHITESPACE.match_at(self.input(), self.in_pos) {
            self.in_pos += len;
        }
    }

    /// Attempt each rule in order at the current position.
    ///
    /// On the first success the match and its trailing whitespace are
    /// consumed, the output target is set if unset, and the expected set is
    /// cleared (for a non-empty match). On failure the scanner is unchanged
    /// and every failing rule joins the expected set. While indent markers
    /// are pending, every read fails.
    pub fn read(&mut self, rules: &[&dyn Match]) -> Option<String> {
        self.read_inner(rules, true)
    }

    /// As [`read`](State::read) but without the trailing whitespace skip.
    /// Used inside backtick strings where whitespace is content.
    pub fn read_exact(&mut self, rules: &[&dyn Match]) -> Option<String> {
        self.read_inner(rules, false)
    }

    fn read_inner(&mut self, rules: &[&dyn Match], skip: bool) -> Option<String> {
        if !self.indents_pending.is_empty() {
            for rule in rules {
                self.expected.insert(rule.describe());
            }
            return None;
        }
        for rule in rules {
            if let Some(len) = rule.match_at(self.input(), self.in_pos) {
                let text = self.input()[self.in_pos..self.in_pos + len].to_string();
                if len > 0 {
                    if self.out_target.is_none() {
                        self.out_target = Some(self.in_pos);
                    }
                    self.expected.clear();
                }
                self.in_pos += len;
                if skip {
                    self.skip_whitespace();
                }
                if self.debug {
                    trace!(token = %text, pos = self.in_pos, "read");
                }
                return Some(text);
            }
            self.expected.insert(rule.describe());
        }
        None
    }

    /// As [`read`](State::read) but restores the scanner afterwards.
    pub fn peek(&mut self, rules: &[&dyn Match]) -> Option<String> {
        let in_pos = self.in_pos;
        let last_newline = self.in_last_newline_pos;
        let target = self.out_target;
        let result = self.read_inner(rules, true);
        self.in_pos = in_pos;
        self.in_last_newline_pos = last_newline;
        self.out_target = target;
        result
    }

    /// Read a single literal, returning whether it matched.
    pub fn read_lit(&mut self, lit: &str) -> bool {
        self.read(&[&lit]).is_some()
    }

    pub fn peek_lit(&mut self, lit: &str) -> bool {
        self.peek(&[&lit]).is_some()
    }

    /// Scan forward over newlines, `;`, blank and comment-only lines until
    /// real content (or end of input), queuing INDENT/DEDENT markers for
    /// the level change.
    ///
    /// Idempotent: a second call at the same position succeeds without
    /// moving. Returns `Ok(false)` without consuming anything when the
    /// current position is not at a newline boundary.
    pub fn read_newline(&mut self) -> Result<bool, ParseError> {
        if self.in_last_newline_pos == Some(self.in_pos) {
            return Ok(true);
        }
        if !self.indents_pending.is_empty() {
            return Ok(false);
        }
        let bytes = self.input().as_bytes();
        let len = bytes.len();
        let mut pos = self.in_pos;
        let mut forced = false;
        let mut crossed = false;
        let mut line_tabs = self.indent_level;
        let new_level;
        loop {
            while pos < len && matches!(bytes[pos], b' ' | b'\t' | b'\r') {
                pos += 1;
            }
            if pos < len && bytes[pos] == b'#' {
                while pos < len && bytes[pos] != b'\n' {
                    pos += 1;
                }
            }
            if pos >= len {
                new_level = 0;
                break;
            }
            match bytes[pos] {
                b';' => {
                    forced = true;
                    crossed = true;
                    pos += 1;
                }
                b'\n' => {
                    crossed = true;
                    pos += 1;
                    let mut tabs = 0;
                    while pos < len && bytes[pos] == b'\t' {
                        tabs += 1;
                        pos += 1;
                    }
                    if pos < len && bytes[pos] == b' ' {
                        self.in_pos = pos;
                        return Err(self.fatal(
                            ErrorKind::Indentation,
                            "Space indentation is not allowed, use tabs only".to_string(),
                        ));
                    }
                    line_tabs = tabs;
                }
                _ => {
                    if !crossed {
                        return Ok(false);
                    }
                    new_level = line_tabs;
                    break;
                }
            }
        }
        if new_level > self.indent_level {
            for _ in 0..new_level - self.indent_level {
                self.indents_pending.push_back(PendingIndent::Indent);
            }
        } else {
            for _ in 0..self.indent_level - new_level {
                self.indents_pending.push_back(PendingIndent::Dedent);
            }
        }
        self.indent_level = new_level;
        if forced && pos < len {
            self.indents_pending.push_back(PendingIndent::Indent);
            self.indent_level += 1;
        }
        if self.debug {
            trace!(
                pos,
                level = self.indent_level,
                pending = self.indents_pending.len(),
                forced,
                "newline"
            );
        }
        self.in_pos = pos;
        self.in_last_newline_pos = Some(pos);
        Ok(true)
    }

    /// Consume one pending INDENT, reading a newline first if necessary.
    pub fn read_indent(&mut self) -> Result<bool, ParseError> {
        self.read_marker(PendingIndent::Indent, "indent")
    }

    /// Consume one pending DEDENT, reading a newline first if necessary.
    pub fn read_dedent(&mut self) -> Result<bool, ParseError> {
        self.read_marker(PendingIndent::Dedent, "dedent")
    }

    fn read_marker(&mut self, want: PendingIndent, name: &str) -> Result<bool, ParseError> {
        if self.indents_pending.is_empty() {
            let in_pos = self.in_pos;
            let indent_level = self.indent_level;
            let last_newline = self.in_last_newline_pos;
            if !self.read_newline()? {
                self.expected.insert(name.to_string());
                return Ok(false);
            }
            if self.indents_pending.front() != Some(&want) {
                // Revert the newline scan; the caller did not want it yet.
                self.in_pos = in_pos;
                self.indent_level = indent_level;
                self.in_last_newline_pos = last_newline;
                self.indents_pending.clear();
                self.expected.insert(name.to_string());
                return Ok(false);
            }
        }
        if self.indents_pending.front() == Some(&want) {
            self.indents_pending.pop_front();
            Ok(true)
        } else {
            self.expected.insert(name.to_string());
            Ok(false)
        }
    }

    /// Whether a newline boundary could be read here, without moving.
    pub fn peek_newline(&mut self) -> bool {
        if self.in_last_newline_pos == Some(self.in_pos) {
            return true;
        }
        let in_pos = self.in_pos;
        let indent_level = self.indent_level;
        let pending = self.indents_pending.clone();
        let last_newline = self.in_last_newline_pos;
        let result = self.read_newline().unwrap_or(false);
        self.in_pos = in_pos;
        self.indent_level = indent_level;
        self.indents_pending = pending;
        self.in_last_newline_pos = last_newline;
        result
    }

    /// Whether a DEDENT is already queued at the head of the marker queue.
    pub(crate) fn pending_dedent(&self) -> bool {
        self.indents_pending.front() == Some(&PendingIndent::Dedent)
    }

    /// Whether the byte just before the cursor is whitespace. Used to tell
    /// a call `f(x)` from a spaced form `f (x)`.
    pub(crate) fn preceded_by_space(&self) -> bool {
        self.in_pos
            .checked_sub(1)
            .map(|i| matches!(self.input().as_bytes()[i], b' ' | b'\t' | b'\r' | b'\n'))
            .unwrap_or(false)
    }

    /// Advance one character without matching. Recovery only.
    pub(crate) fn bump_char(&mut self) {
        if let Some(c) = self.input()[self.in_pos..].chars().next() {
            self.in_pos += c.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{IDENTIFIER, INTEGER};

    fn state(src: &str) -> State {
        State::new(src, false)
    }

    #[test]
    fn read_consumes_trailing_whitespace() {
        let mut s = state("foo   bar");
        assert_eq!(s.read(&[&*IDENTIFIER]), Some("foo".to_string()));
        assert_eq!(s.in_pos(), 6);
        assert_eq!(s.read(&[&*IDENTIFIER]), Some("bar".to_string()));
    }

    #[test]
    fn failed_read_leaves_state_unchanged() {
        let mut s = state("foo");
        assert_eq!(s.read(&[&*INTEGER]), None);
        assert_eq!(s.in_pos(), 0);
    }

    #[test]
    fn read_sets_output_target_once() {
        let mut s = state("a b");
        s.read(&[&*IDENTIFIER]);
        assert_eq!(s.out_target, Some(0));
        s.read(&[&*IDENTIFIER]);
        assert_eq!(s.out_target, Some(0));
    }

    #[test]
    fn peek_never_advances() {
        let mut s = state("foo bar");
        assert_eq!(s.peek(&[&*IDENTIFIER]), Some("foo".to_string()));
        assert_eq!(s.in_pos(), 0);
        assert_eq!(s.out_target, None);
    }

    #[test]
    fn newline_measures_indent() {
        let mut s = state("a\n\tb");
        s.read(&[&*IDENTIFIER]);
        assert!(s.read_newline().unwrap());
        // Pattern reads are blocked while the INDENT is pending.
        assert_eq!(s.read(&[&*IDENTIFIER]), None);
        assert!(s.read_indent().unwrap());
        assert_eq!(s.read(&[&*IDENTIFIER]), Some("b".to_string()));
    }

    #[test]
    fn newline_is_idempotent() {
        let mut s = state("a\nb");
        s.read(&[&*IDENTIFIER]);
        assert!(s.read_newline().unwrap());
        let pos = s.in_pos();
        assert!(s.read_newline().unwrap());
        assert_eq!(s.in_pos(), pos);
    }

    #[test]
    fn newline_fails_mid_line() {
        let mut s = state("a b");
        s.read(&[&*IDENTIFIER]);
        assert!(!s.read_newline().unwrap());
        assert_eq!(s.in_pos(), 2);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let mut s = state("a\n\n# note\n\tb");
        s.read(&[&*IDENTIFIER]);
        assert!(s.read_newline().unwrap());
        assert!(s.read_indent().unwrap());
        assert_eq!(s.read(&[&*IDENTIFIER]), Some("b".to_string()));
    }

    #[test]
    fn dedents_are_queued_on_the_way_out() {
        let mut s = state("a\n\tb\nc");
        s.read(&[&*IDENTIFIER]);
        s.read_newline().unwrap();
        s.read_indent().unwrap();
        s.read(&[&*IDENTIFIER]);
        assert!(s.read_newline().unwrap());
        assert!(s.read_dedent().unwrap());
        assert_eq!(s.read(&[&*IDENTIFIER]), Some("c".to_string()));
    }

    #[test]
    fn eof_returns_to_level_zero() {
        let mut s = state("a\n\tb");
        s.read(&[&*IDENTIFIER]);
        s.read_newline().unwrap();
        s.read_indent().unwrap();
        s.read(&[&*IDENTIFIER]);
        assert!(s.read_newline().unwrap());
        assert!(s.read_dedent().unwrap());
        assert!(s.at_eof());
    }

    #[test]
    fn space_indentation_is_fatal() {
        let mut s = state("a\n  b");
        s.read(&[&*IDENTIFIER]);
        let err = s.read_newline().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Indentation);
        assert!(err.message.contains("tabs only"));
    }

    #[test]
    fn semicolon_forces_an_indent() {
        let mut s = state("a; b\nc");
        s.read(&[&*IDENTIFIER]);
        assert!(s.read_newline().unwrap());
        assert!(s.read_indent().unwrap());
        assert_eq!(s.read(&[&*IDENTIFIER]), Some("b".to_string()));
        // The next physical line closes the forced block.
        assert!(s.read_newline().unwrap());
        assert!(s.read_dedent().unwrap());
        assert_eq!(s.read(&[&*IDENTIFIER]), Some("c".to_string()));
    }

    #[test]
    fn semicolon_before_newline_stacks_on_natural_indent() {
        let mut s = state("a;\n\tb");
        s.read(&[&*IDENTIFIER]);
        assert!(s.read_newline().unwrap());
        // Natural INDENT for the tab, then the forced one.
        assert!(s.read_indent().unwrap());
        assert!(s.read_indent().unwrap());
        assert_eq!(s.read(&[&*IDENTIFIER]), Some("b".to_string()));
    }

    #[test]
    fn read_indent_reverts_newline_when_marker_missing() {
        let mut s = state("a\nb");
        s.read(&[&*IDENTIFIER]);
        let pos = s.in_pos();
        // Same level: no INDENT to take, so the scan must roll back.
        assert!(!s.read_indent().unwrap());
        assert_eq!(s.in_pos(), pos);
        assert!(s.read_newline().unwrap());
    }
}
