//! Generic delimited / indent-implicit group parsing.
//!
//! One engine handles every bracketed or indented list in the grammar:
//! blocks, argument lists, parameter lists, object and array literals,
//! class bodies and switch cases. A group opens with a literal delimiter,
//! an INDENT, or a literal followed by an INDENT for multi-line layouts;
//! items repeat separated by the literal separator or by newlines; the
//! group closes with the matching DEDENT and/or closing literal.

use crate::parser::{ParseResult, Parser};
use crate::state::Snapshot;

pub(crate) struct GroupOptions {
    pub open: Option<&'static str>,
    pub close: Option<&'static str>,
    pub next: Option<&'static str>,
    pub js_open: &'static str,
    pub js_close: &'static str,
    pub js_next: &'static str,
    /// Allow an INDENT to open the group when the literal is absent.
    pub allow_implicit: bool,
    /// Keep a trailing implicit separator instead of reverting it.
    pub end_next: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        GroupOptions {
            open: None,
            close: None,
            next: None,
            js_open: "",
            js_close: "",
            js_next: "",
            allow_implicit: false,
            end_next: false,
        }
    }
}

impl Parser {
    /// Parse one group. Returns `Ok(false)` (state untouched) when neither
    /// the open literal nor an implicit INDENT is present.
    pub(crate) fn parse_group<F>(&mut self, opts: GroupOptions, mut item: F) -> ParseResult
    where
        F: FnMut(&mut Parser) -> ParseResult,
    {
        let opened_by_literal = match opts.open {
            Some(open) => self.state.read_lit(open),
            None => false,
        };
        let mut indent_open = false;
        if opened_by_literal {
            self.emit(opts.js_open);
            // A literal group may still lay its items out on indented lines.
            if self.state.read_indent()? {
                indent_open = true;
            }
        } else if opts.allow_implicit && self.state.read_indent()? {
            self.emit(opts.js_open);
            indent_open = true;
        } else {
            return Ok(false);
        }

        let mut sep_snap: Option<Snapshot> = None;
        loop {
            let matched = item(self)?;
            if !matched {
                if let Some(snap) = sep_snap.take() {
                    if !opts.end_next {
                        self.state.revert_output(&snap);
                    }
                }
                break;
            }
            sep_snap = None;
            if let Some(next) = opts.next {
                if self.state.read_lit(next) {
                    self.emit(opts.js_next);
                    if indent_open {
                        let _ = self.state.read_newline()?;
                    }
                    continue;
                }
            }
            if indent_open {
                let snap = self.state.snapshot();
                if self.state.read_newline()? {
                    if !opts.js_next.is_empty() {
                        self.emit(opts.js_next);
                    }
                    sep_snap = Some(snap);
                    continue;
                }
            }
            break;
        }

        if indent_open {
            let dedent = self.state.read_dedent()?;
            self.expect(dedent)?;
        }
        if opened_by_literal {
            if let Some(close) = opts.close {
                if indent_open {
                    let _ = self.state.read_newline()?;
                }
                let closed = self.state.read_lit(close);
                self.expect(closed)?;
            }
        } else if !opts.js_close.is_empty() {
            // Closing delimiter of an indent group lands on its own line.
            self.state.out.push_mark(self.state.in_pos, false);
        }
        self.emit(opts.js_close);
        self.state.out_target = None;
        Ok(true)
    }

    /// Block of statements delimited by INDENT/DEDENT, emitted as `{ ... }`.
    pub(crate) fn parse_block(&mut self) -> ParseResult {
        self.parse_group(
            GroupOptions {
                js_open: "{",
                js_close: "}",
                allow_implicit: true,
                ..GroupOptions::default()
            },
            |p| {
                p.recover_errors(|q| {
                    let matched = q.call("parse_statement")?;
                    Ok(matched)
                })
            },
        )
    }

    /// Block if present, otherwise a single statement on the same line.
    pub(crate) fn parse_body(&mut self) -> Result<(), crate::error::ParseError> {
        if self.parse_block()? {
            return Ok(());
        }
        let matched = self.call("parse_statement")?;
        self.expect(matched)
    }

    /// As [`parse_body`](Parser::parse_body) but always braced in the
    /// output, for constructs that require a block in the target language.
    pub(crate) fn parse_braced_body(&mut self) -> Result<(), crate::error::ParseError> {
        if self.parse_block()? {
            return Ok(());
        }
        self.emit("{");
        let matched = self.call("parse_statement")?;
        self.expect(matched)?;
        self.emit("}");
        self.state.out_target = None;
        Ok(())
    }
}
