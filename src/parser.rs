//! Parser core
//!
//! A recursive-descent parser that consumes input through the scanner and
//! appends output tokens as it goes. There is no AST: the output of a parse
//! is the token stream itself, plus any errors collected along the way.
//!
//! Method contract
//!
//!     Every parse method either returns `Ok(true)` having advanced the
//!     state, returns `Ok(false)` having left the state exactly as it was on
//!     entry, or returns a `ParseError` leaving the state wherever the
//!     partial consumption put it. Alternation is sequential attempts with a
//!     snapshot taken where a failed attempt would otherwise leave tracks.
//!
//! Plugin slots
//!
//!     The named grammar rules are dispatched through a table of replaceable
//!     method slots, so a plugin can capture the current implementation of a
//!     rule and install a replacement that delegates back to it. Internal
//!     calls between rules go through the same table.
//!
//! The grammar itself lives in the submodules: statements, expressions,
//! functions, classes, types and groups.

mod classes;
mod expressions;
mod functions;
mod groups;
mod statements;
mod types;

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{ErrorKind, ParseError};
use crate::options::Options;
use crate::patterns::{IDENTIFIER, VERSION};
use crate::state::State;

/// Result of one parse method: matched / did not match / error.
pub type ParseResult = Result<bool, ParseError>;

/// A replaceable parse-method slot.
pub type ParseMethod = Rc<dyn Fn(&mut Parser) -> ParseResult>;

/// Supported header version.
const SUPPORTED_MAJOR: u32 = 1;
const SUPPORTED_MINOR: u32 = 0;

/// How a statement terminates: declarations stand alone, plain statements
/// get a `;` appended when they emitted anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    None,
    Plain,
    Decl,
}

pub(crate) struct ClassCtx {
    pub derived: bool,
}

pub struct Parser {
    pub(crate) state: State,
    pub(crate) options: Options,
    methods: HashMap<String, ParseMethod>,
    method_stack: Vec<String>,
    /// `name=value` flags from the header line, handed to plugins.
    pub(crate) header_flags: serde_json::Map<String, serde_json::Value>,
    /// Enclosing class contexts, innermost last.
    pub(crate) class_stack: Vec<ClassCtx>,
    /// Parameter-property names collected while parsing a constructor.
    pub(crate) ctor_props: Option<Vec<String>>,
}

impl Parser {
    pub fn new(input: &str, options: Options) -> Self {
        let mut parser = Parser {
            state: State::new(input, options.debug),
            options,
            methods: HashMap::new(),
            method_stack: Vec::new(),
            header_flags: serde_json::Map::new(),
            class_stack: Vec::new(),
            ctor_props: None,
        };
        parser.register_defaults();
        parser
    }

    fn register_defaults(&mut self) {
        fn slot(f: fn(&mut Parser) -> ParseResult) -> ParseMethod {
            Rc::new(f)
        }
        let defaults: &[(&str, fn(&mut Parser) -> ParseResult)] = &[
            ("parse_statement", Parser::parse_statement_impl),
            ("parse_return", Parser::parse_return_impl),
            ("parse_throw", Parser::parse_throw_impl),
            ("parse_type_decl", Parser::parse_type_decl_impl),
            ("parse_import", Parser::parse_import_impl),
            ("parse_do_while", Parser::parse_do_while_impl),
            ("parse_if_while", Parser::parse_if_while_impl),
            ("parse_for", Parser::parse_for_impl),
            ("parse_try", Parser::parse_try_impl),
            ("parse_function", Parser::parse_function_decl_impl),
            ("parse_class", Parser::parse_class_impl),
            ("parse_switch", Parser::parse_switch_impl),
            ("parse_enum", Parser::parse_enum_impl),
            ("parse_declare", Parser::parse_declare_impl),
            ("parse_var_decl", Parser::parse_var_decl_impl),
            ("parse_expression_seq", Parser::parse_expression_seq_impl),
            ("parse_expression", Parser::parse_expression_impl),
            ("parse_primary", Parser::parse_primary_impl),
            ("parse_type", Parser::parse_type_impl),
        ];
        for (name, f) in defaults {
            self.methods.insert((*name).to_string(), slot(*f));
        }
    }

    /// Dispatch a named parse method through the slot table.
    pub fn call(&mut self, name: &str) -> ParseResult {
        let method = match self.methods.get(name) {
            Some(m) => m.clone(),
            None => {
                return Err(self
                    .state
                    .fatal(ErrorKind::Plugin, format!("unknown parse method '{name}'")))
            }
        };
        self.method_stack.push(name.to_string());
        let result = method(self);
        self.method_stack.pop();
        result
    }

    /// Current implementation of a named slot, for plugin delegation.
    pub fn method(&self, name: &str) -> Option<ParseMethod> {
        self.methods.get(name).cloned()
    }

    /// Install a replacement for a named slot, returning the previous one.
    pub fn replace(
        &mut self,
        name: &str,
        method: impl Fn(&mut Parser) -> ParseResult + 'static,
    ) -> Option<ParseMethod> {
        if self.state.debug {
            debug!(slot = name, "plugin replaces parse method");
        }
        self.methods.insert(name.to_string(), Rc::new(method))
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// TypeScript output mode.
    pub(crate) fn ts(&self) -> bool {
        !self.options.js
    }

    /// Name of the innermost table-dispatched rule, for error messages.
    fn current_rule(&self) -> String {
        self.method_stack
            .last()
            .cloned()
            .unwrap_or_else(|| "program".to_string())
    }

    /// Require a condition inside the current rule.
    pub(crate) fn expect(&mut self, ok: bool) -> Result<(), ParseError> {
        if ok {
            Ok(())
        } else {
            Err(self.state.expectation_error(&self.current_rule()))
        }
    }

    /// Read a pattern or fail the current rule.
    pub(crate) fn require(&mut self, pat: &crate::patterns::Pattern) -> Result<String, ParseError> {
        match self.state.read(&[pat]) {
            Some(text) => Ok(text),
            None => Err(self.state.expectation_error(&self.current_rule())),
        }
    }

    /// Read a literal or fail the current rule.
    pub(crate) fn require_lit(&mut self, lit: &str) -> Result<(), ParseError> {
        let ok = self.state.read_lit(lit);
        self.expect(ok)
    }

    /// Emit a text token, consuming the pending output target into an
    /// automatic position mark.
    pub fn emit(&mut self, text: &str) {
        if let Some(offset) = self.state.out_target.take() {
            self.state.out.push_mark(offset, true);
        }
        if self.state.debug && !text.is_empty() {
            trace!(out = text, "emit");
        }
        self.state.out.push_text(text);
    }

    /// Emit a type-level token: written in TS mode, swallowed in JS mode.
    /// In JS mode the pending target is discarded so the next runtime token
    /// maps to its own position instead of a stripped one.
    pub fn emit_ts(&mut self, text: &str) {
        if self.options.js {
            self.state.out_target = None;
        } else {
            self.emit(text);
        }
    }

    /// Run a type-level parse: emitted normally, then reverted from the
    /// output wholesale in JS mode. The input consumption always stands.
    pub(crate) fn stripped<F>(&mut self, f: F) -> ParseResult
    where
        F: FnOnce(&mut Parser) -> ParseResult,
    {
        let snap = self.state.snapshot();
        let ok = f(self)?;
        if !ok {
            self.state.revert(&snap);
            return Ok(false);
        }
        if self.options.js {
            self.state.revert_output(&snap);
            self.state.out_target = None;
        }
        Ok(true)
    }

    /// Parse an entire program into the output buffer.
    pub fn parse_main(&mut self) -> Result<(), ParseError> {
        self.state.skip_whitespace();
        if self.options.js {
            self.emit("\"use strict\";");
        }
        self.parse_header()?;
        while !self.state.at_eof() {
            self.recover_errors(|p| {
                let matched = p.call("parse_statement")?;
                p.expect(matched)?;
                let newline = p.state.read_newline()?;
                p.expect(newline)?;
                Ok(true)
            })?;
        }
        Ok(())
    }

    /// Parse the mandatory `tabscript X.Y` header line with optional
    /// `name=value` feature flags.
    fn parse_header(&mut self) -> Result<(), ParseError> {
        if !self.state.read_lit("tabscript") {
            return Err(self.state.fatal(
                ErrorKind::Header,
                "missing 'tabscript X.Y' header line".to_string(),
            ));
        }
        let version = match self.state.read(&[&*VERSION]) {
            Some(v) => v,
            None => {
                return Err(self
                    .state
                    .fatal(ErrorKind::Header, "missing header version".to_string()))
            }
        };
        let (major, minor) = version
            .split_once('.')
            .map(|(a, b)| {
                (
                    a.parse::<u32>().unwrap_or(u32::MAX),
                    b.parse::<u32>().unwrap_or(u32::MAX),
                )
            })
            .unwrap_or((u32::MAX, u32::MAX));
        if major != SUPPORTED_MAJOR || minor > SUPPORTED_MINOR {
            return Err(self.state.fatal(
                ErrorKind::Header,
                format!(
                    "tabscript {version} is not supported (this build supports \
                     {SUPPORTED_MAJOR}.{SUPPORTED_MINOR})"
                ),
            ));
        }
        while let Some(name) = self.state.read(&[&*IDENTIFIER]) {
            if !self.state.read_lit("=") {
                return Err(self
                    .state
                    .fatal(ErrorKind::Header, format!("unknown header flag '{name}'")));
            }
            let value = self.read_flag_value()?;
            if self.state.debug {
                debug!(flag = %name, "header flag");
            }
            self.header_flags.insert(name, value);
        }
        let newline = self.state.read_newline()?;
        self.expect(newline)?;
        self.state.out_target = None;
        Ok(())
    }

    fn read_flag_value(&mut self) -> Result<serde_json::Value, ParseError> {
        use crate::patterns::{NUMBER, STRING};
        if let Some(s) = self.state.read(&[&*STRING]) {
            return Ok(serde_json::Value::String(s[1..s.len() - 1].to_string()));
        }
        if let Some(n) = self.state.read(&[&*NUMBER]) {
            if let Ok(parsed) = n.parse::<f64>() {
                if let Some(num) = serde_json::Number::from_f64(parsed) {
                    return Ok(serde_json::Value::Number(num));
                }
            }
            return Ok(serde_json::Value::String(n));
        }
        if let Some(word) = self.state.read(&[&*IDENTIFIER]) {
            return Ok(match word.as_str() {
                "true" => serde_json::Value::Bool(true),
                "false" => serde_json::Value::Bool(false),
                _ => serde_json::Value::String(word),
            });
        }
        Err(self
            .state
            .fatal(ErrorKind::Header, "missing header flag value".to_string()))
    }

    /// Wrap a parse attempt in the error-recovery policy.
    ///
    /// On a recoverable error with recovery enabled: record the error, skip
    /// forward to a newline at the starting indent depth (consuming nested
    /// INDENT/DEDENT pairs on the way), stash the skipped slice on the
    /// error, and report success so the enclosing loop continues.
    pub(crate) fn recover_errors<F>(&mut self, mut f: F) -> ParseResult
    where
        F: FnMut(&mut Parser) -> ParseResult,
    {
        match f(self) {
            Ok(v) => Ok(v),
            Err(err) if self.options.recover && err.recoverable() => {
                let skip_start = self.state.in_pos;
                let mut depth: i32 = 0;
                let mut progressed = false;
                loop {
                    if self.state.at_eof() {
                        break;
                    }
                    if self.state.read_indent()? {
                        depth += 1;
                        progressed = true;
                        continue;
                    }
                    if depth > 0 {
                        if self.state.read_dedent()? {
                            depth -= 1;
                            progressed = true;
                            continue;
                        }
                    } else if self.state.pending_dedent() {
                        // The enclosing block's DEDENT is not ours to eat.
                        break;
                    }
                    let next = self.state.input().as_bytes().get(self.state.in_pos).copied();
                    if progressed || matches!(next, Some(b'\n') | Some(b';')) {
                        if self.state.read_newline()? {
                            progressed = true;
                            if depth <= 0 && !self.state.has_pending_indents() {
                                break;
                            }
                            continue;
                        }
                    }
                    self.state.bump_char();
                    progressed = true;
                }
                let mut err = err;
                err.recover_skip =
                    Some(self.state.input()[skip_start..self.state.in_pos].to_string());
                if self.state.debug {
                    debug!(skip = err.recover_skip.as_deref().unwrap_or(""), "recovered");
                }
                self.state.push_error(err);
                self.state.out_target = None;
                if !self.state.out.is_empty() && !self.state.out.ends_with(";") {
                    self.state.out.push_text(";");
                }
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Give up ownership of the parts the renderer needs.
    pub fn finish(self) -> (State, Options) {
        (self.state, self.options)
    }
}

impl State {
    pub(crate) fn has_pending_indents(&self) -> bool {
        !self.indents_pending.is_empty()
    }
}
