//! Plugin dispatch
//!
//! A plugin is a callable that receives the parser and may replace any
//! named parse-method slot, usually capturing the previous implementation
//! to delegate back to. How a plugin module is located and compiled is the
//! loader's business; the core only needs `path -> PluginModule`.
//!
//! The grammar form `import plugin "path" { options? }` drives the loader
//! at parse time. The statement leaves no runtime import in the output: the
//! options literal is parsed speculatively, its emitted tokens are taken
//! back out of the buffer with `revert_output`, and the rendered source is
//! evaluated by a small literal-only evaluator into a `serde_json::Value`.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::ErrorKind;
use crate::options::Options;
use crate::output::OutToken;
use crate::parser::{ParseResult, Parser};
use crate::patterns::STRING;

/// Entry point of a loaded plugin: `(parser, global options, plugin options)`.
pub type PluginEntry = Rc<dyn Fn(&mut Parser, &Options, &serde_json::Value)>;

/// What the loader returns for a plugin path.
pub struct PluginModule {
    pub default: PluginEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// The loader could not produce a module for the path.
    Load(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::Load(msg) => write!(f, "plugin load error: {msg}"),
        }
    }
}

impl std::error::Error for PluginError {}

/// Resolves a plugin path to its module.
pub type PluginLoader = Rc<dyn Fn(&str) -> Result<PluginModule, PluginError>>;

impl Parser {
    /// The `plugin "path" { ... }` tail of an `import` statement. Called
    /// with `import` already consumed and nothing emitted for it yet.
    pub(crate) fn parse_plugin_import(&mut self) -> ParseResult {
        let snap = self.state.snapshot();
        if !self.state.read_lit("plugin") {
            return Ok(false);
        }
        let Some(path_lit) = self.state.read(&[&*STRING]) else {
            // `plugin` was an ordinary import binding after all.
            self.state.revert(&snap);
            return Ok(false);
        };
        let mut plugin_options = serde_json::Map::new();
        let options_snap = self.state.snapshot();
        if self.parse_object_literal()? {
            let tokens = self.state.revert_output(&options_snap);
            let source = tokens_to_source(&tokens);
            match parse_value(&source) {
                Ok(serde_json::Value::Object(map)) => plugin_options = map,
                Ok(_) | Err(_) => {
                    return Err(self.state.fatal(
                        ErrorKind::Plugin,
                        format!("invalid plugin options literal: {source}"),
                    ))
                }
            }
        }
        // Header feature flags ride along; explicit options win.
        for (key, value) in self.header_flags.clone() {
            plugin_options.entry(key).or_insert(value);
        }
        let loader = match self.options.load_plugin.clone() {
            Some(loader) => loader,
            None => {
                return Err(self
                    .state
                    .fatal(ErrorKind::Plugin, "no plugin loader configured".to_string()))
            }
        };
        let path = path_lit[1..path_lit.len() - 1].to_string();
        let module = loader(&path).map_err(|err| {
            self.state
                .fatal(ErrorKind::Plugin, format!("failed to load plugin '{path}': {err}"))
        })?;
        if self.state.debug {
            debug!(plugin = %path, "plugin loaded");
        }
        let entry = module.default.clone();
        let global = self.options().clone();
        entry(self, &global, &serde_json::Value::Object(plugin_options));
        self.state.out_target = None;
        Ok(true)
    }
}

/// Join the literal text of a reverted token run.
pub(crate) fn tokens_to_source(tokens: &[OutToken]) -> String {
    let mut source = String::new();
    for token in tokens {
        if let OutToken::Text(text) = token {
            source.push_str(text);
        }
    }
    source
}

/// Evaluate a JSON-like literal: object/array/string/number/bool/null with
/// unquoted identifier keys. No expressions.
pub(crate) fn parse_value(src: &str) -> Result<serde_json::Value, String> {
    let bytes = src.as_bytes();
    let mut pos = 0;
    let value = parse_value_at(bytes, &mut pos)?;
    skip_ws(bytes, &mut pos);
    if pos != bytes.len() {
        return Err(format!("trailing content at offset {pos}"));
    }
    Ok(value)
}

fn skip_ws(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
}

fn parse_value_at(bytes: &[u8], pos: &mut usize) -> Result<serde_json::Value, String> {
    skip_ws(bytes, pos);
    match bytes.get(*pos) {
        None => Err("unexpected end of literal".to_string()),
        Some(b'{') => {
            *pos += 1;
            let mut map = serde_json::Map::new();
            loop {
                skip_ws(bytes, pos);
                if bytes.get(*pos) == Some(&b'}') {
                    *pos += 1;
                    return Ok(serde_json::Value::Object(map));
                }
                let key = parse_key(bytes, pos)?;
                skip_ws(bytes, pos);
                if bytes.get(*pos) != Some(&b':') {
                    return Err(format!("expected ':' at offset {pos}"));
                }
                *pos += 1;
                let value = parse_value_at(bytes, pos)?;
                map.insert(key, value);
                skip_ws(bytes, pos);
                if bytes.get(*pos) == Some(&b',') {
                    *pos += 1;
                }
            }
        }
        Some(b'[') => {
            *pos += 1;
            let mut items = Vec::new();
            loop {
                skip_ws(bytes, pos);
                if bytes.get(*pos) == Some(&b']') {
                    *pos += 1;
                    return Ok(serde_json::Value::Array(items));
                }
                items.push(parse_value_at(bytes, pos)?);
                skip_ws(bytes, pos);
                if bytes.get(*pos) == Some(&b',') {
                    *pos += 1;
                }
            }
        }
        Some(b'"') | Some(b'\'') => parse_string(bytes, pos).map(serde_json::Value::String),
        Some(c) if c.is_ascii_alphabetic() || *c == b'_' => {
            let word = parse_word(bytes, pos);
            match word.as_str() {
                "null" => Ok(serde_json::Value::Null),
                "true" => Ok(serde_json::Value::Bool(true)),
                "false" => Ok(serde_json::Value::Bool(false)),
                other => Err(format!("unexpected word '{other}' in literal")),
            }
        }
        Some(_) => parse_number(bytes, pos),
    }
}

fn parse_key(bytes: &[u8], pos: &mut usize) -> Result<String, String> {
    match bytes.get(*pos) {
        Some(b'"') | Some(b'\'') => parse_string(bytes, pos),
        Some(c) if c.is_ascii_alphanumeric() || *c == b'_' || *c == b'$' => {
            Ok(parse_word(bytes, pos))
        }
        _ => Err(format!("expected key at offset {pos}")),
    }
}

fn parse_word(bytes: &[u8], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < bytes.len()
        && (bytes[*pos].is_ascii_alphanumeric() || bytes[*pos] == b'_' || bytes[*pos] == b'$')
    {
        *pos += 1;
    }
    String::from_utf8_lossy(&bytes[start..*pos]).into_owned()
}

fn parse_string(bytes: &[u8], pos: &mut usize) -> Result<String, String> {
    let quote = bytes[*pos];
    *pos += 1;
    let mut out = String::new();
    while let Some(&b) = bytes.get(*pos) {
        if b == quote {
            *pos += 1;
            return Ok(out);
        }
        if b == b'\\' {
            *pos += 1;
            match bytes.get(*pos) {
                Some(b'n') => out.push('\n'),
                Some(b't') => out.push('\t'),
                Some(&c) => out.push(c as char),
                None => break,
            }
            *pos += 1;
            continue;
        }
        out.push(b as char);
        *pos += 1;
    }
    Err("unterminated string in literal".to_string())
}

fn parse_number(bytes: &[u8], pos: &mut usize) -> Result<serde_json::Value, String> {
    let start = *pos;
    if bytes.get(*pos) == Some(&b'-') || bytes.get(*pos) == Some(&b'+') {
        *pos += 1;
    }
    while *pos < bytes.len()
        && (bytes[*pos].is_ascii_digit()
            || bytes[*pos] == b'.'
            || bytes[*pos] == b'e'
            || bytes[*pos] == b'E'
            || bytes[*pos] == b'x'
            || bytes[*pos].is_ascii_hexdigit())
    {
        *pos += 1;
    }
    let text = String::from_utf8_lossy(&bytes[start..*pos]);
    if let Ok(int) = text.parse::<i64>() {
        return Ok(serde_json::Value::Number(int.into()));
    }
    if let Some(stripped) = text.strip_prefix("0x").or_else(|| text.strip_prefix("-0x")) {
        if let Ok(int) = i64::from_str_radix(stripped, 16) {
            let signed = if text.starts_with('-') { -int } else { int };
            return Ok(serde_json::Value::Number(signed.into()));
        }
    }
    match text.parse::<f64>() {
        Ok(float) => serde_json::Number::from_f64(float)
            .map(serde_json::Value::Number)
            .ok_or_else(|| format!("number '{text}' is not representable")),
        Err(_) => Err(format!("invalid number '{text}'")),
    }
}
