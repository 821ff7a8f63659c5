//! Expression grammar.
//!
//! Expressions are parsed left to right with no precedence climbing: a
//! binary operator parses its right-hand side recursively and the target
//! language re-parses the emitted source with its own precedence, which is
//! sound because the operator spellings survive translation.
//!
//! The shape is prefix* primary postfix*, where the postfix loop covers
//! calls (including the `..` call form and tagged templates), member and
//! index access, type-level suffixes (`as`, non-null `!`, template
//! arguments) and binary operators. A trailing `?` is either a ternary or
//! the `!=null` nullish-test shorthand, decided by whether an expression
//! follows.

use crate::error::ParseError;
use crate::parser::groups::GroupOptions;
use crate::parser::{ParseResult, Parser};
use crate::patterns::{
    is_reserved, Match, EXPRESSION_PREFIX, IDENTIFIER, NUMBER, OPERATOR, REGEXP, STRING,
    WITHIN_BACKTICK_STRING,
};

impl Parser {
    pub(crate) fn parse_expression_impl(&mut self) -> ParseResult {
        let mut had_prefix = false;
        loop {
            if self.state.read_lit("%bit_not") {
                self.emit("~");
                had_prefix = true;
                continue;
            }
            if let Some(op) = self.state.read(&[&*EXPRESSION_PREFIX]) {
                self.emit(&op);
                had_prefix = true;
                continue;
            }
            break;
        }
        if !self.call("parse_primary")? {
            if had_prefix {
                return Err(self.state.expectation_error("parse_expression"));
            }
            return Ok(false);
        }
        self.parse_postfix()?;
        Ok(true)
    }

    pub(crate) fn parse_primary_impl(&mut self) -> ParseResult {
        if self.call("parse_class")? {
            return Ok(true);
        }
        if self.parse_function(false)? {
            return Ok(true);
        }
        let snap = self.state.snapshot();
        if let Some(name) = self.state.read(&[&*IDENTIFIER]) {
            if is_reserved(&name) {
                self.state.revert(&snap);
            } else {
                self.emit(&name);
                return Ok(true);
            }
        }
        if self.parse_array_literal()? {
            return Ok(true);
        }
        if self.parse_object_literal()? {
            return Ok(true);
        }
        if let Some(text) = self.state.read(&[&*STRING]) {
            self.emit(&text);
            return Ok(true);
        }
        if self.parse_backtick_string()? {
            return Ok(true);
        }
        if let Some(text) = self.state.read(&[&*NUMBER]) {
            self.emit(&text);
            return Ok(true);
        }
        if self.state.read_lit("(") {
            self.emit("(");
            let matched = self.call("parse_expression_seq")?;
            self.expect(matched)?;
            self.require_lit(")")?;
            self.emit(")");
            self.state.out_target = None;
            return Ok(true);
        }
        if let Some(text) = self.state.read(&[&*REGEXP]) {
            self.emit(&text);
            return Ok(true);
        }
        Ok(false)
    }

    fn parse_postfix(&mut self) -> Result<(), ParseError> {
        loop {
            // Call arguments, but only when the paren hugs the callee;
            // a spaced `(` is not a call.
            if !self.state.preceded_by_space() && self.state.peek_lit("(") {
                let grouped = self.parse_group(
                    GroupOptions {
                        open: Some("("),
                        close: Some(")"),
                        next: Some(","),
                        js_open: "(",
                        js_close: ")",
                        js_next: ",",
                        ..GroupOptions::default()
                    },
                    |p| p.parse_argument(),
                )?;
                self.expect(grouped)?;
                continue;
            }
            if self.state.read_lit("..") {
                self.parse_dot_call()?;
                continue;
            }
            if self.state.peek_lit("`") {
                // Tagged template.
                let matched = self.parse_backtick_string()?;
                self.expect(matched)?;
                continue;
            }
            if self.state.read_lit("[") {
                self.emit("[");
                let matched = self.call("parse_expression_seq")?;
                self.expect(matched)?;
                self.require_lit("]")?;
                self.emit("]");
                self.state.out_target = None;
                continue;
            }
            if self.state.read_lit("++") {
                self.emit("++");
                continue;
            }
            if self.state.read_lit("--") {
                self.emit("--");
                continue;
            }
            if self.state.read_lit("as") {
                let _ = self.stripped(|p| {
                    p.emit("as");
                    let matched = p.call("parse_type")?;
                    p.expect(matched)?;
                    Ok(true)
                })?;
                continue;
            }
            if self.state.read_lit("?.") {
                self.emit("?.");
                if self.state.read_lit("[") {
                    self.emit("[");
                    let matched = self.call("parse_expression")?;
                    self.expect(matched)?;
                    self.require_lit("]")?;
                    self.emit("]");
                    self.state.out_target = None;
                } else {
                    let name = self.require(&IDENTIFIER)?;
                    self.emit(&name);
                }
                continue;
            }
            if self.state.read_lit(".") {
                let name = self.require(&IDENTIFIER)?;
                self.emit(".");
                self.emit(&name);
                continue;
            }
            if self.state.peek_lit("<") && self.parse_template_args()? {
                continue;
            }
            if let Some(op) = self.state.read(&[&*OPERATOR]) {
                let mapped = self.operator_output(&op)?;
                self.emit(&mapped);
                let matched = self.call("parse_expression")?;
                self.expect(matched)?;
                continue;
            }
            // Non-null assertion.
            if self.state.read_lit("!") {
                self.emit_ts("!");
                continue;
            }
            if self.state.read_lit("?") {
                let snap = self.state.snapshot();
                self.emit("?");
                if self.call("parse_expression")? {
                    self.require_lit(":")?;
                    self.emit(":");
                    let matched = self.call("parse_expression")?;
                    self.expect(matched)?;
                } else {
                    self.state.revert(&snap);
                    self.emit("!=null");
                }
                continue;
            }
            break;
        }
        Ok(())
    }

    /// Translate a source operator spelling to its output form.
    fn operator_output(&mut self, op: &str) -> Result<String, ParseError> {
        let mapped = match op {
            "or" => "||",
            "and" => "&&",
            "==" => "===",
            "!=" => "!==",
            "=~" => "==",
            "!~" => "!=",
            "%mod" => "%",
            "%bit_or" => "|",
            "%bit_and" => "&",
            "%bit_xor" => "^",
            "%shift_left" => "<<",
            "%shift_right" => ">>",
            "%unsigned_shift_right" => ">>>",
            other if other.starts_with('%') => {
                return Err(self.state.expectation_error("parse_expression"));
            }
            other => other,
        };
        Ok(mapped.to_string())
    }

    fn parse_argument(&mut self) -> ParseResult {
        if self.state.read_lit("...") {
            self.emit("...");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
            return Ok(true);
        }
        self.call("parse_expression")
    }

    /// The `..` call form: arguments are an indented group or a run of
    /// whitespace-separated expressions on the same line.
    fn parse_dot_call(&mut self) -> Result<(), ParseError> {
        let grouped = self.parse_group(
            GroupOptions {
                js_open: "(",
                js_close: ")",
                js_next: ",",
                allow_implicit: true,
                ..GroupOptions::default()
            },
            |p| p.parse_argument(),
        )?;
        if grouped {
            return Ok(());
        }
        self.emit("(");
        if self.parse_argument()? {
            loop {
                let snap = self.state.snapshot();
                self.emit(",");
                if !self.parse_argument()? {
                    self.state.revert(&snap);
                    break;
                }
            }
        }
        self.emit(")");
        self.state.out_target = None;
        Ok(())
    }

    /// Backtick string with `${ … }` interpolations. The literal pieces are
    /// emitted fused with the interpolation delimiters so the renderer can
    /// never reflow whitespace inside the string.
    pub(crate) fn parse_backtick_string(&mut self) -> ParseResult {
        if self.state.read_exact(&[&"`"]).is_none() {
            return Ok(false);
        }
        let mut text = String::from("`");
        loop {
            if let Some(segment) = self.state.read_exact(&[&WITHIN_BACKTICK_STRING as &dyn Match])
            {
                text.push_str(&segment);
            }
            if self.state.read_exact(&[&"`"]).is_some() {
                text.push('`');
                self.emit(&text);
                self.state.skip_whitespace();
                return Ok(true);
            }
            if self.state.read_exact(&[&"${"]).is_some() {
                text.push_str("${");
                self.emit(&text);
                let matched = self.call("parse_expression")?;
                self.expect(matched)?;
                let closed = self.state.read_exact(&[&"}"]).is_some();
                self.expect(closed)?;
                text = String::from("}");
                continue;
            }
            return Err(self.state.expectation_error("parse_expression"));
        }
    }

    pub(crate) fn parse_array_literal(&mut self) -> ParseResult {
        self.parse_group(
            GroupOptions {
                open: Some("["),
                close: Some("]"),
                next: Some(","),
                js_open: "[",
                js_close: "]",
                js_next: ",",
                ..GroupOptions::default()
            },
            |p| p.parse_argument(),
        )
    }

    pub(crate) fn parse_object_literal(&mut self) -> ParseResult {
        self.parse_group(
            GroupOptions {
                open: Some("{"),
                close: Some("}"),
                next: Some(","),
                js_open: "{",
                js_close: "}",
                js_next: ",",
                ..GroupOptions::default()
            },
            |p| p.parse_object_member(),
        )
    }

    fn parse_object_member(&mut self) -> ParseResult {
        if self.state.read_lit("...") {
            self.emit("...");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
            return Ok(true);
        }
        let mut keyed = false;
        if self.state.read_lit("[") {
            self.emit("[");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
            self.require_lit("]")?;
            self.emit("]");
            keyed = true;
        } else if let Some(key) = self.state.read(&[&*IDENTIFIER]) {
            self.emit(&key);
            keyed = true;
        } else if let Some(key) = self.state.read(&[&*NUMBER]) {
            self.emit(&key);
            keyed = true;
        } else if let Some(key) = self.state.read(&[&*STRING]) {
            self.emit(&key);
            keyed = true;
        } else if self.state.peek_lit("`") {
            // Template keys are computed keys in the output.
            self.emit("[");
            let matched = self.parse_backtick_string()?;
            self.expect(matched)?;
            self.emit("]");
            keyed = true;
        }
        if !keyed {
            return Ok(false);
        }
        // Method shorthand.
        if self.state.peek_lit("|") {
            let params = self.parse_params()?;
            self.expect(params)?;
            self.parse_return_type()?;
            self.parse_method_body()?;
            return Ok(true);
        }
        if self.state.read_lit(":") {
            self.emit(":");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
        }
        Ok(true)
    }

    /// Speculative template-argument application after a primary.
    ///
    /// Commits only when the closing `>` is followed by `.`, `(` or a
    /// newline; anything else (`a<b>+c`) stays a pair of comparisons.
    fn parse_template_args(&mut self) -> ParseResult {
        let snap = self.state.snapshot();
        let committed = self.template_args_inner()?;
        if !committed {
            self.state.revert(&snap);
            return Ok(false);
        }
        if self.options.js {
            self.state.revert_output(&snap);
            self.state.out_target = None;
        }
        Ok(true)
    }

    fn template_args_inner(&mut self) -> ParseResult {
        if !self.state.read_lit("<") {
            return Ok(false);
        }
        self.emit("<");
        if !self.parse_type_inner()? {
            return Ok(false);
        }
        while self.state.read_lit(",") {
            self.emit(",");
            if !self.parse_type_inner()? {
                return Ok(false);
            }
        }
        if !self.state.read_lit(">") {
            return Ok(false);
        }
        self.emit(">");
        let commits =
            self.state.peek_lit(".") || self.state.peek_lit("(") || self.state.peek_newline();
        Ok(commits)
    }
}
