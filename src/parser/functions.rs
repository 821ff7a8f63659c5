//! Function grammar: arrow and classic shapes, parameter lists, bodies.
//!
//! Parameters are written `|a, b|`; the arrow form `|x| body` emits
//! `(x)=>body` and the classic form emits a `function` declaration. A
//! parameter-property modifier inside a constructor is collected for the
//! `this.X=X;` injection done by the class grammar.

use crate::error::ParseError;
use crate::parser::groups::GroupOptions;
use crate::parser::{ParseResult, Parser};
use crate::patterns::{is_reserved, IDENTIFIER};

impl Parser {
    pub(crate) fn parse_function_decl_impl(&mut self) -> ParseResult {
        self.parse_function(true)
    }

    /// Parse any function shape. `declaration` permits body-less overload
    /// signatures, which are stripped from the output.
    pub(crate) fn parse_function(&mut self, declaration: bool) -> ParseResult {
        let start = self.state.snapshot();
        let is_async = self.state.read_lit("async");
        if self.state.read_lit("function") {
            if is_async {
                self.emit("async");
            }
            self.emit("function");
            if self.state.read_lit("*") {
                self.emit("*");
            }
            let snap = self.state.snapshot();
            if let Some(name) = self.state.read(&[&*IDENTIFIER]) {
                if is_reserved(&name) {
                    self.state.revert(&snap);
                } else {
                    self.emit(&name);
                }
            }
            let _ = self.parse_template_params()?;
            let params = self.parse_params()?;
            self.expect(params)?;
            self.parse_return_type()?;
            if self.parse_block()? {
                return Ok(true);
            }
            let snap = self.state.snapshot();
            self.emit("{return");
            if self.call("parse_expression")? {
                self.emit("}");
                self.state.out_target = None;
                return Ok(true);
            }
            self.state.revert(&snap);
            // Overload signature: no body, tokens discarded.
            self.expect(declaration)?;
            self.state.revert_output(&start);
            self.state.out_target = None;
            return Ok(true);
        }
        if self.state.peek_lit("|") {
            if is_async {
                self.emit("async");
            }
            let _ = self.parse_template_params()?;
            let params = self.parse_params()?;
            self.expect(params)?;
            self.parse_return_type()?;
            self.emit("=>");
            self.parse_arrow_body()?;
            return Ok(true);
        }
        if is_async {
            self.state.revert(&start);
        }
        Ok(false)
    }

    /// `|a, b|` parameter list, emitted as `(a,b)`.
    pub(crate) fn parse_params(&mut self) -> ParseResult {
        self.parse_group(
            GroupOptions {
                open: Some("|"),
                close: Some("|"),
                next: Some(","),
                js_open: "(",
                js_close: ")",
                js_next: ",",
                ..GroupOptions::default()
            },
            |p| p.parse_param(),
        )
    }

    fn parse_param(&mut self) -> ParseResult {
        if self.state.read_lit("...") {
            self.emit("...");
            let name = self.require(&IDENTIFIER)?;
            self.emit(&name);
            let _ = self.parse_type_annotation()?;
            return Ok(true);
        }
        // Constructor parameter property. A lone `public` with no name
        // after it is just a parameter called "public".
        let snap = self.state.snapshot();
        let mut access = self.state.read(&[&"public", &"private", &"protected"]);
        if access.is_some() && self.state.peek(&[&*IDENTIFIER]).is_none() {
            self.state.revert(&snap);
            access = None;
        }
        if let Some(modifier) = &access {
            self.emit_ts(modifier);
        }
        let Some(name) = self.state.read(&[&*IDENTIFIER]) else {
            return Ok(false);
        };
        self.emit(&name);
        if access.is_some() && self.options.js {
            if let Some(props) = &mut self.ctor_props {
                props.push(name);
            }
        }
        self.parse_param_tail()?;
        Ok(true)
    }

    fn parse_param_tail(&mut self) -> ParseResult {
        if self.state.read_lit("?") {
            self.emit_ts("?");
        }
        let _ = self.parse_type_annotation()?;
        if self.state.read_lit("=") {
            self.emit("=");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
        }
        Ok(true)
    }

    /// Optional `: TYPE` return annotation, with `asserts` predicates.
    pub(crate) fn parse_return_type(&mut self) -> ParseResult {
        self.stripped(|p| {
            if !p.state.read_lit(":") {
                return Ok(false);
            }
            p.emit(":");
            if p.state.read_lit("asserts") {
                p.emit("asserts");
            }
            let matched = p.parse_type_inner()?;
            p.expect(matched)?;
            Ok(true)
        })
    }

    /// Arrow body: block, parenthesized object literal, or bare expression.
    fn parse_arrow_body(&mut self) -> Result<(), ParseError> {
        if self.parse_block()? {
            return Ok(());
        }
        if self.state.peek_lit("{") {
            // An object literal body must be parenthesized to not read as a
            // block in the output.
            self.emit("(");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
            self.emit(")");
            self.state.out_target = None;
            return Ok(());
        }
        let matched = self.call("parse_expression")?;
        self.expect(matched)
    }

    /// Method body: block, or expression wrapped as `{return …}`.
    pub(crate) fn parse_method_body(&mut self) -> Result<(), ParseError> {
        if self.parse_block()? {
            return Ok(());
        }
        self.emit("{return");
        let matched = self.call("parse_expression")?;
        self.expect(matched)?;
        self.emit("}");
        self.state.out_target = None;
        Ok(())
    }
}
