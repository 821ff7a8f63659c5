//! Class and interface grammar.
//!
//! Members go through one `parse_member` routine handling the modifier
//! cascade, accessors, static initializer blocks, fields, methods and
//! constructors. Constructor parameter properties become `this.X=X;`
//! assignments injected after a leading `super(…)` call in derived classes,
//! otherwise at the start of the body.
//!
//! Interfaces are parsed with the same machinery; in JS mode the whole
//! interface is reverted out of the output afterwards.

use crate::error::ParseError;
use crate::parser::groups::GroupOptions;
use crate::parser::{ClassCtx, ParseResult, Parser};
use crate::patterns::{is_reserved, IDENTIFIER, NUMBER, STRING};

impl Parser {
    pub(crate) fn parse_class_impl(&mut self) -> ParseResult {
        let start = self.state.snapshot();
        let is_abstract = self.state.read_lit("abstract");
        let interface = if self.state.read_lit("class") {
            false
        } else if !is_abstract && self.state.read_lit("interface") {
            true
        } else {
            self.state.revert(&start);
            return Ok(false);
        };
        if interface && self.options.js {
            let snap = self.state.snapshot();
            self.parse_class_rest(true, is_abstract)?;
            self.state.revert_output(&snap);
            self.state.out_target = None;
        } else {
            self.parse_class_rest(interface, is_abstract)?;
        }
        Ok(true)
    }

    fn parse_class_rest(&mut self, interface: bool, is_abstract: bool) -> Result<(), ParseError> {
        if is_abstract {
            self.emit_ts("abstract");
        }
        self.emit(if interface { "interface" } else { "class" });
        let snap = self.state.snapshot();
        if let Some(name) = self.state.read(&[&*IDENTIFIER]) {
            if is_reserved(&name) {
                self.state.revert(&snap);
            } else {
                self.emit(&name);
            }
        }
        let _ = self.parse_template_params()?;
        let derived = if self.state.read_lit("extends") {
            self.emit("extends");
            if interface {
                let matched = self.parse_type_inner()?;
                self.expect(matched)?;
                while self.state.read_lit(",") {
                    self.emit(",");
                    let matched = self.parse_type_inner()?;
                    self.expect(matched)?;
                }
            } else {
                let matched = self.call("parse_expression")?;
                self.expect(matched)?;
            }
            true
        } else {
            false
        };
        let _ = self.stripped(|p| {
            if !p.state.read_lit("implements") {
                return Ok(false);
            }
            p.emit("implements");
            let matched = p.parse_type_inner()?;
            p.expect(matched)?;
            while p.state.read_lit(",") {
                p.emit(",");
                let matched = p.parse_type_inner()?;
                p.expect(matched)?;
            }
            Ok(true)
        })?;
        self.class_stack.push(ClassCtx { derived });
        let grouped = self.parse_group(
            GroupOptions {
                js_open: "{",
                js_close: "}",
                allow_implicit: true,
                ..GroupOptions::default()
            },
            |p| p.recover_errors(|q| q.parse_member()),
        );
        self.class_stack.pop();
        let grouped = grouped?;
        self.expect(grouped)?;
        Ok(())
    }

    fn parse_member(&mut self) -> ParseResult {
        let member_start = self.state.snapshot();
        let mut is_static = false;
        let mut is_abstract = false;
        loop {
            if self.state.read_lit("static") {
                self.emit("static");
                is_static = true;
                continue;
            }
            if let Some(modifier) = self.state.read(&[&"public", &"private", &"protected"]) {
                self.emit_ts(&modifier);
                continue;
            }
            if self.state.read_lit("abstract") {
                self.emit_ts("abstract");
                is_abstract = true;
                continue;
            }
            break;
        }
        // Static initializer block.
        if is_static && self.parse_block()? {
            return Ok(true);
        }
        // Accessor prefix, only when a name follows.
        let snap = self.state.snapshot();
        if let Some(accessor) = self.state.read(&[&"get", &"set"]) {
            if self.state.peek(&[&*IDENTIFIER]).is_some() {
                self.emit(&accessor);
            } else {
                self.state.revert(&snap);
            }
        }
        // Member name.
        let mut is_ctor = false;
        if let Some(name) = self.state.read(&[&*IDENTIFIER]) {
            is_ctor = name == "constructor";
            self.emit(&name);
        } else if let Some(name) = self.state.read(&[&*STRING]) {
            self.emit(&name);
        } else if let Some(name) = self.state.read(&[&*NUMBER]) {
            self.emit(&name);
        } else if self.state.read_lit("[") {
            self.emit("[");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
            self.require_lit("]")?;
            self.emit("]");
        } else {
            self.state.revert(&member_start);
            return Ok(false);
        }

        if self.state.peek_lit("|") {
            // Method or constructor.
            let _ = self.parse_template_params()?;
            if is_ctor {
                self.ctor_props = Some(Vec::new());
            }
            let params = self.parse_params();
            let props = self.ctor_props.take().unwrap_or_default();
            let params = params?;
            self.expect(params)?;
            self.parse_return_type()?;
            if is_ctor {
                self.parse_ctor_body(&props)?;
                return Ok(true);
            }
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
            // No body: an abstract signature survives in TS mode, an
            // overload signature is stripped everywhere.
            if is_abstract && self.ts() {
                self.emit(";");
            } else {
                self.state.revert_output(&member_start);
                self.state.out_target = None;
            }
            return Ok(true);
        }

        // Field declaration.
        if self.state.read_lit("?") {
            self.emit_ts("?");
        }
        let _ = self.parse_type_annotation()?;
        if self.state.read_lit("=") {
            self.emit("=");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
        }
        self.emit(";");
        self.state.out_target = None;
        Ok(true)
    }

    /// Constructor body with parameter-property assignments injected. A
    /// body-less constructor that collected properties synthesizes one.
    fn parse_ctor_body(&mut self, props: &[String]) -> Result<(), ParseError> {
        let derived = self.class_stack.last().map(|c| c.derived).unwrap_or(false);
        let props = props.to_vec();
        let mut first_done = false;
        let grouped = self.parse_group(
            GroupOptions {
                js_open: "{",
                js_close: "}",
                allow_implicit: true,
                ..GroupOptions::default()
            },
            |p| {
                if first_done {
                    return p.recover_errors(|q| q.call("parse_statement"));
                }
                first_done = true;
                // A derived class runs its super(...) call before the
                // parameter-property assignments.
                if derived && p.state.peek_lit("super") {
                    let matched = p.recover_errors(|q| q.call("parse_statement"))?;
                    p.emit_ctor_props(&props);
                    Ok(matched)
                } else {
                    p.emit_ctor_props(&props);
                    p.recover_errors(|q| q.call("parse_statement"))
                }
            },
        )?;
        if grouped {
            return Ok(());
        }
        // No body in the source.
        if props.is_empty() {
            return Err(self.state.expectation_error("parse_class"));
        }
        self.emit("{");
        self.emit_ctor_props(&props);
        self.emit("}");
        self.state.out_target = None;
        Ok(())
    }

    fn emit_ctor_props(&mut self, props: &[String]) {
        for name in props {
            self.emit(&format!("this.{name}={name};"));
        }
    }
}
