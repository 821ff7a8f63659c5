//! Statement grammar.
//!
//! `parse_statement` dispatches by keyword or shape, first match wins. Each
//! branch is a parse method that reads its own leading keyword and backs out
//! cleanly when it is not present, so the dispatcher is just an ordered list
//! of attempts. After a plain (non-declaration) statement that emitted
//! anything, a `;` is appended; a statement that emitted nothing (a type
//! statement in JS mode) clears the output target so the next statement maps
//! to its own line.

use crate::error::ParseError;
use crate::parser::groups::GroupOptions;
use crate::parser::{Outcome, ParseResult, Parser};
use crate::patterns::{is_reserved, IDENTIFIER, STRING};

impl Parser {
    pub(crate) fn parse_statement_impl(&mut self) -> ParseResult {
        let snap = self.state.snapshot();
        let outcome = self.dispatch_statement()?;
        match outcome {
            Outcome::None => Ok(false),
            Outcome::Decl => Ok(true),
            Outcome::Plain => {
                if self.state.has_output(&snap) {
                    self.emit(";");
                } else {
                    self.state.out_target = None;
                }
                Ok(true)
            }
        }
    }

    fn dispatch_statement(&mut self) -> Result<Outcome, ParseError> {
        if self.call("parse_return")? {
            return Ok(Outcome::Plain);
        }
        if self.call("parse_throw")? {
            return Ok(Outcome::Plain);
        }
        if self.call("parse_type_decl")? {
            return Ok(Outcome::Plain);
        }
        if let Some(outcome) = self.parse_export()? {
            return Ok(outcome);
        }
        if self.call("parse_import")? {
            return Ok(Outcome::Plain);
        }
        if self.call("parse_do_while")? {
            return Ok(Outcome::Plain);
        }
        if self.call("parse_if_while")? {
            return Ok(Outcome::Decl);
        }
        if self.call("parse_for")? {
            return Ok(Outcome::Decl);
        }
        if self.call("parse_try")? {
            return Ok(Outcome::Decl);
        }
        if self.call("parse_function")? {
            return Ok(Outcome::Decl);
        }
        if self.call("parse_class")? {
            return Ok(Outcome::Decl);
        }
        if self.call("parse_switch")? {
            return Ok(Outcome::Decl);
        }
        if self.call("parse_enum")? {
            return Ok(Outcome::Decl);
        }
        if self.call("parse_declare")? {
            return Ok(Outcome::Plain);
        }
        if self.call("parse_var_decl")? {
            return Ok(Outcome::Plain);
        }
        if self.call("parse_expression_seq")? {
            return Ok(Outcome::Plain);
        }
        Ok(Outcome::None)
    }

    pub(crate) fn parse_return_impl(&mut self) -> ParseResult {
        let Some(kw) = self.state.read(&[&"return", &"yield"]) else {
            return Ok(false);
        };
        self.emit(&kw);
        if kw == "yield" && self.state.read_lit("*") {
            self.emit("*");
        }
        let _ = self.call("parse_expression")?;
        Ok(true)
    }

    pub(crate) fn parse_throw_impl(&mut self) -> ParseResult {
        if !self.state.read_lit("throw") {
            return Ok(false);
        }
        self.emit("throw");
        let matched = self.call("parse_expression")?;
        self.expect(matched)?;
        Ok(true)
    }

    /// `type IDENT <T?> = TYPE` — purely type-level.
    pub(crate) fn parse_type_decl_impl(&mut self) -> ParseResult {
        self.stripped(|p| {
            if !p.state.read_lit("type") {
                return Ok(false);
            }
            let Some(name) = p.state.read(&[&*IDENTIFIER]) else {
                return Ok(false);
            };
            p.emit("type");
            p.emit(&name);
            let _ = p.parse_template_params()?;
            p.require_lit("=")?;
            p.emit("=");
            let matched = p.parse_type_inner()?;
            p.expect(matched)?;
            Ok(true)
        })
    }

    /// `export` wraps another statement kind and inherits its termination.
    fn parse_export(&mut self) -> Result<Option<Outcome>, ParseError> {
        let snap = self.state.snapshot();
        if !self.state.read_lit("export") {
            return Ok(None);
        }
        self.emit("export");
        if self.state.read_lit("default") {
            self.emit("default");
        }
        // Re-export list: export { a, b as c } from "path"
        let listed = self.parse_group(
            GroupOptions {
                open: Some("{"),
                close: Some("}"),
                next: Some(","),
                js_open: "{",
                js_close: "}",
                js_next: ",",
                ..GroupOptions::default()
            },
            |p| p.parse_import_binding(),
        )?;
        if listed {
            if self.state.read_lit("from") {
                self.emit("from");
                let path = self.require(&STRING)?;
                self.emit_import_path(&path);
            }
            return Ok(Some(Outcome::Plain));
        }
        if self.call("parse_function")? {
            return Ok(Some(Outcome::Decl));
        }
        if self.call("parse_class")? {
            return Ok(Some(Outcome::Decl));
        }
        if self.call("parse_enum")? {
            return Ok(Some(Outcome::Decl));
        }
        if self.call("parse_type_decl")? {
            if self.options.js {
                // A type-only export leaves no runtime statement at all.
                self.state.revert_output(&snap);
                self.state.out_target = None;
            }
            return Ok(Some(Outcome::Plain));
        }
        if self.call("parse_var_decl")? {
            return Ok(Some(Outcome::Plain));
        }
        let err = self.state.expectation_error("parse_export");
        Err(err)
    }

    pub(crate) fn parse_import_impl(&mut self) -> ParseResult {
        if !self.state.read_lit("import") {
            return Ok(false);
        }
        if self.parse_plugin_import()? {
            return Ok(true);
        }
        self.emit("import");
        // Bare side-effect import.
        if let Some(path) = self.state.read(&[&*STRING]) {
            self.emit_import_path(&path);
            return Ok(true);
        }
        let mut clause = false;
        if self.state.read_lit("*") {
            self.emit("*");
            self.require_lit("as")?;
            self.emit("as");
            let name = self.require(&IDENTIFIER)?;
            self.emit(&name);
            clause = true;
        } else {
            if let Some(name) = self.state.read(&[&*IDENTIFIER]) {
                self.emit(&name);
                clause = true;
                if self.state.read_lit(",") {
                    self.emit(",");
                }
            }
            let named = self.parse_group(
                GroupOptions {
                    open: Some("{"),
                    close: Some("}"),
                    next: Some(","),
                    js_open: "{",
                    js_close: "}",
                    js_next: ",",
                    ..GroupOptions::default()
                },
                |p| p.parse_import_binding(),
            )?;
            clause = clause || named;
        }
        self.expect(clause)?;
        self.require_lit("from")?;
        self.emit("from");
        let path = self.require(&STRING)?;
        self.emit_import_path(&path);
        Ok(true)
    }

    fn parse_import_binding(&mut self) -> ParseResult {
        let Some(name) = self.state.read(&[&*IDENTIFIER]) else {
            return Ok(false);
        };
        self.emit(&name);
        if self.state.read_lit("as") {
            self.emit("as");
            let alias = self.require(&IDENTIFIER)?;
            self.emit(&alias);
        }
        Ok(true)
    }

    /// Emit an import path literal, applying the configured URI rewriter.
    pub(crate) fn emit_import_path(&mut self, lit: &str) {
        let quote = &lit[..1];
        let inner = &lit[1..lit.len() - 1];
        let rewritten = match &self.options.transform_import {
            Some(rewrite) => rewrite(inner),
            None => inner.to_string(),
        };
        self.emit(&format!("{quote}{rewritten}{quote}"));
    }

    pub(crate) fn parse_do_while_impl(&mut self) -> ParseResult {
        if !self.state.read_lit("do") {
            return Ok(false);
        }
        self.emit("do");
        self.parse_braced_body()?;
        let snap = self.state.snapshot();
        let _ = self.state.read_newline()?;
        if !self.state.read_lit("while") {
            self.state.revert(&snap);
            return Err(self.state.expectation_error("parse_do_while"));
        }
        self.emit("while");
        self.emit("(");
        let matched = self.call("parse_expression")?;
        self.expect(matched)?;
        self.emit(")");
        self.state.out_target = None;
        Ok(true)
    }

    pub(crate) fn parse_if_while_impl(&mut self) -> ParseResult {
        let Some(kw) = self.state.read(&[&"if", &"while"]) else {
            return Ok(false);
        };
        self.emit(&kw);
        self.emit("(");
        let matched = self.call("parse_expression")?;
        self.expect(matched)?;
        self.emit(")");
        self.state.out_target = None;
        self.parse_body()?;
        if kw == "if" {
            // `else` may sit on the next line at the same indent.
            let snap = self.state.snapshot();
            let _ = self.state.read_newline()?;
            if self.state.read_lit("else") {
                self.emit("else");
                self.parse_body()?;
            } else {
                self.state.revert(&snap);
            }
        }
        Ok(true)
    }

    pub(crate) fn parse_for_impl(&mut self) -> ParseResult {
        if !self.state.read_lit("for") {
            return Ok(false);
        }
        self.emit("for");
        self.emit("(");
        let head = self.state.snapshot();
        if !self.parse_for_of()? {
            self.state.revert(&head);
            self.parse_for_c()?;
        }
        self.emit(")");
        self.state.out_target = None;
        self.parse_body()?;
        Ok(true)
    }

    /// `for BINDING of|in EXPR`. Leaves partial consumption for the caller
    /// to revert when the form does not apply.
    fn parse_for_of(&mut self) -> ParseResult {
        let mut bound = self.parse_var_decl(false)?;
        if !bound {
            let snap = self.state.snapshot();
            if let Some(name) = self.state.read(&[&*IDENTIFIER]) {
                if is_reserved(&name) {
                    self.state.revert(&snap);
                } else {
                    self.emit(&name);
                    bound = true;
                }
            }
        }
        if !bound {
            return Ok(false);
        }
        let Some(kw) = self.state.read(&[&"of", &"in"]) else {
            return Ok(false);
        };
        self.emit(&kw);
        let matched = self.call("parse_expression")?;
        self.expect(matched)?;
        Ok(true)
    }

    /// C-style head: `INIT? ; COND? ; STEP?`, parts emitted verbatim.
    fn parse_for_c(&mut self) -> Result<(), ParseError> {
        if !self.parse_var_decl(true)? {
            let _ = self.call("parse_expression_seq")?;
        }
        self.require_lit(";")?;
        self.emit(";");
        let _ = self.call("parse_expression")?;
        self.require_lit(";")?;
        self.emit(";");
        let _ = self.call("parse_expression_seq")?;
        Ok(())
    }

    pub(crate) fn parse_try_impl(&mut self) -> ParseResult {
        if !self.state.read_lit("try") {
            return Ok(false);
        }
        self.emit("try");
        self.parse_braced_body()?;
        let mut handled = false;
        let snap = self.state.snapshot();
        let _ = self.state.read_newline()?;
        if self.state.read_lit("catch") {
            self.emit("catch");
            if let Some(name) = self.state.read(&[&*IDENTIFIER]) {
                self.emit("(");
                self.emit(&name);
                let _ = self.parse_type_annotation()?;
                self.emit(")");
            }
            self.parse_braced_body()?;
            handled = true;
        } else {
            self.state.revert(&snap);
        }
        let snap = self.state.snapshot();
        let _ = self.state.read_newline()?;
        if self.state.read_lit("finally") {
            self.emit("finally");
            self.parse_braced_body()?;
            handled = true;
        } else {
            self.state.revert(&snap);
        }
        if !handled {
            self.emit("catch{}");
        }
        Ok(true)
    }

    pub(crate) fn parse_switch_impl(&mut self) -> ParseResult {
        if !self.state.read_lit("switch") {
            return Ok(false);
        }
        self.emit("switch");
        self.emit("(");
        let matched = self.call("parse_expression")?;
        self.expect(matched)?;
        self.emit(")");
        self.state.out_target = None;
        let grouped = self.parse_group(
            GroupOptions {
                open: Some("{"),
                close: Some("}"),
                js_open: "{",
                js_close: "}",
                allow_implicit: true,
                ..GroupOptions::default()
            },
            |p| p.parse_case(),
        )?;
        self.expect(grouped)?;
        Ok(true)
    }

    /// One switch case: `*` for default, otherwise an expression with an
    /// optional `:`. Every case body gets `break;}` appended.
    fn parse_case(&mut self) -> ParseResult {
        let snap = self.state.snapshot();
        // The emitted case label starts at the case's own line.
        self.state.out.push_mark(self.state.in_pos, false);
        if self.state.read_lit("*") {
            self.emit("default:{");
        } else {
            self.emit("case");
            if !self.call("parse_expression")? {
                self.state.revert(&snap);
                return Ok(false);
            }
            let _ = self.state.read_lit(":");
            self.emit(":{");
        }
        self.parse_case_body()?;
        self.emit("break;}");
        self.state.out_target = None;
        Ok(true)
    }

    fn parse_case_body(&mut self) -> Result<(), ParseError> {
        let grouped = self.parse_group(
            GroupOptions {
                allow_implicit: true,
                ..GroupOptions::default()
            },
            |p| p.recover_errors(|q| q.call("parse_statement")),
        )?;
        if grouped {
            return Ok(());
        }
        let matched = self.call("parse_statement")?;
        self.expect(matched)
    }

    pub(crate) fn parse_enum_impl(&mut self) -> ParseResult {
        let snap = self.state.snapshot();
        if !self.state.read_lit("enum") {
            return Ok(false);
        }
        let Some(name) = self.state.read(&[&*IDENTIFIER]) else {
            self.state.revert(&snap);
            return Ok(false);
        };
        let opts = GroupOptions {
            open: Some("{"),
            close: Some("}"),
            next: Some(","),
            js_open: "{",
            js_close: "}",
            js_next: ",",
            allow_implicit: true,
            ..GroupOptions::default()
        };
        if self.ts() {
            self.emit("enum");
            self.emit(&name);
            let grouped = self.parse_group(opts, |p| p.parse_enum_member_ts())?;
            self.expect(grouped)?;
        } else {
            // JS lowering: a plain object with auto-numbered members.
            self.emit("const");
            self.emit(&name);
            self.emit("=");
            let mut index = 0usize;
            let grouped = self.parse_group(opts, |p| {
                let done = p.parse_enum_member_js(index)?;
                if done {
                    index += 1;
                }
                Ok(done)
            })?;
            self.expect(grouped)?;
            self.emit(";");
        }
        Ok(true)
    }

    fn parse_enum_member_ts(&mut self) -> ParseResult {
        let Some(name) = self.state.read(&[&*IDENTIFIER]) else {
            return Ok(false);
        };
        self.emit(&name);
        if self.state.read_lit("=") {
            self.emit("=");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
        }
        Ok(true)
    }

    fn parse_enum_member_js(&mut self, index: usize) -> ParseResult {
        let Some(name) = self.state.read(&[&*IDENTIFIER]) else {
            return Ok(false);
        };
        self.emit(&name);
        if self.state.read_lit("=") {
            self.emit(":");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
        } else {
            self.emit(&format!(":{index}"));
        }
        Ok(true)
    }

    /// `declare` statements are parsed fully and stripped from the output.
    pub(crate) fn parse_declare_impl(&mut self) -> ParseResult {
        if !self.state.read_lit("declare") {
            return Ok(false);
        }
        let snap = self.state.snapshot();
        let outcome = self.dispatch_statement()?;
        if outcome == Outcome::None {
            return Err(self.state.expectation_error("parse_declare"));
        }
        self.state.revert_output(&snap);
        self.state.out_target = None;
        Ok(true)
    }

    pub(crate) fn parse_var_decl_impl(&mut self) -> ParseResult {
        self.parse_var_decl(true)
    }

    /// `IDENT ":"` marks a declaration; a second `":"` means `let`,
    /// otherwise `const`. The type annotation follows the colon directly.
    pub(crate) fn parse_var_decl(&mut self, allow_init: bool) -> ParseResult {
        let snap = self.state.snapshot();
        let Some(name) = self.state.read(&[&*IDENTIFIER]) else {
            return Ok(false);
        };
        if is_reserved(&name) || !self.state.read_lit(":") {
            self.state.revert(&snap);
            return Ok(false);
        }
        let keyword = if self.state.read_lit(":") { "let" } else { "const" };
        self.emit(keyword);
        self.emit(&name);
        let _ = self.stripped(|p| {
            p.emit(":");
            p.parse_type_inner()
        })?;
        if allow_init && self.state.read_lit("=") {
            self.emit("=");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
        }
        Ok(true)
    }

    pub(crate) fn parse_expression_seq_impl(&mut self) -> ParseResult {
        if !self.call("parse_expression")? {
            return Ok(false);
        }
        while self.state.read_lit(",") {
            self.emit(",");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
        }
        Ok(true)
    }
}
