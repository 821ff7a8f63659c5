//! Type grammar.
//!
//! Types are parsed with normal emission and then reverted wholesale from
//! the output in JS mode, so the strip logic lives in exactly one place.
//! In TS mode the tokens pass through with two substitutions: `or`/`and`
//! render as `|`/`&`, and the function-type return colon renders as `=>`.

use crate::parser::groups::GroupOptions;
use crate::parser::{ParseResult, Parser};
use crate::patterns::{is_reserved, IDENTIFIER, NUMBER, STRING};

impl Parser {
    /// Table slot: a full type, stripped from the output in JS mode.
    pub(crate) fn parse_type_impl(&mut self) -> ParseResult {
        self.stripped(|p| p.parse_type_inner())
    }

    /// A type with unions, intersections, predicates and conditionals.
    /// Emits unconditionally; callers route it through `stripped`.
    pub(crate) fn parse_type_inner(&mut self) -> ParseResult {
        if !self.parse_type_unit()? {
            return Ok(false);
        }
        loop {
            if self.state.read_lit("or") {
                self.emit("|");
                let matched = self.parse_type_unit()?;
                self.expect(matched)?;
                continue;
            }
            if self.state.read_lit("and") {
                self.emit("&");
                let matched = self.parse_type_unit()?;
                self.expect(matched)?;
                continue;
            }
            if self.state.read_lit("is") {
                // Type predicate: `x is T`.
                self.emit("is");
                let matched = self.parse_type_unit()?;
                self.expect(matched)?;
                continue;
            }
            if self.state.read_lit("extends") {
                // Conditional type: `T extends U ? A : B`.
                self.emit("extends");
                let matched = self.parse_type_inner()?;
                self.expect(matched)?;
                self.require_lit("?")?;
                self.emit("?");
                let matched = self.parse_type_inner()?;
                self.expect(matched)?;
                self.require_lit(":")?;
                self.emit(":");
                let matched = self.parse_type_inner()?;
                self.expect(matched)?;
                continue;
            }
            break;
        }
        Ok(true)
    }

    fn parse_type_unit(&mut self) -> ParseResult {
        if self.state.read_lit("typeof") {
            self.emit("typeof");
            let matched = self.call("parse_expression")?;
            self.expect(matched)?;
            return Ok(true);
        }
        if self.state.read_lit("keyof") {
            self.emit("keyof");
            let matched = self.parse_type_unit()?;
            self.expect(matched)?;
            return Ok(true);
        }
        let mut cored = false;
        // Named type, possibly dotted, with optional type arguments.
        let snap = self.state.snapshot();
        if let Some(name) = self.state.read(&[&*IDENTIFIER]) {
            if is_reserved(&name) {
                self.state.revert(&snap);
            } else {
                self.emit(&name);
                while self.state.read_lit(".") {
                    self.emit(".");
                    let part = self.require(&IDENTIFIER)?;
                    self.emit(&part);
                }
                if self.state.read_lit("<") {
                    self.emit("<");
                    let matched = self.parse_type_inner()?;
                    self.expect(matched)?;
                    while self.state.read_lit(",") {
                        self.emit(",");
                        let matched = self.parse_type_inner()?;
                        self.expect(matched)?;
                    }
                    self.require_lit(">")?;
                    self.emit(">");
                }
                cored = true;
            }
        }
        if !cored {
            cored = self.parse_object_type()?;
        }
        if !cored && self.state.peek_lit("[") {
            let grouped = self.parse_group(
                GroupOptions {
                    open: Some("["),
                    close: Some("]"),
                    next: Some(","),
                    js_open: "[",
                    js_close: "]",
                    js_next: ",",
                    ..GroupOptions::default()
                },
                |p| p.parse_type_inner(),
            )?;
            cored = grouped;
        }
        if !cored {
            cored = self.parse_function_type()?;
        }
        if !cored && self.state.read_lit("(") {
            self.emit("(");
            let matched = self.parse_type_inner()?;
            self.expect(matched)?;
            self.require_lit(")")?;
            self.emit(")");
            cored = true;
        }
        if !cored {
            if let Some(text) = self.state.read(&[&*NUMBER]) {
                self.emit(&text);
                cored = true;
            } else if let Some(text) = self.state.read(&[&*STRING]) {
                self.emit(&text);
                cored = true;
            }
        }
        if !cored {
            return Ok(false);
        }
        // Array / index suffixes.
        while self.state.read_lit("[") {
            self.emit("[");
            let _ = self.parse_type_inner()?;
            self.require_lit("]")?;
            self.emit("]");
        }
        Ok(true)
    }

    /// Object type literal `{ name?: T, ... }`.
    fn parse_object_type(&mut self) -> ParseResult {
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
            |p| {
                let key = match p.state.read(&[&*IDENTIFIER]) {
                    Some(k) => k,
                    None => match p.state.read(&[&*STRING]) {
                        Some(k) => k,
                        None => return Ok(false),
                    },
                };
                p.emit(&key);
                if p.state.read_lit("?") {
                    p.emit("?");
                }
                p.require_lit(":")?;
                p.emit(":");
                let matched = p.parse_type_inner()?;
                p.expect(matched)?;
                Ok(true)
            },
        )
    }

    /// Function type `|PARAMS|: T`, emitted as `(PARAMS)=>T`. Backs out
    /// cleanly when the return colon is missing.
    fn parse_function_type(&mut self) -> ParseResult {
        let snap = self.state.snapshot();
        if !self.state.peek_lit("|") {
            return Ok(false);
        }
        let params = self.parse_params()?;
        if !params || !self.state.read_lit(":") {
            self.state.revert(&snap);
            return Ok(false);
        }
        self.emit("=>");
        let matched = self.parse_type_inner()?;
        self.expect(matched)?;
        Ok(true)
    }

    /// Optional `: TYPE` annotation, colon present in the source. Backs out
    /// (colon included) when no type follows, so `x := 0` initializers read
    /// the `:` as part of the declaration instead.
    pub(crate) fn parse_type_annotation(&mut self) -> ParseResult {
        self.stripped(|p| {
            if !p.state.read_lit(":") {
                return Ok(false);
            }
            p.emit(":");
            p.call("parse_type")
        })
    }

    /// Template parameter list `<T, U extends X>` on declarations.
    /// Type-level only.
    pub(crate) fn parse_template_params(&mut self) -> ParseResult {
        self.stripped(|p| {
            if !p.state.read_lit("<") {
                return Ok(false);
            }
            p.emit("<");
            loop {
                let name = p.require(&IDENTIFIER)?;
                p.emit(&name);
                if p.state.read_lit("extends") {
                    p.emit("extends");
                    let matched = p.parse_type_inner()?;
                    p.expect(matched)?;
                }
                if p.state.read_lit("=") {
                    p.emit("=");
                    let matched = p.parse_type_inner()?;
                    p.expect(matched)?;
                }
                if p.state.read_lit(",") {
                    p.emit(",");
                    continue;
                }
                break;
            }
            p.require_lit(">")?;
            p.emit(">");
            Ok(true)
        })
    }
}
