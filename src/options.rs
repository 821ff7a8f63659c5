//! Transpiler options.
//!
//! Options deserialize from configuration the same way embedders would load
//! any other tool config; the callable hooks (`transform_import`,
//! `load_plugin`) are runtime-only and are skipped by serde.

use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::plugins::PluginLoader;

/// Renderer whitespace mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Whitespace {
    /// Reproduce source layout: line breaks and column padding follow the
    /// input positions, so stripped type tokens leave alignment holes.
    #[default]
    Preserve,
    /// Normalized spacing with two-space indentation.
    Pretty,
}

/// Rewrites string-literal paths in `import` statements.
pub type TransformImport = Rc<dyn Fn(&str) -> String>;

/// Options accepted by [`transpile`](crate::transpile).
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Emit a token-by-token trace of reads, emits and reverts.
    pub debug: bool,
    /// Collect syntax errors and continue at the next statement boundary.
    pub recover: bool,
    /// JavaScript output mode: strip type-level tokens, emit `"use strict";`.
    pub js: bool,
    /// Renderer whitespace mode.
    pub whitespace: Whitespace,
    /// Optional URI rewriter applied to import paths.
    #[serde(skip)]
    pub transform_import: Option<TransformImport>,
    /// Loader invoked by `import plugin` statements.
    #[serde(skip)]
    pub load_plugin: Option<PluginLoader>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("debug", &self.debug)
            .field("recover", &self.recover)
            .field("js", &self.js)
            .field("whitespace", &self.whitespace)
            .field("transform_import", &self.transform_import.is_some())
            .field("load_plugin", &self.load_plugin.is_some())
            .finish()
    }
}
