//! # tabscript
//!
//! Source-to-source transpiler core from TabScript, an indentation-based
//! surface syntax, to TypeScript or JavaScript.
//!
//! Architecture
//!
//!     The engine is a lexer-less, single-pass, backtracking recursive
//!     descent parser: it consumes input through sticky patterns and emits
//!     output tokens as it goes, interleaved with source-position marks for
//!     the source map. There is no AST.
//!
//!     The pipeline per transpilation:
//!     1. A State is created over the input (scanner cursor, pending
//!        INDENT/DEDENT queue, output buffer, errors).
//!     2. The Parser walks the grammar, reading through the scanner and
//!        writing into the output buffer; speculative parses snapshot the
//!        state and revert on failure. Plugins registered before the parse
//!        can replace any named parse method.
//!     3. The renderer materializes the token stream into the final code
//!        string and the `(input offset, output offset)` source map.
//!
//!     The file structure:
//!     .
//!     ├── patterns.rs     # named sticky patterns, keyword matching
//!     ├── position.rs     # offset -> line/column cache
//!     ├── scanner.rs      # reads, whitespace skip, indent engine
//!     ├── output.rs       # output token buffer
//!     ├── state.rs        # state aggregate, snapshots, must
//!     ├── parser.rs       # parser core, method table, recovery
//!     │   └── parser/     # statements, expressions, functions, classes,
//!     │                     types, groups
//!     ├── render.rs       # token stream -> code + source map
//!     ├── plugins.rs      # plugin slots, `import plugin`
//!     ├── options.rs      # transpile options
//!     ├── error.rs        # error model
//!     └── testing.rs      # shared test helpers

pub mod error;
pub mod options;
pub mod output;
pub mod parser;
pub mod patterns;
pub mod plugins;
pub mod position;
pub mod render;
pub mod scanner;
pub mod state;
pub mod testing;

pub use error::{ErrorKind, ParseError};
pub use options::{Options, TransformImport, Whitespace};
pub use parser::{ParseMethod, ParseResult, Parser};
pub use plugins::{PluginEntry, PluginError, PluginLoader, PluginModule};
pub use render::SourceMap;

/// Result of one transpilation.
#[derive(Debug)]
pub struct Transpiled {
    /// The emitted TypeScript or JavaScript.
    pub code: String,
    /// Errors collected during the parse; empty on full success. With
    /// recovery disabled the first error ends the parse.
    pub errors: Vec<ParseError>,
    /// Source-map basis points.
    pub map: SourceMap,
}

/// Transpile one TabScript source.
pub fn transpile(input: &str, options: Options) -> Transpiled {
    let mut parser = Parser::new(input, options);
    if let Err(err) = parser.parse_main() {
        parser.state_mut().push_error(err);
    }
    let (state, options) = parser.finish();
    let (code, map) = render::render(state.out_tokens(), options.whitespace, state.line_map());
    Transpiled {
        code,
        errors: state.into_errors(),
        map,
    }
}
