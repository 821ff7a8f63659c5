//! Test helpers.
//!
//! Every test goes through these helpers instead of calling
//! [`transpile`](crate::transpile) directly: they prepend the mandatory
//! header line so test sources stay focused on the construct under test,
//! and the `*_ok` variants fail loudly on unexpected errors instead of
//! letting an assertion pass against half-parsed output.

use crate::options::{Options, Whitespace};
use crate::Transpiled;

/// Prefix a test source with a current header line, and make sure it ends
/// with a newline so closing delimiters resolve past the last line.
pub fn with_header(source: &str) -> String {
    let mut full = format!("tabscript 1.0\n{source}");
    if !full.ends_with('\n') {
        full.push('\n');
    }
    full
}

/// Transpile to TypeScript (preserve whitespace).
pub fn ts(source: &str) -> Transpiled {
    crate::transpile(&with_header(source), Options::default())
}

/// Transpile to TypeScript with pretty whitespace.
pub fn ts_pretty(source: &str) -> Transpiled {
    let options = Options {
        whitespace: Whitespace::Pretty,
        ..Options::default()
    };
    crate::transpile(&with_header(source), options)
}

/// Transpile to JavaScript (preserve whitespace).
pub fn js(source: &str) -> Transpiled {
    let options = Options {
        js: true,
        ..Options::default()
    };
    crate::transpile(&with_header(source), options)
}

/// Transpile to JavaScript with pretty whitespace.
pub fn js_pretty(source: &str) -> Transpiled {
    let options = Options {
        js: true,
        whitespace: Whitespace::Pretty,
        ..Options::default()
    };
    crate::transpile(&with_header(source), options)
}

fn expect_clean(result: Transpiled, source: &str) -> String {
    assert!(
        result.errors.is_empty(),
        "unexpected errors for {source:?}: {:#?}",
        result.errors
    );
    result.code
}

/// Transpile to TypeScript, panicking on any error.
pub fn ts_ok(source: &str) -> String {
    expect_clean(ts(source), source)
}

/// Transpile to pretty TypeScript, panicking on any error.
pub fn ts_pretty_ok(source: &str) -> String {
    expect_clean(ts_pretty(source), source)
}

/// Transpile to JavaScript, panicking on any error.
pub fn js_ok(source: &str) -> String {
    expect_clean(js(source), source)
}

/// Transpile to pretty JavaScript, panicking on any error.
pub fn js_pretty_ok(source: &str) -> String {
    expect_clean(js_pretty(source), source)
}
