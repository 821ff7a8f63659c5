//! Renderer
//!
//! Converts the output token stream into the final source string and the
//! source map, in a single left-to-right pass.
//!
//! Position marks set the render target: where in the source the next text
//! token came from. The renderer moves the output cursor toward that target
//! with newlines and indentation, then decides the separator between
//! adjacent tokens on the same line:
//!
//!     preserve    pad with spaces to the target column when the output has
//!                 not already grown past it. Stripped type tokens leave
//!                 alignment holes, the way a type-stripping pass would.
//!     pretty      normalized spacing: a small no-space character class,
//!                 plus "glued in the source stays glued" for marked tokens
//!                 (that is how `log(c)` keeps its call paren tight while a
//!                 synthesized `if (` gets its space). Two-space indentation
//!                 per level.
//!
//! Both modes force one space between adjacent word characters so tokens
//! never fuse. The separator decision lives in [`separator`] so the rules
//! are testable on their own.
//!
//! Text emitted before any mapped token — the `"use strict";` prologue —
//! does not open an output line of its own: the first mapped token
//! continues that line with no separator, so a JS-mode program starts
//! `"use strict";const …` the way the transpiled shape is documented.

use serde::Serialize;

use crate::options::Whitespace;
use crate::output::OutToken;
use crate::position::LineMap;

/// Parallel arrays of `(input offset, output offset)` basis points.
///
/// A decoder may interpolate linearly forward from each pair until the next
/// one. Offsets are 0-based bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMap {
    #[serde(rename = "in")]
    pub input: Vec<usize>,
    #[serde(rename = "out")]
    pub output: Vec<usize>,
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Decide the separator string emitted between two texts on the same line.
///
/// `glued` means the text carries a fresh mark and the source byte right
/// before it is not whitespace, i.e. it touched its left neighbor in the
/// source.
fn separator(
    prev: char,
    next: char,
    mode: Whitespace,
    out_col: u32,
    target_col: u32,
    fresh_target: bool,
    glued: bool,
) -> String {
    if is_word(prev) && is_word(next) {
        return " ".to_string();
    }
    match mode {
        Whitespace::Preserve => {
            if fresh_target && target_col > out_col {
                " ".repeat((target_col - out_col) as usize)
            } else {
                String::new()
            }
        }
        Whitespace::Pretty => {
            if matches!(next, ')' | ']' | '}' | ',' | ';' | ':' | '.')
                || matches!(prev, '(' | '[' | '.' | '{')
            {
                String::new()
            } else if glued {
                String::new()
            } else {
                " ".to_string()
            }
        }
    }
}

/// Render the token stream to `(code, map)`.
pub fn render(tokens: &[OutToken], mode: Whitespace, lines: &LineMap) -> (String, SourceMap) {
    let input = lines.input().as_bytes();
    let mut code = String::new();
    let mut map = SourceMap::default();
    let mut out_line = 1u32;
    let mut out_col = 1u32;
    let mut target_line = 1u32;
    let mut target_col = 1u32;
    let mut pending_map_in: Option<usize> = None;
    let mut fresh_target = false;
    let mut target_offset = 0usize;
    // Whether any mapped text has been emitted. Until then, line targets
    // do not open new output lines: the unmapped `"use strict";` prologue
    // keeps the first real token on its own line.
    let mut mapped = false;

    for token in tokens {
        match token {
            OutToken::Mark(mark) => {
                let (line, col) = lines.resolve(mark.offset);
                target_line = line;
                target_col = col;
                target_offset = mark.offset;
                fresh_target = true;
                if mark.map {
                    pending_map_in = Some(mark.offset);
                }
            }
            OutToken::Text(text) => {
                let mut continuing = false;
                if target_line > out_line {
                    if mapped {
                        for _ in 0..target_line - out_line {
                            code.push('\n');
                        }
                        out_col = 1;
                    } else {
                        // First mapped token continues the prologue line,
                        // with no separator.
                        continuing = !code.is_empty();
                    }
                    out_line = target_line;
                }
                if out_col == 1 {
                    if target_col > 1 {
                        let indent = match mode {
                            Whitespace::Preserve => "\t".repeat(target_col as usize - 1),
                            Whitespace::Pretty => "  ".repeat(target_col as usize - 1),
                        };
                        code.push_str(&indent);
                        out_col = target_col;
                    }
                } else if continuing {
                    // No separator between the prologue and the token that
                    // takes over its line.
                } else if let (Some(prev), Some(next)) = (code.chars().last(), text.chars().next())
                {
                    // Colons are excluded so values keep a space after the
                    // declaration/key colon that was consumed or rewritten.
                    let glued = fresh_target
                        && target_offset > 0
                        && input
                            .get(target_offset - 1)
                            .map(|b| !b.is_ascii_whitespace() && *b != b':')
                            .unwrap_or(false);
                    let sep = separator(prev, next, mode, out_col, target_col, fresh_target, glued);
                    out_col += sep.chars().count() as u32;
                    code.push_str(&sep);
                }
                if let Some(input_offset) = pending_map_in.take() {
                    map.input.push(input_offset);
                    map.output.push(code.len());
                    mapped = true;
                }
                fresh_target = false;
                code.push_str(text);
                match text.rfind('\n') {
                    Some(i) => {
                        out_line += text.matches('\n').count() as u32;
                        out_col = text[i + 1..].chars().count() as u32 + 1;
                    }
                    None => out_col += text.chars().count() as u32,
                }
            }
        }
    }
    code.push('\n');
    (code, map)
}
