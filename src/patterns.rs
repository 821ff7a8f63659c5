//! Pattern registry
//!
//! The scanner is lexer-less: the parser asks for exactly the token shapes it
//! can accept at the current position, and each shape is a sticky pattern
//! that either matches at that position or fails without consuming anything.
//!
//! Patterns
//!
//!     A [`Pattern`] wraps a compiled regex anchored with `\A` so a match can
//!     only start at the beginning of the slice handed to it; matching against
//!     `&input[pos..]` gives sticky semantics without per-call allocation.
//!     Each pattern carries a display name, and error messages show the name
//!     instead of the regex source.
//!
//!     Literal tokens are matched as plain strings through the same [`Match`]
//!     trait. A literal that ends in a word character only matches when the
//!     following character is a non-word character, so `in` never matches the
//!     prefix of `inward`.
//!
//!     Backtick string bodies need "everything up to the next `${` or
//!     closing backtick", which the regex engine cannot express without
//!     lookahead; [`WithinBacktick`] is a hand-rolled matcher for that one
//!     shape.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A sticky pattern with a display name for error messages.
pub struct Pattern {
    regex: Regex,
    name: &'static str,
}

impl Pattern {
    /// Compile `src` anchored to the match position.
    pub fn new(src: &str, name: &'static str) -> Self {
        let anchored = format!(r"\A(?:{src})");
        let regex = Regex::new(&anchored).expect("pattern regex must compile");
        Pattern { regex, name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Anchored/sticky form of `src` whose display is `name`.
pub fn pattern(src: &str, name: &'static str) -> Pattern {
    Pattern::new(src, name)
}

/// Anything the scanner can attempt at the current position.
pub trait Match {
    /// Length of the match at `pos`, or `None` if the input there does not
    /// have this shape. Never consumes.
    fn match_at(&self, input: &str, pos: usize) -> Option<usize>;

    /// Name used in "expecting one of" error messages.
    fn describe(&self) -> String;
}

impl Match for Pattern {
    fn match_at(&self, input: &str, pos: usize) -> Option<usize> {
        self.regex.find(&input[pos..]).map(|m| m.end())
    }

    fn describe(&self) -> String {
        self.name.to_string()
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

impl Match for &str {
    fn match_at(&self, input: &str, pos: usize) -> Option<usize> {
        let rest = &input.as_bytes()[pos..];
        let lit = self.as_bytes();
        if !rest.starts_with(lit) {
            return None;
        }
        // Keyword boundary: `in` must not match inside `inward`.
        if lit.last().copied().is_some_and(is_word_byte)
            && rest.get(lit.len()).copied().is_some_and(is_word_byte)
        {
            return None;
        }
        Some(lit.len())
    }

    fn describe(&self) -> String {
        format!("'{self}'")
    }
}

/// Body segment of a backtick string: consumes text up to (not including)
/// the next `${` or closing backtick, honoring backslash escapes.
pub struct WithinBacktick;

impl Match for WithinBacktick {
    fn match_at(&self, input: &str, pos: usize) -> Option<usize> {
        let bytes = input.as_bytes();
        let mut i = pos;
        while i < bytes.len() {
            match bytes[i] {
                b'`' => break,
                b'$' if bytes.get(i + 1) == Some(&b'{') => break,
                b'\\' if i + 1 < bytes.len() => i += 2,
                _ => i += 1,
            }
        }
        Some(i - pos)
    }

    fn describe(&self) -> String {
        "backtick string content".to_string()
    }
}

/// Horizontal whitespace with an optional `#` line comment.
pub static WHITESPACE: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"[ \t\r]*(?:#.*)?", "whitespace"));

pub static IDENTIFIER: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"[A-Za-z_$][0-9A-Za-z_$]*", "identifier"));

/// Single- or double-quoted string with backslash escapes.
pub static STRING: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(r#"'(?:[^'\\\n]|\\.)*'|"(?:[^"\\\n]|\\.)*""#, "string")
});

/// Hex, octal, binary or decimal literal with optional sign, fraction and
/// exponent.
pub static NUMBER: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(
        r"[+-]?(?:0[xX][0-9a-fA-F]+|0[oO][0-7]+|0[bB][01]+|(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)",
        "number",
    )
});

pub static INTEGER: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"[0-9]+", "integer"));

/// Header version: `major.minor`.
pub static VERSION: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"[0-9]+\.[0-9]+", "version"));

/// Binary operators, longest spellings first. Includes the word operators
/// and the `%`-named operator family.
pub static OPERATOR: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(
        r"==|!=|=~|!~|<=|>=|\*\*=|\*\*|\+=|-=|\*=|/=|<|>|\+|-|\*|/|=|%[A-Za-z_$][0-9A-Za-z_$]*|(?:and|or|in|instanceof)\b",
        "operator",
    )
});

/// Unary/prefix operator set.
pub static EXPRESSION_PREFIX: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(
        r"\+\+|--|!|\+|-|(?:typeof|delete|await|new)\b",
        "prefix operator",
    )
});

pub static WITHIN_BACKTICK_STRING: WithinBacktick = WithinBacktick;

/// JavaScript regex literal with flag suffix.
pub static REGEXP: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(
        r"/(?:[^/\\\n\[]|\\.|\[(?:[^\]\\\n]|\\.)*\])+/[a-zA-Z]*",
        "regular expression",
    )
});

/// Words that can never be a primary-expression identifier.
const RESERVED: &[&str] = &[
    "and", "or", "in", "instanceof", "typeof", "delete", "await", "new", "as", "of", "is",
    "keyof", "extends", "implements", "else", "catch", "finally", "while",
];

/// Whether `word` is reserved in expression position.
pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}
