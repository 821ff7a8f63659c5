//! Byte offset to line/column resolution.
//!
//! The scanner and renderer both need `offset -> (line, column)` lookups, and
//! they ask for positions that move mostly forward. A full per-offset table
//! would be wasteful, so the map caches the position at every `CACHE_STEP`
//! bytes and finishes each query with a short linear scan from the nearest
//! cached point.

/// Distance between cached positions.
const CACHE_STEP: usize = 100;

/// Resolves byte offsets in one input to 1-based line/column pairs.
#[derive(Debug, Clone)]
pub struct LineMap {
    input: String,
    /// `(line, column)` at byte offset `i * CACHE_STEP`.
    cache: Vec<(u32, u32)>,
}

impl LineMap {
    pub fn new(input: &str) -> Self {
        let bytes = input.as_bytes();
        let mut cache = Vec::with_capacity(bytes.len() / CACHE_STEP + 1);
        let mut line = 1u32;
        let mut column = 1u32;
        for (i, &b) in bytes.iter().enumerate() {
            if i % CACHE_STEP == 0 {
                cache.push((line, column));
            }
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        if bytes.len() % CACHE_STEP == 0 {
            cache.push((line, column));
        }
        LineMap {
            input: input.to_string(),
            cache,
        }
    }

    /// The input this map was built over.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Resolve a byte offset to its 1-based `(line, column)`.
    ///
    /// Offsets past the end of the input resolve to the position just after
    /// the final byte.
    pub fn resolve(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.input.len());
        let base = offset / CACHE_STEP;
        let (mut line, mut column) = self.cache[base.min(self.cache.len() - 1)];
        let start = (base * CACHE_STEP).min(offset);
        for &b in &self.input.as_bytes()[start..offset] {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}
