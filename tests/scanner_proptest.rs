//! Property-based tests for the scanner and the full pipeline: the
//! invariants that must hold for any input, not just the grammar we like.

use proptest::prelude::*;
use tabscript::patterns::{IDENTIFIER, INTEGER};
use tabscript::state::State;
use tabscript::testing::with_header;
use tabscript::{Options, Whitespace};

proptest! {
    /// Successful reads only ever move the cursor forward.
    #[test]
    fn input_position_is_monotonic(words in proptest::collection::vec("[a-z]{1,8}", 1..20)) {
        let source = words.join(" ");
        let mut state = State::new(&source, false);
        let mut last = state.in_pos();
        while state.read(&[&*IDENTIFIER]).is_some() {
            prop_assert!(state.in_pos() >= last);
            last = state.in_pos();
        }
        prop_assert_eq!(state.in_pos(), source.len());
    }

    /// A failed read leaves the scanner exactly where it was.
    #[test]
    fn failed_reads_do_not_consume(source in "[a-z]{1,12}") {
        let mut state = State::new(&source, false);
        prop_assert!(state.read(&[&*INTEGER]).is_none());
        prop_assert_eq!(state.in_pos(), 0);
    }

    /// Snapshot, mutate arbitrarily, revert: captured fields round-trip.
    #[test]
    fn snapshot_round_trip(
        words in proptest::collection::vec("[a-z]{1,6}", 1..6),
        consumed in 0usize..3,
    ) {
        let source = words.join("\n\t");
        let mut state = State::new(&source, false);
        for _ in 0..consumed {
            let _ = state.read(&[&*IDENTIFIER]);
            let _ = state.read_newline();
            let _ = state.read_indent();
        }
        let snap = state.snapshot();
        let pos = state.in_pos();
        let out_len = state.out_tokens().len();
        // Arbitrary forward progress.
        let _ = state.read_newline();
        let _ = state.read_indent();
        let _ = state.read(&[&*IDENTIFIER]);
        state.revert(&snap);
        prop_assert_eq!(state.in_pos(), pos);
        prop_assert_eq!(state.out_tokens().len(), out_len);
    }

    /// Two consecutive newline reads at one position both succeed without
    /// moving.
    #[test]
    fn newline_read_is_idempotent(lines in proptest::collection::vec("[a-z]{1,6}", 2..5)) {
        let source = lines.join("\n");
        let mut state = State::new(&source, false);
        let _ = state.read(&[&*IDENTIFIER]);
        prop_assert!(state.read_newline().expect("no tabs error"));
        let pos = state.in_pos();
        prop_assert!(state.read_newline().expect("no tabs error"));
        prop_assert_eq!(state.in_pos(), pos);
    }

    /// The whole pipeline neither panics nor emits a non-monotonic map,
    /// whatever the input.
    #[test]
    fn transpile_never_panics(source in "[a-zA-Z0-9 \\t\\n:=|.#(){}\\[\\]]{0,60}") {
        let options = Options { recover: true, js: true, ..Options::default() };
        let result = tabscript::transpile(&with_header(&source), options);
        let mut input = result.map.input.clone();
        input.sort_unstable();
        prop_assert_eq!(&result.map.input, &input);
        let mut output = result.map.output.clone();
        output.sort_unstable();
        prop_assert_eq!(&result.map.output, &output);
    }

    /// Tabs only: a space at an indent position is always fatal.
    #[test]
    fn space_indent_is_always_fatal(
        line in "[a-z]{1,6}",
        spaces in 1usize..4,
    ) {
        let source = format!("a := 1\n{}{} := 2", " ".repeat(spaces), line);
        let result = tabscript::transpile(&with_header(&source), Options {
            recover: true,
            ..Options::default()
        });
        prop_assert!(result
            .errors
            .iter()
            .any(|e| e.kind == tabscript::ErrorKind::Indentation));
    }

    /// Pretty output for simple declaration programs is a fixed point:
    /// feeding the emitted expressions back through produces identical
    /// spacing decisions.
    #[test]
    fn pretty_rendering_is_deterministic(names in proptest::collection::vec("[a-z]{1,5}", 1..5)) {
        let source: String = names
            .iter()
            .enumerate()
            .map(|(i, n)| format!("{n}{i} := {i}\n"))
            .collect();
        let options = || Options { whitespace: Whitespace::Pretty, ..Options::default() };
        let first = tabscript::transpile(&with_header(&source), options());
        let second = tabscript::transpile(&with_header(&source), options());
        prop_assert_eq!(first.code, second.code);
        prop_assert_eq!(first.map, second.map);
    }
}

#[test]
fn indents_balance_at_end_of_file() {
    let mut state = State::new("a\n\tb\n\t\tc", false);
    let mut depth = 0i32;
    loop {
        if state.read(&[&*IDENTIFIER]).is_some() {
            continue;
        }
        if state.read_indent().expect("no tabs error") {
            depth += 1;
            continue;
        }
        if state.read_dedent().expect("no tabs error") {
            depth -= 1;
            continue;
        }
        if state.read_newline().expect("no tabs error") && state.at_eof() && depth == 0 {
            break;
        }
        if state.at_eof() && depth == 0 {
            break;
        }
    }
    assert!(state.at_eof());
    assert_eq!(depth, 0);
}
