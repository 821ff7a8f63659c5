//! Expression forms: calls (all three shapes), member and index access,
//! postfix operators, backtick strings, ternaries and the nullish-test
//! shorthand.

use tabscript::testing::{js_pretty_ok, ts_ok, ts_pretty_ok};

#[test]
fn call_hugging_paren() {
    assert_eq!(ts_pretty_ok("log(c)"), "log(c);\n");
}

#[test]
fn spaced_paren_is_not_a_call() {
    // `f (x)` is two statements' worth of nothing: the expression ends at
    // `f`, and the parenthesized sequence cannot follow it on the line.
    let result = tabscript::testing::ts("f (x)");
    assert!(!result.errors.is_empty());
}

#[test]
fn dot_dot_call_with_inline_arguments() {
    assert_eq!(ts_pretty_ok("f.. a b"), "f(a, b);\n");
}

#[test]
fn dot_dot_call_with_indented_arguments() {
    let code = ts_pretty_ok("f..\n\ta\n\tb");
    assert!(code.starts_with("f("), "got: {code}");
    assert!(code.contains("a,"), "got: {code}");
    assert!(code.contains("b"), "got: {code}");
}

#[test]
fn member_and_index_access() {
    assert_eq!(ts_pretty_ok("r := a.b"), "const r = a.b;\n");
    assert_eq!(ts_pretty_ok("r := a[0]"), "const r = a[0];\n");
    assert_eq!(ts_pretty_ok("r := a?.b"), "const r = a?.b;\n");
}

#[test]
fn postfix_increment() {
    assert_eq!(ts_pretty_ok("i++"), "i++;\n");
}

#[test]
fn prefix_operators() {
    assert_eq!(ts_pretty_ok("r := !a"), "const r = !a;\n");
    let code = ts_pretty_ok("r := %bit_not a");
    assert!(code.contains('~'), "got: {code}");
}

#[test]
fn ternary() {
    assert_eq!(ts_pretty_ok("r := a ? b : c"), "const r = a ? b: c;\n");
}

#[test]
fn trailing_question_is_a_nullish_test() {
    assert_eq!(ts_pretty_ok("r := a?"), "const r = a!=null;\n");
}

#[test]
fn backtick_string_with_interpolation() {
    assert_eq!(
        ts_pretty_ok("s := `a ${x} b`"),
        "const s = `a ${x} b`;\n"
    );
}

#[test]
fn nested_backtick_strings() {
    let code = ts_pretty_ok("s := `a ${`b ${c}`}`");
    assert!(code.contains("`a ${"), "got: {code}");
    assert!(code.contains("`b ${"), "got: {code}");
}

#[test]
fn backtick_whitespace_is_never_reflowed() {
    // Inner spacing of a template literal must survive pretty mode.
    let code = ts_pretty_ok("s := `  spaced   out  `");
    assert!(code.contains("`  spaced   out  `"), "got: {code}");
}

#[test]
fn tagged_template_call() {
    assert_eq!(ts_pretty_ok("r := tag`x`"), "const r = tag`x`;\n");
}

#[test]
fn parenthesized_sequence() {
    assert_eq!(ts_pretty_ok("r := (a, b)"), "const r = (a, b);\n");
}

#[test]
fn array_literal_with_spread() {
    assert_eq!(ts_pretty_ok("r := [1, ...rest]"), "const r = [1, ...rest];\n");
}

#[test]
fn object_literal_shorthand_and_methods() {
    let code = js_pretty_ok("o := {a, f: |x| x, g|y|\n\treturn y\n}");
    assert!(code.contains("a,"), "got: {code}");
    assert!(code.contains("f: (x) => x"), "got: {code}");
    assert!(code.contains("g(y)"), "got: {code}");
}

#[test]
fn regex_literal() {
    assert_eq!(ts_pretty_ok("r := /ab+/gi"), "const r = /ab+/gi;\n");
}

#[test]
fn template_arguments_commit_before_a_call() {
    assert_eq!(ts_ok("f<number>(x)"), "f<number>(x);\n");
    // Pretty mode: the stripped arguments leave no hole behind.
    assert_eq!(
        tabscript::testing::js_pretty_ok("f<number>(x)"),
        "\"use strict\";f(x);\n"
    );
}

#[test]
fn template_arguments_stay_comparisons_otherwise() {
    // The committed rule requires `.`, `(` or a newline after `>`; a `+`
    // right after keeps both angle brackets as comparisons.
    let code = ts_ok("r := a<b>+c");
    assert!(code.contains("a<b>+c"), "got: {code}");
}
