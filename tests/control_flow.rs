//! Conditionals, loops, switch and try: heads are parenthesized in the
//! output regardless of source form, bodies are blocks or single
//! statements.

use tabscript::testing::{js_pretty, js_pretty_ok, ts_pretty_ok};

#[test]
fn if_with_word_operators_and_inline_body() {
    assert_eq!(
        ts_pretty_ok("if a == 1 or b == 2 and c log(c)"),
        "if (a === 1 || b === 2 && c) log(c);\n"
    );
}

#[test]
fn if_else_blocks() {
    assert_eq!(
        ts_pretty_ok("if a\n\tf()\nelse\n\tg()"),
        "if (a) {\n  f();\n} else {\n  g();\n}\n"
    );
}

#[test]
fn else_if_chains() {
    let code = ts_pretty_ok("if a\n\tf()\nelse if b\n\tg()");
    assert!(code.contains("} else if (b) {"), "got: {code}");
}

#[test]
fn while_with_inline_body() {
    assert_eq!(ts_pretty_ok("while a < 3 f(a)"), "while (a < 3) f(a);\n");
}

#[test]
fn do_while() {
    assert_eq!(
        ts_pretty_ok("do\n\tf()\nwhile a"),
        "do {\n  f();\n} while (a);\n"
    );
}

#[test]
fn for_of_with_inline_const() {
    assert_eq!(
        ts_pretty_ok("for x: of arr\n\tlog(x)"),
        "for (const x of arr) {\n  log(x);\n}\n"
    );
}

#[test]
fn for_in_over_plain_binding() {
    assert_eq!(
        ts_pretty_ok("for k in obj\n\tlog(k)"),
        "for (k in obj) {\n  log(k);\n}\n"
    );
}

#[test]
fn c_style_for() {
    let code = ts_pretty_ok("for i := 0; i < 3; i++\n\tlog(i)");
    assert!(
        code.contains("for (const i = 0; i < 3; i++)"),
        "got: {code}"
    );
}

#[test]
fn try_catch() {
    assert_eq!(
        ts_pretty_ok("try\n\trisky()\ncatch e\n\thandle(e)"),
        "try {\n  risky();\n} catch (e) {\n  handle(e);\n}\n"
    );
}

#[test]
fn try_without_handlers_synthesizes_an_empty_catch() {
    let code = ts_pretty_ok("try\n\trisky()");
    assert!(code.contains("catch{}"), "got: {code}");
}

#[test]
fn catch_binding_type_is_stripped_in_js() {
    let result = js_pretty("try\n\trisky()\ncatch e: Failure\n\thandle(e)");
    assert!(result.errors.is_empty(), "{:#?}", result.errors);
    assert!(result.code.contains("catch (e)"), "got: {}", result.code);
    assert!(!result.code.contains("Failure"), "got: {}", result.code);
}

#[test]
fn switch_cases_get_breaks_appended() {
    let code = js_pretty_ok("switch x\n\t1\n\t\tlog(a)\n\t*\n\t\tlog(b)");
    assert!(code.contains("switch (x)"), "got: {code}");
    assert!(code.contains("case 1:{"), "got: {code}");
    assert!(code.contains("default:{"), "got: {code}");
    assert_eq!(code.matches("break;}").count(), 2, "got: {code}");
}

#[test]
fn return_and_yield() {
    let code = ts_pretty_ok("f := |x|\n\treturn x");
    assert!(code.contains("return x;"), "got: {code}");
    let code = ts_pretty_ok("g := function*||\n\tyield 1");
    assert!(code.contains("yield 1;"), "got: {code}");
}

#[test]
fn throw_statement() {
    let code = ts_pretty_ok("throw err");
    assert_eq!(code, "throw err;\n");
}
