//! Type-level constructs: emitted verbatim (with `or`/`and` substitution)
//! in TS mode, absent from JS mode output entirely.

use tabscript::testing::{js_ok, js_pretty_ok, ts_pretty_ok};

#[test]
fn type_alias_with_union() {
    assert_eq!(
        ts_pretty_ok("type T = number or string"),
        "type T = number | string;\n"
    );
    assert_eq!(js_ok("type T = number or string"), "\"use strict\";\n");
}

#[test]
fn intersection_types() {
    assert_eq!(ts_pretty_ok("type T = A and B"), "type T = A & B;\n");
}

#[test]
fn conditional_type() {
    let code = ts_pretty_ok("type R = T extends U ? A : B");
    assert!(code.contains("T extends U ? A: B"), "got: {code}");
}

#[test]
fn keyof_and_generic_arguments() {
    assert_eq!(ts_pretty_ok("type K = keyof T"), "type K = keyof T;\n");
    let code = ts_pretty_ok("type M = Map<string, number>");
    assert!(code.contains("Map<string, number>"), "got: {code}");
}

#[test]
fn function_type_renders_as_arrow() {
    let code = ts_pretty_ok("type F = |x: number|: string");
    assert!(code.contains("(x: number)=> string"), "got: {code}");
}

#[test]
fn as_cast_is_type_level() {
    assert_eq!(ts_pretty_ok("y := x as number"), "const y = x as number;\n");
    assert_eq!(js_pretty_ok("y := x as number"), "\"use strict\";const y = x;\n");
}

#[test]
fn non_null_assertion_is_type_level() {
    assert_eq!(ts_pretty_ok("y := x!"), "const y = x!;\n");
    assert_eq!(js_pretty_ok("y := x!"), "\"use strict\";const y = x;\n");
}

#[test]
fn declare_statements_are_fully_stripped() {
    assert_eq!(ts_pretty_ok("declare x : number"), "\n");
    assert_eq!(js_ok("declare x : number"), "\"use strict\";\n");
}

#[test]
fn interface_survives_ts_and_vanishes_in_js() {
    let source = "interface I\n\tx: number\n\tf: |n: number|: void";
    let ts = ts_pretty_ok(source);
    assert!(ts.contains("interface I {"), "got: {ts}");
    assert!(ts.contains("x: number;"), "got: {ts}");
    assert_eq!(js_ok(source), "\"use strict\";\n");
}

#[test]
fn enum_is_kept_in_ts() {
    assert_eq!(
        ts_pretty_ok("enum Color\n\tRed\n\tGreen"),
        "enum Color {\n  Red,\n  Green\n}\n"
    );
}

#[test]
fn enum_lowers_to_an_object_in_js() {
    assert_eq!(
        js_pretty_ok("enum Color\n\tRed\n\tGreen"),
        "\"use strict\";const Color = {\n  Red:0,\n  Green:1\n};\n"
    );
}

#[test]
fn function_overload_signatures_are_stripped() {
    let source = "function f|x: number|: string\nfunction f|x|\n\treturn x";
    let js = js_pretty_ok(source);
    assert_eq!(js.matches("function f").count(), 1, "got: {js}");
    assert!(js.contains("return x;"), "got: {js}");
}

#[test]
fn return_type_annotations_are_stripped_in_js() {
    let source = "f := |x: number|: number x";
    let ts = ts_pretty_ok(source);
    assert!(ts.contains(": number"), "got: {ts}");
    let js = js_pretty_ok(source);
    assert!(!js.contains("number"), "got: {js}");
}

#[test]
fn template_parameters_are_type_level() {
    let source = "function id<T>|x: T|: T\n\treturn x";
    let ts = ts_pretty_ok(source);
    assert!(ts.contains("id<T>"), "got: {ts}");
    let js = js_pretty_ok(source);
    assert!(js.contains("function id(x)"), "got: {js}");
    assert!(!js.contains("<T>"), "got: {js}");
}
