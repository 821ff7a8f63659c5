//! Variable declarations: the `IDENT :` / `IDENT ::` forms, type
//! annotations, and initializers in both output modes.

use tabscript::testing::{js_ok, js_pretty_ok, ts_ok, ts_pretty_ok};

#[test]
fn const_declaration_with_type() {
    // Preserve mode keeps source columns; the output grew past them, so the
    // tokens pack tight.
    assert_eq!(ts_ok("x : number = 3"), "const x:number=3;\n");
}

#[test]
fn const_declaration_with_type_pretty() {
    assert_eq!(ts_pretty_ok("x : number = 3"), "const x: number = 3;\n");
}

#[test]
fn js_mode_strips_the_type() {
    // The first statement continues the prologue's line; with the output
    // already past the source columns, preserve mode packs the tokens.
    assert_eq!(js_ok("x : number = 3"), "\"use strict\";const x=3;\n");
}

#[test]
fn js_mode_preserve_pads_alignment_on_later_lines() {
    // From the second line on, the stripped annotation leaves an alignment
    // hole, the way a transpile-only type stripper would.
    assert_eq!(
        js_ok("a := 1\nx : number = 3"),
        "\"use strict\";const a=1;\nconst x    = 3;\n"
    );
}

#[test]
fn js_mode_pretty() {
    assert_eq!(js_pretty_ok("x : number = 3"), "\"use strict\";const x = 3;\n");
}

#[test]
fn double_colon_means_let() {
    assert_eq!(
        ts_pretty_ok("y :: string = \"a\""),
        "let y: string = \"a\";\n"
    );
}

#[test]
fn declaration_without_type() {
    assert_eq!(ts_pretty_ok("x := 3"), "const x = 3;\n");
}

#[test]
fn declaration_without_initializer() {
    assert_eq!(ts_pretty_ok("x : number"), "const x: number;\n");
}

#[test]
fn arrow_function_value() {
    assert_eq!(js_pretty_ok("f := |x| x"), "\"use strict\";const f = (x) => x;\n");
}

#[test]
fn arrow_with_object_literal_body_is_parenthesized() {
    assert_eq!(
        js_pretty_ok("f := |x| {a: x}"),
        "\"use strict\";const f = (x) => ({a: x});\n"
    );
}

#[test]
fn array_type_annotation() {
    assert_eq!(ts_pretty_ok("xs : number[] = []"), "const xs: number[] = [];\n");
}

#[test]
fn two_declarations_map_to_their_own_lines() {
    assert_eq!(ts_pretty_ok("a := 1\nb := 2"), "const a = 1;\nconst b = 2;\n");
}
