//! Import and export statements, the URI rewriter hook, and plugin
//! imports.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use tabscript::testing::{js_pretty_ok, with_header};
use tabscript::{Options, PluginError, PluginLoader, PluginModule};

#[test]
fn default_import() {
    assert_eq!(
        js_pretty_ok("import util from \"./util\""),
        "\"use strict\";import util from \"./util\";\n"
    );
}

#[test]
fn named_imports() {
    assert_eq!(
        js_pretty_ok("import {a, b as c} from \"m\""),
        "\"use strict\";import {a, b as c} from \"m\";\n"
    );
}

#[test]
fn namespace_import() {
    let code = js_pretty_ok("import * as m from \"m\"");
    assert!(code.contains("import * as m from \"m\";"), "got: {code}");
}

#[test]
fn bare_import() {
    let code = js_pretty_ok("import \"side-effect\"");
    assert!(code.contains("import \"side-effect\";"), "got: {code}");
}

#[test]
fn transform_import_rewrites_paths() {
    let options = Options {
        js: true,
        transform_import: Some(Rc::new(|uri: &str| format!("{uri}.js"))),
        ..Options::default()
    };
    let result = tabscript::transpile(&with_header("import util from \"./util\""), options);
    assert!(result.errors.is_empty(), "{:#?}", result.errors);
    assert!(result.code.contains("\"./util.js\""), "got: {}", result.code);
}

#[test]
fn export_declaration() {
    let code = js_pretty_ok("export f := 1");
    assert!(code.contains("export const f = 1;"), "got: {code}");
}

#[test]
fn export_function() {
    let code = js_pretty_ok("export function f|x|\n\treturn x");
    assert!(code.contains("export function f(x)"), "got: {code}");
}

#[test]
fn type_only_export_vanishes_in_js() {
    assert_eq!(js_pretty_ok("export type T = A"), "\"use strict\";\n");
}

fn recording_loader(seen: Rc<RefCell<Option<serde_json::Value>>>) -> PluginLoader {
    Rc::new(move |path: &str| {
        if path != "magic-plugin" {
            return Err(PluginError::Load(format!("unknown plugin {path}")));
        }
        let seen = seen.clone();
        Ok(PluginModule {
            default: Rc::new(move |parser, _global, plugin_options| {
                *seen.borrow_mut() = Some(plugin_options.clone());
                let prev = parser.method("parse_statement").expect("slot exists");
                parser.replace("parse_statement", move |p| {
                    if p.state_mut().read_lit("magic") {
                        p.emit("conjure()");
                        return Ok(true);
                    }
                    prev(p)
                });
            }),
        })
    })
}

#[test]
fn plugin_import_installs_an_override_and_emits_no_import() {
    let seen = Rc::new(RefCell::new(None));
    let options = Options {
        js: true,
        whitespace: tabscript::Whitespace::Pretty,
        load_plugin: Some(recording_loader(seen.clone())),
        ..Options::default()
    };
    let source = with_header("import plugin \"magic-plugin\" {level: 2}\nmagic\nx := 1");
    let result = tabscript::transpile(&source, options);
    assert!(result.errors.is_empty(), "{:#?}", result.errors);
    assert!(!result.code.contains("import"), "got: {}", result.code);
    assert!(result.code.contains("conjure()"), "got: {}", result.code);
    assert!(result.code.contains("const x = 1;"), "got: {}", result.code);
    assert_eq!(*seen.borrow(), Some(json!({"level": 2})));
}

#[test]
fn header_flags_reach_plugin_options() {
    let seen = Rc::new(RefCell::new(None));
    let options = Options {
        load_plugin: Some(recording_loader(seen.clone())),
        ..Options::default()
    };
    let source = "tabscript 1.0 mode=fast\nimport plugin \"magic-plugin\" {level: 2}\n";
    let result = tabscript::transpile(source, options);
    assert!(result.errors.is_empty(), "{:#?}", result.errors);
    assert_eq!(
        *seen.borrow(),
        Some(json!({"level": 2, "mode": "fast"}))
    );
}

#[test]
fn failing_loader_is_a_fatal_error() {
    let options = Options {
        recover: true,
        load_plugin: Some(recording_loader(Rc::new(RefCell::new(None)))),
        ..Options::default()
    };
    let result = tabscript::transpile(&with_header("import plugin \"nope\""), options);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, tabscript::ErrorKind::Plugin);
}

#[test]
fn missing_loader_is_a_fatal_error() {
    let result = tabscript::transpile(
        &with_header("import plugin \"p\""),
        Options::default(),
    );
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, tabscript::ErrorKind::Plugin);
}
