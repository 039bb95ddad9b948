/// End-to-end rendering tests through the public API.
///
/// Each case renders a whole template against JSON data and checks the exact
/// output, or the error the first failing action reports.

use serde_json::json;
use tmpl::template::{render, Error, Template, Value};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ok(src: &str, data: serde_json::Value) -> String {
    render(src, data).unwrap_or_else(|e| panic!("render {src:?} failed: {e}"))
}

fn err(src: &str, data: serde_json::Value) -> Error {
    match render(src, data) {
        Ok(out) => panic!("render {src:?} unexpectedly produced {out:?}"),
        Err(e) => e,
    }
}

// ── Substitution and whitespace ───────────────────────────────────────────────

#[test]
fn trim_markers_strip_adjoining_whitespace() {
    assert_eq!(ok("{{23 -}} < {{- 45}}", json!(null)), "23<45");
}

#[test]
fn trimming_a_list() {
    let src = "items:\n  {{- .a}}\n  {{- .b}}\n  {{- .c -}}\n!";
    assert_eq!(ok(src, json!({"a": "x", "b": "y", "c": "z"})), "items:xyz!");
}

#[test]
fn text_between_actions_is_preserved() {
    assert_eq!(
        ok("Dear {{.name}},\n\nYour total is {{.total}}.\n", json!({"name": "Ann", "total": 12.5})),
        "Dear Ann,\n\nYour total is 12.5.\n"
    );
}

#[test]
fn numbers_render_naturally() {
    assert_eq!(ok("{{.n}} {{.f}} {{-7}}", json!({"n": 3, "f": 0.25})), "3 0.25 -7");
}

// ── Variables ─────────────────────────────────────────────────────────────────

#[test]
fn variable_declared_then_used() {
    assert_eq!(ok("{{$x := 5}}{{$x}}", json!({})), "5");
}

#[test]
fn variable_reassigned() {
    assert_eq!(ok("{{$x := 1}}{{$x = 2}}{{$x}}", json!(null)), "2");
}

#[test]
fn variable_from_data() {
    assert_eq!(
        ok(r#"{{$n := .user.name}}hello {{$n}}, {{$n | len}} letters"#, json!({"user": {"name": "Bea"}})),
        "hello Bea, 3 letters"
    );
}

#[test]
fn undefined_variable_produces_no_output() {
    assert_eq!(err("some text {{$missing}} more", json!({})), Error::UndefinedVariable("missing".into()));
}

#[test]
fn outer_data_reachable_inside_with() {
    let data = json!({"site": "example.org", "page": {"title": "Home"}});
    assert_eq!(
        ok("{{$site := .site}}{{with .page}}{{.title}} @ {{$site}}{{end}}", data),
        "Home @ example.org"
    );
    assert_eq!(ok("{{with .a}}{{.}} of {{$}}{{end}}", json!({"a": 1})), r#"1 of {"a":1}"#);
}

// ── with / end ────────────────────────────────────────────────────────────────

#[test]
fn nested_with_blocks() {
    let data = json!({"a": {"b": {"c": "deep"}, "name": "A"}});
    assert_eq!(
        ok("{{with .a}}{{with .b}}{{.c}}{{end}}/{{.name}}{{end}}", data),
        "deep/A"
    );
}

#[test]
fn variables_from_inside_with_are_dropped_at_end() {
    let data = json!({"a": {}});
    assert_eq!(
        err("{{with .a}}{{$inner := 1}}{{end}}{{$inner}}", data),
        Error::UndefinedVariable("inner".into())
    );
}

#[test]
fn outer_variables_visible_inside_with() {
    assert_eq!(ok("{{$x := 7}}{{with .a}}{{$x}}{{end}}", json!({"a": 1})), "7");
}

#[test]
fn with_over_missing_field_fails() {
    assert!(matches!(
        err("{{with .nonexistent}}{{.}}{{end}}", json!({})),
        Error::FieldAccess { .. }
    ));
}

#[test]
fn unbalanced_end() {
    assert_eq!(err("{{end}}", json!(null)), Error::UnboundedEnd);
    assert_eq!(err("{{with .a}}{{end}}{{end}}", json!({"a": 1})), Error::UnboundedEnd);
}

// ── Functions ─────────────────────────────────────────────────────────────────

#[test]
fn comparisons() {
    let data = json!({"age": 30, "name": "Cy"});
    assert_eq!(ok("{{lt .age 40}} {{ge .age 40}} {{eq .name `Cy` `Di`}}", data), "true false true");
}

#[test]
fn and_or_return_operands() {
    assert_eq!(ok("{{and 1 2}} {{and 0 2}} {{or 0 2}} {{or 1 0}}", json!(null)), "2 0 2 1");
    assert_eq!(ok(r#"{{or .nick .name}}"#, json!({"nick": "", "name": "Dee"})), "Dee");
}

#[test]
fn not_and_emptiness() {
    assert_eq!(ok(r#"{{not ""}} {{not 0}} {{not nil}} {{not "x"}} {{not .obj}}"#, json!({"obj": {}})), "true true true false false");
}

#[test]
fn print_spacing() {
    assert_eq!(ok(r#"{{print 1 nil "x"}}"#, json!(null)), "1 <nil> x");
    assert_eq!(ok(r#"{{print "a" "b"}}"#, json!(null)), "ab");
    assert_eq!(ok(r#"{{println "a" 1}}"#, json!(null)), "a 1\n");
}

#[test]
fn parenthesized_arguments() {
    assert_eq!(ok(r#"{{print (len .s) (eq (len .s) 5)}}"#, json!({"s": "hello"})), "5 true");
}

#[test]
fn escapes_in_literals() {
    assert_eq!(ok(r#"{{"tab\there"}}"#, json!(null)), "tab\there");
    assert_eq!(ok(r"{{`raw\n`}}", json!(null)), r"raw\n");
    assert_eq!(err(r#"{{"\q"}}"#, json!(null)), Error::UnsupportedEscape('q'));
}

#[test]
fn ordering_on_nil_is_invalid() {
    assert!(matches!(err("{{lt nil 1}}", json!(null)), Error::InvalidArguments { .. }));
}

#[test]
fn unknown_and_unimplemented_functions() {
    assert_eq!(err("{{nosuch 1}}", json!(null)), Error::UnknownFunction("nosuch".into()));
    assert_eq!(err("{{printf `%d` 1}}", json!(null)), Error::NotImplemented("printf".into()));
}

#[test]
fn user_functions_take_priority() {
    let mut tmpl = Template::named("report");
    tmpl.add_func("print", |_| Ok(Value::Str("shadowed".into())))
        .add_func("sum", |args| {
            args.iter()
                .map(|a| match a {
                    Value::Number(n) => Ok(*n),
                    other => Err(format!("can't sum {}", other.kind())),
                })
                .sum::<Result<f64, String>>()
                .map(Value::Number)
        });
    assert_eq!(tmpl.execute("{{print 1}} {{sum 1 2 3}} {{.x | sum 10}}", json!({"x": 5})).unwrap(), "shadowed 6 15");
    assert_eq!(
        tmpl.execute(r#"{{sum 1 "a"}}"#, json!(null)),
        Err(Error::FunctionFailed { func: "sum".into(), message: "can't sum string".into() })
    );
}

#[test]
fn template_shared_across_threads() {
    let mut tmpl = Template::new();
    tmpl.add_func("twice", |args| match args {
        [Value::Str(s)] => Ok(Value::Str(s.repeat(2))),
        _ => Err("twice wants a string".into()),
    });
    let tmpl = std::sync::Arc::new(tmpl);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tmpl = std::sync::Arc::clone(&tmpl);
            std::thread::spawn(move || tmpl.execute("{{.id | print | twice}}", json!({"id": i})))
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        assert_eq!(h.join().unwrap().unwrap(), format!("{i}{i}"));
    }
}

// ── Syntax errors ─────────────────────────────────────────────────────────────

#[test]
fn syntax_errors() {
    for src in ["{{1 @}}", "{{(print 1}}", "{{1 )}}", "{{print 1 |}}", "{{Upper}}", "{{\"open}}"] {
        assert!(matches!(err(src, json!(null)), Error::Syntax { .. }), "{src}");
    }
}
