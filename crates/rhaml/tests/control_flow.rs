use rhaml::{Engine, Locals, MapScope, Options, RenderError};
use serde_json::json;

fn render(template: &str, scope: &MapScope) -> String {
    Engine::new(template, Options::default())
        .unwrap()
        .render(scope, Locals::new())
        .unwrap()
}

#[test]
fn if_true_renders_primary_body() {
    let mut scope = MapScope::new();
    scope.insert("cond", json!(true));
    assert_eq!(
        render("- if cond\n  %p yes\n- else\n  %p no", &scope),
        "<p>yes</p>\n"
    );
}

#[test]
fn if_false_renders_only_the_else_body() {
    let mut scope = MapScope::new();
    scope.insert("cond", json!(false));
    assert_eq!(
        render("- if cond\n  %p yes\n- else\n  %p no", &scope),
        "<p>no</p>\n"
    );
}

#[test]
fn elsif_takes_first_true_arm() {
    let mut scope = MapScope::new();
    scope.insert("a", json!(false));
    scope.insert("b", json!(true));
    assert_eq!(
        render("- if a\n  %p a\n- elsif b\n  %p b\n- else\n  %p c", &scope),
        "<p>b</p>\n"
    );
}

#[test]
fn if_without_else_can_render_nothing() {
    let mut scope = MapScope::new();
    scope.insert("cond", json!(false));
    assert_eq!(render("- if cond\n  %p yes", &scope), "");
}

#[test]
fn unless_inverts_the_condition() {
    let mut scope = MapScope::new();
    scope.insert("hidden", json!(false));
    assert_eq!(render("- unless hidden\n  %p shown", &scope), "<p>shown</p>\n");
    scope.insert("hidden", json!(true));
    assert_eq!(render("- unless hidden\n  %p shown", &scope), "");
}

#[test]
fn null_and_false_are_the_only_falsy_values() {
    let mut scope = MapScope::new();
    scope.insert("zero", json!(0));
    scope.insert("empty", json!(""));
    scope.insert("nothing", json!(null));
    assert_eq!(render("- if zero\n  %p z", &scope), "<p>z</p>\n");
    assert_eq!(render("- if empty\n  %p e", &scope), "<p>e</p>\n");
    assert_eq!(render("- if nothing\n  %p n", &scope), "");
}

#[test]
fn for_loop_over_array() {
    let mut scope = MapScope::new();
    scope.insert("items", json!(["one", "two", "three"]));
    assert_eq!(
        render("%ul\n  - for item in items\n    %li= item", &scope),
        "<ul>\n  <li>one</li>\n  <li>two</li>\n  <li>three</li>\n</ul>\n"
    );
}

#[test]
fn for_loop_with_index_binding() {
    let mut scope = MapScope::new();
    scope.insert("items", json!(["a", "b"]));
    assert_eq!(
        render("- for i, item in items\n  %p #{i}: #{item}", &scope),
        "<p>0: a</p>\n<p>1: b</p>\n"
    );
}

#[test]
fn for_loop_over_object_yields_keys_and_values() {
    let mut scope = MapScope::new();
    scope.insert("settings", json!({"lang": "en", "theme": "dark"}));
    assert_eq!(
        render("- for key, value in settings\n  %p #{key}=#{value}", &scope),
        "<p>lang=en</p>\n<p>theme=dark</p>\n"
    );
}

#[test]
fn loop_bindings_shadow_and_restore() {
    let mut scope = MapScope::new();
    scope.insert("item", json!("outer"));
    scope.insert("items", json!(["inner"]));
    assert_eq!(
        render("- for item in items\n  %p= item\n%p= item", &scope),
        "<p>inner</p>\n<p>outer</p>\n"
    );
}

#[test]
fn nested_loops_keep_their_own_bindings() {
    let mut scope = MapScope::new();
    scope.insert("rows", json!([["a", "b"], ["c"]]));
    assert_eq!(
        render("- for row in rows\n  - for cell in row\n    %td= cell", &scope),
        "<td>a</td>\n<td>b</td>\n<td>c</td>\n"
    );
}

#[test]
fn non_iterable_loop_target_is_a_render_error() {
    let mut scope = MapScope::new();
    scope.insert("items", json!(42));
    let engine = Engine::new("- for item in items\n  %p= item", Options::default()).unwrap();
    let err = engine.render(&scope, Locals::new()).unwrap_err();
    match err {
        RenderError::LoopTarget { expr, line, .. } => {
            assert_eq!(expr, "items");
            assert_eq!(line, 1);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn while_loop_is_reachable_through_a_custom_scope() {
    use rhaml::{Scope, ScopeError};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Countdown(AtomicUsize);

    impl Scope for Countdown {
        fn resolve(&self, expr: &str, _locals: &Locals) -> Result<Value, ScopeError> {
            match expr {
                "more" => {
                    let left = self.0.load(Ordering::SeqCst);
                    Ok(Value::Bool(left > 0))
                }
                "tick" => {
                    self.0.fetch_sub(1, Ordering::SeqCst);
                    Ok(Value::Null)
                }
                other => Err(ScopeError::new(format!("`{}` is not defined", other))),
            }
        }
    }

    let scope = Countdown(AtomicUsize::new(3));
    let engine = Engine::new("- while more\n  - tick\n  %p tick", Options::default()).unwrap();
    let html = engine.render(&scope, Locals::new()).unwrap();
    assert_eq!(html, "<p>tick</p>\n".repeat(3));
}

#[test]
fn silent_code_output_is_discarded() {
    let mut scope = MapScope::new();
    scope.insert("name", json!("x"));
    assert_eq!(render("- name\n%p done", &scope), "<p>done</p>\n");
}

#[test]
fn failed_condition_resolution_aborts_the_render() {
    let engine = Engine::new("- if missing\n  %p x", Options::default()).unwrap();
    let err = engine.render(&MapScope::new(), Locals::new()).unwrap_err();
    assert!(matches!(err, RenderError::UnresolvedExpression { .. }));
}
