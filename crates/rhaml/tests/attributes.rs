use rhaml::{Engine, Format, Locals, MapScope, Options};
use serde_json::json;

fn scope() -> MapScope {
    let mut s = MapScope::new();
    s.insert("url", json!("/home"));
    s.insert("extra", json!("c d"));
    s.insert("on", json!(true));
    s.insert("off", json!(false));
    s.insert("nothing", json!(null));
    s
}

fn render(template: &str) -> String {
    render_with(template, Options::default())
}

fn render_with(template: &str, options: Options) -> String {
    Engine::new(template, options)
        .unwrap()
        .render(&scope(), Locals::new())
        .unwrap()
}

#[test]
fn hash_attributes_render_in_order() {
    assert_eq!(
        render("%a{href: '/x', title: 'home'} link"),
        "<a href=\"/x\" title=\"home\">link</a>\n"
    );
}

#[test]
fn expression_attribute_values_resolve_per_render() {
    assert_eq!(render("%a{href: url} go"), "<a href=\"/home\">go</a>\n");
}

#[test]
fn shorthand_and_hash_classes_merge_in_stable_order() {
    assert_eq!(
        render("%p.a.b{class: extra} text"),
        "<p class=\"a b c d\">text</p>\n"
    );
}

#[test]
fn shorthand_id_is_overridden_by_hash_id() {
    assert_eq!(
        render("%p#first{id: 'second'} text"),
        "<p id=\"second\">text</p>\n"
    );
}

#[test]
fn id_renders_before_class() {
    assert_eq!(
        render("%p.a#main text"),
        "<p id=\"main\" class=\"a\">text</p>\n"
    );
}

#[test]
fn boolean_attribute_formats() {
    assert_eq!(render("%input{checked: true}"), "<input checked>\n");
    let html4 = Options {
        format: Format::Html4,
        ..Options::default()
    };
    assert_eq!(
        render_with("%input{checked: true}", html4),
        "<input checked=\"checked\">\n"
    );
    let xhtml = Options {
        format: Format::Xhtml,
        ..Options::default()
    };
    assert_eq!(
        render_with("%input{checked: true}", xhtml),
        "<input checked=\"checked\" />\n"
    );
}

#[test]
fn truthy_expression_becomes_a_flag() {
    assert_eq!(render("%input{checked: on}"), "<input checked>\n");
}

#[test]
fn false_and_nil_attributes_are_omitted() {
    assert_eq!(render("%input{checked: off}"), "<input>\n");
    assert_eq!(render("%a{title: nothing} x"), "<a>x</a>\n");
}

#[test]
fn attribute_values_are_escaped() {
    let mut s = MapScope::new();
    s.insert("q", json!("a\"b&c"));
    let html = Engine::new("%a{title: q} x", Options::default())
        .unwrap()
        .render(&s, Locals::new())
        .unwrap();
    assert_eq!(html, "<a title=\"a&quot;b&amp;c\">x</a>\n");
}

#[test]
fn custom_attribute_wrapper() {
    let options = Options {
        attr_wrapper: '\'',
        ..Options::default()
    };
    assert_eq!(
        render_with("%a{href: '/x'} go", options),
        "<a href='/x'>go</a>\n"
    );
}

#[test]
fn single_quote_wrapper_escapes_quotes_in_values() {
    let options = Options {
        attr_wrapper: '\'',
        ..Options::default()
    };
    let mut s = MapScope::new();
    s.insert("q", json!("it's"));
    let html = Engine::new("%a{title: q} x", options)
        .unwrap()
        .render(&s, Locals::new())
        .unwrap();
    assert_eq!(html, "<a title='it&#39;s'>x</a>\n");
}

#[test]
fn paren_attributes() {
    assert_eq!(
        render("%a(href='/x' target='_blank') go"),
        "<a href=\"/x\" target=\"_blank\">go</a>\n"
    );
    assert_eq!(render("%input(checked)"), "<input checked>\n");
}

#[test]
fn nested_hash_flattens_to_dashed_names() {
    assert_eq!(
        render("%div{data: {role: 'nav', item_count: 3}} x"),
        "<div data-role=\"nav\" data-item-count=\"3\">x</div>\n"
    );
}

#[test]
fn multiline_attribute_hash() {
    assert_eq!(
        render("%a{href: '/x',\n   title: 'home'} go"),
        "<a href=\"/x\" title=\"home\">go</a>\n"
    );
}

#[test]
fn number_attribute_values() {
    assert_eq!(
        render("%td{colspan: 2} x"),
        "<td colspan=\"2\">x</td>\n"
    );
}

#[test]
fn repeated_attribute_keeps_last_value() {
    assert_eq!(
        render("%a{rel: 'a', rel: 'b'} x"),
        "<a rel=\"b\">x</a>\n"
    );
}
