//! Scope commands
//!
//! `{key}` redirects key-value lines into an object resolved from the nearest enclosing
//! object; `{}` steps back out.

use archieml::aml::testing::assert_doc;
use archieml::parse;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::plain("{scope}\n")]
#[case::spaces_around_command("  {scope}  ")]
#[case::tabs_around_command("\t\t{scope}\t\t")]
#[case::spaces_in_key("{  scope  }")]
#[case::tabs_in_key("{\t\tscope\t}")]
#[case::trailing_text("{scope}a")]
fn test_scope_command_creates_object(#[case] source: &str) {
    let doc = parse(source);
    assert_doc(&doc).keys(&["scope"]).field("scope", |s| {
        s.is_object().keys(&[]);
    });
}

#[test]
fn test_items_before_scope_not_namespaced() {
    let doc = parse("key:value\n{scope}\n");
    assert_doc(&doc).json(json!({"key": "value", "scope": {}}));
}

#[test]
fn test_items_after_scope_namespaced() {
    let doc = parse("{scope}\nkey:value\n");
    assert_doc(&doc).json(json!({"scope": {"key": "value"}}));
}

#[test]
fn test_scopes_nest_with_dot_notation() {
    let doc = parse("{scope.scope}\nkey:value\n");
    assert_doc(&doc).json(json!({"scope": {"scope": {"key": "value"}}}));
}

#[test]
fn test_scopes_can_be_reopened() {
    let doc = parse("{scope}\nkey:value\n{}\n{scope}\nother:value\n");
    assert_doc(&doc).json(json!({"scope": {"key": "value", "other": "value"}}));
}

#[test]
fn test_scopes_do_not_overwrite_existing_values() {
    let doc = parse("{scope.scope}\nkey:value\n{scope.otherscope}\nkey:value\n");
    assert_doc(&doc).json(json!({"scope": {
        "scope": {"key": "value"},
        "otherscope": {"key": "value"}
    }}));
}

#[rstest]
#[case::plain("{}")]
#[case::spaces_inside("{  }")]
#[case::tabs_inside("{\t\t}")]
#[case::spaces_around("  {}  ")]
#[case::tabs_around("\t{}\t")]
fn test_end_scope_resets_to_root(#[case] close: &str) {
    let doc = parse(&format!("{{scope}}\n{close}\nkey:value\n"));
    assert_doc(&doc).json(json!({"scope": {}, "key": "value"}));
}

#[test]
fn test_keys_overwritten_as_namespaces() {
    let doc = parse("key: value\n{key}\nsubkey: subvalue\n");
    assert_doc(&doc).json(json!({"key": {"subkey": "subvalue"}}));
}

#[test]
fn test_sibling_scopes_do_not_nest() {
    let doc = parse("{a}\nx: 1\n{b}\ny: 2\n");
    assert_doc(&doc).json(json!({"a": {"x": "1"}, "b": {"y": "2"}}));
}

#[test]
fn test_leading_dot_ignored_outside_freeform() {
    let doc = parse("{.scope}\nkey: value\n");
    assert_doc(&doc).json(json!({"scope": {"key": "value"}}));
}

#[test]
fn test_scope_inside_object_array_item() {
    let doc = parse("[items]\nname: a\n{detail}\nx: 1\n");
    assert_doc(&doc).json(json!({
        "items": [{"name": "a"}],
        "detail": {"x": "1"}
    }));
}
