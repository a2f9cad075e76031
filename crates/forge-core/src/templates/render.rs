//! `{{placeholder}}` substitution

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(\w+)\}\}").unwrap_or_else(|e| panic!("placeholder pattern is invalid: {e}"))
});

/// Replace every `{{name}}` with its value; unknown names become empty
pub fn render_template(content: &str, variables: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            variables.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Placeholder names referenced by `content`, in order of first appearance
pub fn placeholders(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let rendered = render_template(
            "Hello {{name}}, you chose {{mode}}",
            &vars(&[("name", "Ada"), ("mode", "popup")]),
        );
        assert_eq!(rendered, "Hello Ada, you chose popup");
    }

    #[test]
    fn test_missing_placeholder_renders_empty() {
        assert_eq!(render_template("[{{missing}}]", &HashMap::new()), "[]");
    }

    #[test]
    fn test_repeated_and_adjacent_placeholders() {
        let rendered = render_template("{{a}}{{b}}{{a}}", &vars(&[("a", "1"), ("b", "2")]));
        assert_eq!(rendered, "121");
    }

    #[test]
    fn test_non_word_names_are_left_alone() {
        let text = "{{ name }} {{first-name}} {name} {{}}";
        assert_eq!(render_template(text, &vars(&[("name", "x")])), text);
    }

    #[test]
    fn test_values_are_not_rendered_again() {
        let rendered = render_template("{{a}}", &vars(&[("a", "{{b}}"), ("b", "nope")]));
        assert_eq!(rendered, "{{b}}");
    }

    #[test]
    fn test_placeholders_listed_once_in_order() {
        assert_eq!(
            placeholders("{{b}} {{a}} {{b}} {{ c }}"),
            vec!["b".to_string(), "a".to_string()]
        );
    }

    proptest! {
        #[test]
        fn prop_text_without_placeholders_is_unchanged(text in "[^{}]*", value in ".*") {
            let mapping = vars(&[("anything", value.as_str())]);
            prop_assert_eq!(render_template(&text, &mapping), text);
        }

        #[test]
        fn prop_known_placeholder_resolves_to_value(key in "[A-Za-z0-9_]{1,16}", value in ".*") {
            let mapping = vars(&[(key.as_str(), value.as_str())]);
            prop_assert_eq!(render_template(&format!("{{{{{}}}}}", key), &mapping), value);
        }

        #[test]
        fn prop_unknown_placeholder_resolves_to_empty(key in "[A-Za-z0-9_]{1,16}") {
            prop_assert_eq!(render_template(&format!("{{{{{}}}}}", key), &HashMap::new()), "");
        }
    }
}
