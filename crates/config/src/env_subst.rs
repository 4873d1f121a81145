/// Replace `${ENV_VAR}` placeholders in config text.
///
/// Unresolvable or malformed placeholders are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Implementation of [`substitute_env`] with a pluggable lookup, so tests
/// never have to mutate the process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push_str("${");
                        result.push_str(name);
                        result.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            _ => {
                // No closing brace (or empty name) — emit literally.
                result.push_str("${");
                rest = after;
            },
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "DOCMILL_API_KEY" => Some("sk-test".to_string()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with("api_key = \"${DOCMILL_API_KEY}\"", lookup),
            "api_key = \"sk-test\""
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env_with("${DOCMILL_MISSING_XYZ}", lookup),
            "${DOCMILL_MISSING_XYZ}"
        );
    }

    #[test]
    fn substitutes_multiple_occurrences() {
        assert_eq!(
            substitute_env_with("${DOCMILL_API_KEY}/${DOCMILL_API_KEY}", lookup),
            "sk-test/sk-test"
        );
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(
            substitute_env_with("prefix ${DOCMILL_API", lookup),
            "prefix ${DOCMILL_API"
        );
    }

    #[test]
    fn empty_value_is_allowed() {
        assert_eq!(substitute_env_with("[${EMPTY}]", lookup), "[]");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }
}
