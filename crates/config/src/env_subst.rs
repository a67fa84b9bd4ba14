//! `${ENV_VAR}` substitution in raw config text.

/// Replace `${ENV_VAR}` placeholders in config string values.
///
/// Unresolvable variables are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Replace `${ENV_VAR}` placeholders using a custom lookup function.
///
/// Split out so tests don't have to mutate the process environment.
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
                    // Leave unresolved placeholder as-is.
                    None => {
                        result.push_str("${");
                        result.push_str(name);
                        result.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            // Malformed (no closing brace or empty name) — emit literally.
            _ => {
                result.push_str("${");
                rest = after;
            },
        }
    }

    result.push_str(rest);
    result
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "SITEDIFF_DEV" => Some("http://localhost:3000".to_string()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with("dev_domain = \"${SITEDIFF_DEV}\"", lookup),
            "dev_domain = \"http://localhost:3000\""
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env_with("key = \"${NOPE}\"", lookup),
            "key = \"${NOPE}\""
        );
    }

    #[test]
    fn leaves_malformed_placeholder() {
        assert_eq!(substitute_env_with("key = ${oops", lookup), "key = ${oops");
        assert_eq!(substitute_env_with("${}after", lookup), "${}after");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(substitute_env_with("no vars here", lookup), "no vars here");
    }

    #[test]
    fn substitutes_multiple() {
        assert_eq!(
            substitute_env_with("${SITEDIFF_DEV}/${SITEDIFF_DEV}", lookup),
            "http://localhost:3000/http://localhost:3000"
        );
    }
}
