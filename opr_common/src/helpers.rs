/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// Read a boolean flag from the environment, falling back to `default` when the variable is unset
/// or holds an unrecognised value.
pub fn env_flag(var: &str, default: bool) -> bool {
    parse_boolean_flag(std::env::var(var).ok(), default)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boolean_flag_accepted_forms() {
        for v in ["1", "true", "YES", " on "] {
            assert!(parse_boolean_flag(Some(v.to_string()), false), "{v} should parse as true");
        }
        for v in ["0", "false", "No", "OFF"] {
            assert!(!parse_boolean_flag(Some(v.to_string()), true), "{v} should parse as false");
        }
    }

    #[test]
    fn boolean_flag_defaults() {
        assert!(parse_boolean_flag(None, true));
        assert!(!parse_boolean_flag(None, false));
        assert!(parse_boolean_flag(Some("banana".to_string()), true));
        assert!(!parse_boolean_flag(Some("banana".to_string()), false));
    }
}
