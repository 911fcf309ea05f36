/// Expand environment variable references in a config string.
///
/// Supported syntaxes:
/// - `${VAR}` - replaced with the env var value; error if unset
/// - `${VAR:-fallback}` - replaced with the env var value, or the fallback
///   if unset or empty
///
/// Lets secrets like the OAuth client secret stay out of the config file.
pub fn expand_env_vars(input: &str) -> Result<String, String> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next(); // consume '{'

        let mut var_expr = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_expr.push(c);
        }
        if !found_close {
            return Err(format!("Unclosed variable reference: ${{{var_expr}"));
        }

        if let Some(sep) = var_expr.find(":-") {
            let (name, fallback) = (&var_expr[..sep], &var_expr[sep + 2..]);
            match std::env::var(name) {
                Ok(val) if !val.is_empty() => result.push_str(&val),
                _ => result.push_str(fallback),
            }
        } else {
            match std::env::var(&var_expr) {
                Ok(val) => result.push_str(&val),
                Err(_) => {
                    return Err(format!("Environment variable '{var_expr}' is not set"));
                }
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(expand_env_vars("no vars here").unwrap(), "no vars here");
    }

    #[test]
    fn expands_set_variable() {
        std::env::set_var("FBOOKS_TEST_EXPAND_A", "value-a");
        assert_eq!(
            expand_env_vars("prefix-${FBOOKS_TEST_EXPAND_A}-suffix").unwrap(),
            "prefix-value-a-suffix"
        );
    }

    #[test]
    fn unset_variable_is_an_error() {
        let err = expand_env_vars("${FBOOKS_TEST_EXPAND_UNSET_XYZ}").unwrap_err();
        assert!(err.contains("FBOOKS_TEST_EXPAND_UNSET_XYZ"));
    }

    #[test]
    fn fallback_used_when_unset() {
        assert_eq!(
            expand_env_vars("${FBOOKS_TEST_EXPAND_UNSET_XYZ:-fallback}").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn unclosed_reference_is_an_error() {
        assert!(expand_env_vars("${NOPE").is_err());
    }

    #[test]
    fn dollar_without_brace_is_literal() {
        assert_eq!(expand_env_vars("cost: $5").unwrap(), "cost: $5");
    }
}
