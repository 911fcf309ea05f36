use std::path::{Path, PathBuf};

use crate::error::FbooksError;

use super::env::expand_env_vars;
use super::types::Config;

/// Strip JSONC comments (// line comments and /* */ block comments) so the
/// config file can be annotated.
pub fn strip_jsonc_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(ch) = chars.next() {
        if escape_next {
            escape_next = false;
            result.push(ch);
            continue;
        }

        if in_string {
            result.push(ch);
            match ch {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                result.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    // Preserve newlines to keep parse error line numbers stable.
                    if c == '\n' {
                        result.push('\n');
                    }
                    prev = c;
                }
            }
            _ => result.push(ch),
        }
    }

    result
}

/// Locate the config file.
///
/// Precedence:
/// 1. explicit path argument (`--config`)
/// 2. `FBOOKS_CONFIG` env var
/// 3. `~/.fbooks/config.json` or `~/.fbooks/config.jsonc`
pub fn discover_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    if let Ok(env_path) = std::env::var("FBOOKS_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    let home = dirs::home_dir()?;
    let json = home.join(".fbooks").join("config.json");
    if json.exists() {
        return Some(json);
    }
    let jsonc = home.join(".fbooks").join("config.jsonc");
    if jsonc.exists() {
        return Some(jsonc);
    }
    None
}

/// Load and validate the configuration, expanding `${VAR}` references in
/// string fields.
pub fn load_config(explicit: Option<&str>) -> Result<Config, FbooksError> {
    let path = discover_config_path(explicit).ok_or_else(|| FbooksError::ConfigError {
        path: PathBuf::from("~/.fbooks/config.json"),
        detail: "no config file found; create one with accountId, clientId, clientSecret \
                 and redirectUri"
            .to_string(),
    })?;
    load_config_file(&path)
}

fn load_config_file(path: &Path) -> Result<Config, FbooksError> {
    let content = std::fs::read_to_string(path).map_err(|e| FbooksError::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {e}"),
    })?;

    let stripped = strip_jsonc_comments(&content);
    let mut config: Config =
        serde_json::from_str(&stripped).map_err(|e| FbooksError::ConfigError {
            path: path.to_path_buf(),
            detail: format!("Invalid JSON: {e}"),
        })?;

    for field in [
        &mut config.account_id,
        &mut config.client_id,
        &mut config.client_secret,
        &mut config.redirect_uri,
        &mut config.api_url,
        &mut config.token_url,
        &mut config.authorize_url,
    ] {
        *field = expand_env_vars(field).map_err(|detail| FbooksError::ConfigError {
            path: path.to_path_buf(),
            detail,
        })?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_line_comments() {
        let input = "{\n  // comment\n  \"key\": \"value\" // inline\n}";
        let parsed: serde_json::Value =
            serde_json::from_str(&strip_jsonc_comments(input)).unwrap();
        assert_eq!(parsed["key"], "value");
    }

    #[test]
    fn strip_block_comments() {
        let input = "{\n  /* block\n     comment */\n  \"key\": \"value\"\n}";
        let parsed: serde_json::Value =
            serde_json::from_str(&strip_jsonc_comments(input)).unwrap();
        assert_eq!(parsed["key"], "value");
    }

    #[test]
    fn preserve_strings_with_slashes() {
        let input = r#"{"url": "https://example.com/path"}"#;
        let parsed: serde_json::Value =
            serde_json::from_str(&strip_jsonc_comments(input)).unwrap();
        assert_eq!(parsed["url"], "https://example.com/path");
    }

    #[test]
    fn load_valid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                // FreshBooks OAuth app
                "accountId": "ogqZ2g",
                "clientId": "id",
                "clientSecret": "secret",
                "redirectUri": "https://localhost/callback"
            }"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.account_id, "ogqZ2g");
        assert_eq!(config.api_url, "https://api.freshbooks.com");
    }

    #[test]
    fn load_invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert_eq!(err.code(), "config_error");
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn load_expands_env_references() {
        std::env::set_var("FBOOKS_TEST_SECRET", "from-env");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "accountId": "a",
                "clientId": "b",
                "clientSecret": "${FBOOKS_TEST_SECRET}",
                "redirectUri": "https://localhost/callback"
            }"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.client_secret, "from-env");
    }

    #[test]
    fn explicit_path_wins() {
        let path = discover_config_path(Some("/tmp/custom.json")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.json"));
    }
}
