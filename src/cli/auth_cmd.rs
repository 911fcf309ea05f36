use crate::config::Config;
use crate::error::FbooksError;

/// Complete authorization: with a code, run the code-for-tokens exchange
/// and persist the first credential; without one, open the authorization
/// page so the user can obtain a code.
pub async fn run_auth(config: &Config, code: Option<&str>) -> Result<(), FbooksError> {
    match code {
        Some(code) => {
            let http = crate::http_client(config)?;
            let mut manager = crate::build_token_manager(config, http)?;
            manager.exchange_code(code).await?;
            println!(
                "Authorization complete. Tokens saved to {}",
                config.credentials_file().display()
            );
            Ok(())
        }
        None => {
            let url = authorize_page_url(config);
            if webbrowser::open(&url).is_err() {
                tracing::warn!("could not open a browser automatically");
            }
            println!("Authorize fbooks in your browser, then run `fbooks auth <CODE>` with the");
            println!("code from the redirect URL:");
            println!("{url}");
            Ok(())
        }
    }
}

fn authorize_page_url(config: &Config) -> String {
    format!(
        "{}?client_id={}&response_type=code&redirect_uri={}",
        config.authorize_url,
        urlencoded(&config.client_id),
        urlencoded(&config.redirect_uri),
    )
}

fn urlencoded(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char);
            }
            _ => {
                result.push('%');
                result.push_str(&format!("{b:02X}"));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        serde_json::from_str(
            r#"{
                "accountId": "a",
                "clientId": "client id",
                "clientSecret": "secret",
                "redirectUri": "https://localhost:8080/callback"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn authorize_url_encodes_params() {
        let url = authorize_page_url(&config());
        assert!(url.starts_with("https://auth.freshbooks.com/oauth/authorize?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Flocalhost%3A8080%2Fcallback"));
    }

    #[test]
    fn urlencoded_passes_unreserved() {
        assert_eq!(urlencoded("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
        assert_eq!(urlencoded("a b"), "a%20b");
    }
}
