use lol_html::{element, HtmlRewriter, Settings};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("streamwatch/", env!("CARGO_PKG_VERSION"));

/// Shared client for the panel session and the Telegram api. The cookie
/// store carries the panel session across the login flow.
pub fn create_client() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .cookie_store(true)
        .user_agent(USER_AGENT)
}

/// Scrapes the hidden `_token` input from the panel login page.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let mut token: Option<String> = None;
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!(r#"input[name="_token"]"#, |el| {
                if token.is_none() {
                    token = el.get_attribute("value");
                }
                Ok(())
            })],
            ..Settings::new()
        },
        |_: &[u8]| {},
    );
    rewriter.write(html.as_bytes()).ok()?;
    rewriter.end().ok()?;
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_csrf_token() {
        let html = r#"<html><body>
            <form method="POST" action="/login">
              <input type="hidden" name="_token" value="abc123DEF">
              <input type="text" name="username">
              <input type="password" name="password">
            </form>
        </body></html>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("abc123DEF"));
    }

    #[test]
    fn test_extract_csrf_token_first_wins() {
        let html = r#"<input name="_token" value="first"><input name="_token" value="second">"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("first"));
    }

    #[test]
    fn test_extract_csrf_token_missing() {
        let html = r#"<form><input type="text" name="username"></form>"#;
        assert_eq!(extract_csrf_token(html), None);
    }
}
