use crate::error::Result;
use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that authenticates with a pretalx API token.
///
/// Every request gets `Authorization: Token <token>`.
pub struct TokenAuth<C> {
    inner: C,
    value: HeaderValue,
}

impl<C> TokenAuth<C> {
    /// Fails if the token contains characters not allowed in a header.
    pub fn new(inner: C, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Token {token}"))?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for TokenAuth<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;
    use std::time::Duration;

    #[test]
    fn test_rejects_token_with_newline() {
        let inner = BasicClient::new(Duration::from_secs(1)).unwrap();
        assert!(TokenAuth::new(inner, "abc\ndef").is_err());
    }

    #[test]
    fn test_header_value_is_sensitive() {
        let inner = BasicClient::new(Duration::from_secs(1)).unwrap();
        let auth = TokenAuth::new(inner, "abc").unwrap();
        assert_eq!(auth.value.to_str().unwrap(), "Token abc");
        assert!(auth.value.is_sensitive());
    }
}
