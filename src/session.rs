// Session state owned by the shell: the credential and the client bound
// to it. Lives for the process; nothing here is persisted.

use crate::api::ChatApi;

/// Tokens longer than this are masked in the status display.
pub const MASK_THRESHOLD: usize = 8;

/// Credential plus the client built for it. Both are set together so a
/// client never exists without a credential and vice versa.
#[derive(Default)]
pub struct Session {
    credential: Option<String>,
    client: Option<Box<dyn ChatApi>>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Replace the credential and its client, unconditionally.
    pub fn authenticate(&mut self, token: String, client: Box<dyn ChatApi>) {
        self.credential = Some(token);
        self.client = Some(client);
    }

    pub fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&dyn ChatApi> {
        self.client.as_deref()
    }

    /// Credential as shown by `status`, or `None` when not configured.
    pub fn masked_credential(&self) -> Option<String> {
        self.credential.as_deref().map(mask_token)
    }
}

/// First 4 chars, `...`, last 4 chars. Short tokens are returned as is.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= MASK_THRESHOLD {
        return token.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ChatRequest, ChatResponse};

    struct Nop;

    impl ChatApi for Nop {
        fn create_chat_completion(&self, _: &ChatRequest) -> Result<ChatResponse, ApiError> {
            Ok(ChatResponse::default())
        }
    }

    #[test]
    fn masks_long_tokens() {
        assert_eq!(mask_token("TOKEN123456"), "TOKE...3456");
        assert_eq!(mask_token("123456789"), "1234...6789");
    }

    #[test]
    fn short_tokens_are_shown_in_full() {
        assert_eq!(mask_token("ab"), "ab");
        assert_eq!(mask_token("12345678"), "12345678");
    }

    #[test]
    fn masking_counts_characters_not_bytes() {
        assert_eq!(mask_token("ééééxxxxéééé"), "éééé...éééé");
    }

    #[test]
    fn new_session_is_not_ready() {
        let session = Session::new();
        assert!(!session.is_ready());
        assert!(session.client().is_none());
        assert_eq!(session.masked_credential(), None);
    }

    #[test]
    fn authenticate_overwrites() {
        let mut session = Session::new();
        session.authenticate("first-token-1".into(), Box::new(Nop));
        session.authenticate("second-token-2".into(), Box::new(Nop));
        assert!(session.is_ready());
        assert_eq!(session.masked_credential().as_deref(), Some("seco...en-2"));
    }
}
