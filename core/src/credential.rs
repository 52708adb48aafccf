//! Bearer credential lookup.
//!
//! The client never stores or refreshes tokens. Authenticated operations
//! take a provider and ask it for the current token at request time.

/// Source of the bearer token for authenticated requests.
pub trait CredentialProvider {
    /// The current token, or `None` when the caller is signed out.
    fn token(&self) -> Option<String>;
}

impl CredentialProvider for str {
    fn token(&self) -> Option<String> {
        non_empty(self)
    }
}

impl CredentialProvider for String {
    fn token(&self) -> Option<String> {
        non_empty(self)
    }
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for &T {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

impl<T: CredentialProvider> CredentialProvider for Option<T> {
    fn token(&self) -> Option<String> {
        self.as_ref().and_then(CredentialProvider::token)
    }
}

/// Adapts a closure, e.g. one reading a session store.
pub struct FnCredential<F>(pub F);

impl<F> CredentialProvider for FnCredential<F>
where
    F: Fn() -> Option<String>,
{
    fn token(&self) -> Option<String> {
        (self.0)()
    }
}

fn non_empty(token: &str) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_no_token() {
        assert_eq!("".token(), None);
        assert_eq!(String::from("abc").token().as_deref(), Some("abc"));
    }

    #[test]
    fn option_and_closure_providers() {
        let none: Option<String> = None;
        assert_eq!(none.token(), None);
        assert_eq!(Some("t").token().as_deref(), Some("t"));
        assert_eq!(FnCredential(|| Some("x".to_string())).token().as_deref(), Some("x"));
    }
}
