//! Parsing of `Authorization: Basic <base64(email:password)>` headers.
//!
//! Parsing is pure: whether a header is well formed never depends on the
//! stored credentials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

pub const BASIC_REALM: &str = "Basic realm=\"weekly-planner\"";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing Authorization Header")]
    Missing,
    #[error("Invalid Authorization Header")]
    Malformed,
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub email: String,
    pub password: String,
}

// Keep the password out of logs.
impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BasicCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The value to send in an `Authorization` header.
    pub fn to_header_value(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.email, self.password))
        )
    }
}

pub fn parse_authorization_header(
    header: Option<&str>,
) -> Result<BasicCredentials, CredentialError> {
    let header = header.ok_or(CredentialError::Missing)?;

    let (scheme, parameter) = header
        .trim()
        .split_once(' ')
        .ok_or(CredentialError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(CredentialError::Malformed);
    }

    let decoded = STANDARD
        .decode(parameter.trim())
        .map_err(|_| CredentialError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| CredentialError::Malformed)?;

    // Split on the first colon only; passwords may contain colons.
    let (email, password) = decoded.split_once(':').ok_or(CredentialError::Malformed)?;
    Ok(BasicCredentials::new(email, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn test_parses_email_and_password() {
        let creds = parse_authorization_header(Some(&encoded("ann@example.com:secret"))).unwrap();

        assert_eq!(creds, BasicCredentials::new("ann@example.com", "secret"));
    }

    #[test]
    fn test_splits_on_first_colon_only() {
        let creds = parse_authorization_header(Some(&encoded("ann@example.com:a:b:c"))).unwrap();

        assert_eq!(creds.email, "ann@example.com");
        assert_eq!(creds.password, "a:b:c");
    }

    #[test]
    fn test_payload_without_colon_is_malformed() {
        let result = parse_authorization_header(Some(&encoded("onlyoneword")));

        assert_eq!(result, Err(CredentialError::Malformed));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(parse_authorization_header(None), Err(CredentialError::Missing));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let header = format!("basic {}", STANDARD.encode("ann@example.com:secret"));

        assert!(parse_authorization_header(Some(&header)).is_ok());
    }

    #[test]
    fn test_other_schemes_are_malformed() {
        assert_eq!(
            parse_authorization_header(Some("Bearer abc.def.ghi")),
            Err(CredentialError::Malformed)
        );
        assert_eq!(
            parse_authorization_header(Some("Basic")),
            Err(CredentialError::Malformed)
        );
    }

    #[test]
    fn test_invalid_base64_and_utf8_are_malformed() {
        assert_eq!(
            parse_authorization_header(Some("Basic !!!not-base64!!!")),
            Err(CredentialError::Malformed)
        );
        let not_utf8 = format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']));
        assert_eq!(
            parse_authorization_header(Some(&not_utf8)),
            Err(CredentialError::Malformed)
        );
    }

    #[test]
    fn test_header_value_parses_back() {
        let creds = BasicCredentials::new("ben@example.com", "p@ss:word");

        let parsed = parse_authorization_header(Some(&creds.to_header_value())).unwrap();

        assert_eq!(parsed, creds);
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = BasicCredentials::new("ben@example.com", "hunter2");

        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
