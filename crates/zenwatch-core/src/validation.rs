//! Form validation.
//!
//! Validators collect every problem at once so a form can mark all bad
//! fields in one pass.

use url::Url;
use zenwatch_api::types::{
    KeywordInput, LoginRequest, NewUserKeyword, ProfileUpdate, RegisterRequest, SourceInput,
};

/// Allowed username length.
pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=30;
/// Minimum password length.
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum comment length in characters.
pub const COMMENT_MAX_LEN: usize = 2000;
/// Maximum keyword length in characters.
pub const KEYWORD_MAX_LEN: usize = 50;
/// Allowed personalization weight.
pub const KEYWORD_WEIGHT: std::ops::RangeInclusive<f64> = 0.1..=5.0;
/// Maximum profile bio length in characters.
pub const BIO_MAX_LEN: usize = 500;

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email address is empty.
    EmptyEmail,
    /// Email address format is invalid.
    InvalidEmail,
    /// Password is empty.
    EmptyPassword,
    /// Username has the wrong length or characters.
    InvalidUsername,
    /// Password is shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort,
    /// Password lacks a letter or a digit.
    PasswordTooWeak,
    /// Confirmation does not match the password.
    PasswordMismatch,
    /// Comment is blank.
    EmptyComment,
    /// Comment is longer than [`COMMENT_MAX_LEN`].
    CommentTooLong,
    /// Keyword is blank.
    EmptyKeyword,
    /// Keyword is longer than [`KEYWORD_MAX_LEN`].
    KeywordTooLong,
    /// Weight outside [`KEYWORD_WEIGHT`].
    InvalidWeight,
    /// Source name is blank.
    EmptySourceName,
    /// Source URL is blank.
    EmptySourceUrl,
    /// Source URL is not an http(s) URL.
    InvalidSourceUrl,
    /// Bio is longer than [`BIO_MAX_LEN`].
    BioTooLong,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "Email address is required",
            Self::InvalidEmail => "Invalid email address format",
            Self::EmptyPassword => "Password is required",
            Self::InvalidUsername => "Username must be 3-30 letters, digits or underscores",
            Self::PasswordTooShort => "Password must be at least 8 characters",
            Self::PasswordTooWeak => "Password must contain a letter and a digit",
            Self::PasswordMismatch => "Passwords do not match",
            Self::EmptyComment => "Comment cannot be empty",
            Self::CommentTooLong => "Comment must be at most 2000 characters",
            Self::EmptyKeyword => "Keyword is required",
            Self::KeywordTooLong => "Keyword must be at most 50 characters",
            Self::InvalidWeight => "Weight must be between 0.1 and 5.0",
            Self::EmptySourceName => "Source name is required",
            Self::EmptySourceUrl => "Source URL is required",
            Self::InvalidSourceUrl => "Source URL must start with http:// or https://",
            Self::BioTooLong => "Bio must be at most 500 characters",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort | Self::PasswordTooWeak => "password",
            Self::InvalidUsername => "username",
            Self::PasswordMismatch => "confirm_password",
            Self::EmptyComment | Self::CommentTooLong => "content",
            Self::EmptyKeyword | Self::KeywordTooLong => "keyword",
            Self::InvalidWeight => "weight",
            Self::EmptySourceName => "name",
            Self::EmptySourceUrl | Self::InvalidSourceUrl => "url",
            Self::BioTooLong => "bio",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a form.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a login form.
///
/// # Errors
///
/// Returns every invalid field.
pub fn validate_login(request: &LoginRequest) -> ValidationResult {
    let mut errors = Vec::new();
    check_email(&request.email, &mut errors);
    if request.password.is_empty() {
        errors.push(ValidationError::EmptyPassword);
    }
    finish(errors)
}

/// Validate a registration form, including the password confirmation.
///
/// # Errors
///
/// Returns every invalid field.
pub fn validate_registration(
    request: &RegisterRequest,
    confirm_password: &str,
) -> ValidationResult {
    let mut errors = Vec::new();
    check_email(&request.email, &mut errors);
    if !is_valid_username(&request.username) {
        errors.push(ValidationError::InvalidUsername);
    }

    let password = &request.password;
    if password.is_empty() {
        errors.push(ValidationError::EmptyPassword);
    } else if password.chars().count() < PASSWORD_MIN_LEN {
        errors.push(ValidationError::PasswordTooShort);
    } else if !(password.chars().any(char::is_alphabetic)
        && password.chars().any(|c| c.is_ascii_digit()))
    {
        errors.push(ValidationError::PasswordTooWeak);
    }
    if password != confirm_password {
        errors.push(ValidationError::PasswordMismatch);
    }
    finish(errors)
}

/// Validate comment text.
///
/// # Errors
///
/// Returns an error for blank or overlong text.
pub fn validate_comment(content: &str) -> ValidationResult {
    let mut errors = Vec::new();
    if content.trim().is_empty() {
        errors.push(ValidationError::EmptyComment);
    } else if content.chars().count() > COMMENT_MAX_LEN {
        errors.push(ValidationError::CommentTooLong);
    }
    finish(errors)
}

/// Validate a personalization keyword.
///
/// # Errors
///
/// Returns every invalid field.
pub fn validate_user_keyword(keyword: &NewUserKeyword) -> ValidationResult {
    let mut errors = Vec::new();
    check_keyword(&keyword.keyword, &mut errors);
    if !KEYWORD_WEIGHT.contains(&keyword.weight) {
        errors.push(ValidationError::InvalidWeight);
    }
    finish(errors)
}

/// Validate an admin scraping keyword.
///
/// # Errors
///
/// Returns every invalid field.
pub fn validate_admin_keyword(input: &KeywordInput) -> ValidationResult {
    let mut errors = Vec::new();
    check_keyword(&input.name, &mut errors);
    finish(errors)
}

/// Validate a scraping source.
///
/// # Errors
///
/// Returns every invalid field.
pub fn validate_source(input: &SourceInput) -> ValidationResult {
    let mut errors = Vec::new();
    if input.name.trim().is_empty() {
        errors.push(ValidationError::EmptySourceName);
    }
    if input.url.trim().is_empty() {
        errors.push(ValidationError::EmptySourceUrl);
    } else if !is_http_url(&input.url) {
        errors.push(ValidationError::InvalidSourceUrl);
    }
    finish(errors)
}

/// Validate a profile update. Only fields being changed are checked.
///
/// # Errors
///
/// Returns every invalid field.
pub fn validate_profile(update: &ProfileUpdate) -> ValidationResult {
    let mut errors = Vec::new();
    if let Some(username) = &update.username
        && !is_valid_username(username)
    {
        errors.push(ValidationError::InvalidUsername);
    }
    if update
        .bio
        .as_ref()
        .is_some_and(|bio| bio.chars().count() > BIO_MAX_LEN)
    {
        errors.push(ValidationError::BioTooLong);
    }
    finish(errors)
}

fn check_email(email: &str, errors: &mut Vec<ValidationError>) {
    if email.trim().is_empty() {
        errors.push(ValidationError::EmptyEmail);
    } else if !is_valid_email(email) {
        errors.push(ValidationError::InvalidEmail);
    }
}

fn check_keyword(keyword: &str, errors: &mut Vec<ValidationError>) {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        errors.push(ValidationError::EmptyKeyword);
    } else if keyword.chars().count() > KEYWORD_MAX_LEN {
        errors.push(ValidationError::KeywordTooLong);
    }
}

fn is_valid_username(username: &str) -> bool {
    USERNAME_LEN.contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_http_url(url: &str) -> bool {
    Url::parse(url.trim())
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: "ada@example.com".into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@sub.example.com"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example..com"));
    }

    #[test]
    fn test_login_collects_all_errors() {
        let errors = validate_login(&LoginRequest::new("", "")).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyEmail, ValidationError::EmptyPassword]);
        assert!(validate_login(&LoginRequest::new("ada@example.com", "pw")).is_ok());
    }

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration(&registration("ada_99", "hunter22"), "hunter22").is_ok());

        let errors = validate_registration(&registration("ab", "short1"), "short1").unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidUsername));
        assert!(errors.contains(&ValidationError::PasswordTooShort));

        let errors =
            validate_registration(&registration("ada-x", "longpassword"), "other").unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidUsername,
                ValidationError::PasswordTooWeak,
                ValidationError::PasswordMismatch
            ]
        );
        assert_eq!(errors[2].field(), "confirm_password");
    }

    #[test]
    fn test_comment_limits() {
        assert_eq!(validate_comment("   ").unwrap_err(), vec![ValidationError::EmptyComment]);
        assert!(validate_comment(&"x".repeat(COMMENT_MAX_LEN)).is_ok());
        assert_eq!(
            validate_comment(&"x".repeat(COMMENT_MAX_LEN + 1)).unwrap_err(),
            vec![ValidationError::CommentTooLong]
        );
    }

    #[test]
    fn test_keyword_weight() {
        assert!(validate_user_keyword(&NewUserKeyword::new("rust")).is_ok());
        let keyword = NewUserKeyword {
            keyword: "rust".into(),
            weight: 9.0,
        };
        assert_eq!(
            validate_user_keyword(&keyword).unwrap_err(),
            vec![ValidationError::InvalidWeight]
        );
        assert_eq!(
            validate_user_keyword(&NewUserKeyword::new("k".repeat(51))).unwrap_err(),
            vec![ValidationError::KeywordTooLong]
        );
    }

    #[test]
    fn test_source_url() {
        let mut source = SourceInput {
            name: "HN".into(),
            url: "https://news.ycombinator.com".into(),
            source_type: None,
            is_active: true,
        };
        assert!(validate_source(&source).is_ok());
        source.url = "ftp://example.com".into();
        assert_eq!(validate_source(&source).unwrap_err(), vec![ValidationError::InvalidSourceUrl]);
    }

    #[test]
    fn test_profile_bio() {
        let update = ProfileUpdate {
            bio: Some("b".repeat(BIO_MAX_LEN + 1)),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            validate_profile(&update).unwrap_err()[0].message(),
            "Bio must be at most 500 characters"
        );
    }
}
