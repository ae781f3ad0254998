use crate::domain::email::{MAX_WORDS, MIN_WORDS};
use crate::domain::selection::Selection;
use std::fmt;

// Local checks run before any network call. Each rule has its own message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    RecipientMissing,
    RecipientCustomMissing,
    OccasionMissing,
    OccasionCustomMissing,
    ToneMissing,
    ToneCustomMissing,
    WordCountNotANumber,
    WordCountOutOfRange,
    OriginalEmailMissing,
    EmailInvalid,
    OtpMissing,
    NameMissing,
    WeakPassword,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::RecipientMissing => "Please select a recipient.",
            ValidationError::RecipientCustomMissing => "Please enter a custom recipient.",
            ValidationError::OccasionMissing => "Please select an occasion.",
            ValidationError::OccasionCustomMissing => "Please enter a custom occasion.",
            ValidationError::ToneMissing => "Please select a tone.",
            ValidationError::ToneCustomMissing => "Please enter a custom tone.",
            ValidationError::WordCountNotANumber => "Number of words must be a whole number.",
            ValidationError::WordCountOutOfRange => "Number of words must be between 50 and 400.",
            ValidationError::OriginalEmailMissing => "Please enter the original email.",
            ValidationError::EmailInvalid => "Please enter a valid email address.",
            ValidationError::OtpMissing => "Please enter the OTP.",
            ValidationError::NameMissing => "Please enter your name.",
            ValidationError::WeakPassword => "Please meet all password requirements.",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Parses the optional word count. Blank input means "not supplied".
pub fn parse_word_count(raw: &str) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let count: u32 = raw
        .parse()
        .map_err(|_| ValidationError::WordCountNotANumber)?;
    if !(MIN_WORDS..=MAX_WORDS).contains(&count) {
        return Err(ValidationError::WordCountOutOfRange);
    }
    Ok(Some(count))
}

// One enumerated field: picked at all, then custom text present when "Other".
fn require_selection<T: AsRef<str>>(
    selection: &Selection<T>,
    missing: ValidationError,
    custom_missing: ValidationError,
) -> Result<String, ValidationError> {
    match selection {
        Selection::Unset => Err(missing),
        Selection::Option(_) => selection
            .resolved()
            .map(str::to_string)
            .ok_or(missing),
        Selection::Other { .. } => selection
            .resolved()
            .map(str::to_string)
            .ok_or(custom_missing),
    }
}

pub fn require_tone<T: AsRef<str>>(tone: &Selection<T>) -> Result<String, ValidationError> {
    require_selection(
        tone,
        ValidationError::ToneMissing,
        ValidationError::ToneCustomMissing,
    )
}

// Fields that passed the generation checks, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidGeneration {
    pub recipient: String,
    pub occasion: String,
    pub tone: String,
    pub number_of_words: Option<u32>,
}

/// Generation order: recipient, its custom text, occasion, its custom text,
/// tone, its custom text, then word count.
pub fn validate_generation<T: AsRef<str>>(
    recipient: &Selection<String>,
    occasion: &Selection<String>,
    tone: &Selection<T>,
    word_count: &str,
) -> Result<ValidGeneration, ValidationError> {
    let recipient = require_selection(
        recipient,
        ValidationError::RecipientMissing,
        ValidationError::RecipientCustomMissing,
    )?;
    let occasion = require_selection(
        occasion,
        ValidationError::OccasionMissing,
        ValidationError::OccasionCustomMissing,
    )?;
    let tone = require_tone(tone)?;
    let number_of_words = parse_word_count(word_count)?;
    Ok(ValidGeneration {
        recipient,
        occasion,
        tone,
        number_of_words,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegeneration {
    pub original_email: String,
    pub tone: String,
    pub number_of_words: Option<u32>,
}

/// Rewrite order: original email, tone, its custom text, then word count.
/// Tone checks precede the word count here as they do for generation.
pub fn validate_regeneration<T: AsRef<str>>(
    original_email: &str,
    tone: &Selection<T>,
    word_count: &str,
) -> Result<ValidRegeneration, ValidationError> {
    if original_email.trim().is_empty() {
        return Err(ValidationError::OriginalEmailMissing);
    }
    let tone = require_tone(tone)?;
    let number_of_words = parse_word_count(word_count)?;
    Ok(ValidRegeneration {
        original_email: original_email.to_string(),
        tone,
        number_of_words,
    })
}

// Individual password rules, reported separately so a form can show each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordChecks {
    pub length: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub number: bool,
    pub symbol: bool,
}

impl PasswordChecks {
    pub fn evaluate(password: &str) -> Self {
        Self {
            length: password.chars().count() >= 8,
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            symbol: password.chars().any(|c| !c.is_ascii_alphanumeric()),
        }
    }

    pub fn all_pass(&self) -> bool {
        self.length && self.lowercase && self.uppercase && self.number && self.symbol
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if PasswordChecks::evaluate(password).all_pass() {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::EmailInvalid),
    }
}

pub fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.trim().is_empty() {
        Err(ValidationError::OtpMissing)
    } else {
        Ok(())
    }
}
