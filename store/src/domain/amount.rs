//! Parsing of monetary amounts typed by bot users.
//!
//! Users answer questions such as "What was your salary income?" with free
//! text like `Rs 1,200.50` or `PKR 45,000`. [`validate_numeric`] strips the
//! recognised currency markers and thousands separators, then accepts only a
//! plain non-negative decimal number. Every rejection carries a message that
//! can be shown to the user verbatim.

use thiserror::Error;

/// Field name used in messages when the caller does not supply one.
pub const DEFAULT_AMOUNT_FIELD: &str = "amount";

/// Currency markers removed before validation. Matching is case-sensitive.
const CURRENCY_MARKERS: [&str; 2] = ["Rs", "PKR"];

/// Reasons an amount reply was rejected.
///
/// The `Display` output is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountValidationError {
    /// Nothing, or only whitespace, was supplied.
    #[error("Please provide a valid {field}.")]
    Missing {
        /// Name of the field shown in the message.
        field: String,
    },
    /// The text contains signs, letters, extra decimal points or other symbols.
    #[error("Invalid {field}. Please enter a numeric value without symbols or text.")]
    Invalid {
        /// Name of the field shown in the message.
        field: String,
    },
    /// The text passed the format check but could not be parsed as a number.
    #[error("Unable to parse the {field}. Please enter a valid number.")]
    Unparseable {
        /// Name of the field shown in the message.
        field: String,
    },
    /// The parsed value is below zero.
    #[error("The {field} cannot be negative.")]
    Negative {
        /// Name of the field shown in the message.
        field: String,
    },
}

impl AmountValidationError {
    /// Build a [`Self::Missing`] error for `field`.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    /// Build a [`Self::Invalid`] error for `field`.
    pub fn invalid(field: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
        }
    }

    /// Build a [`Self::Unparseable`] error for `field`.
    pub fn unparseable(field: impl Into<String>) -> Self {
        Self::Unparseable {
            field: field.into(),
        }
    }

    /// Build a [`Self::Negative`] error for `field`.
    pub fn negative(field: impl Into<String>) -> Self {
        Self::Negative {
            field: field.into(),
        }
    }
}

/// Validate an amount reply using the default field name `"amount"`.
///
/// # Examples
///
/// ```rust
/// use taxbot_store::validate_amount;
///
/// assert_eq!(validate_amount(Some("Rs 1,200.50")), Ok(1200.5));
/// assert_eq!(
///     validate_amount(Some("")).unwrap_err().to_string(),
///     "Please provide a valid amount."
/// );
/// ```
pub fn validate_amount(raw: Option<&str>) -> Result<f64, AmountValidationError> {
    validate_numeric(raw, DEFAULT_AMOUNT_FIELD)
}

/// Validate and parse a numeric reply for the named field.
///
/// Checks run in a fixed order: presence, format, parse, sign. A leading `-`
/// is not a recognised symbol, so `"-5"` fails the format check and never
/// reaches the negative-value branch.
///
/// # Errors
///
/// Returns an [`AmountValidationError`] describing the first failed check.
pub fn validate_numeric(
    raw: Option<&str>,
    field_name: &str,
) -> Result<f64, AmountValidationError> {
    let Some(raw) = raw.filter(|text| !text.trim().is_empty()) else {
        return Err(AmountValidationError::missing(field_name));
    };

    let cleaned = normalise(raw);
    if !is_plain_decimal(&cleaned) {
        return Err(AmountValidationError::invalid(field_name));
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|_| AmountValidationError::unparseable(field_name))?;

    if value < 0.0 {
        return Err(AmountValidationError::negative(field_name));
    }

    Ok(value)
}

fn normalise(raw: &str) -> String {
    let without_markers = CURRENCY_MARKERS
        .iter()
        .fold(raw.to_owned(), |text, marker| text.replace(marker, ""));
    without_markers.replace(',', "").trim().to_owned()
}

/// ASCII digits with at most one decimal point.
fn is_plain_decimal(text: &str) -> bool {
    let digits = text.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
