use crate::domain::model::NormalizedPostalCode;

const CEP_DIGITS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// `XXXXX-XXX` when valid, otherwise the raw input untouched.
    pub formatted: String,
    pub valid: bool,
}

/// Strips non-digits and checks for exactly eight of them.
pub fn normalize(raw: &str) -> Normalized {
    match parse(raw) {
        Some(code) => Normalized {
            formatted: code.formatted(),
            valid: true,
        },
        None => Normalized {
            formatted: raw.to_string(),
            valid: false,
        },
    }
}

pub fn parse(raw: &str) -> Option<NormalizedPostalCode> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != CEP_DIGITS {
        return None;
    }
    Some(NormalizedPostalCode::from_digits(digits))
}
