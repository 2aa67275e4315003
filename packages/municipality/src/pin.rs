//! The 4-digit PIN that gates export and print.

use serde::{Deserialize, Serialize};

/// Number of digits in an export PIN.
pub const PIN_LENGTH: usize = 4;

/// Rejected PIN value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("PIN must be exactly {PIN_LENGTH} ASCII digits")]
pub struct InvalidPin;

/// A validated export PIN. `Debug` never prints the digits.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExportPin(String);

impl ExportPin {
    /// Validates `pin`, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPin`] unless `pin` is exactly four ASCII digits.
    pub fn new(pin: &str) -> Result<Self, InvalidPin> {
        let pin = pin.trim();
        if pin.len() == PIN_LENGTH && pin.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(pin.to_string()))
        } else {
            Err(InvalidPin)
        }
    }

    /// Returns `true` if `attempt` matches this PIN.
    #[must_use]
    pub fn verify(&self, attempt: &str) -> bool {
        let attempt = attempt.trim().as_bytes();
        let expected = self.0.as_bytes();
        attempt.len() == expected.len()
            && attempt
                .iter()
                .zip(expected)
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl std::fmt::Debug for ExportPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExportPin(****)")
    }
}

impl TryFrom<String> for ExportPin {
    type Error = InvalidPin;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ExportPin> for String {
    fn from(pin: ExportPin) -> Self {
        pin.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_four_digits() {
        assert!(ExportPin::new("0420").is_ok());
        assert!(ExportPin::new(" 1234 ").is_ok());
        assert_eq!(ExportPin::new("123"), Err(InvalidPin));
        assert_eq!(ExportPin::new("12345"), Err(InvalidPin));
        assert_eq!(ExportPin::new("12a4"), Err(InvalidPin));
        assert_eq!(ExportPin::new("١٢٣٤"), Err(InvalidPin));
    }

    #[test]
    fn verifies_attempts() {
        let pin = ExportPin::new("0420").unwrap();
        assert!(pin.verify("0420"));
        assert!(pin.verify("0420\n"));
        assert!(!pin.verify("0421"));
        assert!(!pin.verify("042"));
        assert!(!pin.verify(""));
    }

    #[test]
    fn debug_hides_digits() {
        let pin = ExportPin::new("0420").unwrap();
        assert!(!format!("{pin:?}").contains("0420"));
    }
}
