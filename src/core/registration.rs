//! Driver registration: raw form input, validated record, and the validator
//! that turns one into the other.

use crate::core::error::{RequestError, ValidationError};
use crate::core::validation::filters::{
    normalize_carrier, normalize_name, normalize_order, normalize_plate, trim,
};
use crate::core::validation::validators::{optional_non_negative_integer, required};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp layout stored on every record
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether the vehicle is entering or leaving the facility
///
/// Deserializes through [`FromStr`], so every accepted spelling is accepted
/// case-insensitively on every input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Entry,
    Exit,
}

impl Direction {
    /// Wire name used in URLs and form values
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Entry => "entry",
            Direction::Exit => "exit",
        }
    }

    /// Label shown on kiosk pages
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Entry => "Entry",
            Direction::Exit => "Exit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" | "entrada" => Ok(Direction::Entry),
            "exit" | "saída" | "saida" => Ok(Direction::Exit),
            _ => Err(RequestError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Form fields exactly as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInput {
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub plate: String,
    #[serde(default)]
    pub order: String,
    #[serde(default)]
    pub carrier: String,
    pub direction: Direction,
    #[serde(default)]
    pub odometer: Option<String>,
}

impl RegistrationInput {
    /// Input with every free-text field empty
    pub fn empty(direction: Direction) -> Self {
        Self {
            driver_name: String::new(),
            plate: String::new(),
            order: String::new(),
            carrier: String::new(),
            direction,
            odometer: None,
        }
    }
}

/// A validated, normalized registration ready for the record store
///
/// Only [`RegistrationValidator`] can build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRecord {
    driver_name: String,
    plate: String,
    order: String,
    carrier: String,
    direction: Direction,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    odometer: Option<u64>,
}

impl RegistrationRecord {
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn order(&self) -> &str {
        &self.order
    }

    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Local civil time of validation, `YYYY-MM-DD HH:MM:SS`
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn odometer(&self) -> Option<u64> {
        self.odometer
    }
}

/// Result of validating one submission
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Accepted(RegistrationRecord),
    Rejected {
        error: ValidationError,
        /// The original, unnormalized input
        echo: RegistrationInput,
    },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    /// User-facing message for a rejection
    pub fn message(&self) -> Option<String> {
        match self {
            ValidationOutcome::Accepted(_) => None,
            ValidationOutcome::Rejected { error, .. } => Some(error.to_string()),
        }
    }
}

/// Normalizes and validates registration input
#[derive(Debug, Clone, Copy)]
pub struct RegistrationValidator {
    timezone: Tz,
}

impl RegistrationValidator {
    /// Create a validator stamping records in the given civil timezone
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Validate against the current wall clock
    pub fn validate(&self, input: RegistrationInput) -> ValidationOutcome {
        self.validate_at(input, Utc::now())
    }

    /// Validate with an explicit clock reading
    pub fn validate_at(&self, input: RegistrationInput, now: DateTime<Utc>) -> ValidationOutcome {
        match self.normalize(&input, now) {
            Ok(record) => ValidationOutcome::Accepted(record),
            Err(error) => ValidationOutcome::Rejected { error, echo: input },
        }
    }

    fn normalize(
        &self,
        input: &RegistrationInput,
        now: DateTime<Utc>,
    ) -> Result<RegistrationRecord, ValidationError> {
        let driver_name = normalize_name(&input.driver_name);
        let plate = normalize_plate(&input.plate);
        let order = normalize_order(&input.order);
        let carrier = normalize_carrier(&input.carrier);
        let odometer = trim(input.odometer.as_deref().unwrap_or_default());

        // Precedence: first failing rule wins.
        required(&driver_name, ValidationError::NameRequired)?;
        required(&plate, ValidationError::PlateRequired)?;
        required(&order, ValidationError::OrderRequired)?;
        required(&carrier, ValidationError::CarrierRequired)?;
        let odometer = optional_non_negative_integer(&odometer)?;

        Ok(RegistrationRecord {
            driver_name,
            plate,
            order,
            carrier,
            direction: input.direction,
            timestamp: now
                .with_timezone(&self.timezone)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            odometer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn validator() -> RegistrationValidator {
        RegistrationValidator::new(chrono_tz::America::Sao_Paulo)
    }

    fn valid_input() -> RegistrationInput {
        RegistrationInput {
            driver_name: "ana".to_string(),
            plate: "abc1234".to_string(),
            order: "oc1".to_string(),
            carrier: "acme".to_string(),
            direction: Direction::Exit,
            odometer: None,
        }
    }

    #[test]
    fn test_direction_from_str_aliases() {
        assert_eq!("entry".parse::<Direction>(), Ok(Direction::Entry));
        assert_eq!("Entrada".parse::<Direction>(), Ok(Direction::Entry));
        assert_eq!("EXIT".parse::<Direction>(), Ok(Direction::Exit));
        assert_eq!("Saída".parse::<Direction>(), Ok(Direction::Exit));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_serde_names() {
        assert_eq!(serde_json::to_string(&Direction::Entry).unwrap(), "\"entry\"");
        let d: Direction = serde_json::from_str("\"Saída\"").unwrap();
        assert_eq!(d, Direction::Exit);
    }

    #[test]
    fn test_direction_deserialize_ignores_case() {
        let d: Direction = serde_json::from_str("\"ENTRY\"").unwrap();
        assert_eq!(d, Direction::Entry);
        let d: Direction = serde_json::from_str("\"SAÍDA\"").unwrap();
        assert_eq!(d, Direction::Exit);

        let err = serde_json::from_str::<Direction>("\"sideways\"").unwrap_err();
        assert!(err.to_string().contains("Unknown direction 'sideways'"));
    }

    #[test]
    fn test_timestamp_uses_civil_timezone() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 4, 5).unwrap();
        let outcome = validator().validate_at(valid_input(), now);
        let ValidationOutcome::Accepted(record) = outcome else {
            panic!("expected acceptance");
        };
        // Sao Paulo is UTC-3 with no DST in 2024
        assert_eq!(record.timestamp(), "2024-03-10 12:04:05");
        assert_eq!(record.direction(), Direction::Exit);
    }

    #[test]
    fn test_whitespace_only_odometer_is_absent() {
        let mut input = valid_input();
        input.odometer = Some("   ".to_string());
        let outcome = validator().validate(input);
        let ValidationOutcome::Accepted(record) = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(record.odometer(), None);
    }

    #[test]
    fn test_plate_of_punctuation_is_rejected() {
        let mut input = valid_input();
        input.plate = " -- ".to_string();
        let outcome = validator().validate(input.clone());
        assert_eq!(
            outcome,
            ValidationOutcome::Rejected {
                error: ValidationError::PlateRequired,
                echo: input,
            }
        );
    }

    #[test]
    fn test_record_serializes_without_absent_odometer() {
        let outcome = validator().validate(valid_input());
        let ValidationOutcome::Accepted(record) = outcome else {
            panic!("expected acceptance");
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("odometer").is_none());
        assert_eq!(json["plate"], "ABC1234");
        assert_eq!(json["direction"], "exit");
    }
}
