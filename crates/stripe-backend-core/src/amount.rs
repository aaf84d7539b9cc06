//! Charge amounts.
//!
//! Requests carry an amount in whole currency units, either as a JSON number
//! or as a base-10 integer string. The provider is charged in minor units.

use serde_json::Value;
use std::str::FromStr;

use crate::error::ValidationError;

/// Minor units per whole currency unit.
pub const MINOR_UNITS_PER_UNIT: i64 = 100;

/// A positive amount in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u32);

impl Amount {
    /// Create an amount from whole units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for zero.
    pub fn new(units: u32) -> Result<Self, ValidationError> {
        if units == 0 {
            return Err(ValidationError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }
        Ok(Self(units))
    }

    /// Parse an amount from the raw `amount` field of a request body.
    ///
    /// `null`, `false`, `0` and blank strings count as missing. Negative,
    /// fractional, non-numeric and out-of-range values are invalid.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` or `InvalidAmount` as described above.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Null | Value::Bool(false) => Err(ValidationError::MissingFields),
            Value::Number(n) => {
                if let Some(units) = n.as_u64() {
                    if units == 0 {
                        return Err(ValidationError::MissingFields);
                    }
                    return u32::try_from(units)
                        .map_err(|_| out_of_range())
                        .and_then(Self::new);
                }
                if n.as_i64().is_some() {
                    return Err(ValidationError::InvalidAmount(
                        "amount must be greater than zero".into(),
                    ));
                }
                n.as_f64()
                    .ok_or_else(|| ValidationError::InvalidAmount("not a number".into()))
                    .and_then(Self::from_float)
            }
            Value::String(s) => {
                if s.trim().is_empty() {
                    return Err(ValidationError::MissingFields);
                }
                s.parse()
            }
            _ => Err(ValidationError::InvalidAmount(
                "expected a number or numeric string".into(),
            )),
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_cmp
    )]
    fn from_float(f: f64) -> Result<Self, ValidationError> {
        if f == 0.0 {
            return Err(ValidationError::MissingFields);
        }
        if !f.is_finite() || f.fract() != 0.0 {
            return Err(ValidationError::InvalidAmount(
                "amount must be a whole number".into(),
            ));
        }
        if f < 0.0 {
            return Err(ValidationError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }
        if f > f64::from(u32::MAX) {
            return Err(out_of_range());
        }
        Self::new(f as u32)
    }

    /// The amount in minor units, as sent to the provider.
    #[must_use]
    pub fn minor_units(self) -> i64 {
        i64::from(self.0) * MINOR_UNITS_PER_UNIT
    }
}

fn out_of_range() -> ValidationError {
    ValidationError::InvalidAmount("amount is too large".into())
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let units: u64 = s
            .parse()
            .map_err(|_| ValidationError::InvalidAmount(format!("'{s}' is not a positive integer")))?;
        u32::try_from(units)
            .map_err(|_| out_of_range())
            .and_then(Self::new)
    }
}
