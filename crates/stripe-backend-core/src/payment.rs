//! Validated workflow inputs.

use serde_json::Value;

use crate::amount::Amount;
use crate::error::ValidationError;
use crate::ids::{CustomerId, PaymentIntentId, PaymentMethodId};

/// Currency used for every payment intent.
pub const CURRENCY: &str = "usd";

/// Provider API version pinned for all requests and ephemeral keys.
pub const STRIPE_API_VERSION: &str = "2024-06-20";

/// Input for the payment setup workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSetupInput {
    /// Customer display name.
    pub name: String,
    /// Customer email, used for lookup.
    pub email: String,
    /// Amount to charge in whole currency units.
    pub amount: Amount,
}

impl PaymentSetupInput {
    /// Validate raw request fields.
    ///
    /// Every field is checked for presence before the amount is inspected, so
    /// a request missing anything is always reported as `MissingFields`.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` if any field is absent or blank, and
    /// `InvalidAmount` if the amount cannot be charged.
    pub fn from_fields(
        name: Option<&str>,
        email: Option<&str>,
        amount: Option<&Value>,
    ) -> Result<Self, ValidationError> {
        let name = required(name)?;
        let email = required(email)?;
        let amount = amount.ok_or(ValidationError::MissingFields)?;

        Ok(Self {
            name,
            email,
            amount: Amount::from_json(amount)?,
        })
    }
}

/// Input for the payment confirmation workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPaymentInput {
    /// Payment method to attach and confirm with.
    pub payment_method_id: PaymentMethodId,
    /// Payment intent to confirm.
    pub payment_intent_id: PaymentIntentId,
    /// Customer the payment method is attached to.
    pub customer_id: CustomerId,
}

impl ConfirmPaymentInput {
    /// Validate raw request fields.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` if any identifier is absent or blank.
    pub fn from_fields(
        payment_method_id: Option<&str>,
        payment_intent_id: Option<&str>,
        customer_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let missing = || ValidationError::MissingFields;

        Ok(Self {
            payment_method_id: payment_method_id.ok_or_else(missing)?.parse()?,
            payment_intent_id: payment_intent_id.ok_or_else(missing)?.parse()?,
            customer_id: customer_id.ok_or_else(missing)?.parse()?,
        })
    }
}

fn required(value: Option<&str>) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::MissingFields),
    }
}
