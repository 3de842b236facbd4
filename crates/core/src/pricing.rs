use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingField {
    DailyRate,
    WeeklyRate,
    MonthlyRate,
    SecurityDeposit,
    ProcessingFee,
}

impl PricingField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DailyRate => "daily rate",
            Self::WeeklyRate => "weekly rate",
            Self::MonthlyRate => "monthly rate",
            Self::SecurityDeposit => "security deposit",
            Self::ProcessingFee => "processing fee",
        }
    }
}

/// In-progress rate values for one vehicle approval. All fields stay
/// free-text until submit so the capture surface can round-trip whatever the
/// reviewer typed; validation happens once, on submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingDraft {
    pub daily_rate: String,
    pub weekly_rate: String,
    pub monthly_rate: String,
    pub security_deposit: String,
    pub processing_fee: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingValidationError {
    #[error("daily rate is required")]
    MissingDailyRate,
    #[error("{} `{value}` is not a valid amount", field.label())]
    InvalidAmount { field: PricingField, value: String },
    #[error("{} must not be negative", field.label())]
    NegativeAmount { field: PricingField },
}

/// Validated rates sent with a vehicle approval. Only the daily rate is
/// mandatory; absent optional fields are omitted from the request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePricing {
    pub daily_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_deposit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_fee: Option<Decimal>,
}

impl PricingDraft {
    pub fn validate(&self) -> Result<VehiclePricing, PricingValidationError> {
        if self.daily_rate.trim().is_empty() {
            return Err(PricingValidationError::MissingDailyRate);
        }

        Ok(VehiclePricing {
            daily_rate: parse_amount(PricingField::DailyRate, &self.daily_rate)?,
            weekly_rate: parse_optional(PricingField::WeeklyRate, &self.weekly_rate)?,
            monthly_rate: parse_optional(PricingField::MonthlyRate, &self.monthly_rate)?,
            security_deposit: parse_optional(PricingField::SecurityDeposit, &self.security_deposit)?,
            processing_fee: parse_optional(PricingField::ProcessingFee, &self.processing_fee)?,
        })
    }
}

fn parse_amount(field: PricingField, raw: &str) -> Result<Decimal, PricingValidationError> {
    let value = raw.trim();
    let amount = value
        .parse::<Decimal>()
        .map_err(|_| PricingValidationError::InvalidAmount { field, value: value.to_string() })?;
    if amount.is_sign_negative() {
        return Err(PricingValidationError::NegativeAmount { field });
    }
    Ok(amount)
}

fn parse_optional(
    field: PricingField,
    raw: &str,
) -> Result<Option<Decimal>, PricingValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_amount(field, raw).map(Some)
}
