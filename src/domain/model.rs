use crate::core::run::Run;
use crate::domain::ports::Defaultable;
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::{
    parse_expiry, validate_digits, validate_non_empty_string, Validate,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub id: u64,
    pub alias: String,
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    pub fn new(alias: &str, street: &str, city: &str, details: &str) -> Self {
        Self {
            id: 0,
            alias: alias.to_string(),
            street: street.to_string(),
            city: city.to_string(),
            details: details.to_string(),
            is_default: false,
        }
    }
}

impl Defaultable for Address {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn is_default(&self) -> bool {
        self.is_default
    }

    fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }
}

impl Validate for Address {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("address.alias", &self.alias)?;
        validate_non_empty_string("address.street", &self.street)?;
        validate_non_empty_string("address.city", &self.city)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(default)]
    pub id: u64,
    pub card_type: String,
    pub last_four_digits: String,
    /// `MM/YY`
    pub expiry_date: String,
    #[serde(default)]
    pub is_default: bool,
}

impl PaymentMethod {
    pub fn new(card_type: &str, last_four_digits: &str, expiry_date: &str) -> Self {
        Self {
            id: 0,
            card_type: card_type.to_string(),
            last_four_digits: last_four_digits.to_string(),
            expiry_date: expiry_date.to_string(),
            is_default: false,
        }
    }

    /// `Visa •••• 4242`
    pub fn masked(&self) -> String {
        format!("{} •••• {}", self.card_type, self.last_four_digits)
    }

    /// A card stays valid through the last day of its expiry month.
    pub fn is_expired(&self, today: NaiveDate) -> Result<bool> {
        let (month, year) = parse_expiry("payment_method.expiry_date", &self.expiry_date)?;
        Ok((today.year(), today.month()) > (year, month))
    }
}

impl Defaultable for PaymentMethod {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn is_default(&self) -> bool {
        self.is_default
    }

    fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }
}

impl Validate for PaymentMethod {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("payment_method.card_type", &self.card_type)?;
        validate_digits("payment_method.last_four_digits", &self.last_four_digits, 4)?;
        parse_expiry("payment_method.expiry_date", &self.expiry_date)?;
        Ok(())
    }
}

/// 使用者基本資料；若有街道資訊，會被轉成第一筆地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub run: Option<Run>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("profile.name", &self.name)?;
        validate_non_empty_string("profile.email", &self.email)?;
        if !self.email.contains('@') {
            return Err(StorefrontError::InvalidFieldValue {
                field: "profile.email".to_string(),
                value: self.email.clone(),
                reason: "Email must contain '@'".to_string(),
            });
        }
        Ok(())
    }
}
