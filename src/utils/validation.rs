use crate::utils::error::{Result, StorefrontError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> StorefrontError {
    StorefrontError::InvalidFieldValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// 必須剛好是 `len` 個 ASCII 數字
pub fn validate_digits(field_name: &str, value: &str, len: usize) -> Result<()> {
    if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(
            field_name,
            value,
            format!("Expected exactly {} digits", len),
        ));
    }
    Ok(())
}

/// 解析 `MM/YY` 格式的到期日，回傳 (月, 四位數年份)
pub fn parse_expiry(field_name: &str, value: &str) -> Result<(u32, i32)> {
    let (month, year) = value
        .split_once('/')
        .ok_or_else(|| invalid(field_name, value, "Expected MM/YY"))?;

    validate_digits(field_name, month, 2)?;
    validate_digits(field_name, year, 2)?;

    let month: u32 = month
        .parse()
        .map_err(|_| invalid(field_name, value, "Month is not a number"))?;
    let year: i32 = year
        .parse()
        .map_err(|_| invalid(field_name, value, "Year is not a number"))?;

    validate_range(field_name, month, 1, 12)?;
    Ok((month, 2000 + year))
}
