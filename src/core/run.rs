//! RUN (Rol Único Nacional) 解析、格式化與檢查碼計算。
//!
//! 所有函式都是純函式：輸入法產生的任意字串都不會造成錯誤，
//! 無法放置的字元會被直接丟棄。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_BODY_LEN: usize = 7;
pub const MAX_BODY_LEN: usize = 8;

const GROUP_SEPARATOR: char = '.';

/// 單次按鍵後的解析結果，不會被保存。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunComponents {
    pub body: String,
    pub check_digit: Option<char>,
    pub has_hyphen: bool,
}

impl RunComponents {
    pub fn to_raw_input(&self) -> String {
        compose_raw_input(&self.body, self.check_digit, self.has_hyphen)
    }

    pub fn to_display(&self) -> String {
        format_for_display(&self.body, self.check_digit, self.has_hyphen)
    }
}

/// Scans keystroke input into body digits and an optional check digit.
///
/// Up to eight digits before a hyphen go into the body. A ninth digit, or a
/// `K` once the body holds at least seven digits, becomes the check digit. A
/// hyphen anywhere ends the body; the next digit or `K` after it is the check
/// digit. The first captured check digit wins and everything after it is
/// ignored.
pub fn parse_input(raw: &str) -> RunComponents {
    let upper = raw.to_uppercase();
    let mut body = String::with_capacity(MAX_BODY_LEN);
    let mut check_digit = None;
    let mut past_body = false;

    for c in upper.chars() {
        if check_digit.is_some() {
            break;
        }
        match c {
            '-' => past_body = true,
            '0'..='9' if past_body || body.len() >= MAX_BODY_LEN => check_digit = Some(c),
            '0'..='9' => body.push(c),
            'K' if past_body || body.len() >= MIN_BODY_LEN => check_digit = Some(c),
            _ => {}
        }
    }

    let has_hyphen = (upper.contains('-') || check_digit.is_some()) && !body.is_empty();

    RunComponents {
        body,
        check_digit,
        has_hyphen,
    }
}

fn push_suffix(out: &mut String, check_digit: Option<char>, has_hyphen: bool) {
    if has_hyphen || check_digit.is_some() {
        out.push('-');
    }
    if let Some(dv) = check_digit {
        out.extend(dv.to_uppercase());
    }
}

pub fn compose_raw_input(body: &str, check_digit: Option<char>, has_hyphen: bool) -> String {
    if body.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(body.len() + 2);
    out.push_str(body);
    push_suffix(&mut out, check_digit, has_hyphen);
    out
}

/// `12345678` → `12.345.678`
pub fn format_number_part(digits: &str) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(count + count / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (count - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

pub fn format_for_display(body: &str, check_digit: Option<char>, has_hyphen: bool) -> String {
    if body.is_empty() {
        return String::new();
    }
    let mut out = format_number_part(body);
    push_suffix(&mut out, check_digit, has_hyphen);
    out
}

/// Reformats an input field after each keystroke.
pub fn format_keystrokes(raw: &str) -> String {
    parse_input(raw).to_display()
}

/// Modulo 11 check digit. Weights 2..=7 cycle from the least significant
/// digit; a result of 11 maps to `0` and 10 maps to `K`.
///
/// Returns `None` for an empty body or one with any non-digit character.
pub fn calculate_check_digit(number_part: &str) -> Option<char> {
    if number_part.is_empty() {
        return None;
    }

    let mut sum = 0u32;
    let mut weight = 2u32;
    for c in number_part.chars().rev() {
        sum = (sum + c.to_digit(10)? * weight) % 11;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }

    match 11 - sum {
        11 => Some('0'),
        10 => Some('K'),
        n => char::from_digit(n, 10),
    }
}

/// Builds `{body}-{DV}` from an already-split RUN, or `None` when the
/// shape is wrong. Does not verify that the check digit matches.
pub fn build_full_run(body: &str, check_digit: &str) -> Option<String> {
    let digits: String = body.chars().filter(char::is_ascii_digit).collect();
    if !is_check_digit_valid(check_digit) || !is_body_length_valid(&digits) {
        return None;
    }
    Some(format!("{}-{}", digits, check_digit.to_uppercase()))
}

pub fn is_body_length_valid(body: &str) -> bool {
    (MIN_BODY_LEN..=MAX_BODY_LEN).contains(&body.chars().count())
}

pub fn is_check_digit_valid(value: &str) -> bool {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_digit() || c == 'K' || c == 'k',
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("body must have {min} to {max} digits, got {len}")]
    InvalidBody { len: usize, min: usize, max: usize },

    #[error("missing check digit")]
    MissingCheckDigit,

    #[error("check digit should be {expected}, got {found}")]
    CheckDigitMismatch { expected: char, found: char },
}

/// A RUN whose check digit matches its body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Run {
    body: String,
    check_digit: char,
}

impl Run {
    pub fn new(body: &str, check_digit: char) -> Result<Self, RunError> {
        let body: String = body.chars().filter(char::is_ascii_digit).collect();
        if !is_body_length_valid(&body) {
            return Err(RunError::InvalidBody {
                len: body.len(),
                min: MIN_BODY_LEN,
                max: MAX_BODY_LEN,
            });
        }

        let found = check_digit.to_ascii_uppercase();
        let expected = calculate_check_digit(&body).ok_or(RunError::InvalidBody {
            len: body.len(),
            min: MIN_BODY_LEN,
            max: MAX_BODY_LEN,
        })?;
        if expected != found {
            return Err(RunError::CheckDigitMismatch { expected, found });
        }

        Ok(Self {
            body,
            check_digit: found,
        })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn check_digit(&self) -> char {
        self.check_digit
    }

    /// `12345678-5`
    pub fn canonical(&self) -> String {
        format!("{}-{}", self.body, self.check_digit)
    }
}

impl FromStr for Run {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_input(s);
        let check_digit = parts.check_digit.ok_or(RunError::MissingCheckDigit)?;
        Run::new(&parts.body, check_digit)
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_number_part(&self.body), self.check_digit)
    }
}

impl TryFrom<String> for Run {
    type Error = RunError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Run> for String {
    fn from(run: Run) -> Self {
        run.canonical()
    }
}
