//! Database models
//!
//! A brand owns zero or more equipment rows; every equipment row references
//! exactly one brand. Deleting a brand removes its equipment (see migrations).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub country: String,
}

/// Brand insert payload (id is generated by the database)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBrand {
    pub name: String,
    pub country: String,
}

impl NewBrand {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }
}

/// Kind of tracked audio gear
///
/// Persisted as its integer discriminant, so the order here is part of the
/// on-disk format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentType {
    Headphone = 0,
    #[serde(rename = "DAC")]
    Dac = 1,
    Amplifier = 2,
    Cable = 3,
    Source = 4,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 5] = [
        EquipmentType::Headphone,
        EquipmentType::Dac,
        EquipmentType::Amplifier,
        EquipmentType::Cable,
        EquipmentType::Source,
    ];

    /// Integer value stored in the `Type` column
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EquipmentType::Headphone => "Headphone",
            EquipmentType::Dac => "DAC",
            EquipmentType::Amplifier => "Amplifier",
            EquipmentType::Cable => "Cable",
            EquipmentType::Source => "Source",
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for EquipmentType {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        EquipmentType::ALL
            .into_iter()
            .find(|t| t.as_i64() == value)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown equipment type: {}", value)))
    }
}

/// Accepts either the discriminant ("1") or the name ("dac", "DAC")
impl FromStr for EquipmentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i64>() {
            return EquipmentType::try_from(value);
        }
        EquipmentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown equipment type: {}", s)))
    }
}

/// Non-negative currency amount in minor units (cents)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Result<Self> {
        if cents < 0 {
            return Err(Error::InvalidInput("Price must not be negative".to_string()));
        }
        Ok(Self(cents))
    }

    /// Whole currency units, e.g. `Price::from_units(45000)`
    pub fn from_units(units: i64) -> Result<Self> {
        let cents = units
            .checked_mul(100)
            .ok_or_else(|| Error::InvalidInput("Price is too large".to_string()))?;
        Self::from_cents(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Plain decimal text without separators, suitable for a form field
    pub fn to_plain_string(self) -> String {
        let (whole, frac) = (self.0 / 100, self.0 % 100);
        if frac == 0 {
            whole.to_string()
        } else {
            format!("{}.{:02}", whole, frac)
        }
    }
}

/// Parses form text such as `45000`, `45000.5` or `1,299.99`
impl FromStr for Price {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.starts_with('-') {
            return Err(Error::InvalidInput("Price must not be negative".to_string()));
        }

        let (whole, frac) = match cleaned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (cleaned.as_str(), ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(Error::InvalidInput(format!("Invalid price: {}", s.trim())));
        }
        if frac.len() > 2 {
            return Err(Error::InvalidInput(
                "Price supports at most two decimal places".to_string(),
            ));
        }

        let too_large = || Error::InvalidInput("Price is too large".to_string());
        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| too_large())? * 10,
            _ => frac.parse().map_err(|_| too_large())?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or_else(too_large)?;
        Self::from_cents(cents)
    }
}

/// Thousands separators, decimals only when non-zero: `130,000`, `1,299.99`
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = (self.0 / 100).to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        match self.0 % 100 {
            0 => f.write_str(&grouped),
            frac => write!(f, "{}.{:02}", grouped, frac),
        }
    }
}

/// A tracked piece of audio gear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    pub model_name: String,
    pub kind: EquipmentType,
    pub price: Price,
    pub purchase_date: Option<NaiveDate>,
    /// Intended range 1-10; enforced at form validation, not in storage
    pub review_score: f64,
    pub notes: Option<String>,
    pub brand_id: i64,
    /// Populated only by brand-joined reads
    pub brand: Option<Brand>,
}

impl Equipment {
    /// Brand name when the brand was loaded
    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_ref().map(|b| b.name.as_str())
    }
}

/// Equipment insert payload (id is generated by the database)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEquipment {
    pub model_name: String,
    pub kind: EquipmentType,
    pub price: Price,
    pub purchase_date: Option<NaiveDate>,
    pub review_score: f64,
    pub notes: Option<String>,
    pub brand_id: i64,
}

impl NewEquipment {
    pub fn into_equipment(self, id: i64) -> Equipment {
        Equipment {
            id,
            model_name: self.model_name,
            kind: self.kind,
            price: self.price,
            purchase_date: self.purchase_date,
            review_score: self.review_score,
            notes: self.notes,
            brand_id: self.brand_id,
            brand: None,
        }
    }
}
