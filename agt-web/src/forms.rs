//! Form binding and validation
//!
//! Every field binds as text so a bad value redisplays the form with a
//! message instead of failing extraction. Field names follow the column
//! names (`ModelName`, `BrandId`, ...).

use std::collections::BTreeMap;

use agt_common::{Brand, Equipment, EquipmentType, NewBrand, NewEquipment, Price};
use chrono::NaiveDate;
use serde::Deserialize;

/// Review score bounds
pub const MIN_REVIEW_SCORE: f64 = 1.0;
pub const MAX_REVIEW_SCORE: f64 = 10.0;

/// Field name -> message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Parse the hidden `Id` field; `None` when absent or not a number
fn parse_form_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BrandForm {
    pub id: String,
    pub name: String,
    pub country: String,
}

impl BrandForm {
    pub fn form_id(&self) -> Option<i64> {
        parse_form_id(&self.id)
    }

    pub fn validate(&self) -> Result<NewBrand, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("Name", "The Name field is required.");
        }

        if errors.is_empty() {
            Ok(NewBrand::new(name, self.country.trim()))
        } else {
            Err(errors)
        }
    }
}

impl From<&Brand> for BrandForm {
    fn from(brand: &Brand) -> Self {
        Self {
            id: brand.id.to_string(),
            name: brand.name.clone(),
            country: brand.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EquipmentForm {
    pub id: String,
    pub model_name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub price: String,
    pub purchase_date: String,
    pub review_score: String,
    pub notes: String,
    pub brand_id: String,
}

impl EquipmentForm {
    pub fn form_id(&self) -> Option<i64> {
        parse_form_id(&self.id)
    }

    /// Field-level checks; brand existence is checked by the handler
    pub fn validate(&self) -> Result<NewEquipment, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let model_name = self.model_name.trim();
        if model_name.is_empty() {
            errors.add("ModelName", "The ModelName field is required.");
        }

        let kind = self.kind.parse::<EquipmentType>().map_err(|_| {
            errors.add("Type", "Choose a valid equipment type.");
        });

        let price = if self.price.trim().is_empty() {
            errors.add("Price", "The Price field is required.");
            Err(())
        } else {
            self.price.parse::<Price>().map_err(|e| {
                errors.add("Price", price_message(&e));
            })
        };

        let purchase_date = match self.purchase_date.trim() {
            "" => Ok(None),
            raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some).map_err(|_| {
                errors.add("PurchaseDate", "Use the YYYY-MM-DD date format.");
            }),
        };

        let review_score = match self.review_score.trim().parse::<f64>() {
            Ok(score) if (MIN_REVIEW_SCORE..=MAX_REVIEW_SCORE).contains(&score) => Ok(score),
            Ok(_) => {
                errors.add("ReviewScore", "Review score must be between 1 and 10.");
                Err(())
            }
            Err(_) => {
                errors.add("ReviewScore", "The ReviewScore field must be a number.");
                Err(())
            }
        };

        let brand_id = parse_form_id(&self.brand_id).ok_or_else(|| {
            errors.add("BrandId", "Choose a brand.");
        });

        match (kind, price, purchase_date, review_score, brand_id) {
            (Ok(kind), Ok(price), Ok(purchase_date), Ok(review_score), Ok(brand_id))
                if errors.is_empty() =>
            {
                let notes = self.notes.trim();
                Ok(NewEquipment {
                    model_name: model_name.to_string(),
                    kind,
                    price,
                    purchase_date,
                    review_score,
                    notes: (!notes.is_empty()).then(|| notes.to_string()),
                    brand_id,
                })
            }
            _ => Err(errors),
        }
    }
}

fn price_message(err: &agt_common::Error) -> String {
    match err {
        agt_common::Error::InvalidInput(msg) => format!("{}.", msg),
        other => other.to_string(),
    }
}

impl From<&Equipment> for EquipmentForm {
    fn from(e: &Equipment) -> Self {
        Self {
            id: e.id.to_string(),
            model_name: e.model_name.clone(),
            kind: e.kind.as_i64().to_string(),
            price: e.price.to_plain_string(),
            purchase_date: e
                .purchase_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            review_score: e.review_score.to_string(),
            notes: e.notes.clone().unwrap_or_default(),
            brand_id: e.brand_id.to_string(),
        }
    }
}
