use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::ReportError;
use crate::format::format_number;
use crate::nutrition::NutritionReference;

/// Parsed per-food quantity expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Indicator {
    /// `#30g`: carbohydrate grams given directly.
    ExplicitCarbo { grams: f64 },
    /// `75g`, `2枚`, `1`: scaled through the reference table.
    ScaledQuantity { amount: f64, unit: String },
}

impl Indicator {
    pub fn parse(raw: &str) -> Option<Self> {
        lazy_static! {
            static ref EXPLICIT_RE: Regex = Regex::new(r"^\s*#([^g]+)g$").unwrap();
            static ref SCALED_RE: Regex = Regex::new(r"^([\d.]+)(\D+)?$").unwrap();
        }

        if let Some(caps) = EXPLICIT_RE.captures(raw) {
            let grams = caps[1].trim().parse::<f64>().ok()?;
            return Some(Indicator::ExplicitCarbo { grams });
        }

        let caps = SCALED_RE.captures(raw)?;
        let amount = caps[1].parse::<f64>().ok()?;
        let unit = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        Some(Indicator::ScaledQuantity {
            amount,
            unit: unit.to_string(),
        })
    }

    /// `75g` for scaled quantities, nothing for explicit grams.
    pub fn display_quantity(&self) -> Option<String> {
        match self {
            Indicator::ExplicitCarbo { .. } => None,
            Indicator::ScaledQuantity { amount, unit } => {
                Some(format!("{}{}", format_number(*amount), unit))
            }
        }
    }

    pub fn carbohydrate_grams(&self, reference: &NutritionReference, key: &str) -> Option<f64> {
        match self {
            Indicator::ExplicitCarbo { grams } => Some(*grams),
            Indicator::ScaledQuantity { amount, unit } => {
                reference.carbohydrate_grams(key, *amount, unit)
            }
        }
    }
}

/// One food line of a meal.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFood {
    pub key: String,
    pub title: String,
    pub quantity: Option<String>,
    pub carbo: f64,
}

pub fn resolve_food(
    reference: &NutritionReference,
    key: &str,
    raw: &str,
) -> Result<ResolvedFood, ReportError> {
    let invalid = || ReportError::InvalidFood {
        key: key.to_string(),
        indicator: raw.to_string(),
    };
    let indicator = Indicator::parse(raw).ok_or_else(invalid)?;
    let carbo = indicator
        .carbohydrate_grams(reference, key)
        .ok_or_else(invalid)?;

    Ok(ResolvedFood {
        key: key.to_string(),
        title: reference.title(key).unwrap_or(key).to_string(),
        quantity: indicator.display_quantity(),
        carbo,
    })
}
