use std::collections::HashMap;

use crate::errors::ReportError;
use crate::format::format_number;

use super::repo_types::{CarboRate, NutritionEntry, ReferenceRow};

/// Read-only food lookup shared by every computation of a render pass.
#[derive(Debug, Default, Clone)]
pub struct NutritionReference {
    entries: HashMap<String, NutritionEntry>,
}

impl NutritionReference {
    /// Builds the table. Rows sharing an id append their rate to the first
    /// row's entry.
    pub fn from_rows(rows: impl IntoIterator<Item = ReferenceRow>) -> Result<Self, ReportError> {
        let mut entries: HashMap<String, NutritionEntry> = HashMap::new();
        for row in rows {
            if !(row.rate.amount > 0.0) {
                return Err(ReportError::NonPositiveAmount {
                    id: row.id,
                    amount: row.rate.amount,
                });
            }
            match entries.get_mut(&row.id) {
                Some(entry) => {
                    entry.rates.push(row.rate);
                    entry.flagged |= row.flagged;
                }
                None => {
                    entries.insert(
                        row.id,
                        NutritionEntry {
                            title: row.title,
                            rates: vec![row.rate],
                            flagged: row.flagged,
                        },
                    );
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn title(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.title.as_str())
    }

    /// Scales `amount` through the first rate whose unit matches. An empty
    /// unit takes the first declared rate.
    pub fn carbohydrate_grams(&self, key: &str, amount: f64, unit: &str) -> Option<f64> {
        let entry = self.entries.get(key)?;
        let rate = if unit.is_empty() {
            entry.rates.first()?
        } else {
            entry.rates.iter().find(|r| r.unit == unit)?
        };
        Some(amount / rate.amount * rate.carbo)
    }

    /// `"55.8g / 150g, 20g / 1枚"`
    pub fn rate_display(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        let parts: Vec<String> = entry.rates.iter().map(rate_text).collect();
        Some(parts.join(", "))
    }

    pub fn is_category_flagged(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| e.flagged)
    }
}

fn rate_text(rate: &CarboRate) -> String {
    format!(
        "{}g / {}{}",
        format_number(rate.carbo),
        format_number(rate.amount),
        rate.unit
    )
}
