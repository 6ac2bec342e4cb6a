/// One parsed row of the reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub id: String,
    pub title: String,
    pub rate: CarboRate,
    pub flagged: bool,
}

/// Carbohydrate grams per `amount` of `unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct CarboRate {
    pub amount: f64,
    pub unit: String,
    pub carbo: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionEntry {
    pub title: String,
    pub rates: Vec<CarboRate>,
    pub flagged: bool,
}
