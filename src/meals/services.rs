use std::collections::BTreeMap;

use tracing::debug;

use crate::errors::ReportError;
use crate::nutrition::NutritionReference;

use super::glucose::{GlucoseReadings, GlucoseResponse};
use super::indicator::{resolve_food, ResolvedFood};
use super::remark::RemarkTag;
use super::repo_types::{DayRecord, Meal};

/// Day records in ascending date order.
#[derive(Debug, Clone, Default)]
pub struct MealLog {
    days: Vec<DayRecord>,
}

impl MealLog {
    pub fn new(days: Vec<DayRecord>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealSummary {
    /// `YYYYMMDD_slot`
    pub id: String,
    pub slot: String,
    pub time: String,
    pub foods: Vec<ResolvedFood>,
    pub carbo: f64,
    pub response: Option<GlucoseResponse>,
    /// Raw readings, kept only when they produced a response.
    pub readings: Option<GlucoseReadings>,
    pub tags: Vec<RemarkTag>,
}

impl MealSummary {
    /// Declared grams, or the intake implied by the glucose rise when larger.
    pub fn estimated_carbo(&self) -> f64 {
        match &self.response {
            Some(r) => self.carbo.max(r.estimated_intake()),
            None => self.carbo,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary<'a> {
    pub date: &'a str,
    pub meals: Vec<MealSummary>,
    pub reflections: &'a [String],
}

impl DaySummary<'_> {
    pub fn carbo_total(&self) -> f64 {
        self.meals.iter().map(|m| m.carbo).sum()
    }

    pub fn estimated_total(&self) -> f64 {
        self.meals.iter().map(MealSummary::estimated_carbo).sum()
    }
}

pub fn summarize_meal(
    reference: &NutritionReference,
    date: &str,
    meal: &Meal,
) -> Result<MealSummary, ReportError> {
    let id = meal.id(date);

    let foods = meal
        .foods
        .iter()
        .map(|(key, raw)| resolve_food(reference, key, raw))
        .collect::<Result<Vec<_>, _>>()?;
    let carbo = foods.iter().map(|f| f.carbo).sum();

    let response = match &meal.readings {
        Some(readings) if readings.has_after() && readings.before.is_none() => {
            return Err(ReportError::MissingBeforeReading { meal: id });
        }
        Some(readings) => readings.response(),
        None => None,
    };

    let tags = remark_tags(reference, meal, &id)?;
    debug!(meal = %id, carbo, has_response = response.is_some(), "meal summarized");

    Ok(MealSummary {
        slot: meal.slot.clone(),
        time: meal.time.clone(),
        id,
        foods,
        carbo,
        response,
        readings: response.and(meal.readings),
        tags,
    })
}

/// Auto `Staple` first when a flagged food was eaten, then declared tags.
fn remark_tags(
    reference: &NutritionReference,
    meal: &Meal,
    id: &str,
) -> Result<Vec<RemarkTag>, ReportError> {
    let mut tags = Vec::new();
    if meal
        .foods
        .iter()
        .any(|(key, _)| reference.is_category_flagged(key))
    {
        tags.push(RemarkTag::Staple);
    }

    let declared = meal.remark.as_deref().unwrap_or_default();
    for word in declared.split(',').map(str::trim).filter(|w| !w.is_empty()) {
        let tag = word
            .parse::<RemarkTag>()
            .map_err(|_| ReportError::UnknownRemarkTag {
                meal: id.to_string(),
                tag: word.to_string(),
            })?;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

pub fn summarize_day<'a>(
    reference: &NutritionReference,
    day: &'a DayRecord,
) -> Result<DaySummary<'a>, ReportError> {
    let meals = day
        .meals
        .iter()
        .map(|meal| summarize_meal(reference, &day.date, meal))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DaySummary {
        date: &day.date,
        meals,
        reflections: &day.reflections,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub date: String,
    pub slot: String,
    pub carbo: f64,
    pub response: GlucoseResponse,
    pub tags: Vec<RemarkTag>,
}

/// Meals with a glucose response, keyed `YYYYMMDD_slot`.
#[derive(Debug, Clone, Default)]
pub struct History {
    records: BTreeMap<String, HistoryRecord>,
}

impl History {
    pub fn record(&mut self, day: &DaySummary<'_>) {
        for meal in &day.meals {
            let Some(response) = meal.response else {
                continue;
            };
            self.records.insert(
                meal.id.clone(),
                HistoryRecord {
                    date: day.date.to_string(),
                    slot: meal.slot.clone(),
                    carbo: meal.carbo,
                    response,
                    tags: meal.tags.clone(),
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in key order, which is date order and then slot name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HistoryRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod services_tests {
    use super::*;
    use crate::meals::glucose::{GlucoseReadings, PeakHour, Reading};
    use crate::nutrition::repo::read_reference;

    fn reference() -> NutritionReference {
        read_reference(
            "id,title,amount,unit,carbo,flag\n\
             rice,White Rice,150,g,55.8,x\n\
             bread,Bread,100,g,46.4\n"
                .as_bytes(),
        )
        .expect("reference should parse")
    }

    fn meal(slot: &str, foods: &[(&str, &str)]) -> Meal {
        Meal {
            slot: slot.into(),
            time: "12:00".into(),
            foods: foods
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            readings: None,
            remark: None,
        }
    }

    fn readings(before: i32, one: Option<i32>, two: Option<i32>) -> GlucoseReadings {
        GlucoseReadings {
            before: Some(Reading::exact(before)),
            one_hour_after: one.map(Reading::exact),
            two_hour_after: two.map(Reading::exact),
        }
    }

    #[test]
    fn meal_total_sums_foods() {
        let m = meal("lunch", &[("rice", "75g"), ("bread", "50g"), ("cake", "#12g")]);
        let summary = summarize_meal(&reference(), "20240101", &m).expect("meal should summarize");
        assert_eq!(summary.id, "20240101_lunch");
        assert_eq!(summary.foods.len(), 3);
        assert!((summary.carbo - (27.9 + 23.2 + 12.0)).abs() < 1e-9);
        assert_eq!(summary.response, None);
    }

    #[test]
    fn first_bad_food_aborts() {
        let m = meal("lunch", &[("rice", "75g"), ("banana", "1本")]);
        let err = summarize_meal(&reference(), "20240101", &m).unwrap_err();
        assert!(matches!(err, ReportError::InvalidFood { ref key, .. } if key == "banana"));
    }

    #[test]
    fn staple_tag_is_prepended_once() {
        let mut m = meal("dinner", &[("bread", "50g"), ("rice", "100g")]);
        m.remark = Some("walk, staple".into());
        let summary = summarize_meal(&reference(), "20240101", &m).expect("meal should summarize");
        assert_eq!(summary.tags, vec![RemarkTag::Staple, RemarkTag::Walk]);
    }

    #[test]
    fn declared_tags_without_staple() {
        let mut m = meal("dinner", &[("bread", "50g")]);
        m.remark = Some("skipped,rice_like".into());
        let summary = summarize_meal(&reference(), "20240101", &m).expect("meal should summarize");
        assert_eq!(summary.tags, vec![RemarkTag::SkippedPrior, RemarkTag::RiceLike]);
    }

    #[test]
    fn unknown_tag_is_fatal() {
        let mut m = meal("dinner", &[("bread", "50g")]);
        m.remark = Some("walk, nap".into());
        let err = summarize_meal(&reference(), "20240101", &m).unwrap_err();
        assert!(matches!(err, ReportError::UnknownRemarkTag { ref tag, .. } if tag == "nap"));
    }

    #[test]
    fn after_without_before_is_fatal() {
        let mut m = meal("dinner", &[("bread", "50g")]);
        m.readings = Some(GlucoseReadings {
            before: None,
            one_hour_after: Some(Reading::exact(140)),
            two_hour_after: None,
        });
        let err = summarize_meal(&reference(), "20240101", &m).unwrap_err();
        assert!(matches!(err, ReportError::MissingBeforeReading { .. }));
    }

    #[test]
    fn day_totals_include_estimates() {
        let mut breakfast = meal("breakfast", &[("cake", "#20g")]);
        breakfast.readings = Some(readings(100, Some(170), None));
        let lunch = meal("lunch", &[("cake", "#30g")]);
        let day = DayRecord {
            date: "20240101".into(),
            meals: vec![breakfast, lunch],
            reflections: vec![],
        };
        let summary = summarize_day(&reference(), &day).expect("day should summarize");
        assert!((summary.carbo_total() - 50.0).abs() < 1e-9);
        assert!((summary.estimated_total() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn history_only_keeps_meals_with_response() {
        let mut dinner = meal("dinner", &[("cake", "#20g")]);
        dinner.readings = Some(readings(100, Some(150), Some(150)));
        let mut breakfast = meal("breakfast", &[("cake", "#20g")]);
        breakfast.readings = Some(readings(95, None, None));
        let day = DayRecord {
            date: "20240101".into(),
            meals: vec![dinner, breakfast],
            reflections: vec![],
        };
        let summary = summarize_day(&reference(), &day).expect("day should summarize");

        let mut history = History::default();
        history.record(&summary);
        assert_eq!(history.len(), 1);
        let (key, record) = history.iter().next().expect("one record");
        assert_eq!(key, "20240101_dinner");
        assert_eq!(record.response.peak_hour, PeakHour::One);
        assert_eq!(record.response.delta, 50);
    }

    #[test]
    fn history_keys_sort_by_date_then_slot() {
        let mut history = History::default();
        for (date, slots) in [("20240102", vec!["breakfast"]), ("20240101", vec!["dinner", "breakfast"])] {
            let meals = slots
                .into_iter()
                .map(|slot| {
                    let mut m = meal(slot, &[("cake", "#10g")]);
                    m.readings = Some(readings(90, Some(120), None));
                    m
                })
                .collect();
            let day = DayRecord {
                date: date.into(),
                meals,
                reflections: vec![],
            };
            let summary = summarize_day(&reference(), &day).expect("day should summarize");
            history.record(&summary);
        }
        let keys: Vec<_> = history.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(
            keys,
            ["20240101_breakfast", "20240101_dinner", "20240102_breakfast"]
        );
    }
}
