use std::path::Path;

use anyhow::Context;
use serde_yaml::{Mapping, Value};
use tracing::info;

use crate::errors::ReportError;
use crate::format::{parse_date_key, scalar_text};

use super::dto::MealBody;
use super::repo_types::{DayRecord, Meal, REFLECTION_SLOT};
use super::services::MealLog;

pub fn load_meal_log(path: &Path) -> anyhow::Result<MealLog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read meal log {}", path.display()))?;
    let days = parse_meal_log(&text).with_context(|| format!("parse meal log {}", path.display()))?;
    info!(path = %path.display(), days = days.len(), "meal log loaded");
    Ok(MealLog::new(days))
}

/// Parses the log document into day records sorted by date.
pub fn parse_meal_log(text: &str) -> Result<Vec<DayRecord>, ReportError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc = match serde_yaml::from_str::<Value>(text)? {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(doc) => doc,
        other => return Err(ReportError::Shape(format!("meal log root {other:?}"))),
    };

    let mut days = Vec::with_capacity(doc.len());
    for (key, value) in doc {
        let date = scalar_text(&key)
            .ok_or_else(|| ReportError::Shape(format!("date key {key:?} is not a scalar")))?;
        parse_date_key(&date)?;
        days.push(parse_day(date, value)?);
    }
    days.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(days)
}

fn parse_day(date: String, value: Value) -> Result<DayRecord, ReportError> {
    let slots: Mapping = match value {
        Value::Null => Mapping::new(),
        other => serde_yaml::from_value(other)?,
    };

    let mut day = DayRecord {
        date,
        ..Default::default()
    };
    for (slot, body) in slots {
        let slot = scalar_text(&slot).ok_or_else(|| {
            ReportError::Shape(format!("meal slot {slot:?} in {} is not a scalar", day.date))
        })?;
        if slot == REFLECTION_SLOT {
            day.reflections = parse_reflections(body)?;
            continue;
        }
        let body: MealBody = match body {
            Value::Null => MealBody::default(),
            other => serde_yaml::from_value(other)?,
        };
        day.meals.push(to_meal(&day.date, slot, body)?);
    }
    Ok(day)
}

fn parse_reflections(value: Value) -> Result<Vec<String>, ReportError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                scalar_text(item)
                    .ok_or_else(|| ReportError::Shape(format!("reflection line {item:?}")))
            })
            .collect(),
        other => scalar_text(&other)
            .map(|line| vec![line])
            .ok_or_else(|| ReportError::Shape(format!("reflection block {other:?}"))),
    }
}

fn to_meal(date: &str, slot: String, body: MealBody) -> Result<Meal, ReportError> {
    let mut foods = Vec::with_capacity(body.foods.len());
    for (key, indicator) in &body.foods {
        let key = scalar_text(key)
            .ok_or_else(|| ReportError::Shape(format!("food key {key:?} in {date}_{slot}")))?;
        let raw = scalar_text(indicator).ok_or_else(|| ReportError::InvalidFood {
            key: key.clone(),
            indicator: format!("{indicator:?}"),
        })?;
        foods.push((key, raw));
    }

    Ok(Meal {
        slot,
        time: scalar_text(&body.time).unwrap_or_default(),
        foods,
        readings: body.ketto,
        remark: body.remark,
    })
}

#[cfg(test)]
mod repo_tests {
    use super::*;
    use crate::meals::glucose::Reading;

    const LOG: &str = r##"
20240102:
  breakfast:
    time: "07:30"
    foods:
      rice: 75g
      egg: 1
  kanso:
    - ate too fast
20240101:
  dinner:
    time: "19:00"
    foods:
      cake: "#30g"
      rice: 150g
    ketto:
      before: 98
      1h_after: "151?"
      2h_after: 130
    remark: walk, skipped
  breakfast:
    time: "08:00"
    foods: {}
"##;

    #[test]
    fn days_are_sorted_and_slots_keep_order() {
        let days = parse_meal_log(LOG).expect("log should parse");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "20240101");
        assert_eq!(days[1].date, "20240102");

        let slots: Vec<_> = days[0].meals.iter().map(|m| m.slot.as_str()).collect();
        assert_eq!(slots, ["dinner", "breakfast"]);
    }

    #[test]
    fn foods_keep_order_and_numbers_become_text() {
        let days = parse_meal_log(LOG).expect("log should parse");
        let dinner = &days[0].meals[0];
        assert_eq!(
            dinner.foods,
            vec![
                ("cake".to_string(), "#30g".to_string()),
                ("rice".to_string(), "150g".to_string())
            ]
        );
        assert_eq!(days[1].meals[0].foods[1], ("egg".to_string(), "1".to_string()));
    }

    #[test]
    fn readings_remarks_and_reflections() {
        let days = parse_meal_log(LOG).expect("log should parse");
        let dinner = &days[0].meals[0];
        let readings = dinner.readings.expect("dinner has readings");
        assert_eq!(readings.one_hour_after, Some(Reading::guessed(151)));
        assert_eq!(dinner.remark.as_deref(), Some("walk, skipped"));
        assert_eq!(dinner.time, "19:00");

        assert_eq!(days[1].reflections, vec!["ate too fast".to_string()]);
        assert_eq!(days[1].meals.len(), 1);
    }

    #[test]
    fn string_date_keys_are_accepted() {
        let days = parse_meal_log("\"20240103\":\n  lunch:\n    time: \"12:00\"\n")
            .expect("log should parse");
        assert_eq!(days[0].date, "20240103");
        assert!(days[0].meals[0].foods.is_empty());
    }

    #[test]
    fn bad_date_key_is_rejected() {
        let err = parse_meal_log("2024011:\n  lunch: {}\n").unwrap_err();
        assert!(matches!(err, ReportError::InvalidDateKey(_)));
    }

    #[test]
    fn empty_document_has_no_days() {
        assert!(parse_meal_log("").expect("empty log should parse").is_empty());
    }
}
