use std::collections::VecDeque;

use tracing::debug;

use crate::errors::ReportError;
use crate::format::{bold_if, format_date, format_month, format_number};
use crate::images::{img_tag, ImageStore};
use crate::meals::glucose::{PeakHour, Reading};
use crate::meals::policy::{
    is_high_after, is_high_before, is_high_day_carbo, is_high_meal_carbo,
};
use crate::meals::remark::phrases;
use crate::meals::repo_types::DayRecord;
use crate::meals::services::{summarize_day, HistoryRecord, MealSummary};
use crate::meals::{History, MealLog};
use crate::nutrition::NutritionReference;

const SUMMARY_ANCHOR: &str = "summary";
const SUMMARY_TITLE: &str = "血糖まとめ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Index,
    Day(usize),
    Summary,
    Finished,
}

/// Markdown lines of the meal report, produced day by day.
///
/// Single pass: the summary table is built from what the day sections
/// already rendered. After an error the iterator yields nothing more.
pub struct MealReport<'a> {
    log: &'a MealLog,
    reference: &'a NutritionReference,
    images: &'a dyn ImageStore,
    stage: Stage,
    pending: VecDeque<String>,
    history: History,
}

impl<'a> MealReport<'a> {
    pub fn new(
        log: &'a MealLog,
        reference: &'a NutritionReference,
        images: &'a dyn ImageStore,
    ) -> Self {
        Self {
            log,
            reference,
            images,
            stage: Stage::Index,
            pending: VecDeque::new(),
            history: History::default(),
        }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.pending.push_back(line.into());
    }

    /// Renders the next section into `pending`. `false` once finished.
    fn advance(&mut self) -> Result<bool, ReportError> {
        let log = self.log;
        match self.stage {
            Stage::Index => {
                self.index()?;
                self.stage = Stage::Day(0);
            }
            Stage::Day(i) => match log.days().get(i) {
                Some(day) => {
                    self.day(day)?;
                    self.stage = Stage::Day(i + 1);
                }
                None => self.stage = Stage::Summary,
            },
            Stage::Summary => {
                self.summary()?;
                self.stage = Stage::Finished;
            }
            Stage::Finished => return Ok(false),
        }
        Ok(true)
    }

    fn index(&mut self) -> Result<(), ReportError> {
        self.push("# めし");
        self.push("");
        self.push("## もくじ");

        let log = self.log;
        let mut current_month = None;
        for day in log.days() {
            let month = format_month(&day.date)?;
            if current_month.as_ref() != Some(&month) {
                self.push("");
                self.push(format!("### {month}"));
                self.push("");
                current_month = Some(month);
            }
            self.push(format!(
                r##"- <a href="#{}"> {}</a>"##,
                day.date,
                format_date(&day.date)?
            ));
        }

        self.push("");
        self.push(format!(
            r##"- <a href="#{SUMMARY_ANCHOR}">{SUMMARY_TITLE}</a>"##
        ));
        self.push("");
        Ok(())
    }

    fn day(&mut self, day: &DayRecord) -> Result<(), ReportError> {
        let summary = summarize_day(self.reference, day)?;
        debug!(date = %day.date, meals = summary.meals.len(), "rendering day");

        self.push("");
        self.push(format!(
            r#"## <a id="{}"></a>{}"#,
            day.date,
            format_date(&day.date)?
        ));
        self.push("");

        for meal in &summary.meals {
            self.meal(meal);
        }

        let total = summary.carbo_total();
        let estimated = summary.estimated_total();
        self.push("");
        self.push("### まとめ");
        self.push("");
        self.push(format!(
            "- 総計糖分: {} ( 〜{} )",
            bold_if(grams(total), is_high_day_carbo(total)),
            bold_if(grams(estimated), is_high_day_carbo(estimated))
        ));
        for line in summary.reflections {
            self.push(format!("- {line}"));
        }
        self.push("---");

        self.history.record(&summary);
        Ok(())
    }

    fn meal(&mut self, meal: &MealSummary) {
        self.push("");
        self.push(format!(r#"### <a id="{}"></a>{}"#, meal.id, meal.slot));
        self.push("");

        if self.images.exists(&meal.id) {
            self.push(img_tag(self.images, &meal.id));
            self.push("");
        }

        self.push(format!("- 食った時間：{}", meal.time));
        self.push("- 申告糖分");
        for food in &meal.foods {
            let quantity = food
                .quantity
                .as_ref()
                .map(|q| format!(" ({q})"))
                .unwrap_or_default();
            self.push(format!("  - {}{}: {}", food.title, quantity, grams(food.carbo)));
        }
        self.push(format!(
            "- 合計糖分: {}",
            bold_if(grams(meal.carbo), is_high_meal_carbo(meal.carbo))
        ));

        if !meal.tags.is_empty() {
            self.push(format!("- 備考: {}", phrases(&meal.tags)));
        }

        let (Some(response), Some(readings)) = (meal.response, meal.readings) else {
            return;
        };
        self.push("- 血糖");
        self.push(format!(
            "  - 食前: {}",
            bold_if(
                reading_text(response.before, " (推定)"),
                is_high_before(response.before.value)
            )
        ));
        for (label, hour, reading) in [
            ("食後１時間", PeakHour::One, readings.one_hour_after),
            ("食後２時間", PeakHour::Two, readings.two_hour_after),
        ] {
            if let Some(r) = reading {
                self.push(format!(
                    "  - {label}: {}",
                    bold_if(reading_text(r, " (推定)"), is_high_after(r.value, hour))
                ));
            }
        }

        let intake = response.estimated_intake();
        self.push("  - 考察");
        self.push(format!("    - 差分: {}", response.delta));
        self.push(format!(
            "    - 差分から想定される摂取糖分量: {}",
            bold_if(grams(intake), is_high_meal_carbo(intake))
        ));
    }

    fn summary(&mut self) -> Result<(), ReportError> {
        self.push("");
        self.push(format!(
            r#"## <a id="{SUMMARY_ANCHOR}"></a>{SUMMARY_TITLE}"#
        ));
        self.push("");
        self.push("| 日付 | 食事 | 糖分 | 食前 | 食後 | 差分 | 差分/糖分 | ピーク | 備考 |");
        self.push("|---|---|---|---|---|---|---|---|---|");

        if self.history.is_empty() {
            debug!("no meals with glucose readings");
        }
        let rows = self
            .history
            .iter()
            .map(|(key, record)| summary_row(key, record))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(rows = self.history.len(), "rendering summary table");
        self.pending.extend(rows);
        Ok(())
    }
}

impl Iterator for MealReport<'_> {
    type Item = Result<String, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            match self.advance() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(e) => {
                    self.pending.clear();
                    self.stage = Stage::Finished;
                    return Some(Err(e));
                }
            }
        }
    }
}

fn grams(value: f64) -> String {
    format!("{}g", format_number(value))
}

fn reading_text(reading: Reading, estimated_marker: &str) -> String {
    if reading.estimated {
        format!("{}{}", reading.value, estimated_marker)
    } else {
        reading.value.to_string()
    }
}

/// Display label of a meal slot; unknown slot names pass through.
pub fn slot_label(slot: &str) -> &str {
    match slot {
        "breakfast" => "朝",
        "lunch" => "昼",
        "dinner" => "夜",
        other => other,
    }
}

fn summary_row(key: &str, record: &HistoryRecord) -> Result<String, ReportError> {
    let response = &record.response;
    let before = bold_if(
        reading_text(response.before, "?"),
        is_high_before(response.before.value),
    );
    let peak = bold_if(
        reading_text(response.peak, "?"),
        is_high_after(response.peak.value, response.peak_hour),
    );
    let ratio = response
        .delta_per_gram(record.carbo)
        .map(format_number)
        .unwrap_or_else(|| "-".to_string());

    Ok(format!(
        "| [{}](#{}) | {} | {} | {} | {} | {:+} | {} | {}h | {} |",
        format_date(&record.date)?,
        key,
        slot_label(&record.slot),
        grams(record.carbo),
        before,
        peak,
        response.delta,
        ratio,
        response.peak_hour.hours(),
        phrases(&record.tags)
    ))
}
