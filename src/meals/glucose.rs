use std::str::FromStr;

use serde::Deserialize;

use crate::errors::ReportError;

/// Blood-glucose rise (mg/dL) per gram of carbohydrate.
pub const RISE_PER_GRAM: f64 = 1.4;

/// A glucose reading. `"130?"` in the log marks a guessed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawReading")]
pub struct Reading {
    pub value: i32,
    pub estimated: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReading {
    Number(i64),
    Text(String),
}

impl Reading {
    pub fn exact(value: i32) -> Self {
        Self {
            value,
            estimated: false,
        }
    }

    pub fn guessed(value: i32) -> Self {
        Self {
            value,
            estimated: true,
        }
    }
}

impl FromStr for Reading {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, estimated) = match trimmed.strip_suffix('?') {
            Some(rest) => (rest.trim_end(), true),
            None => (trimmed, false),
        };
        let value = digits
            .parse::<i32>()
            .map_err(|_| ReportError::InvalidReading(s.to_string()))?;
        Ok(if estimated {
            Self::guessed(value)
        } else {
            Self::exact(value)
        })
    }
}

impl TryFrom<RawReading> for Reading {
    type Error = ReportError;

    fn try_from(raw: RawReading) -> Result<Self, Self::Error> {
        match raw {
            RawReading::Number(value) => i32::try_from(value)
                .map(Self::exact)
                .map_err(|_| ReportError::InvalidReading(value.to_string())),
            RawReading::Text(text) => text.parse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PeakHour {
    One,
    Two,
}

impl PeakHour {
    pub fn hours(self) -> u8 {
        match self {
            PeakHour::One => 1,
            PeakHour::Two => 2,
        }
    }
}

/// The `ketto` block of a meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct GlucoseReadings {
    #[serde(default)]
    pub before: Option<Reading>,
    #[serde(default, rename = "1h_after")]
    pub one_hour_after: Option<Reading>,
    #[serde(default, rename = "2h_after")]
    pub two_hour_after: Option<Reading>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlucoseResponse {
    pub before: Reading,
    pub peak: Reading,
    pub peak_hour: PeakHour,
    pub delta: i64,
}

impl GlucoseReadings {
    pub fn has_after(&self) -> bool {
        self.one_hour_after.is_some() || self.two_hour_after.is_some()
    }

    /// Peak and delta of the meal. `None` without an after reading or without
    /// a before reading.
    ///
    /// The one-hour reading is the peak whenever it equals the maximum, so a
    /// tie between the two after readings resolves to one hour.
    pub fn response(&self) -> Option<GlucoseResponse> {
        if !self.has_after() {
            return None;
        }
        let before = self.before?;
        let one = self.one_hour_after.map(|r| r.value).unwrap_or(0);
        let two = self.two_hour_after.map(|r| r.value).unwrap_or(0);
        let peak_value = one.max(two);

        let (peak_hour, peak) = match self.one_hour_after {
            Some(r) if r.value == peak_value => (PeakHour::One, r),
            _ => (
                PeakHour::Two,
                self.two_hour_after.unwrap_or(Reading::exact(peak_value)),
            ),
        };

        Some(GlucoseResponse {
            before,
            peak,
            peak_hour,
            delta: i64::from(peak.value) - i64::from(before.value),
        })
    }
}

impl GlucoseResponse {
    /// Carbohydrate grams implied by the rise.
    pub fn estimated_intake(&self) -> f64 {
        self.delta as f64 / RISE_PER_GRAM
    }

    pub fn delta_per_gram(&self, carbo: f64) -> Option<f64> {
        (carbo != 0.0).then(|| self.delta as f64 / carbo)
    }
}
