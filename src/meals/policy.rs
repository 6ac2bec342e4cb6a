//! Fixed thresholds above which a value is highlighted in the report.

use super::glucose::PeakHour;

pub const BEFORE_HIGH: i32 = 90;
pub const ONE_HOUR_AFTER_HIGH: i32 = 140;
pub const TWO_HOUR_AFTER_HIGH: i32 = 120;
pub const MEAL_CARBO_HIGH: f64 = 40.0;
pub const DAY_CARBO_HIGH: f64 = 120.0;

pub fn is_high_before(value: i32) -> bool {
    value >= BEFORE_HIGH
}

pub fn is_high_after(value: i32, hour: PeakHour) -> bool {
    match hour {
        PeakHour::One => value >= ONE_HOUR_AFTER_HIGH,
        PeakHour::Two => value >= TWO_HOUR_AFTER_HIGH,
    }
}

/// Also applies to the intake estimated from a glucose rise.
pub fn is_high_meal_carbo(grams: f64) -> bool {
    grams > MEAL_CARBO_HIGH
}

pub fn is_high_day_carbo(grams: f64) -> bool {
    grams > DAY_CARBO_HIGH
}
