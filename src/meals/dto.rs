use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::glucose::GlucoseReadings;

/// One meal slot as written in the log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealBody {
    #[serde(default)]
    pub time: Value,
    #[serde(default)]
    pub foods: Mapping,
    #[serde(default)]
    pub ketto: Option<GlucoseReadings>,
    #[serde(default)]
    pub remark: Option<String>,
}
