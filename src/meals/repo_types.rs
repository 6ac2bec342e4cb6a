use super::glucose::GlucoseReadings;

/// Reserved slot holding the day's reflection lines.
pub const REFLECTION_SLOT: &str = "kanso";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meal {
    pub slot: String,
    pub time: String,
    /// Food key and raw indicator, in log order.
    pub foods: Vec<(String, String)>,
    pub readings: Option<GlucoseReadings>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayRecord {
    /// `YYYYMMDD`
    pub date: String,
    pub meals: Vec<Meal>,
    pub reflections: Vec<String>,
}

impl Meal {
    /// `20240101_breakfast`, shared by anchors, image names and history keys.
    pub fn id(&self, date: &str) -> String {
        format!("{}_{}", date, self.slot)
    }
}
