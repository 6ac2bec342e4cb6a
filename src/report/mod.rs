pub mod markdown;

pub use markdown::MealReport;
