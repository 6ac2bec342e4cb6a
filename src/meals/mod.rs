pub mod dto;
pub mod glucose;
pub mod indicator;
pub mod policy;
pub mod remark;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use repo::load_meal_log;
pub use services::{History, MealLog};
