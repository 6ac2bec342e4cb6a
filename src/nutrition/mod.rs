pub mod repo;
pub mod repo_types;
pub mod services;

pub use repo::load_reference;
pub use services::NutritionReference;
