pub mod repo;
pub mod repo_types;
pub mod services;

pub use repo::load_shopping_list;
pub use repo_types::ShoppingList;
