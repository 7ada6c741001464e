pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{Database, DatabaseError};
pub use models::{Drink, DrinkShort, Ingredient, RecipeInput};
pub use repository::{DrinkChanges, DrinkRepository};
