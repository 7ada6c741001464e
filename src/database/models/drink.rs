use serde::{Deserialize, Serialize};
use serde_json::Number;
use sqlx::FromRow;

use crate::database::manager::DatabaseError;

/// One recipe line: a colored layer of `parts` units of `name`.
/// `parts` is any JSON number and is stored as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: Number,
}

/// Ingredient without its quantity, used by the public menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientShort {
    pub color: String,
    pub name: String,
}

/// Recipe as sent by clients: a list, or a lone ingredient object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(ingredients) => ingredients,
            RecipeInput::One(ingredient) => vec![ingredient],
        }
    }
}

/// Row as stored: the recipe is serialized JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

/// A drink with its decoded recipe. Serializes as the long view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Public representation: ingredient quantities are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| IngredientShort {
                    color: ingredient.color.clone(),
                    name: ingredient.name.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<DrinkRow> for Drink {
    type Error = DatabaseError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = serde_json::from_str(&row.recipe)?;
        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}
