use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Drink, DrinkRow, Ingredient};

/// Fields a PATCH may change; `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl DrinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

pub struct DrinkRepository {
    pool: SqlitePool,
}

impl DrinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn select_all(&self) -> Result<Vec<Drink>, DatabaseError> {
        sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drink ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Drink::try_from)
            .collect()
    }

    pub async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, DatabaseError> {
        let recipe_json = serde_json::to_string(recipe)?;

        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drink (title, recipe) VALUES (?, ?) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(recipe_json)
        .fetch_one(&self.pool)
        .await?;

        Drink::try_from(row)
    }

    /// Apply `changes` to drink `id` inside one transaction.
    pub async fn update(&self, id: i64, changes: DrinkChanges) -> Result<Drink, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drink WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("drink {}", id)))?;

        let title = changes.title.unwrap_or(current.title);
        let recipe_json = match changes.recipe {
            Some(recipe) => serde_json::to_string(&recipe)?,
            None => current.recipe,
        };

        let row = sqlx::query_as::<_, DrinkRow>(
            "UPDATE drink SET title = ?, recipe = ? WHERE id = ? RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(recipe_json)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Drink::try_from(row)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM drink WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("drink {}", id)));
        }
        Ok(())
    }
}
