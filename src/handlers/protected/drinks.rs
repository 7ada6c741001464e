use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::app::AppState;
use crate::auth::Claims;
use crate::database::{DatabaseError, Drink, DrinkChanges, RecipeInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

fn caller(claims: &Claims) -> &str {
    claims.sub.as_deref().unwrap_or("unknown")
}

/// GET /api/drinks-detail - requires `get:drinks-detail`
///
/// Same listing as the public menu but in the long representation.
pub async fn detail(State(state): State<AppState>) -> ApiResult<Vec<Drink>> {
    let drinks = state.drinks().select_all().await?;
    Ok(ApiResponse::success("drinks", drinks))
}

/// POST /api/drinks - requires `post:drinks`
///
/// Body: `{ "title": "Water", "recipe": [{ "color": "blue", "name": "water", "parts": 1 }] }`.
/// `recipe` may also be a single ingredient object. Any failure is a 422.
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> ApiResult<Vec<Drink>> {
    let Json(body) = body.map_err(|e| {
        debug!("Rejected drink body: {}", e);
        ApiError::UnprocessableEntity
    })?;

    let title = body
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or(ApiError::UnprocessableEntity)?;
    let recipe = body
        .recipe
        .map(RecipeInput::into_vec)
        .ok_or(ApiError::UnprocessableEntity)?;

    let drink = state.drinks().insert(&title, &recipe).await.map_err(|e| {
        error!("Failed to insert drink '{}': {}", title, e);
        ApiError::UnprocessableEntity
    })?;

    info!("Drink {} '{}' created by {}", drink.id, drink.title, caller(&claims));
    Ok(ApiResponse::success("drinks", vec![drink]))
}

/// PATCH /api/drinks/:id - requires `patch:drinks`
///
/// Body: `{ "title": "..." }`, optionally with a replacement `recipe`.
/// Missing id is a 404, every other failure a 400.
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> ApiResult<Vec<Drink>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let Json(body) = body.map_err(|e| {
        debug!("Rejected drink patch: {}", e);
        ApiError::BadRequest
    })?;

    if body.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
        return Err(ApiError::BadRequest);
    }

    let changes = DrinkChanges {
        title: body.title,
        recipe: body.recipe.map(RecipeInput::into_vec),
    };
    if changes.is_empty() {
        return Err(ApiError::BadRequest);
    }

    let drink = state
        .drinks()
        .update(id, changes)
        .await
        .map_err(|e| match e {
            DatabaseError::NotFound(_) => ApiError::NotFound,
            other => {
                error!("Failed to update drink {}: {}", id, other);
                ApiError::BadRequest
            }
        })?;

    info!("Drink {} updated by {}", drink.id, caller(&claims));
    Ok(ApiResponse::success("drinks", vec![drink]))
}

/// DELETE /api/drinks/:id - requires `delete:drinks`
///
/// Responds with `{ "success": true, "delete": <id> }`. Missing id is a 404,
/// every other failure a 422.
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<i64> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    state.drinks().delete(id).await.map_err(|e| match e {
        DatabaseError::NotFound(_) => ApiError::NotFound,
        other => {
            error!("Failed to delete drink {}: {}", id, other);
            ApiError::UnprocessableEntity
        }
    })?;

    info!("Drink {} deleted by {}", id, caller(&claims));
    Ok(ApiResponse::success("delete", id))
}
