use axum::extract::State;

use crate::app::AppState;
use crate::database::{Drink, DrinkShort};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/drinks - public menu
///
/// Returns every drink in the short representation (no ingredient parts):
///
/// ```json
/// { "success": true, "drinks": [{ "id": 1, "title": "water", "recipe": [{ "color": "blue", "name": "water" }] }] }
/// ```
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<DrinkShort>> {
    let drinks = state.drinks().select_all().await?;
    Ok(ApiResponse::success(
        "drinks",
        drinks.iter().map(Drink::short).collect(),
    ))
}
