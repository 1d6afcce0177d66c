use axum::{extract::State, response::IntoResponse, Json};

use crate::{error::AppError, service::template::TemplateService, state::AppState};

/// List stored templates.
///
/// # Returns
/// - `200 OK` - Summaries of every stored template, newest first
/// - `500 Internal Server Error` - Database error
pub async fn get_templates(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summaries = TemplateService::new(&state.db).list().await?;

    Ok(Json(summaries))
}
