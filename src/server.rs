use crate::catalog;
use crate::config::Settings;
use crate::data::{TimetableInput, TimetableOutput};
use crate::solver;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;

async fn solve_input(input: TimetableInput) -> Result<Json<TimetableOutput>, (StatusCode, String)> {
    let result = tokio::task::spawn_blocking(move || solver::solve_week(&input))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match result {
        Ok(output) => Ok(Json(output)),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

async fn solve_handler(
    Json(input): Json<TimetableInput>,
) -> Result<Json<TimetableOutput>, (StatusCode, String)> {
    solve_input(input).await
}

async fn default_handler() -> Result<Json<TimetableOutput>, (StatusCode, String)> {
    solve_input(catalog::builtin()).await
}

async fn catalog_handler() -> Json<TimetableInput> {
    Json(catalog::builtin())
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/timetable/solve", post(solve_handler))
        .route("/v1/timetable/default", get(default_handler))
        .route("/v1/timetable/catalog", get(catalog_handler))
}

pub async fn run_server(settings: &Settings) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await
}
