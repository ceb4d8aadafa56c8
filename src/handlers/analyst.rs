use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Response},
};
use askama::Template;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    database::Database,
    filters,
    handlers::forms::{SearchParams, SearchValues},
    handlers::queries,
    handlers::reports,
    middleware::{get_current_user, CurrentUser},
    models::{Location, MaterialDisplay, ReportType},
};

#[derive(Template)]
#[template(path = "analyst.html")]
struct AnalystTemplate<'a> {
    current_user: &'a CurrentUser,
    selected_materials: Vec<MaterialDisplay>,
    categories: Vec<String>,
    locations: Vec<Location>,
    total_quantity: i64,
    search: SearchValues,
}

/// The CSV form carries the active search as hidden fields so the export
/// matches what is on screen.
#[derive(Deserialize)]
pub struct DownloadForm {
    report_type: String,
    location: Option<String>,
    name: Option<String>,
}

pub async fn analyst_view(
    cookies: Cookies,
    State(db): State<Database>,
    Query(search): Query<SearchParams>,
) -> Result<Html<String>, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("analyst:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let selected_materials = queries::fetch_materials(&db, &search.filter())
        .await
        .map_err(queries::db_error)?;
    let categories = queries::fetch_distinct_material_names(&db)
        .await
        .map_err(queries::db_error)?;
    let locations = queries::fetch_locations(&db).await.map_err(queries::db_error)?;
    let total_quantity = queries::fetch_total_quantity(&db).await.map_err(queries::db_error)?;

    let template = AnalystTemplate {
        current_user: &current_user,
        selected_materials,
        categories,
        locations,
        total_quantity,
        search: search.values(),
    };
    Ok(Html(template.render().unwrap()))
}

pub async fn download_report(
    cookies: Cookies,
    State(db): State<Database>,
    Form(form): Form<DownloadForm>,
) -> Result<Response, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("analyst:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let search = SearchParams {
        location: form.location,
        name: form.name,
    };
    let materials = queries::fetch_materials(&db, &search.filter())
        .await
        .map_err(queries::db_error)?;

    let report_type = ReportType::parse(&form.report_type);

    log::info!(
        "csv report '{}' with {} rows downloaded by {}",
        report_type.tag(),
        materials.len(),
        current_user.username
    );

    reports::csv_response(report_type, &materials)
}
