use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::Html,
};
use askama::Template;
use tower_cookies::Cookies;

use crate::{
    database::Database,
    filters,
    handlers::forms::{SearchParams, SearchValues},
    handlers::queries::{self, MaterialFilter},
    handlers::reports::{self, ReportForm},
    middleware::{get_current_user, CurrentUser},
    models::{LocationSummary, MaterialDisplay, Report, ReportType},
};

#[derive(Template)]
#[template(path = "manager.html")]
struct ManagerTemplate<'a> {
    current_user: &'a CurrentUser,
    materials: Vec<MaterialDisplay>,
    locations: Vec<LocationSummary>,
    search: SearchValues,
    report: Option<Report>,
}

async fn render_manager(
    db: &Database,
    current_user: &CurrentUser,
    search: SearchValues,
    report: Option<Report>,
) -> Result<Html<String>, StatusCode> {
    let materials = queries::fetch_materials(db, &MaterialFilter::default())
        .await
        .map_err(queries::db_error)?;
    let locations = queries::fetch_location_summaries(db).await.map_err(queries::db_error)?;

    let template = ManagerTemplate {
        current_user,
        materials,
        locations,
        search,
        report,
    };
    Ok(Html(template.render().unwrap()))
}

pub async fn manager_view(
    cookies: Cookies,
    State(db): State<Database>,
    Query(search): Query<SearchParams>,
) -> Result<Html<String>, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    render_manager(&db, &current_user, search.values(), None).await
}

/// Generates and renders the chosen report inline on the manager page.
pub async fn generate_report(
    cookies: Cookies,
    State(db): State<Database>,
    Form(form): Form<ReportForm>,
) -> Result<Html<String>, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let report_type = ReportType::parse(&form.report_type);
    let report = reports::generate(&db, report_type).await?;

    render_manager(&db, &current_user, SearchValues::default(), Some(report)).await
}
