use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use askama::Template;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    database::Database,
    filters,
    handlers::queries::{self, MaterialFilter},
    middleware::{get_current_user, CurrentUser},
    models::{group_by_name, write_csv, MaterialDisplay, Report, ReportShape, ReportType},
};

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    current_user: &'a CurrentUser,
    report_name: &'static str,
    report: Report,
}

#[derive(Deserialize)]
pub struct ReportForm {
    pub report_type: String,
}

/// Selects the report's query shape. Only `category` groups; every other
/// tag yields the unfiltered full material list.
pub async fn generate(db: &Database, report_type: ReportType) -> Result<Report, StatusCode> {
    let materials = queries::fetch_materials(db, &MaterialFilter::default())
        .await
        .map_err(queries::db_error)?;

    Ok(match report_type.shape() {
        ReportShape::Grouped => Report::Grouped(group_by_name(&materials)),
        ReportShape::Flat => Report::Flat(materials),
    })
}

/// Wraps a projected material list as a CSV attachment download.
pub fn csv_response(
    report_type: ReportType,
    materials: &[MaterialDisplay],
) -> Result<Response, StatusCode> {
    let body = write_csv(report_type, materials).map_err(|err| {
        log::error!("csv serialization failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report_type.filename()),
        ),
    ];

    Ok((headers, body).into_response())
}

/// Standalone report page, manager gate, mirroring the inline report on the
/// manager views.
pub async fn generate_report_view(
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
    let report = generate(&db, report_type).await?;

    let template = ReportTemplate {
        current_user: &current_user,
        report_name: report_type.tag(),
        report,
    };
    Ok(Html(template.render().unwrap()))
}
