use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use askama::Template;
use serde::Deserialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    database::Database,
    filters,
    handlers::forms::{validate_location_form, LocationForm, LocationFormValues, SearchParams, SearchValues},
    handlers::queries,
    handlers::reports::{self, ReportForm},
    middleware::{get_current_user, CurrentUser},
    models::{LocationSummary, MaterialDisplay, Report, ReportType},
};

#[derive(Template)]
#[template(path = "inventory_manager.html")]
struct InventoryManagerTemplate<'a> {
    current_user: &'a CurrentUser,
    materials: Vec<MaterialDisplay>,
    locations: Vec<LocationSummary>,
    search_results: Option<Vec<MaterialDisplay>>,
    search: SearchValues,
    form: LocationFormValues,
    report: Option<Report>,
    error: String,
}

#[derive(Deserialize)]
pub struct InventoryManagerQuery {
    edit_location: Option<String>,
    location: Option<String>,
    name: Option<String>,
}

async fn render_inventory_manager(
    db: &Database,
    current_user: &CurrentUser,
    search: &SearchParams,
    form: LocationFormValues,
    report: Option<Report>,
    error: String,
) -> Result<Html<String>, StatusCode> {
    let materials = queries::fetch_materials(db, &queries::MaterialFilter::default())
        .await
        .map_err(queries::db_error)?;
    let locations = queries::fetch_location_summaries(db).await.map_err(queries::db_error)?;

    let filter = search.filter();
    let search_results = if filter.is_empty() {
        None
    } else {
        Some(queries::fetch_materials(db, &filter).await.map_err(queries::db_error)?)
    };

    let template = InventoryManagerTemplate {
        current_user,
        materials,
        locations,
        search_results,
        search: search.values(),
        form,
        report,
        error,
    };
    Ok(Html(template.render().unwrap()))
}

pub async fn inventory_manager_view(
    cookies: Cookies,
    State(db): State<Database>,
    Query(query): Query<InventoryManagerQuery>,
) -> Result<Html<String>, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("inventory_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    // ?edit_location=<id> pre-fills the location form.
    let form = match &query.edit_location {
        Some(raw) => {
            let id = Uuid::parse_str(raw).map_err(|_| StatusCode::NOT_FOUND)?;
            let location = queries::fetch_location(&db, id)
                .await
                .map_err(queries::db_error)?
                .ok_or(StatusCode::NOT_FOUND)?;
            LocationFormValues {
                id: location.id.to_string(),
                name: location.name,
                max_capacity: location.max_capacity.to_string(),
            }
        }
        None => LocationFormValues::default(),
    };

    let search = SearchParams {
        location: query.location,
        name: query.name,
    };

    render_inventory_manager(&db, &current_user, &search, form, None, String::new()).await
}

pub async fn create_location(
    cookies: Cookies,
    State(db): State<Database>,
    Form(form): Form<LocationForm>,
) -> Result<Response, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("inventory_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let input = match validate_location_form(&form) {
        Ok(input) => input,
        Err(error) => {
            let values = LocationFormValues::from_form(&form, None);
            let page = render_inventory_manager(
                &db,
                &current_user,
                &SearchParams::default(),
                values,
                None,
                error,
            )
            .await?;
            return Ok(page.into_response());
        }
    };

    sqlx::query("INSERT INTO locations (name, max_capacity) VALUES ($1, $2)")
        .bind(&input.name)
        .bind(input.max_capacity)
        .execute(&db)
        .await
        .map_err(queries::db_error)?;

    log::info!("location '{}' added by {}", input.name, current_user.username);

    Ok(Redirect::to("/inventory-manager").into_response())
}

pub async fn update_location(
    cookies: Cookies,
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Form(form): Form<LocationForm>,
) -> Result<Response, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("inventory_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    queries::fetch_location(&db, id)
        .await
        .map_err(queries::db_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let input = match validate_location_form(&form) {
        Ok(input) => input,
        Err(error) => {
            let values = LocationFormValues::from_form(&form, Some(id));
            let page = render_inventory_manager(
                &db,
                &current_user,
                &SearchParams::default(),
                values,
                None,
                error,
            )
            .await?;
            return Ok(page.into_response());
        }
    };

    sqlx::query("UPDATE locations SET name = $2, max_capacity = $3 WHERE id = $1")
        .bind(id)
        .bind(&input.name)
        .bind(input.max_capacity)
        .execute(&db)
        .await
        .map_err(queries::db_error)?;

    log::info!("location {} updated by {}", id, current_user.username);

    Ok(Redirect::to("/inventory-manager").into_response())
}

/// Deleting a location cascades to its materials and alerts at the schema
/// level.
pub async fn delete_location(
    cookies: Cookies,
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("inventory_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let result = sqlx::query("DELETE FROM locations WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await
        .map_err(queries::db_error)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    log::info!("location {} deleted (with its materials and alerts) by {}", id, current_user.username);

    Ok(Redirect::to("/inventory-manager"))
}

/// Generates and renders the chosen report inline on the page.
pub async fn generate_report(
    cookies: Cookies,
    State(db): State<Database>,
    Form(form): Form<ReportForm>,
) -> Result<Html<String>, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("inventory_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let report_type = ReportType::parse(&form.report_type);
    let report = reports::generate(&db, report_type).await?;

    render_inventory_manager(
        &db,
        &current_user,
        &SearchParams::default(),
        LocationFormValues::default(),
        Some(report),
        String::new(),
    )
    .await
}
