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
    middleware::{get_current_user, CurrentUser},
    models::{capacity_alert, AlertDisplay, LocationSummary, MaterialDisplay},
};

#[derive(Template)]
#[template(path = "storage_manager.html")]
struct StorageManagerTemplate<'a> {
    current_user: &'a CurrentUser,
    materials: Vec<MaterialDisplay>,
    locations: Vec<LocationSummary>,
    alerts: Vec<AlertDisplay>,
    total_quantity: i64,
    capacity_limit: i64,
    capacity_alert: bool,
    form: LocationFormValues,
    search: SearchValues,
    error: String,
}

#[derive(Deserialize)]
pub struct SelectLocationForm {
    location: String,
}

#[derive(Deserialize)]
pub struct SendAlertForm {
    alert_location_id: String,
}

async fn render_storage_manager(
    db: &Database,
    current_user: &CurrentUser,
    search: &SearchParams,
    form: LocationFormValues,
    error: String,
) -> Result<Html<String>, StatusCode> {
    let materials = queries::fetch_materials(db, &search.filter())
        .await
        .map_err(queries::db_error)?;
    let locations = queries::fetch_location_summaries(db).await.map_err(queries::db_error)?;
    let alerts = queries::fetch_alerts(db).await.map_err(queries::db_error)?;
    let total_quantity = queries::fetch_total_quantity(db).await.map_err(queries::db_error)?;
    let capacity_limit = queries::fetch_capacity_limit(db).await.map_err(queries::db_error)?;

    let template = StorageManagerTemplate {
        current_user,
        materials,
        locations,
        alerts,
        total_quantity,
        capacity_limit,
        capacity_alert: capacity_alert(total_quantity, capacity_limit),
        form,
        search: search.values(),
        error,
    };
    Ok(Html(template.render().unwrap()))
}

pub async fn storage_manager_view(
    cookies: Cookies,
    State(db): State<Database>,
    Query(search): Query<SearchParams>,
) -> Result<Html<String>, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("storage_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    render_storage_manager(&db, &current_user, &search, LocationFormValues::default(), String::new())
        .await
}

/// Loads the chosen location into the capacity form; renders in place
/// rather than redirecting, since nothing was written.
pub async fn select_location(
    cookies: Cookies,
    State(db): State<Database>,
    Form(form): Form<SelectLocationForm>,
) -> Result<Html<String>, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("storage_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let id = Uuid::parse_str(form.location.trim()).map_err(|_| StatusCode::NOT_FOUND)?;
    let location = queries::fetch_location(&db, id)
        .await
        .map_err(queries::db_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let values = LocationFormValues {
        id: location.id.to_string(),
        name: location.name,
        max_capacity: location.max_capacity.to_string(),
    };

    render_storage_manager(&db, &current_user, &SearchParams::default(), values, String::new()).await
}

pub async fn update_location(
    cookies: Cookies,
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Form(form): Form<LocationForm>,
) -> Result<Response, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("storage_manager:access") {
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
            let page = render_storage_manager(&db, &current_user, &SearchParams::default(), values, error)
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

    log::info!("location {} capacity updated by {}", id, current_user.username);

    Ok(Redirect::to("/storage-manager").into_response())
}

pub async fn send_alert(
    cookies: Cookies,
    State(db): State<Database>,
    Form(form): Form<SendAlertForm>,
) -> Result<Redirect, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("storage_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let location_id = Uuid::parse_str(form.alert_location_id.trim())
        .map_err(|_| StatusCode::NOT_FOUND)?;
    queries::fetch_location(&db, location_id)
        .await
        .map_err(queries::db_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    // Alerts are not unique per location; raising twice coexists.
    sqlx::query("INSERT INTO alerts (location_id, created_by) VALUES ($1, $2)")
        .bind(location_id)
        .bind(current_user.id)
        .execute(&db)
        .await
        .map_err(queries::db_error)?;

    log::info!("alert raised for location {} by {}", location_id, current_user.username);

    Ok(Redirect::to("/storage-manager"))
}

pub async fn clear_alert(
    cookies: Cookies,
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("storage_manager:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await
        .map_err(queries::db_error)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    log::info!("alert {} cleared by {}", id, current_user.username);

    Ok(Redirect::to("/storage-manager"))
}
