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
    handlers::forms::{validate_material_form, MaterialForm, MaterialFormValues},
    handlers::queries::{self, MaterialFilter},
    middleware::{get_current_user, CurrentUser},
    models::{capacity_alert, AlertDisplay, Location, MaterialDisplay},
};

#[derive(Template)]
#[template(path = "clerk.html")]
struct ClerkTemplate<'a> {
    current_user: &'a CurrentUser,
    materials: Vec<MaterialDisplay>,
    locations: Vec<Location>,
    alerts: Vec<AlertDisplay>,
    total_quantity: i64,
    capacity_limit: i64,
    capacity_alert: bool,
    form: MaterialFormValues,
    error: String,
}

#[derive(Deserialize)]
pub struct ClerkQuery {
    edit_material: Option<String>,
}

async fn render_clerk(
    db: &Database,
    current_user: &CurrentUser,
    form: MaterialFormValues,
    error: String,
) -> Result<Html<String>, StatusCode> {
    let materials = queries::fetch_materials(db, &MaterialFilter::default())
        .await
        .map_err(queries::db_error)?;
    let locations = queries::fetch_locations(db).await.map_err(queries::db_error)?;
    let alerts = queries::fetch_alerts(db).await.map_err(queries::db_error)?;
    let total_quantity = queries::fetch_total_quantity(db).await.map_err(queries::db_error)?;
    let capacity_limit = queries::fetch_capacity_limit(db).await.map_err(queries::db_error)?;

    let template = ClerkTemplate {
        current_user,
        materials,
        locations,
        alerts,
        total_quantity,
        capacity_limit,
        capacity_alert: capacity_alert(total_quantity, capacity_limit),
        form,
        error,
    };
    Ok(Html(template.render().unwrap()))
}

pub async fn clerk_view(
    cookies: Cookies,
    State(db): State<Database>,
    Query(query): Query<ClerkQuery>,
) -> Result<Html<String>, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("clerk:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    // ?edit_material=<id> pre-fills the form with an existing material.
    let form = match &query.edit_material {
        Some(raw) => {
            let id = Uuid::parse_str(raw).map_err(|_| StatusCode::NOT_FOUND)?;
            let material = queries::fetch_material(&db, id)
                .await
                .map_err(queries::db_error)?
                .ok_or(StatusCode::NOT_FOUND)?;
            MaterialFormValues {
                id: material.id.to_string(),
                name: material.name,
                description: material.description,
                quantity: material.quantity.to_string(),
                location_id: material.location_id.to_string(),
                condition: material.condition,
            }
        }
        None => MaterialFormValues::default(),
    };

    render_clerk(&db, &current_user, form, String::new()).await
}

pub async fn create_material(
    cookies: Cookies,
    State(db): State<Database>,
    Form(form): Form<MaterialForm>,
) -> Result<Response, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("clerk:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let input = match validate_material_form(&form) {
        Ok(input) => input,
        Err(error) => {
            let values = MaterialFormValues::from_form(&form, None);
            return Ok(render_clerk(&db, &current_user, values, error).await?.into_response());
        }
    };

    let location = queries::fetch_location(&db, input.location_id)
        .await
        .map_err(queries::db_error)?;
    if location.is_none() {
        let values = MaterialFormValues::from_form(&form, None);
        return Ok(render_clerk(&db, &current_user, values, "Select a valid location".to_string())
            .await?
            .into_response());
    }

    // added_by always comes from the session, never from the form.
    sqlx::query(
        r#"
        INSERT INTO materials (name, description, quantity, condition, location_id, added_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.quantity)
    .bind(input.condition.as_str())
    .bind(input.location_id)
    .bind(current_user.id)
    .execute(&db)
    .await
    .map_err(queries::db_error)?;

    log::info!("material '{}' added by {}", input.name, current_user.username);

    Ok(Redirect::to("/clerk").into_response())
}

pub async fn update_material(
    cookies: Cookies,
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Form(form): Form<MaterialForm>,
) -> Result<Response, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("clerk:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    queries::fetch_material(&db, id)
        .await
        .map_err(queries::db_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let input = match validate_material_form(&form) {
        Ok(input) => input,
        Err(error) => {
            let values = MaterialFormValues::from_form(&form, Some(id));
            return Ok(render_clerk(&db, &current_user, values, error).await?.into_response());
        }
    };

    let location = queries::fetch_location(&db, input.location_id)
        .await
        .map_err(queries::db_error)?;
    if location.is_none() {
        let values = MaterialFormValues::from_form(&form, Some(id));
        return Ok(render_clerk(&db, &current_user, values, "Select a valid location".to_string())
            .await?
            .into_response());
    }

    sqlx::query(
        r#"
        UPDATE materials
        SET name = $2, description = $3, quantity = $4, condition = $5, location_id = $6
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.quantity)
    .bind(input.condition.as_str())
    .bind(input.location_id)
    .execute(&db)
    .await
    .map_err(queries::db_error)?;

    log::info!("material {} updated by {}", id, current_user.username);

    Ok(Redirect::to("/clerk").into_response())
}

pub async fn delete_material(
    cookies: Cookies,
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("clerk:access") {
        return Err(StatusCode::FORBIDDEN);
    }

    let result = sqlx::query("DELETE FROM materials WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await
        .map_err(queries::db_error)?;

    if result.rows_affected() == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    log::info!("material {} deleted by {}", id, current_user.username);

    Ok(Redirect::to("/clerk"))
}

pub async fn clear_alert(
    cookies: Cookies,
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, StatusCode> {
    let current_user = get_current_user(cookies, &db).await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.has("clerk:access") {
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

    Ok(Redirect::to("/clerk"))
}
