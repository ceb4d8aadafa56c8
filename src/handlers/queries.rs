use axum::http::StatusCode;
use uuid::Uuid;

use crate::{
    database::Database,
    models::{AlertDisplay, Location, LocationSummary, MaterialDisplay},
};

const MATERIAL_SELECT: &str = r#"
    SELECT m.id, m.name, m.description, m.quantity, m.condition,
           m.location_id, l.name AS location_name,
           u.username AS added_by_username, m.date_added
    FROM materials m
    JOIN locations l ON m.location_id = l.id
    JOIN users u ON m.added_by = u.id
"#;

/// Optional material filters: exact location, case-insensitive name substring.
#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    pub location_id: Option<Uuid>,
    pub name: Option<String>,
}

impl MaterialFilter {
    pub fn is_empty(&self) -> bool {
        self.location_id.is_none() && self.name.is_none()
    }
}

pub async fn fetch_materials(
    db: &Database,
    filter: &MaterialFilter,
) -> Result<Vec<MaterialDisplay>, sqlx::Error> {
    // Build dynamic query based on filters
    let mut conditions = Vec::new();
    let mut bind_count = 1;

    if filter.location_id.is_some() {
        conditions.push(format!("m.location_id = ${}", bind_count));
        bind_count += 1;
    }

    if filter.name.is_some() {
        conditions.push(format!("m.name ILIKE ${}", bind_count));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!("{} {} ORDER BY m.name, m.date_added", MATERIAL_SELECT, where_clause);

    let mut query = sqlx::query_as::<_, MaterialDisplay>(&sql);

    if let Some(location_id) = filter.location_id {
        query = query.bind(location_id);
    }

    if let Some(name) = &filter.name {
        query = query.bind(format!("%{}%", name));
    }

    query.fetch_all(db).await
}

pub async fn fetch_material(db: &Database, id: Uuid) -> Result<Option<MaterialDisplay>, sqlx::Error> {
    let sql = format!("{} WHERE m.id = $1", MATERIAL_SELECT);
    sqlx::query_as::<_, MaterialDisplay>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_locations(db: &Database) -> Result<Vec<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>("SELECT id, name, max_capacity FROM locations ORDER BY name")
        .fetch_all(db)
        .await
}

pub async fn fetch_location(db: &Database, id: Uuid) -> Result<Option<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>("SELECT id, name, max_capacity FROM locations WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Locations with the summed quantity of their materials, recomputed on
/// every request.
pub async fn fetch_location_summaries(db: &Database) -> Result<Vec<LocationSummary>, sqlx::Error> {
    sqlx::query_as::<_, LocationSummary>(
        r#"
        SELECT l.id, l.name, l.max_capacity,
               COALESCE(SUM(m.quantity), 0)::bigint AS total_quantity
        FROM locations l
        LEFT JOIN materials m ON m.location_id = l.id
        GROUP BY l.id, l.name, l.max_capacity
        ORDER BY l.name
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_alerts(db: &Database) -> Result<Vec<AlertDisplay>, sqlx::Error> {
    sqlx::query_as::<_, AlertDisplay>(
        r#"
        SELECT a.id, l.name AS location_name, u.username AS created_by_username, a.created_at
        FROM alerts a
        JOIN locations l ON a.location_id = l.id
        JOIN users u ON a.created_by = u.id
        ORDER BY a.created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_total_quantity(db: &Database) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(quantity), 0)::bigint FROM materials")
        .fetch_one(db)
        .await
}

pub async fn fetch_distinct_material_names(db: &Database) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT name FROM materials ORDER BY name")
        .fetch_all(db)
        .await
}

/// First storage_capacity row wins; 1000 when the table is empty.
pub async fn fetch_capacity_limit(db: &Database) -> Result<i64, sqlx::Error> {
    let limit = sqlx::query_scalar::<_, i64>(
        r#"SELECT "limit"::bigint FROM storage_capacity ORDER BY id LIMIT 1"#,
    )
    .fetch_optional(db)
    .await?;
    Ok(limit.unwrap_or(1000))
}

pub(crate) fn db_error(err: sqlx::Error) -> StatusCode {
    log::error!("database error: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}
