use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    database::Database,
    models::User,
    utils::verify_token,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn from_user_and_permissions(user: User, permissions: Vec<String>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            permissions,
        }
    }

    pub fn has(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Resolves the current user from the `auth_token` cookie. Identity comes
/// from the external auth service's JWT; the permission set comes from the
/// role assignments in the database.
pub async fn get_current_user(cookies: Cookies, db: &Database) -> Option<CurrentUser> {
    let token = cookies.get("auth_token")?.value().to_string();

    let claims = verify_token(&token).ok()?;
    let user_id = Uuid::parse_str(&claims.sub).ok()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, is_active, created_at FROM users WHERE id = $1 AND is_active = true"
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .ok()??;

    let permissions = get_user_permissions(db, user.id).await;

    Some(CurrentUser::from_user_and_permissions(user, permissions))
}

pub async fn get_user_permissions(db: &Database, user_id: Uuid) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT jsonb_array_elements_text(r.permissions)
        FROM roles r
        JOIN user_roles ur ON r.id = ur.role_id
        WHERE ur.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .unwrap_or_default()
}
