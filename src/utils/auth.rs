use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::env;

/// Claims of the `auth_token` cookie issued by the external auth service.
/// This app only verifies; it never issues tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_with(secret: &str, exp: i64) -> String {
        let claims = Claims {
            sub: "5f8a1f2e-0000-0000-0000-000000000001".to_string(),
            email: "clerk1@example.com".to_string(),
            exp,
            iat: Utc::now().timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_a_valid_token_and_rejects_bad_signature_or_expiry() {
        env::set_var("JWT_SECRET", "test-secret");
        let future = (Utc::now() + Duration::hours(1)).timestamp();
        let past = (Utc::now() - Duration::hours(1)).timestamp();

        let claims = verify_token(&token_with("test-secret", future)).unwrap();
        assert_eq!(claims.email, "clerk1@example.com");

        assert!(verify_token(&token_with("other-secret", future)).is_err());
        assert!(verify_token(&token_with("test-secret", past)).is_err());
    }
}
