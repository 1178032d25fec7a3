// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState};

// Estrutura de dados ("claims") dentro do JWT emitido pelo serviço de autenticação
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // Subject (ID do usuário)
    pub exp: usize,  // Expiration time
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::InvalidToken)?;

        let claims = validate_token(
            bearer.token(),
            &app_state.settings.jwt_secret,
            app_state.settings.jwt_audience.as_deref(),
        )?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Valida assinatura HS256 e expiração; a audiência só é checada quando configurada.
pub fn validate_token(token: &str, secret: &str, audience: Option<&str>) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Token rejeitado: {}", e);
            AppError::InvalidToken
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, exp_offset: i64, aud: Option<&str>) -> String {
        #[derive(Serialize)]
        struct Raw<'a> {
            sub: Uuid,
            exp: i64,
            email: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            aud: Option<&'a str>,
        }
        let raw = Raw {
            sub: Uuid::new_v4(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            email: "operador@grupothermas.com.br",
            aud,
        };
        encode(&Header::default(), &raw, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_valid_token_with_provider_audience() {
        let claims = validate_token(&token("s3cret", 3600, Some("authenticated")), "s3cret", None).unwrap();
        assert_eq!(claims.email.as_deref(), Some("operador@grupothermas.com.br"));

        assert!(validate_token(&token("s3cret", 3600, Some("authenticated")), "s3cret", Some("authenticated")).is_ok());
    }

    #[test]
    fn rejects_wrong_secret_expired_or_wrong_audience() {
        assert!(matches!(validate_token(&token("outro", 3600, None), "s3cret", None), Err(AppError::InvalidToken)));
        assert!(matches!(validate_token(&token("s3cret", -3600, None), "s3cret", None), Err(AppError::InvalidToken)));
        assert!(matches!(
            validate_token(&token("s3cret", 3600, Some("anon")), "s3cret", Some("authenticated")),
            Err(AppError::InvalidToken)
        ));
    }
}
