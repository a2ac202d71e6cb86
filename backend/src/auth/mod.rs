//! Bearer-token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the shared secret from the `[auth]`
//! config section. Only the signature is checked; tokens carry no expiry.
//! Handlers opt into authentication by taking an [`Authenticated`] argument.

use crate::context::AppContext;
use crate::error::AppError;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

const TOKEN_SUBJECT: &str = "user";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
}

/// Signs and checks bearer tokens with one shared secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenAuthority {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        let claims = Claims {
            sub: TOKEN_SUBJECT.to_string(),
            iat,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }

    /// Checks an `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> Result<Claims, AppError> {
        let header = header.ok_or(AppError::AuthMissing)?;
        let token = header.strip_prefix("Bearer ").unwrap_or(header);
        self.verify(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            AppError::AuthInvalid
        })
    }
}

/// Extractor that succeeds only for requests carrying a valid bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<AppContext>>() {
            Some(context) => {
                let header = req
                    .headers()
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok());
                context.tokens.authorize(header).map(Authenticated)
            }
            None => Err(AppError::AuthInvalid),
        };
        ready(result)
    }
}
