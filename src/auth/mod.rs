use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Role of the acting user inside their company, as asserted by the
/// authentication collaborator. The engine trusts this identity and only
/// enforces role checks at the operation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    OfficeStaff,
    Agent,
    Captain,
    Sailor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub company_id: Uuid,
    pub role: UserRole,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins, managers and office staff run the booking desk.
    pub fn is_staff(&self) -> bool {
        matches!(
            self.role,
            UserRole::Admin | UserRole::Manager | UserRole::OfficeStaff
        )
    }

    pub fn is_agent(&self) -> bool {
        self.role == UserRole::Agent
    }

    /// Staff and agents may create and mutate bookings; crew may not.
    pub fn requires_booking_access(&self) -> Result<(), AppError> {
        if self.is_staff() || self.is_agent() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only staff and agents may manage bookings".to_string(),
            ))
        }
    }

    /// Crew reassignment and pricing changes are a desk operation.
    pub fn requires_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only admins, managers and office staff may perform this action".to_string(),
            ))
        }
    }

    pub fn requires_same_company(&self, company_id: Uuid) -> Result<(), AppError> {
        if self.company_id == company_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You do not have access to this company".to_string(),
            ))
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        match decode::<Claims>(
                            token,
                            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims));
                            }
                            Err(_) => {
                                return ready(Err(ErrorUnauthorized("Invalid token")));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

/// Issue a token for the given identity. The production identity provider is an
/// external collaborator; this is used by tooling and tests.
pub fn issue_token(
    config: &Config,
    user_id: Uuid,
    company_id: Uuid,
    role: UserRole,
) -> anyhow::Result<String> {
    let expiration = Utc::now() + Duration::days(30);
    let claims = Claims {
        sub: user_id,
        company_id,
        role,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            role,
            exp: 0,
        }
    }

    #[test]
    fn staff_roles_have_booking_access() {
        assert!(claims(UserRole::Admin).requires_booking_access().is_ok());
        assert!(claims(UserRole::Manager).requires_booking_access().is_ok());
        assert!(
            claims(UserRole::OfficeStaff)
                .requires_booking_access()
                .is_ok()
        );
        assert!(claims(UserRole::Agent).requires_booking_access().is_ok());
    }

    #[test]
    fn crew_roles_are_rejected() {
        assert!(claims(UserRole::Captain).requires_booking_access().is_err());
        assert!(claims(UserRole::Sailor).requires_staff().is_err());
        assert!(claims(UserRole::Agent).requires_staff().is_err());
    }

    #[test]
    fn company_check_matches_claim() {
        let c = claims(UserRole::Admin);
        assert!(c.requires_same_company(c.company_id).is_ok());
        assert!(c.requires_same_company(Uuid::new_v4()).is_err());
    }

    #[test]
    fn issued_tokens_round_trip() {
        let config = Config {
            database_url: String::new(),
            jwt_secret: "test-secret".to_string(),
            host: String::new(),
            port: 0,
            environment: "test".to_string(),
            hold_minutes: 15,
            sweep_interval_secs: 60,
            profit_threshold: 10.0,
        };
        let user_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();

        let token = issue_token(&config, user_id, company_id, UserRole::Agent).unwrap();
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, user_id);
        assert_eq!(decoded.claims.company_id, company_id);
        assert_eq!(decoded.claims.role, UserRole::Agent);
    }
}
