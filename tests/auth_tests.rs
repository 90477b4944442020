use actix_web::{FromRequest, test, web};
use uuid::Uuid;

use charterdesk::auth::{Claims, UserRole, issue_token};
use charterdesk::config::Config;

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        jwt_secret: "integration-test-secret".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        hold_minutes: 15,
        sweep_interval_secs: 60,
        profit_threshold: 10.0,
    }
}

#[actix_web::test]
async fn valid_bearer_token_yields_claims() {
    let config = test_config();
    let user_id = Uuid::new_v4();
    let company_id = Uuid::new_v4();
    let token = issue_token(&config, user_id, company_id, UserRole::OfficeStaff).unwrap();

    let req = test::TestRequest::get()
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .app_data(web::Data::new(config))
        .to_http_request();

    let claims = Claims::extract(&req).await.unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.company_id, company_id);
    assert_eq!(claims.role, UserRole::OfficeStaff);
}

#[actix_web::test]
async fn missing_header_is_rejected() {
    let req = test::TestRequest::get()
        .app_data(web::Data::new(test_config()))
        .to_http_request();

    assert!(Claims::extract(&req).await.is_err());
}

#[actix_web::test]
async fn token_signed_with_wrong_secret_is_rejected() {
    let mut other = test_config();
    other.jwt_secret = "a-different-secret".to_string();
    let token = issue_token(&other, Uuid::new_v4(), Uuid::new_v4(), UserRole::Admin).unwrap();

    let req = test::TestRequest::get()
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .app_data(web::Data::new(test_config()))
        .to_http_request();

    assert!(Claims::extract(&req).await.is_err());
}

#[actix_web::test]
async fn malformed_scheme_is_rejected() {
    let config = test_config();
    let token = issue_token(&config, Uuid::new_v4(), Uuid::new_v4(), UserRole::Agent).unwrap();

    let req = test::TestRequest::get()
        .insert_header(("Authorization", format!("Basic {}", token)))
        .app_data(web::Data::new(config))
        .to_http_request();

    assert!(Claims::extract(&req).await.is_err());
}
