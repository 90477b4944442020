use std::env;

use charterdesk::config::Config;
use pretty_assertions::assert_eq;
use serial_test::serial;

const ENV_KEYS: [&str; 8] = [
    "DATABASE_URL",
    "JWT_SECRET",
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "HOLD_MINUTES",
    "SWEEP_INTERVAL_SECS",
    "PROFIT_THRESHOLD",
];

fn snapshot_env() -> Vec<(&'static str, Option<String>)> {
    ENV_KEYS.iter().map(|k| (*k, env::var(k).ok())).collect()
}

fn restore_env(saved: Vec<(&'static str, Option<String>)>) {
    for (key, value) in saved {
        unsafe {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn config_defaults_apply_without_env() {
    let saved = snapshot_env();
    for key in ENV_KEYS {
        unsafe {
            env::remove_var(key);
        }
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.environment, "development");
    assert_eq!(config.hold_minutes, 15);
    assert_eq!(config.sweep_interval_secs, 60);
    assert_eq!(config.profit_threshold, 10.0);

    restore_env(saved);
}

#[test]
#[serial]
fn config_reads_custom_values() {
    let saved = snapshot_env();
    unsafe {
        env::set_var("DATABASE_URL", "postgres://test@localhost/charterdesk_test");
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("HOST", "0.0.0.0");
        env::set_var("PORT", "3000");
        env::set_var("ENVIRONMENT", "production");
        env::set_var("HOLD_MINUTES", "30");
        env::set_var("SWEEP_INTERVAL_SECS", "15");
        env::set_var("PROFIT_THRESHOLD", "25.5");
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(
        config.database_url,
        "postgres://test@localhost/charterdesk_test"
    );
    assert_eq!(config.jwt_secret, "test-secret");
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.environment, "production");
    assert_eq!(config.hold_minutes, 30);
    assert_eq!(config.sweep_interval_secs, 15);
    assert_eq!(config.profit_threshold, 25.5);

    restore_env(saved);
}

#[test]
#[serial]
fn invalid_numeric_values_fall_back_to_defaults() {
    let saved = snapshot_env();
    unsafe {
        env::set_var("PORT", "not_a_port");
        env::set_var("HOLD_MINUTES", "soon");
        env::set_var("SWEEP_INTERVAL_SECS", "often");
    }

    let config = Config::from_env_only().unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.hold_minutes, 15);
    assert_eq!(config.sweep_interval_secs, 60);

    restore_env(saved);
}

#[test]
fn environment_detection() {
    let mut config = Config {
        database_url: "test".to_string(),
        jwt_secret: "test".to_string(),
        host: "localhost".to_string(),
        port: 8080,
        environment: "production".to_string(),
        hold_minutes: 15,
        sweep_interval_secs: 60,
        profit_threshold: 10.0,
    };

    assert!(config.is_production());
    assert!(!config.is_development());

    config.environment = "development".to_string();
    assert!(!config.is_production());
    assert!(config.is_development());
}

#[test]
fn server_address_formatting() {
    let config = Config {
        database_url: "test".to_string(),
        jwt_secret: "test".to_string(),
        host: "192.168.1.1".to_string(),
        port: 9000,
        environment: "test".to_string(),
        hold_minutes: 15,
        sweep_interval_secs: 60,
        profit_threshold: 10.0,
    };

    assert_eq!(config.server_address(), "192.168.1.1:9000");
}
