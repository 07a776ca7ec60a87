use anyhow::{Ok, Result};

use super::config_model::{Auth, Billing, Collection, Database, DotEnvyConfig, PixApi, Server};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let auth = Auth {
        jwt_secret: std::env::var("AUTH_JWT_SECRET").expect("AUTH_JWT_SECRET is invalid"),
    };

    let pix = PixApi {
        api_url: std::env::var("PIX_API_URL").unwrap_or_default(),
        api_key: std::env::var("PIX_API_KEY").ok(),
        timeout_seconds: std::env::var("PIX_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?,
    };

    let collection = Collection {
        whatsapp_base_url: std::env::var("WHATSAPP_BASE_URL")
            .unwrap_or_else(|_| "https://wa.me".to_string()),
        country_code: std::env::var("WHATSAPP_COUNTRY_CODE")
            .unwrap_or_else(|_| "55".to_string()),
    };

    let billing = Billing {
        utc_offset_hours: std::env::var("BILLING_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "-3".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        pix,
        collection,
        billing,
    })
}
