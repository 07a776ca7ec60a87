#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub pix: PixApi,
    pub collection: Collection,
    pub billing: Billing,
}

/// Billing runs on the school's local calendar, not UTC.
#[derive(Debug, Clone)]
pub struct Billing {
    pub utc_offset_hours: i32,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub jwt_secret: String,
}

/// Payment provider settings. The API key is optional: without it the
/// collection workflow still runs, just without a payment link.
#[derive(Debug, Clone)]
pub struct PixApi {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub whatsapp_base_url: String,
    pub country_code: String,
}
