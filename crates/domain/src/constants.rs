//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Toornament API
pub const DEFAULT_API_BASE_URL: &str = "https://api.toornament.com";
pub const TOKEN_ENDPOINT_PATH: &str = "/oauth/v2/token";
pub const ORGANIZER_API_PATH: &str = "/organizer/v2";
pub const TOKEN_SCOPE: &str = "organizer:participant";
pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

// Pagination
pub const PARTICIPANTS_RANGE_UNIT: &str = "participants";
pub const PARTICIPANTS_PAGE_SIZE: u32 = 50;

// Request pacing (3 requests per second)
pub const DEFAULT_RATE_LIMIT_MS: u64 = 333;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Bearer tokens are refreshed this long before they actually expire
pub const DEFAULT_TOKEN_MARGIN_SECS: i64 = 60;

// Credential file timestamp format, e.g. "31.05.2020, 14:24:46"
pub const EXPIRY_DATE_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

// Bot configuration
pub const TEAM_ROLE_TEMPLATE_KEY: &str = "team_role_template";
pub const DEFAULT_TEAM_ROLE_TEMPLATE: &str = "716961342069669909";

// Local cache
pub const DEFAULT_SQLITE_PATH: &str = "rosterlink.db";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
