// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Token configuration constants
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
pub const TOKEN_TYPE: &str = "bearer";
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

// Page routes used for redirects
pub const LOGIN_PAGE_PATH: &str = "/auth/login-page";
pub const TODO_PAGE_PATH: &str = "/todo/todo-page";

// Todo field limits (in characters)
pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MIN_LEN: usize = 3;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const PRIORITY_MIN: i64 = 1;
pub const PRIORITY_MAX: i64 = 5;

// Enrichment collaborator
pub const DEFAULT_ENRICH_TIMEOUT_SECS: u64 = 10;
