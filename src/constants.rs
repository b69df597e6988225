pub mod cache {

    pub const WEATHER_TTL_MINUTES: i64 = 30;

    pub const WEATHER_KEY_PREFIX: &str = "weather";
}

pub mod history {

    pub const MAX_ENTRIES_PER_USER: u64 = 5;

    pub const MAX_ATTEMPTS: u32 = 3;

    pub const ATTEMPT_TIMEOUT_SECONDS: u64 = 60;
}

pub mod limits {

    pub const DEFAULT_PAGE_SIZE: u64 = 10;

    pub const MAX_PAGE_SIZE: u64 = 100;

    pub const CITY_MIN_LEN: usize = 3;

    pub const CITY_MAX_LEN: usize = 30;

    pub const NAME_MIN_LEN: usize = 3;

    pub const NAME_MAX_LEN: usize = 30;

    pub const EMAIL_MIN_LEN: usize = 6;

    pub const EMAIL_MAX_LEN: usize = 80;

    pub const PASSWORD_MIN_LEN: usize = 8;

    pub const PASSWORD_MAX_LEN: usize = 20;
}

pub mod auth {

    pub const TOKEN_NAME: &str = "auth_token";

    pub const TOKEN_TYPE: &str = "Bearer";

    pub const DEFAULT_GUARD: &str = "web";
}
