/// Application constants

// Upstream defaults
pub const ETHERSCAN_API: &str = "https://api.etherscan.io/api";
pub const COINGECKO_API: &str = "https://api.coingecko.com/api/v3";
pub const NATIVE_PRICE_ASSET_ID: &str = "ethereum";
pub const PRICE_QUOTE_CURRENCY: &str = "usd";

// Explorer envelope
pub const EXPLORER_STATUS_OK: &str = "1";
pub const EXPLORER_NO_RECORDS_MESSAGES: &[&str] = &[
    "No transactions found",
    "No token transfers found",
    "No records found",
];

// Client-side history bounds (block range used when no start time is sent)
pub const HISTORY_START_BLOCK: u64 = 0;
pub const HISTORY_END_BLOCK: u64 = 99_999_999;

// History window
pub const HISTORY_WINDOW_DAYS_DEFAULT: u32 = 30;
pub const SECONDS_PER_DAY: i64 = 86_400;

// Fixed-point scale applied to fiat prices before any balance math
pub const PRICE_SCALE_DECIMALS: usize = 18;
pub const NATIVE_PRICE_FALLBACK: f64 = 1.0;

// Server
pub const DEFAULT_PORT: u16 = 8080;
