//! API credential lookup

/// Environment variable holding the advert API bearer token
pub const TOKEN_ENV_VAR: &str = "TOKEN";

/// Read the advert API token from the environment
///
/// An unset (or non-UTF-8) variable yields an empty string; callers treat
/// an empty token as "nothing to do".
pub fn get_token() -> String {
    std::env::var(TOKEN_ENV_VAR).unwrap_or_default()
}
