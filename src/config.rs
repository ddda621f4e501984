//! Service configuration parsed from environment variables.
//!
//! Every value has a default, so the service always starts. The LLM client
//! has its own config in [`crate::llm::config`] and is optional.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SUGGEST_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_SUGGEST_MAX_MAGNETS: usize = 200;

/// Limits applied to each suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestLimits {
    /// Output token cap passed to the LLM.
    pub max_tokens: u32,
    /// Largest magnet list accepted in one request.
    pub max_magnets: usize,
}

impl Default for SuggestLimits {
    fn default() -> Self {
        Self { max_tokens: DEFAULT_SUGGEST_MAX_TOKENS, max_magnets: DEFAULT_SUGGEST_MAX_MAGNETS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub suggest: SuggestLimits,
}

impl ServerConfig {
    /// Read `PORT`, `SUGGEST_MAX_TOKENS` and `SUGGEST_MAX_MAGNETS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] over any key/value source.
    /// Unparseable values fall back to their defaults with a warning.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: parse_or("PORT", lookup("PORT"), DEFAULT_PORT),
            suggest: SuggestLimits {
                max_tokens: parse_or("SUGGEST_MAX_TOKENS", lookup("SUGGEST_MAX_TOKENS"), DEFAULT_SUGGEST_MAX_TOKENS),
                max_magnets: parse_or("SUGGEST_MAX_MAGNETS", lookup("SUGGEST_MAX_MAGNETS"), DEFAULT_SUGGEST_MAX_MAGNETS),
            },
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(%key, value = %raw, "invalid config value, using default");
            default
        }
    }
}
