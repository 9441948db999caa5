//! HTTP cache control module

/// Cache-Control policy attached to a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Revalidate on every use
    NoCache,
}

impl CachePolicy {
    /// Policy for files relayed from upstream: one hour
    pub const UPSTREAM_FILE: Self = Self::Public(3600);

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_policy() {
        assert_eq!(
            CachePolicy::UPSTREAM_FILE.to_header_value(),
            "public, max-age=3600"
        );
        assert_eq!(CachePolicy::NoCache.to_header_value(), "no-cache");
    }
}
