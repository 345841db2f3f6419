//! GitHub signals rate limits through HTTP 403/429 responses and GraphQL
//! errors mentioning "rate limit". Both surface here as error text.

/// Whether `error` looks like a GitHub rate limit.
pub(crate) fn is_rate_limited(error: &anyhow::Error) -> bool {
    let msg = format!("{error:#}").to_lowercase();
    msg.contains("rate limit") || msg.contains("status code: 429") || msg.contains("429 too many")
}

/// User-facing message for a fetch failure, with a retry hint for rate limits.
pub(crate) fn describe_fetch_error(error: &anyhow::Error) -> String {
    if !is_rate_limited(error) {
        return format!("{error:#}");
    }
    if format!("{error:#}").to_lowercase().contains("secondary rate limit") {
        "Secondary rate limit hit, wait a moment then press R to retry".to_owned()
    } else {
        "API rate limit exceeded, press R to retry".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn detects_rate_limit_exceeded() {
        assert!(is_rate_limited(&anyhow!("API rate limit exceeded for user")));
    }

    #[test]
    fn detects_429_status() {
        assert!(is_rate_limited(&anyhow!("HTTP status code: 429")));
        assert!(is_rate_limited(&anyhow!(
            "HTTP status client error (429 Too Many Requests)"
        )));
    }

    #[test]
    fn plain_errors_pass_through() {
        let err = anyhow!("network timeout").context("requesting /api/search");
        assert!(!is_rate_limited(&err));
        assert_eq!(
            describe_fetch_error(&err),
            "requesting /api/search: network timeout"
        );
    }

    #[test]
    fn secondary_limit_gets_its_own_hint() {
        let msg = describe_fetch_error(&anyhow!("You have exceeded a secondary rate limit"));
        assert!(msg.starts_with("Secondary rate limit"));
        let primary = describe_fetch_error(&anyhow!("API rate limit exceeded"));
        assert!(primary.starts_with("API rate limit exceeded"));
    }
}
