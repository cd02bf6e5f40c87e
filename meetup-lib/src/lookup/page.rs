use regex::Regex;
use uuid::Uuid;

const PUBLIC_MEETUP_PATTERN: &str =
    r"https://niantic-social\.nianticlabs\.com/public/meetup/(.{8}-.{4}-.{4}-.{4}-.{12})";

pub(crate) fn public_meetup_pattern() -> Result<Regex, regex::Error> {
    Regex::new(PUBLIC_MEETUP_PATTERN)
}

/// Finds the public meetup id the short link page redirects to.
pub(crate) fn public_meetup_id(pattern: &Regex, html: &str) -> Option<String> {
    pattern
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .map(|id| id.as_str())
        .find(|id| Uuid::parse_str(id).is_ok())
        .map(str::to_string)
}
