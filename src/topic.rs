use once_cell::sync::Lazy;
use regex::Regex;

// ASCII letters only; `\s` keeps the regex crate's Unicode whitespace class.
static TOPIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s-]+$").unwrap());

pub fn is_valid_topic(topic: &str) -> bool {
    if topic.is_empty() {
        return false;
    }
    TOPIC_RE.is_match(topic)
}
