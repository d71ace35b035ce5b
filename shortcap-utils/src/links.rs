use std::sync::LazyLock;

use regex::Regex;

/// Desktop and mobile Shorts URLs. Anything after the video id is ignored.
static SHORTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?(?:m\.)?youtube\.com/shorts/[a-z0-9_-]{5,}(?:[/?#&]\S*)?")
        .expect("SHORTS_REGEX is a compile-time constant")
});

/// Classifies message text as containing zero or more qualifying links.
pub trait LinkMatcher {
    fn find_links<'a>(&self, text: &'a str) -> Vec<&'a str>;

    fn has_links(&self, text: &str) -> bool {
        !self.find_links(text).is_empty()
    }
}

/// Matches YouTube Shorts links.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortsLinkMatcher;

impl LinkMatcher for ShortsLinkMatcher {
    fn find_links<'a>(&self, text: &'a str) -> Vec<&'a str> {
        find_shorts_links(text)
    }

    fn has_links(&self, text: &str) -> bool {
        contains_shorts_link(text)
    }
}

/// Return every Shorts link in `text`, in order of appearance.
pub fn find_shorts_links(text: &str) -> Vec<&str> {
    SHORTS_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn contains_shorts_link(text: &str) -> bool {
    SHORTS_REGEX.is_match(text)
}
