use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One comment-archive lookup: work, episode, and video length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub work_title: String,
    pub episode_title: Option<String>,
    /// Video duration in seconds.
    pub duration: u32,
}

/// `PT1H2M3S` as found in video microformat data.
static RE_TIMECODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:([0-9]{1,6})H)?(?:([0-9]{1,6})M)?(?:([0-9]{1,6})S)?$").unwrap()
});

/// Parse an ISO-8601 duration (`PT1H2M3S`) or plain seconds into seconds.
///
/// Returns `None` for anything else, including a bare `PT`.
pub fn parse_timecode(input: &str) -> Option<u32> {
    let input = input.trim();
    if let Ok(seconds) = input.parse::<u32>() {
        return Some(seconds);
    }

    let caps = RE_TIMECODE.captures(input)?;
    let mut total: u32 = 0;
    let mut matched = false;
    for (group, scale) in [(1, 3600u32), (2, 60), (3, 1)] {
        if let Some(m) = caps.get(group) {
            let value: u32 = m.as_str().parse().ok()?;
            total = value.checked_mul(scale)?.checked_add(total)?;
            matched = true;
        }
    }
    matched.then_some(total)
}
