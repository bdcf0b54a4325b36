use serde::{Deserialize, Serialize};

use crate::query::SearchQuery;

/// Metadata evaluated from a video title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedMeta {
    /// The work title.
    pub title: Option<String>,
    /// Season designator as written (e.g., "第2期", "2nd season").
    pub season: Option<String>,
    /// Episodes in ascending order. Number 0 marks an episode inferred from
    /// title text alone.
    pub episodes: Vec<EvaluatedEpisode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedEpisode {
    pub number: u32,
    /// Episode subtitle.
    pub title: Option<String>,
}

impl EvaluatedMeta {
    /// Comment-archive lookups for each episode, given the video duration in
    /// seconds. Empty when no title was found.
    pub fn search_queries(&self, duration: u32) -> Vec<SearchQuery> {
        let Some(title) = &self.title else {
            return Vec::new();
        };
        let work_title = match &self.season {
            Some(season) => format!("{title} {season}"),
            None => title.clone(),
        };

        self.episodes
            .iter()
            .map(|episode| {
                let episode_title = match (episode.number, &episode.title) {
                    (0, subtitle) => subtitle.clone(),
                    (n, Some(subtitle)) => Some(format!("第{n}話 {subtitle}")),
                    (n, None) => Some(format!("第{n}話")),
                };
                SearchQuery {
                    work_title: work_title.clone(),
                    episode_title,
                    duration,
                }
            })
            .collect()
    }
}
