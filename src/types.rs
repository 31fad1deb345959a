use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Membership-only set of tags.
pub type TagSet = HashSet<String>;

/// Split `raw` on `delimiter`, trimming tokens and discarding empty ones.
pub fn parse_tags(raw: &str, delimiter: char) -> TagSet {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub tags: TagSet,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

impl Record {
    pub fn new<I, S>(id: impl Into<String>, tags: I, views: u64, likes: u64, comments: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            views,
            likes,
            comments,
        }
    }
}

/// Distance from the query to the record at `index` in the dataset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prediction {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}
