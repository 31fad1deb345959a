use std::io::Write;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::Record;

pub const TAG_POOL: [&str; 15] = [
    "dance", "funny", "cat", "dog", "challenge", "meme", "food", "travel", "fitness", "makeup",
    "gaming", "tutorial", "music", "comedy", "sports",
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub rows: usize,
    pub max_tags: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_1234_ABCD,
            rows: 100,
            max_tags: 4,
        }
    }
}

pub fn generate_synthetic(config: &SyntheticConfig) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let max_tags = config.max_tags.clamp(1, TAG_POOL.len());
    let mut out = Vec::with_capacity(config.rows);
    for id in 1..=config.rows {
        let n_tags = rng.gen_range(1..=max_tags);
        let tags: Vec<&str> = TAG_POOL.choose_multiple(&mut rng, n_tags).copied().collect();
        let views: u64 = rng.gen_range(1_000..=1_000_000);
        // Engagement scales with reach.
        let likes = (views as f64 * rng.gen_range(0.05..0.2)) as u64;
        let comments = (views as f64 * rng.gen_range(0.01..0.05)) as u64;
        out.push(Record::new(id.to_string(), tags, views, likes, comments));
    }
    out
}

/// Write records in the loader's format, header included.
pub fn write_csv<W: Write>(records: &[Record], mut out: W) -> std::io::Result<()> {
    writeln!(out, "id,tags,views,likes,comments")?;
    for r in records {
        let mut tags: Vec<&str> = r.tags.iter().map(String::as_str).collect();
        tags.sort_unstable();
        writeln!(
            out,
            "{},{},{},{},{}",
            r.id,
            tags.join(";"),
            r.views,
            r.likes,
            r.comments
        )?;
    }
    out.flush()
}
