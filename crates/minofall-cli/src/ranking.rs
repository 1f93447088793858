use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use log::warn;
use minofall_engine::Ranking;
use serde::{Deserialize, Serialize};

const MAX_ENTRIES: usize = 10;

/// One high-score entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub score: u64,
    pub achieved_at: DateTime<Utc>,
}

/// Top-10 score list persisted as a JSON file.
///
/// Loading is best effort: a missing or malformed file starts an empty
/// list rather than failing the game.
#[derive(Debug)]
pub struct FileRanking {
    path: PathBuf,
    entries: Vec<RankingEntry>,
}

impl FileRanking {
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("ignoring malformed ranking file {}: {err}", path.display());
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!("cannot read ranking file {}: {err}", path.display());
                Vec::new()
            }
        };
        Self { path, entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    /// Highest recorded score.
    #[must_use]
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|entry| entry.score)
    }
}

impl Ranking for FileRanking {
    fn insert_score(&mut self, score: u64) {
        self.entries.push(RankingEntry {
            score,
            achieved_at: Utc::now(),
        });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    fn save(&mut self) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.entries)
            .map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("minofall-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn keeps_scores_sorted_and_truncated() {
        let mut ranking = FileRanking::load_or_default(temp_path("sorted"));
        for score in [300, 100, 1200, 700, 40, 9000, 2, 55, 800, 650, 431, 77] {
            ranking.insert_score(score);
        }

        let scores: Vec<u64> = ranking.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores.len(), MAX_ENTRIES);
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(ranking.best(), Some(9000));
    }

    #[test]
    fn survives_a_save_load_round_trip() {
        let path = temp_path("roundtrip");
        let mut ranking = FileRanking::load_or_default(&path);
        ranking.insert_score(1200);
        ranking.insert_score(300);
        ranking.save().unwrap();

        let reloaded = FileRanking::load_or_default(&path);
        let scores: Vec<u64> = reloaded.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![1200, 300]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_starts_empty() {
        let ranking = FileRanking::load_or_default(temp_path("does-not-exist"));
        assert!(ranking.entries().is_empty());
        assert_eq!(ranking.best(), None);
    }

    #[test]
    fn malformed_file_starts_empty() {
        let path = temp_path("malformed");
        fs::write(&path, "not json at all").unwrap();

        let ranking = FileRanking::load_or_default(&path);
        assert!(ranking.entries().is_empty());

        let _ = fs::remove_file(&path);
    }
}
