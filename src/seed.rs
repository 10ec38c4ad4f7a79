//! Seed dataset loading
//!
//! The collection is rebuilt from this dataset on every process start; any
//! documents written since the previous start are discarded.

use std::fs;

use crate::config::SeedSection;
use crate::types::Song;
use crate::Result;

/// Bundled seed dataset
pub const DEFAULT_SEED: &str = include_str!("../data/songs.json");

/// Load the seed dataset, preferring a configured override path
pub fn load(config: &SeedSection) -> Result<Vec<Song>> {
    match &config.path {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(serde_json::from_str(DEFAULT_SEED)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_dataset_parses() {
        let songs = load(&SeedSection::default()).unwrap();
        assert!(!songs.is_empty());

        let mut ids: Vec<_> = songs.iter().map(|song| song.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), songs.len(), "seed ids must be unique");
    }

    #[test]
    fn override_path_is_preferred() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 99, "title": "override"}}]"#).unwrap();

        let config = SeedSection {
            path: Some(file.path().to_path_buf()),
        };
        let songs = load(&config).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, 99);
    }

    #[test]
    fn missing_override_path_is_an_error() {
        let config = SeedSection {
            path: Some("/nonexistent/songs.json".into()),
        };
        assert!(load(&config).is_err());
    }
}
