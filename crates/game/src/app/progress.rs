use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use osinter_platform::{read_document_text, write_document_atomic, DocumentIoError, DocumentText};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::levels::City;

/// Live player state for the running session. `completed` is the award-once
/// record: points only move when a (city, level) pair first enters it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub points: u32,
    pub completed: BTreeMap<City, BTreeSet<u8>>,
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error(
        "save document {path} is corrupt: {detail}\n\
The file has been left untouched. Fix it by hand or delete it to start fresh."
    )]
    CorruptDocument { path: PathBuf, detail: String },
    #[error(transparent)]
    Io(#[from] DocumentIoError),
}

/// Completion marker stored in the save document, serialized as the string
/// "completed" so the document stays readable by hand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum CompletionFlag {
    #[serde(rename = "completed")]
    Completed,
}

/// On-disk shape: `{ name, points, levels: { city: { level_id: "completed" } } }`.
/// BTreeMaps keep the key order stable so load-then-save reproduces the file.
#[derive(Debug, Serialize, Deserialize)]
struct SaveDocument {
    name: String,
    points: u32,
    #[serde(default)]
    levels: BTreeMap<City, BTreeMap<u8, CompletionFlag>>,
}

impl SaveDocument {
    fn from_player(player: &Player) -> Self {
        let levels = player
            .completed
            .iter()
            .map(|(city, ids)| {
                let marks = ids
                    .iter()
                    .map(|id| (*id, CompletionFlag::Completed))
                    .collect();
                (*city, marks)
            })
            .collect();
        Self {
            name: player.name.clone(),
            points: player.points,
            levels,
        }
    }

    fn into_player(self) -> Player {
        let completed = self
            .levels
            .into_iter()
            .map(|(city, marks)| (city, marks.into_keys().collect()))
            .collect();
        Player {
            name: self.name,
            points: self.points,
            completed,
        }
    }
}

/// Owns the save document for the session. There is exactly one writer, so
/// atomic replacement on save is all the coordination needed.
#[derive(Debug)]
pub struct ProgressStore {
    save_path: PathBuf,
    player: Player,
}

impl ProgressStore {
    /// Opens the save document, starting fresh when none exists. A document
    /// that exists but does not parse is fatal and is left untouched on disk.
    pub fn open(save_path: PathBuf) -> Result<Self, ProgressError> {
        let player = match read_document_text(&save_path)? {
            DocumentText::Missing => {
                info!(path = %save_path.display(), "save_document_missing_starting_fresh");
                Player::default()
            }
            DocumentText::Present(raw) => parse_save_document(&raw, &save_path)?.into_player(),
        };
        Ok(Self { save_path, player })
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn set_player_name(&mut self, name: &str) {
        if self.player.name != name {
            self.player.name = name.to_string();
        }
    }

    pub fn is_completed(&self, city: City, level_id: u8) -> bool {
        self.player
            .completed
            .get(&city)
            .is_some_and(|ids| ids.contains(&level_id))
    }

    /// Records a completion and awards its points at most once. Returns true
    /// only when the level was newly completed.
    pub fn mark_completed(&mut self, city: City, level_id: u8, point_value: u32) -> bool {
        let newly = self
            .player
            .completed
            .entry(city)
            .or_default()
            .insert(level_id);
        if newly {
            self.player.points += point_value;
            info!(
                city = city.name(),
                level = level_id,
                points = self.player.points,
                "level_completed"
            );
        }
        newly
    }

    pub fn save(&self) -> Result<(), ProgressError> {
        let document = SaveDocument::from_player(&self.player);
        write_document_atomic(&self.save_path, &document)?;
        Ok(())
    }
}

fn parse_save_document(raw: &str, path: &Path) -> Result<SaveDocument, ProgressError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, SaveDocument>(&mut deserializer) {
        Ok(document) => Ok(document),
        Err(error) => {
            let json_path = error.path().to_string();
            let source = error.into_inner();
            let detail = if json_path.is_empty() || json_path == "." {
                source.to_string()
            } else {
                format!("at {json_path}: {source}")
            };
            Err(ProgressError::CorruptDocument {
                path: path.to_path_buf(),
                detail,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_at(dir: &TempDir) -> ProgressStore {
        ProgressStore::open(dir.path().join("save_data.json")).expect("open store")
    }

    #[test]
    fn absent_document_starts_a_fresh_player() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_at(&dir);

        assert_eq!(store.player().name, "");
        assert_eq!(store.player().points, 0);
        assert!(!store.is_completed(City::Portland, 1));
    }

    #[test]
    fn completing_the_same_level_twice_awards_points_once() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = store_at(&dir);

        assert!(store.mark_completed(City::Portland, 3, 100));
        assert_eq!(store.player().points, 100);

        assert!(!store.mark_completed(City::Portland, 3, 100));
        assert_eq!(store.player().points, 100);
        assert!(store.is_completed(City::Portland, 3));
    }

    #[test]
    fn saved_state_survives_a_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("save_data.json");

        let mut store = ProgressStore::open(path.clone()).expect("open");
        store.set_player_name("ana");
        store.mark_completed(City::Eugene, 2, 100);
        store.mark_completed(City::Portland, 5, 100);
        store.save().expect("save");

        let reopened = ProgressStore::open(path).expect("reopen");
        assert_eq!(reopened.player().name, "ana");
        assert_eq!(reopened.player().points, 200);
        assert!(reopened.is_completed(City::Eugene, 2));
        assert!(reopened.is_completed(City::Portland, 5));
        assert!(!reopened.is_completed(City::Corvallis, 1));
    }

    #[test]
    fn document_uses_city_and_level_keys_with_completed_marks() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = store_at(&dir);
        store.set_player_name("ana");
        store.mark_completed(City::Portland, 3, 100);
        store.save().expect("save");

        let raw = fs::read_to_string(dir.path().join("save_data.json")).expect("read");
        let doc: serde_json::Value = serde_json::from_str(&raw).expect("parse");
        assert_eq!(doc["name"], "ana");
        assert_eq!(doc["points"], 100);
        assert_eq!(doc["levels"]["portland"]["3"], "completed");
    }

    #[test]
    fn load_then_save_reproduces_the_document_byte_for_byte() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("save_data.json");

        let mut store = ProgressStore::open(path.clone()).expect("open");
        store.set_player_name("ana");
        store.mark_completed(City::Corvallis, 1, 100);
        store.mark_completed(City::Corvallis, 4, 100);
        store.save().expect("first save");
        let first = fs::read(&path).expect("read first");

        let reopened = ProgressStore::open(path.clone()).expect("reopen");
        reopened.save().expect("second save");
        let second = fs::read(&path).expect("read second");

        assert_eq!(first, second);
    }

    #[test]
    fn corrupt_document_is_fatal_and_left_untouched() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("save_data.json");
        fs::write(&path, "{ \"name\": \"ana\", \"points\": ").expect("write corrupt");

        let error = ProgressStore::open(path.clone()).expect_err("corrupt must fail");
        assert!(matches!(error, ProgressError::CorruptDocument { .. }));
        assert_eq!(
            fs::read_to_string(&path).expect("read back"),
            "{ \"name\": \"ana\", \"points\": "
        );
    }

    #[test]
    fn corrupt_field_error_points_at_the_json_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("save_data.json");
        fs::write(&path, "{\"name\": \"ana\", \"points\": -4, \"levels\": {}}").expect("write");

        let error = ProgressStore::open(path).expect_err("negative points must fail");
        let ProgressError::CorruptDocument { detail, .. } = error else {
            panic!("expected corrupt document error");
        };
        assert!(detail.contains("points"), "detail was: {detail}");
    }
}
