use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use launcher_core::ProgramRow;
use launcher_engine::{AtomicFileWriter, PersistError};
use launcher_logging::{launcher_debug, launcher_info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize programs: {0}")]
    Serialize(#[from] ron::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("program '{0}' not found")]
    NotFound(String),
    #[error("a program named '{0}' already exists")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramStep {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub name: String,
    pub created_at: String,
    pub steps: Vec<ProgramStep>,
}

impl ProgramRecord {
    pub fn prompts(&self) -> Vec<String> {
        self.steps.iter().map(|step| step.prompt.clone()).collect()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgramFile {
    programs: Vec<ProgramRecord>,
}

/// Saved programs, kept as one RON file. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct ProgramStore {
    path: PathBuf,
}

impl ProgramStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows for the launcher table, oldest first.
    pub fn rows(&self) -> Result<Vec<ProgramRow>, StoreError> {
        Ok(self
            .load()?
            .programs
            .into_iter()
            .map(|program| ProgramRow {
                name: program.name,
                created_at: program.created_at,
            })
            .collect())
    }

    pub fn get(&self, name: &str) -> Result<ProgramRecord, StoreError> {
        self.load()?
            .programs
            .into_iter()
            .find(|program| program.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn create(&self, name: &str, prompt: &str, created_at: &str) -> Result<(), StoreError> {
        let mut file = self.load()?;
        if file.programs.iter().any(|program| program.name == name) {
            return Err(StoreError::Duplicate(name.to_string()));
        }
        file.programs.push(ProgramRecord {
            name: name.to_string(),
            created_at: created_at.to_string(),
            steps: vec![ProgramStep {
                prompt: prompt.to_string(),
            }],
        });
        self.save(&file)?;
        launcher_info!("Created program '{}'", name);
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut file = self.load()?;
        let before = file.programs.len();
        file.programs.retain(|program| program.name != name);
        if file.programs.len() == before {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.save(&file)?;
        launcher_info!("Deleted program '{}'", name);
        Ok(())
    }

    fn load(&self) -> Result<ProgramFile, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                launcher_debug!("No program store at {:?} yet", self.path);
                return Ok(ProgramFile::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, file: &ProgramFile) -> Result<(), StoreError> {
        let content = ron::ser::to_string_pretty(file, ron::ser::PrettyConfig::new())?;
        let filename = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "programs.ron".to_string());
        AtomicFileWriter::for_file(&self.path).write(&filename, &content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ProgramStore, StoreError};
    use std::fs;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ProgramStore {
        ProgramStore::new(dir.path().join("programs.ron"))
    }

    fn names(store: &ProgramStore) -> Vec<String> {
        store.rows().unwrap().into_iter().map(|row| row.name).collect()
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.rows().unwrap().is_empty());
    }

    #[test]
    fn create_list_get_delete() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .create("Standup", "Summarize my day.", "2026-10-19T09:00:00+00:00")
            .unwrap();
        store
            .create("Haiku", "Write a haiku.", "2026-10-19T10:00:00+00:00")
            .unwrap();

        assert_eq!(names(&store), vec!["Standup", "Haiku"]);
        let rows = store.rows().unwrap();
        assert_eq!(rows[0].created_at, "2026-10-19T09:00:00+00:00");

        let record = store.get("Haiku").unwrap();
        assert_eq!(record.prompts(), vec!["Write a haiku.".to_string()]);

        store.delete("Standup").unwrap();
        assert_eq!(names(&store), vec!["Haiku"]);
        assert!(matches!(store.get("Standup"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.create("Haiku", "one", "t").unwrap();
        assert!(matches!(
            store.create("Haiku", "two", "t"),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn deleting_unknown_program_fails() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(matches!(
            store.delete("ghost"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn corrupt_file_reports_parse_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "(programs: [oops").unwrap();
        assert!(matches!(store.rows(), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn hand_written_multi_step_program_loads() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"(programs: [(name: "Tour", created_at: "2026-01-01", steps: [(prompt: "Hi"), (prompt: "Next")])])"#,
        )
        .unwrap();
        assert_eq!(
            store.get("Tour").unwrap().prompts(),
            vec!["Hi".to_string(), "Next".to_string()]
        );
    }
}
