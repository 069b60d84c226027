use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::PresetError;
use crate::DEFAULT_PATTERN;

/// A saved, named pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub pattern: String,
}

/// Named patterns, iterated alphabetically by name.
pub trait PresetStore {
    fn list(&self) -> Vec<Preset>;

    fn get(&self, name: &str) -> Option<Preset>;

    /// Add a new preset. Fails if the name is already taken.
    fn create(&mut self, preset: Preset) -> Result<(), PresetError>;

    /// Replace the pattern of an existing preset.
    fn update(&mut self, name: &str, pattern: &str) -> Result<(), PresetError>;

    fn delete(&mut self, name: &str) -> Result<Preset, PresetError>;

    /// Pattern of the first preset, or the bare version pattern.
    fn default_pattern(&self) -> String {
        self.list()
            .into_iter()
            .next()
            .map_or_else(|| DEFAULT_PATTERN.to_string(), |p| p.pattern)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PresetFile {
    #[serde(default)]
    presets: Vec<Preset>,
}

/// Presets persisted as a JSON document.
#[derive(Debug, Clone)]
pub struct JsonPresetStore {
    path: PathBuf,
    presets: BTreeMap<String, String>,
}

impl JsonPresetStore {
    /// Default location, `~/.continue_folder.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".continue_folder.json"))
    }

    fn backup_path(path: &Path) -> PathBuf {
        path.with_extension("json.backup")
    }

    /// Load presets from `path`. A missing file is an empty store; a corrupted
    /// one falls back to its backup.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PresetError> {
        let path = path.into();
        if !path.exists() {
            debug!("no preset file at {}, starting empty", path.display());
            return Ok(Self {
                path,
                presets: BTreeMap::new(),
            });
        }

        let file = match Self::read(&path) {
            Ok(file) => file,
            Err(e @ PresetError::Parse { .. }) => {
                let backup = Self::backup_path(&path);
                warn!("{e}, trying {}", backup.display());
                if !backup.exists() {
                    return Err(e);
                }
                Self::read(&backup).map_err(|_| e)?
            }
            Err(e) => return Err(e),
        };

        let presets = file
            .presets
            .into_iter()
            .map(|p| (p.name, p.pattern))
            .collect();
        Ok(Self { path, presets })
    }

    fn read(path: &Path) -> Result<PresetFile, PresetError> {
        let data = fs::read_to_string(path).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| PresetError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write presets to disk, keeping the previous file as a backup.
    pub fn save(&self) -> Result<(), PresetError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| PresetError::Io { path, source }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        if self.path.exists() {
            let backup = Self::backup_path(&self.path);
            fs::copy(&self.path, &backup).map_err(io_err(backup.as_path()))?;
        }

        // Write to temp file first
        let temp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&PresetFile { presets: self.list() }).map_err(
            |source| PresetError::Parse {
                path: self.path.clone(),
                source,
            },
        )?;
        fs::write(&temp, data).map_err(io_err(temp.as_path()))?;
        fs::rename(&temp, &self.path).map_err(io_err(self.path.as_path()))?;

        debug!("saved {} presets to {}", self.presets.len(), self.path.display());
        Ok(())
    }
}

impl PresetStore for JsonPresetStore {
    fn list(&self) -> Vec<Preset> {
        self.presets
            .iter()
            .map(|(name, pattern)| Preset {
                name: name.clone(),
                pattern: pattern.clone(),
            })
            .collect()
    }

    fn get(&self, name: &str) -> Option<Preset> {
        self.presets.get(name).map(|pattern| Preset {
            name: name.to_string(),
            pattern: pattern.clone(),
        })
    }

    fn create(&mut self, preset: Preset) -> Result<(), PresetError> {
        if self.presets.contains_key(&preset.name) {
            return Err(PresetError::Duplicate(preset.name));
        }
        self.presets.insert(preset.name, preset.pattern);
        Ok(())
    }

    fn update(&mut self, name: &str, pattern: &str) -> Result<(), PresetError> {
        match self.presets.get_mut(name) {
            Some(existing) => {
                *existing = pattern.to_string();
                Ok(())
            }
            None => Err(PresetError::NotFound(name.to_string())),
        }
    }

    fn delete(&mut self, name: &str) -> Result<Preset, PresetError> {
        self.presets
            .remove(name)
            .map(|pattern| Preset {
                name: name.to_string(),
                pattern,
            })
            .ok_or_else(|| PresetError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(name: &str, pattern: &str) -> Preset {
        Preset {
            name: name.to_string(),
            pattern: pattern.to_string(),
        }
    }

    fn empty_store(dir: &Path) -> JsonPresetStore {
        JsonPresetStore::load(dir.join("presets.json")).unwrap()
    }

    #[test]
    fn missing_file_uses_default_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let store = empty_store(dir.path());
        assert!(store.list().is_empty());
        assert_eq!(store.default_pattern(), "{version}");
    }

    #[test]
    fn presets_list_alphabetically() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(dir.path());
        store.create(preset("zeta", "z_{version}")).unwrap();
        store.create(preset("alpha", "a_{version}")).unwrap();

        let names: Vec<_> = store.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(store.default_pattern(), "a_{version}");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(dir.path());
        store.create(preset("daily", "{YYYY}{MM}{DD}")).unwrap();
        let err = store.create(preset("daily", "other")).unwrap_err();
        assert!(matches!(err, PresetError::Duplicate(name) if name == "daily"));

        store.update("daily", "{YY}{MM}{DD}_{version}").unwrap();
        assert_eq!(store.get("daily").unwrap().pattern, "{YY}{MM}{DD}_{version}");
    }

    #[test]
    fn update_and_delete_need_existing_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(dir.path());
        assert!(matches!(store.update("nope", "x"), Err(PresetError::NotFound(_))));
        assert!(matches!(store.delete("nope"), Err(PresetError::NotFound(_))));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(dir.path());
        store.create(preset("shots", "sh{version###}")).unwrap();
        store.save().unwrap();

        let reloaded = JsonPresetStore::load(store.path()).unwrap();
        assert_eq!(reloaded.list(), [preset("shots", "sh{version###}")]);
    }

    #[test]
    fn corrupted_file_falls_back_to_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(dir.path());
        store.create(preset("first", "f{version}")).unwrap();
        store.save().unwrap();
        // second save copies the first file to the backup
        store.create(preset("second", "s{version}")).unwrap();
        store.save().unwrap();

        fs::write(store.path(), "{ not json").unwrap();
        let reloaded = JsonPresetStore::load(store.path()).unwrap();
        assert_eq!(reloaded.list(), [preset("first", "f{version}")]);
    }

    #[test]
    fn corrupted_file_without_backup_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, "[1, 2").unwrap();
        let err = JsonPresetStore::load(&path).unwrap_err();
        assert!(matches!(err, PresetError::Parse { .. }));
    }
}
