//! Named parameter presets
//!
//! User presets are client-side snapshots of the "look" parameters, stored
//! as a JSON array next to the config file. Loading one sends its values as
//! a single batch. System presets live in the device firmware and are only
//! selected by index.

use crate::constants::SYSTEM_PRESETS;
use crate::error::{RemoteError, Result};
use crate::params::{ParamKey, ParamPatch, ParameterSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Keys captured by a user preset
pub const PRESET_KEYS: [ParamKey; 9] = [
    ParamKey::Bpm,
    ParamKey::Brightness,
    ParamKey::Direction,
    ParamKey::FixMode,
    ParamKey::BgRotSpeed,
    ParamKey::FgRotSpeed,
    ParamKey::BlendTime,
    ParamKey::BgPaletteIndex,
    ParamKey::FgPaletteIndex,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub params: ParamPatch,
}

/// Ordered, file-backed list of user presets
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    presets: Vec<Preset>,
}

impl PresetStore {
    /// Load presets from `path`
    ///
    /// A missing file is an empty store; an unreadable or corrupt file is
    /// logged and treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let presets = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Preset file {:?} is corrupt: {}, starting empty", path, e);
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Failed to read presets {:?}: {}, starting empty", path, e);
                Vec::new()
            }
        };
        debug!("Loaded {} presets from {:?}", presets.len(), path);
        Self { path, presets }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[Preset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name.trim())
    }

    /// Snapshot the preset keys of `params` under `name` and save
    ///
    /// Capturing an existing name replaces it in place.
    pub fn capture(&mut self, name: &str, params: &ParameterSet) -> Result<&Preset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RemoteError::Preset {
                reason: "preset name must not be empty".into(),
            });
        }

        let preset = Preset {
            name: name.to_string(),
            params: params.subset(&PRESET_KEYS),
        };
        let index = match self.presets.iter().position(|p| p.name == name) {
            Some(i) => {
                self.presets[i] = preset;
                i
            }
            None => {
                self.presets.push(preset);
                self.presets.len() - 1
            }
        };

        self.save()?;
        Ok(&self.presets[index])
    }

    /// Remove `name` and save; returns the removed preset
    pub fn remove(&mut self, name: &str) -> Result<Preset> {
        let name = name.trim();
        let index = self
            .presets
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| RemoteError::Preset {
                reason: format!("no preset named '{}'", name),
            })?;
        let removed = self.presets.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Write the current list, including an empty one
    pub fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.presets).map_err(|e| RemoteError::Preset {
                reason: e.to_string(),
            })?;
        fs::write(&self.path, content).map_err(|e| RemoteError::PresetIo {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Index of a firmware preset, by index string or case-insensitive name
pub fn system_preset_index(query: &str) -> Option<usize> {
    let query = query.trim();
    if let Ok(index) = query.parse::<usize>() {
        return (index < SYSTEM_PRESETS.len()).then_some(index);
    }
    SYSTEM_PRESETS
        .iter()
        .position(|name| name.eq_ignore_ascii_case(query))
}

// ============================================================================
// Tests
// ============================================================================
