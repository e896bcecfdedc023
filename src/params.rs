//! Device parameter model
//!
//! The device exposes a closed set of named parameters. Each one holds a
//! scalar: an integer, a float, or (for `fixMode`) one of a few string enum
//! values. [`ParameterSet`] always carries a value for every key; partial
//! mappings travel as [`ParamPatch`].

use crate::error::{RemoteError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Keys
// =============================================================================

/// Known parameter keys
///
/// Wire names are the camelCase variant names (`bgRotSpeed`, `fixMode`, ...).
/// Declaration order is the index into [`ParameterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKey {
    Bpm,
    Brightness,
    Direction,
    FixMode,
    BlendTime,
    Preset,
    PowerState,
    BgRotSpeed,
    FgRotSpeed,
    BgLineWidth,
    FgLineWidth,
    BgPaletteIndex,
    FgPaletteIndex,
    AutoAdvancePalette,
    AutoAdvanceDelay,
    NextPalette,
    FgAnimationEnable,
    /// Legacy, unused by current firmware
    CanvasHeight,
    /// Legacy, unused by current firmware
    RasterSpacing,
}

impl ParamKey {
    pub const COUNT: usize = 19;

    pub const ALL: [ParamKey; Self::COUNT] = [
        Self::Bpm,
        Self::Brightness,
        Self::Direction,
        Self::FixMode,
        Self::BlendTime,
        Self::Preset,
        Self::PowerState,
        Self::BgRotSpeed,
        Self::FgRotSpeed,
        Self::BgLineWidth,
        Self::FgLineWidth,
        Self::BgPaletteIndex,
        Self::FgPaletteIndex,
        Self::AutoAdvancePalette,
        Self::AutoAdvanceDelay,
        Self::NextPalette,
        Self::FgAnimationEnable,
        Self::CanvasHeight,
        Self::RasterSpacing,
    ];

    /// Wire name of the key
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bpm => "bpm",
            Self::Brightness => "brightness",
            Self::Direction => "direction",
            Self::FixMode => "fixMode",
            Self::BlendTime => "blendTime",
            Self::Preset => "preset",
            Self::PowerState => "powerState",
            Self::BgRotSpeed => "bgRotSpeed",
            Self::FgRotSpeed => "fgRotSpeed",
            Self::BgLineWidth => "bgLineWidth",
            Self::FgLineWidth => "fgLineWidth",
            Self::BgPaletteIndex => "bgPaletteIndex",
            Self::FgPaletteIndex => "fgPaletteIndex",
            Self::AutoAdvancePalette => "autoAdvancePalette",
            Self::AutoAdvanceDelay => "autoAdvanceDelay",
            Self::NextPalette => "nextPalette",
            Self::FgAnimationEnable => "fgAnimationEnable",
            Self::CanvasHeight => "canvasHeight",
            Self::RasterSpacing => "rasterSpacing",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Value the device is assumed to hold before the first inbound sync
    pub fn default_value(self) -> ParamValue {
        match self {
            Self::Bpm => ParamValue::Int(26),
            Self::Brightness => ParamValue::Int(150),
            Self::Direction => ParamValue::Int(1),
            Self::FixMode => FixMode::None.into(),
            Self::BlendTime => ParamValue::Int(4000),
            Self::Preset => ParamValue::Int(0),
            Self::PowerState => ParamValue::Int(1),
            Self::BgRotSpeed => ParamValue::Int(28),
            Self::FgRotSpeed => ParamValue::Int(135),
            Self::BgLineWidth => ParamValue::Int(3),
            Self::FgLineWidth => ParamValue::Int(4),
            Self::BgPaletteIndex => ParamValue::Int(1),
            Self::FgPaletteIndex => ParamValue::Int(5),
            Self::AutoAdvancePalette => ParamValue::Int(1),
            Self::AutoAdvanceDelay => ParamValue::Int(60),
            Self::NextPalette => ParamValue::Int(0),
            Self::FgAnimationEnable => ParamValue::Int(0),
            Self::CanvasHeight => ParamValue::Int(0),
            Self::RasterSpacing => ParamValue::Int(0),
        }
    }

    /// Inclusive numeric range offered by the control surface
    ///
    /// Front ends check input against it; the session never does.
    pub fn range(self) -> Option<(f64, f64)> {
        match self {
            Self::Bpm => Some((0.0, 180.0)),
            Self::Brightness => Some((0.0, 255.0)),
            Self::Direction => Some((-1.0, 1.0)),
            Self::BgRotSpeed | Self::FgRotSpeed => Some((0.0, 255.0)),
            Self::BgLineWidth | Self::FgLineWidth => Some((0.0, 20.0)),
            Self::AutoAdvanceDelay => Some((0.0, 300.0)),
            Self::PowerState | Self::AutoAdvancePalette | Self::FgAnimationEnable => {
                Some((0.0, 1.0))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKey {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| RemoteError::UnknownParam { key: s.to_string() })
    }
}

// =============================================================================
// Fix mode
// =============================================================================

/// Values of the `fixMode` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FixMode {
    Pause,
    Radar,
    Radiate,
    None,
}

impl FixMode {
    pub const ALL: [FixMode; 4] = [Self::Pause, Self::Radar, Self::Radiate, Self::None];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "PAUSE",
            Self::Radar => "RADAR",
            Self::Radiate => "RADIATE",
            Self::None => "NONE",
        }
    }
}

impl FromStr for FixMode {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RemoteError::InvalidValue {
                key: ParamKey::FixMode.to_string(),
                reason: format!("'{}' is not one of PAUSE, RADAR, RADIATE, NONE", s),
            })
    }
}

// =============================================================================
// Values
// =============================================================================

/// Scalar parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Convert a JSON scalar as received from the device
    ///
    /// Integral numbers stay integers. Returns `None` for booleans, null,
    /// arrays and objects.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }

    /// Parse user input for `key`
    ///
    /// `fixMode` takes a mode name, everything else a number.
    pub fn parse(key: ParamKey, text: &str) -> Result<Self> {
        let text = text.trim();
        if key == ParamKey::FixMode {
            return text.parse::<FixMode>().map(Self::from);
        }
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Self::Int(i));
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Self::Float(f)),
            _ => Err(RemoteError::InvalidValue {
                key: key.to_string(),
                reason: format!("'{}' is not a number", text),
            }),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<FixMode> for ParamValue {
    fn from(mode: FixMode) -> Self {
        Self::Text(mode.as_str().to_string())
    }
}

// =============================================================================
// Partial mapping
// =============================================================================

/// Partial parameter mapping: an outbound batch, an inbound snapshot, or a
/// saved preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamPatch(BTreeMap<ParamKey, ParamValue>);

impl ParamPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ParamKey, value: impl Into<ParamValue>) {
        self.0.insert(key, value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: ParamKey, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: ParamKey) -> Option<&ParamValue> {
        self.0.get(&key)
    }

    pub fn contains(&self, key: ParamKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = ParamKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, &ParamValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl FromIterator<(ParamKey, ParamValue)> for ParamPatch {
    fn from_iter<I: IntoIterator<Item = (ParamKey, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ParamPatch {
    type Item = (ParamKey, ParamValue);
    type IntoIter = std::collections::btree_map::IntoIter<ParamKey, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Complete set
// =============================================================================

/// Complete parameter set, one value per known key
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    values: [ParamValue; ParamKey::COUNT],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            values: ParamKey::ALL.map(ParamKey::default_value),
        }
    }
}

impl ParameterSet {
    pub fn get(&self, key: ParamKey) -> &ParamValue {
        &self.values[key.index()]
    }

    pub fn set(&mut self, key: ParamKey, value: ParamValue) {
        self.values[key.index()] = value;
    }

    /// Overlay `patch`; keys it does not mention keep their value
    pub fn merge(&mut self, patch: &ParamPatch) {
        for (key, value) in patch.iter() {
            self.set(key, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, &ParamValue)> {
        ParamKey::ALL.iter().map(move |k| (*k, self.get(*k)))
    }

    /// Copy out the given keys as a patch
    pub fn subset(&self, keys: &[ParamKey]) -> ParamPatch {
        keys.iter().map(|k| (*k, self.get(*k).clone())).collect()
    }

    /// Blend duration in milliseconds; non-numeric or negative reads as 0
    pub fn blend_time_ms(&self) -> u64 {
        self.get(ParamKey::BlendTime)
            .as_f64()
            .map(|ms| ms.max(0.0) as u64)
            .unwrap_or(0)
    }

    pub fn power_on(&self) -> bool {
        self.get(ParamKey::PowerState).as_i64() == Some(1)
    }

    pub fn fix_mode(&self) -> Option<FixMode> {
        self.get(ParamKey::FixMode).as_str()?.parse().ok()
    }
}
