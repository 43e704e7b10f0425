//! The configuration document shared by the CPCReady tools.
//!
//! On disk the document is a TOML file with exactly three tables:
//!
//! ```toml
//! [drive]
//! drive_a = "/home/user/games/demo.dsk"
//! drive_b = ""
//! selected_drive = "A"
//!
//! [emulator]
//! default = "RetroVirtualMachine"
//! retro_virtual_machine_path = "/Applications/Retro Virtual Machine 2.app"
//! m4board_ip = ""
//!
//! [system]
//! user = 0
//! model = "6128"
//! mode = 1
//! ```
//!
//! # Serde default values
//!
//! Every field carries a `#[serde(default ...)]` attribute and every section
//! is itself defaulted, so a file written by an older version (or trimmed by
//! hand) still loads with all nine fields populated.  Unknown keys are
//! ignored.  Malformed syntax, wrong value types, and values outside a closed
//! enum set are *not* papered over: they surface as deserialization errors.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Returned when text does not name a member of one of the closed sets below.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    /// What was being parsed, e.g. `"drive letter"`.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ── Document ──────────────────────────────────────────────────────────────────

/// The whole configuration, as loaded from and saved to `cpcready.toml`.
///
/// A document is treated as a value: editors produce a new document and hand
/// it to the store in one piece.  There is no field-level patching on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigurationDocument {
    #[serde(default)]
    pub drive: DriveSection,
    #[serde(default)]
    pub emulator: EmulatorSection,
    #[serde(default)]
    pub system: SystemSection,
}

/// Virtual disk drive settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriveSection {
    /// Path to the DSK image mounted in drive A, or empty.
    #[serde(default)]
    pub drive_a: String,
    /// Path to the DSK image mounted in drive B, or empty.
    #[serde(default)]
    pub drive_b: String,
    /// Drive the tools read from and write to.
    #[serde(default)]
    pub selected_drive: DriveLetter,
}

/// Which emulator (or real hardware) the tools target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmulatorSection {
    /// The emulator launched by default.
    #[serde(default)]
    pub default: Emulator,
    /// Path to the RetroVirtualMachine executable (or `.app` bundle), or empty.
    #[serde(default)]
    pub retro_virtual_machine_path: String,
    /// Dotted-quad address of the M4Board, or empty.
    #[serde(default)]
    pub m4board_ip: String,
}

/// Target machine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemSection {
    /// AMSDOS user number, 0-15 once validated.
    #[serde(default)]
    pub user: i64,
    /// CPC model.
    #[serde(default)]
    pub model: CpcModel,
    /// Screen mode, 0-2 once validated.
    #[serde(default = "default_mode")]
    pub mode: i64,
}

fn default_mode() -> i64 {
    1
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            user: 0,
            model: CpcModel::default(),
            mode: default_mode(),
        }
    }
}

// ── Drive letter ──────────────────────────────────────────────────────────────

/// One of the two floppy drives of a CPC.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DriveLetter {
    #[default]
    A,
    B,
}

impl DriveLetter {
    pub const ALL: [DriveLetter; 2] = [DriveLetter::A, DriveLetter::B];

    pub fn as_str(self) -> &'static str {
        match self {
            DriveLetter::A => "A",
            DriveLetter::B => "B",
        }
    }
}

impl fmt::Display for DriveLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriveLetter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("drive letter", s))
    }
}

// ── Emulator ──────────────────────────────────────────────────────────────────

/// Supported launch targets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Emulator {
    #[default]
    RetroVirtualMachine,
    /// Real hardware reached over the network through an M4Board.
    M4Board,
    #[serde(rename = "CPCEmu")]
    CpcEmu,
}

impl Emulator {
    pub const ALL: [Emulator; 3] = [
        Emulator::RetroVirtualMachine,
        Emulator::M4Board,
        Emulator::CpcEmu,
    ];

    /// The name used in the TOML file.
    pub fn as_str(self) -> &'static str {
        match self {
            Emulator::RetroVirtualMachine => "RetroVirtualMachine",
            Emulator::M4Board => "M4Board",
            Emulator::CpcEmu => "CPCEmu",
        }
    }
}

impl fmt::Display for Emulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emulator {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("emulator", s))
    }
}

// ── CPC model ─────────────────────────────────────────────────────────────────

/// Amstrad CPC model.
///
/// Written to TOML as a string (`model = "6128"`).  Reading also accepts a
/// bare integer (`model = 6128`) because hand-edited files often drop the
/// quotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CpcModel {
    Cpc464,
    Cpc664,
    #[default]
    Cpc6128,
}

impl CpcModel {
    pub const ALL: [CpcModel; 3] = [CpcModel::Cpc464, CpcModel::Cpc664, CpcModel::Cpc6128];

    pub fn as_str(self) -> &'static str {
        match self {
            CpcModel::Cpc464 => "464",
            CpcModel::Cpc664 => "664",
            CpcModel::Cpc6128 => "6128",
        }
    }

    pub fn number(self) -> u16 {
        match self {
            CpcModel::Cpc464 => 464,
            CpcModel::Cpc664 => 664,
            CpcModel::Cpc6128 => 6128,
        }
    }

    pub fn from_number(n: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|m| i64::from(m.number()) == n)
    }
}

impl fmt::Display for CpcModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CpcModel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("CPC model", s))
    }
}

impl Serialize for CpcModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CpcModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CpcModelVisitor)
    }
}

struct CpcModelVisitor;

impl<'de> de::Visitor<'de> for CpcModelVisitor {
    type Value = CpcModel;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a CPC model: \"464\", \"664\" or \"6128\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CpcModel, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CpcModel, E> {
        CpcModel::from_number(v).ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CpcModel, E> {
        i64::try_from(v)
            .ok()
            .and_then(CpcModel::from_number)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
