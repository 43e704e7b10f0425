//! Addressing single fields of a [`ConfigurationDocument`] by `section.key`.
//!
//! Editors (the form UI, the command-line launcher) work with text.  This
//! module converts between a field's typed value and its text form, and
//! produces a *new* document with one field replaced; the original document
//! is never mutated.

use std::fmt;
use std::str::FromStr;

use super::document::{ConfigurationDocument, Emulator, EmulatorSection, UnknownVariant};
use super::validation::ValidationError;

/// One of the nine keys of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    DriveA,
    DriveB,
    SelectedDrive,
    Emulator,
    RetroVirtualMachinePath,
    M4BoardIp,
    User,
    Model,
    Mode,
}

impl ConfigField {
    /// All fields in document order.
    pub const ALL: [ConfigField; 9] = [
        ConfigField::DriveA,
        ConfigField::DriveB,
        ConfigField::SelectedDrive,
        ConfigField::Emulator,
        ConfigField::RetroVirtualMachinePath,
        ConfigField::M4BoardIp,
        ConfigField::User,
        ConfigField::Model,
        ConfigField::Mode,
    ];

    /// The TOML table holding this field.
    pub fn section(self) -> &'static str {
        match self {
            ConfigField::DriveA | ConfigField::DriveB | ConfigField::SelectedDrive => "drive",
            ConfigField::Emulator
            | ConfigField::RetroVirtualMachinePath
            | ConfigField::M4BoardIp => "emulator",
            ConfigField::User | ConfigField::Model | ConfigField::Mode => "system",
        }
    }

    /// The key inside [`section`](Self::section).
    pub fn key(self) -> &'static str {
        match self {
            ConfigField::DriveA => "drive_a",
            ConfigField::DriveB => "drive_b",
            ConfigField::SelectedDrive => "selected_drive",
            ConfigField::Emulator => "default",
            ConfigField::RetroVirtualMachinePath => "retro_virtual_machine_path",
            ConfigField::M4BoardIp => "m4board_ip",
            ConfigField::User => "user",
            ConfigField::Model => "model",
            ConfigField::Mode => "mode",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key())
    }
}

impl FromStr for ConfigField {
    type Err = UnknownVariant;

    /// Parses a `section.key` path such as `system.user`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| {
                s.split_once('.')
                    .is_some_and(|(section, key)| section == f.section() && key == f.key())
            })
            .ok_or_else(|| UnknownVariant {
                kind: "field",
                value: s.to_string(),
            })
    }
}

impl ConfigurationDocument {
    /// Returns the text form of `field`, as it would appear in a form input.
    pub fn get_field(&self, field: ConfigField) -> String {
        match field {
            ConfigField::DriveA => self.drive.drive_a.clone(),
            ConfigField::DriveB => self.drive.drive_b.clone(),
            ConfigField::SelectedDrive => self.drive.selected_drive.to_string(),
            ConfigField::Emulator => self.emulator.default.to_string(),
            ConfigField::RetroVirtualMachinePath => self.emulator.retro_virtual_machine_path.clone(),
            ConfigField::M4BoardIp => self.emulator.m4board_ip.clone(),
            ConfigField::User => self.system.user.to_string(),
            ConfigField::Model => self.system.model.to_string(),
            ConfigField::Mode => self.system.mode.to_string(),
        }
    }

    /// Returns a copy of this document with `field` set from its text form.
    ///
    /// Surrounding whitespace is stripped from every typed field (drive
    /// letter, emulator, model, user, mode); path and address fields are
    /// stored exactly as given.  Only the conversion to the field's type is
    /// checked here.  Range checks
    /// (user 0-15, mode 0-2, IP shape) belong to [`validate`](Self::validate),
    /// which editors run before saving.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] when `value` cannot be
    /// converted, e.g. `"C"` for the selected drive or `"x"` for the user.
    pub fn with_field(&self, field: ConfigField, value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidValue {
            field,
            value: value.to_string(),
        };
        let typed = value.trim();
        let mut next = self.clone();
        match field {
            ConfigField::DriveA => next.drive.drive_a = value.to_string(),
            ConfigField::DriveB => next.drive.drive_b = value.to_string(),
            ConfigField::SelectedDrive => {
                next.drive.selected_drive = typed.parse().map_err(|_| invalid())?;
            }
            ConfigField::Emulator => next.emulator.default = typed.parse().map_err(|_| invalid())?,
            ConfigField::RetroVirtualMachinePath => {
                next.emulator.retro_virtual_machine_path = value.to_string();
            }
            ConfigField::M4BoardIp => next.emulator.m4board_ip = value.to_string(),
            ConfigField::User => next.system.user = typed.parse().map_err(|_| invalid())?,
            ConfigField::Model => next.system.model = typed.parse().map_err(|_| invalid())?,
            ConfigField::Mode => next.system.mode = typed.parse().map_err(|_| invalid())?,
        }
        Ok(next)
    }
}

impl EmulatorSection {
    /// Emulator fields that apply to the selected emulator.
    ///
    /// A form shows only these; the others keep their values and are still
    /// saved, so switching emulators back and forth loses nothing.
    pub fn relevant_fields(&self) -> &'static [ConfigField] {
        match self.default {
            Emulator::RetroVirtualMachine => {
                &[ConfigField::Emulator, ConfigField::RetroVirtualMachinePath]
            }
            Emulator::M4Board => &[ConfigField::Emulator, ConfigField::M4BoardIp],
            Emulator::CpcEmu => &[ConfigField::Emulator],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{CpcModel, DriveLetter};

    #[test]
    fn test_every_field_path_parses_back() {
        for field in ConfigField::ALL {
            let path = field.to_string();
            assert_eq!(path.parse::<ConfigField>().unwrap(), field, "path {path}");
        }
    }

    #[test]
    fn test_unknown_field_path_is_rejected() {
        assert!("drive.drive_c".parse::<ConfigField>().is_err());
        assert!("user".parse::<ConfigField>().is_err());
        assert!("system.user.extra".parse::<ConfigField>().is_err());
    }

    #[test]
    fn test_with_field_returns_new_document_and_leaves_original() {
        // Arrange
        let original = ConfigurationDocument::default();

        // Act
        let edited = original
            .with_field(ConfigField::SelectedDrive, "B")
            .and_then(|d| d.with_field(ConfigField::User, "7"))
            .unwrap();

        // Assert
        assert_eq!(original, ConfigurationDocument::default());
        assert_eq!(edited.drive.selected_drive, DriveLetter::B);
        assert_eq!(edited.system.user, 7);
    }

    #[test]
    fn test_with_field_rejects_unconvertible_text() {
        let doc = ConfigurationDocument::default();

        let err = doc.with_field(ConfigField::Mode, "high").unwrap_err();

        assert_eq!(
            err,
            ValidationError::InvalidValue {
                field: ConfigField::Mode,
                value: "high".to_string(),
            }
        );
        assert_eq!(err.to_string(), "invalid value \"high\" for system.mode");
    }

    #[test]
    fn test_with_field_trims_every_typed_field() {
        // Act
        let doc = ConfigurationDocument::default()
            .with_field(ConfigField::SelectedDrive, " B")
            .and_then(|d| d.with_field(ConfigField::Emulator, "M4Board "))
            .and_then(|d| d.with_field(ConfigField::Model, " 664 "))
            .and_then(|d| d.with_field(ConfigField::User, " 7 "))
            .and_then(|d| d.with_field(ConfigField::Mode, "\t2"))
            .unwrap();

        // Assert
        assert_eq!(doc.drive.selected_drive, DriveLetter::B);
        assert_eq!(doc.emulator.default, Emulator::M4Board);
        assert_eq!(doc.system.model, CpcModel::Cpc664);
        assert_eq!(doc.system.user, 7);
        assert_eq!(doc.system.mode, 2);
    }

    #[test]
    fn test_with_field_keeps_path_whitespace() {
        let doc = ConfigurationDocument::default()
            .with_field(ConfigField::DriveA, " /disks/lead space.dsk")
            .unwrap();

        assert_eq!(doc.drive.drive_a, " /disks/lead space.dsk");
    }

    #[test]
    fn test_with_field_accepts_negative_user_for_later_validation() {
        let doc = ConfigurationDocument::default()
            .with_field(ConfigField::User, "-1")
            .unwrap();

        assert_eq!(doc.system.user, -1);
        assert_eq!(doc.validate(), Err(ValidationError::UserOutOfRange(-1)));
    }

    #[test]
    fn test_with_field_defers_range_checks_to_validate() {
        let doc = ConfigurationDocument::default()
            .with_field(ConfigField::User, "99")
            .unwrap();

        assert_eq!(doc.system.user, 99);
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_get_field_uses_disk_spelling() {
        let doc = ConfigurationDocument::default()
            .with_field(ConfigField::Emulator, "CPCEmu")
            .unwrap();

        assert_eq!(doc.get_field(ConfigField::Emulator), "CPCEmu");
        assert_eq!(doc.get_field(ConfigField::Model), CpcModel::Cpc6128.as_str());
        assert_eq!(doc.get_field(ConfigField::Mode), "1");
    }

    #[test]
    fn test_relevant_fields_follow_selected_emulator() {
        let mut section = EmulatorSection::default();
        assert!(section.relevant_fields().contains(&ConfigField::RetroVirtualMachinePath));
        assert!(!section.relevant_fields().contains(&ConfigField::M4BoardIp));

        section.default = Emulator::M4Board;
        assert!(section.relevant_fields().contains(&ConfigField::M4BoardIp));

        section.default = Emulator::CpcEmu;
        assert_eq!(section.relevant_fields(), &[ConfigField::Emulator]);
    }
}
