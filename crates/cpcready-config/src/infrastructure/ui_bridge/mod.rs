//! Command bridge: exposes the edit session to a presentation layer.
//!
//! A form UI (or the command-line launcher) never touches the document types
//! or the store directly.  It calls the functions here, passing text, and gets
//! back Data Transfer Objects made only of strings and booleans.
//!
//! # `CommandResult<T>` wrapper
//!
//! Every command returns `CommandResult<T>` rather than `Result<T, E>`, so
//! every response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.
//! The caller can always read `success` and show `error` in a message box.

use serde::{Deserialize, Serialize};

use cpcready_core::{
    ConfigField, ConfigurationDocument, CpcModel, DriveLetter, Emulator, ValidationError,
    MAX_MODE, MAX_USER,
};

use crate::application::edit_session::{ConfigRepository, EditSession};

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Every field of the document in its text form, one entry per form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDto {
    pub drive_a: String,
    pub drive_b: String,
    pub selected_drive: String,
    pub emulator: String,
    pub retro_virtual_machine_path: String,
    pub m4board_ip: String,
    pub user: String,
    pub model: String,
    pub mode: String,
}

impl From<&ConfigurationDocument> for ConfigDto {
    fn from(doc: &ConfigurationDocument) -> Self {
        Self {
            drive_a: doc.get_field(ConfigField::DriveA),
            drive_b: doc.get_field(ConfigField::DriveB),
            selected_drive: doc.get_field(ConfigField::SelectedDrive),
            emulator: doc.get_field(ConfigField::Emulator),
            retro_virtual_machine_path: doc.get_field(ConfigField::RetroVirtualMachinePath),
            m4board_ip: doc.get_field(ConfigField::M4BoardIp),
            user: doc.get_field(ConfigField::User),
            model: doc.get_field(ConfigField::Model),
            mode: doc.get_field(ConfigField::Mode),
        }
    }
}

impl ConfigDto {
    /// Builds a complete document from the form values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] for the first value that
    /// cannot be converted to its field's type.
    pub fn to_document(&self) -> Result<ConfigurationDocument, ValidationError> {
        let values = [
            (ConfigField::DriveA, &self.drive_a),
            (ConfigField::DriveB, &self.drive_b),
            (ConfigField::SelectedDrive, &self.selected_drive),
            (ConfigField::Emulator, &self.emulator),
            (ConfigField::RetroVirtualMachinePath, &self.retro_virtual_machine_path),
            (ConfigField::M4BoardIp, &self.m4board_ip),
            (ConfigField::User, &self.user),
            (ConfigField::Model, &self.model),
            (ConfigField::Mode, &self.mode),
        ];
        values
            .into_iter()
            .try_fold(ConfigurationDocument::default(), |doc, (field, value)| {
                doc.with_field(field, value)
            })
    }
}

/// What a form needs to render: the draft, whether it has unsaved edits,
/// and which emulator-specific inputs to show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormStateDto {
    pub config: ConfigDto,
    pub dirty: bool,
    pub visible_emulator_fields: Vec<String>,
}

/// Choices offered by the form's drop-downs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsDto {
    pub drives: Vec<String>,
    pub emulators: Vec<String>,
    pub models: Vec<String>,
    pub modes: Vec<String>,
    pub users: Vec<String>,
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn form_state<R: ConfigRepository>(session: &EditSession<R>) -> FormStateDto {
    let draft = session.draft();
    FormStateDto {
        config: ConfigDto::from(draft),
        dirty: session.is_dirty(),
        visible_emulator_fields: draft
            .emulator
            .relevant_fields()
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the choices for every drop-down in the form.
pub fn get_options() -> CommandResult<OptionsDto> {
    CommandResult::ok(OptionsDto {
        drives: DriveLetter::ALL.iter().map(ToString::to_string).collect(),
        emulators: Emulator::ALL.iter().map(ToString::to_string).collect(),
        models: CpcModel::ALL.iter().map(ToString::to_string).collect(),
        modes: (0..=MAX_MODE).map(|m| m.to_string()).collect(),
        users: (0..=MAX_USER).map(|u| u.to_string()).collect(),
    })
}

/// Returns the current draft and form state.
pub fn get_config<R: ConfigRepository>(session: &EditSession<R>) -> CommandResult<FormStateDto> {
    CommandResult::ok(form_state(session))
}

/// Changes one field of the draft, addressed by `section.key`.
pub fn update_field<R: ConfigRepository>(
    session: &mut EditSession<R>,
    path: &str,
    value: &str,
) -> CommandResult<FormStateDto> {
    let field: ConfigField = match path.parse() {
        Ok(f) => f,
        Err(e) => return CommandResult::err(e.to_string()),
    };
    match session.edit(field, value) {
        Ok(()) => CommandResult::ok(form_state(session)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Replaces the draft with the submitted form and saves it.
///
/// Validation failures (for example a malformed M4Board address) are
/// reported without writing anything; the draft keeps the submitted values
/// so the user can correct them.
pub fn save_config<R: ConfigRepository>(
    session: &mut EditSession<R>,
    form: ConfigDto,
) -> CommandResult<FormStateDto> {
    let document = match form.to_document() {
        Ok(doc) => doc,
        Err(e) => return CommandResult::err(e.to_string()),
    };
    session.replace_draft(document);
    match session.save() {
        Ok(()) => CommandResult::ok(form_state(session)),
        Err(e) => CommandResult::err(format!("Failed to save configuration: {e}")),
    }
}

/// Discards unsaved edits and re-reads the document from disk.
pub fn reload_config<R: ConfigRepository>(
    session: &mut EditSession<R>,
) -> CommandResult<FormStateDto> {
    match session.reload() {
        Ok(()) => CommandResult::ok(form_state(session)),
        Err(e) => CommandResult::err(format!("Failed to reload configuration: {e}")),
    }
}

/// Resets the draft to the last saved document.
pub fn discard_changes<R: ConfigRepository>(
    session: &mut EditSession<R>,
) -> CommandResult<FormStateDto> {
    session.discard();
    CommandResult::ok(form_state(session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::mock::InMemoryConfigRepository;

    fn session() -> EditSession<InMemoryConfigRepository> {
        EditSession::open(InMemoryConfigRepository::new()).expect("open")
    }

    #[test]
    fn test_command_result_serializes_uniform_shape() {
        let ok = serde_json::to_value(CommandResult::ok(1u8)).unwrap();
        let err = serde_json::to_value(CommandResult::<u8>::err("boom")).unwrap();

        assert_eq!(ok, serde_json::json!({"success": true, "data": 1, "error": null}));
        assert_eq!(
            err,
            serde_json::json!({"success": false, "data": null, "error": "boom"})
        );
    }

    #[test]
    fn test_dto_round_trips_through_document() {
        let mut doc = ConfigurationDocument::default();
        doc.emulator.default = Emulator::CpcEmu;
        doc.system.model = CpcModel::Cpc664;

        let dto = ConfigDto::from(&doc);

        assert_eq!(dto.emulator, "CPCEmu");
        assert_eq!(dto.model, "664");
        assert_eq!(dto.to_document().unwrap(), doc);
    }

    #[test]
    fn test_get_options_lists_all_choices() {
        let options = get_options().data.unwrap();

        assert_eq!(options.drives, ["A", "B"]);
        assert_eq!(options.emulators, ["RetroVirtualMachine", "M4Board", "CPCEmu"]);
        assert_eq!(options.models, ["464", "664", "6128"]);
        assert_eq!(options.modes, ["0", "1", "2"]);
        assert_eq!(options.users.len(), 16);
    }

    #[test]
    fn test_get_config_shows_emulator_specific_fields() {
        let mut session = session();

        let state = get_config(&session).data.unwrap();
        assert_eq!(
            state.visible_emulator_fields,
            ["emulator.default", "emulator.retro_virtual_machine_path"]
        );

        let state = update_field(&mut session, "emulator.default", "M4Board")
            .data
            .unwrap();
        assert_eq!(
            state.visible_emulator_fields,
            ["emulator.default", "emulator.m4board_ip"]
        );
        assert!(state.dirty);
    }

    #[test]
    fn test_update_field_rejects_unknown_path() {
        let mut session = session();

        let result = update_field(&mut session, "drive.drive_c", "x");

        assert!(!result.success);
        assert!(result.error.unwrap().contains("drive.drive_c"));
    }

    #[test]
    fn test_save_config_with_invalid_ip_reports_error_and_writes_nothing() {
        // Arrange
        let mut session = session();
        let mut form = ConfigDto::from(session.draft());
        form.m4board_ip = "999.1.1.1".to_string();
        let saves_before = session.repository().save_count();

        // Act
        let result = save_config(&mut session, form);

        // Assert
        assert!(!result.success);
        assert!(result.error.unwrap().contains("999.1.1.1"));
        assert_eq!(session.repository().save_count(), saves_before);
        assert_eq!(session.draft().emulator.m4board_ip, "999.1.1.1");
    }

    #[test]
    fn test_save_config_persists_form() {
        let mut session = session();
        let mut form = ConfigDto::from(session.draft());
        form.selected_drive = "B".to_string();
        form.user = "7".to_string();

        let result = save_config(&mut session, form);

        assert!(result.success);
        assert!(!result.data.unwrap().dirty);
        let stored = session.repository().load().unwrap();
        assert_eq!(stored.drive.selected_drive, DriveLetter::B);
        assert_eq!(stored.system.user, 7);
    }

    #[test]
    fn test_discard_changes_restores_saved_values() {
        let mut session = session();
        update_field(&mut session, "system.mode", "0");

        let state = discard_changes(&mut session).data.unwrap();

        assert_eq!(state.config.mode, "1");
        assert!(!state.dirty);
    }

    #[test]
    fn test_reload_config_reports_corrupt_file() {
        let mut session = session();
        session.repository().set_contents("[system");

        let result = reload_config(&mut session);

        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Failed to reload configuration"));
    }
}
