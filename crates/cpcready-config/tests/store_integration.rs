//! Integration tests for the configuration store and edit session.
//!
//! These tests exercise the public API of cpcready-config end-to-end against
//! a real file in an isolated temporary config root.

use std::fs;

use cpcready_config::application::edit_session::{EditSession, SessionError};
use cpcready_config::infrastructure::storage::config::{ConfigError, ConfigStore};
use cpcready_config::infrastructure::ui_bridge::{self, ConfigDto};
use cpcready_core::{ConfigField, ConfigurationDocument, CpcModel, DriveLetter, Emulator};

fn temp_store() -> (tempfile::TempDir, ConfigStore) {
    let root = tempfile::tempdir().expect("tempdir");
    let store = ConfigStore::new(root.path());
    (root, store)
}

#[test]
fn test_first_run_edit_and_save_scenario() {
    // Arrange: empty config root
    let (_root, store) = temp_store();

    // Act: startup creates the defaults
    store.ensure_exists().expect("ensure_exists");
    let defaults = store.load().expect("load defaults");

    // Assert
    assert_eq!(defaults, ConfigurationDocument::default());

    // Act: the user picks drive B and user 7, then saves
    let mut edited = defaults.clone();
    edited.drive.selected_drive = DriveLetter::B;
    edited.system.user = 7;
    store.save(&edited).expect("save");
    let reloaded = store.load().expect("reload");

    // Assert: identical to the defaults except the two edits
    let mut expected = ConfigurationDocument::default();
    expected.drive.selected_drive = DriveLetter::B;
    expected.system.user = 7;
    assert_eq!(reloaded, expected);
}

#[test]
fn test_round_trip_of_fully_populated_document() {
    let (_root, store) = temp_store();
    let mut doc = ConfigurationDocument::default();
    doc.drive.drive_a = "/home/cpc/disks/Side A.dsk".to_string();
    doc.drive.drive_b = r"C:\CPC\disks\work.dsk".to_string();
    doc.drive.selected_drive = DriveLetter::B;
    doc.emulator.default = Emulator::CpcEmu;
    doc.emulator.retro_virtual_machine_path =
        "/Applications/Retro Virtual Machine 2.app".to_string();
    doc.emulator.m4board_ip = "10.0.0.2".to_string();
    doc.system.user = 15;
    doc.system.model = CpcModel::Cpc464;
    doc.system.mode = 0;

    store.save(&doc).expect("save");

    assert_eq!(store.load().expect("load"), doc);
}

#[test]
fn test_ensure_exists_is_idempotent_on_disk() {
    let (_root, store) = temp_store();

    store.ensure_exists().unwrap();
    let once = fs::read_to_string(store.path()).unwrap();
    store.ensure_exists().unwrap();
    let twice = fs::read_to_string(store.path()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_ensure_exists_keeps_user_edits() {
    let (_root, store) = temp_store();
    let mut doc = ConfigurationDocument::default();
    doc.system.mode = 2;
    store.save(&doc).unwrap();

    store.ensure_exists().unwrap();

    assert_eq!(store.load().unwrap().system.mode, 2);
}

#[test]
fn test_corrupt_file_is_reported_not_defaulted() {
    // Arrange
    let (_root, store) = temp_store();
    fs::create_dir_all(store.dir()).unwrap();
    fs::write(store.path(), "[drive]\ndrive_a = \"unterminated\n").unwrap();

    // Act
    let load = store.load();
    let open = EditSession::open(store.clone());

    // Assert
    assert!(matches!(load, Err(ConfigError::Parse { .. })));
    assert!(matches!(open, Err(SessionError::Store(ConfigError::Parse { .. }))));
    // The corrupt content is still there for the user to inspect.
    assert!(fs::read_to_string(store.path()).unwrap().contains("unterminated"));
}

#[test]
fn test_file_from_future_version_loads() {
    let (_root, store) = temp_store();
    fs::create_dir_all(store.dir()).unwrap();
    fs::write(
        store.path(),
        r#"
schema = 2

[drive]
drive_a = "a.dsk"
selected_drive = "B"
history = ["x.dsk", "y.dsk"]

[emulator]
default = "M4Board"

[sound]
volume = 11
"#,
    )
    .unwrap();

    let doc = store.load().expect("unknown keys are ignored");

    assert_eq!(doc.drive.drive_a, "a.dsk");
    assert_eq!(doc.drive.selected_drive, DriveLetter::B);
    assert_eq!(doc.emulator.default, Emulator::M4Board);
    assert_eq!(doc.system, ConfigurationDocument::default().system);
}

#[test]
fn test_session_save_is_visible_to_a_fresh_store() {
    // Arrange
    let (root, store) = temp_store();
    let mut session = EditSession::open(store).expect("open");

    // Act
    session.edit(ConfigField::Model, "664").unwrap();
    session.edit(ConfigField::Emulator, "M4Board").unwrap();
    session.edit(ConfigField::M4BoardIp, "192.168.1.100").unwrap();
    session.save().expect("save");

    // Assert: a second process sees the change
    let other = ConfigStore::new(root.path()).load().unwrap();
    assert_eq!(other.system.model, CpcModel::Cpc664);
    assert_eq!(other.emulator.m4board_ip, "192.168.1.100");
}

#[test]
fn test_last_writer_wins_between_two_sessions() {
    let (root, store) = temp_store();
    let mut first = EditSession::open(store).unwrap();
    let mut second = EditSession::open(ConfigStore::new(root.path())).unwrap();

    first.edit(ConfigField::User, "1").unwrap();
    second.edit(ConfigField::Mode, "2").unwrap();
    first.save().unwrap();
    second.save().unwrap();

    let on_disk = ConfigStore::new(root.path()).load().unwrap();
    assert_eq!(on_disk.system.user, 0, "whole-document save replaces first writer");
    assert_eq!(on_disk.system.mode, 2);
}

#[test]
fn test_form_save_through_command_bridge() {
    // Arrange
    let (root, store) = temp_store();
    let mut session = EditSession::open(store).unwrap();
    let mut form = ConfigDto::from(session.draft());
    form.drive_a = "/disks/game.dsk".to_string();
    form.mode = "0".to_string();

    // Act
    let result = ui_bridge::save_config(&mut session, form);

    // Assert
    assert!(result.success, "error: {:?}", result.error);
    let on_disk = ConfigStore::new(root.path()).load().unwrap();
    assert_eq!(on_disk.drive.drive_a, "/disks/game.dsk");
    assert_eq!(on_disk.system.mode, 0);
}
