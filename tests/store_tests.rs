// Integration tests for the credential store.
// These cover lookup, overwrite and persistence behaviour against real files.

use passkeeper::{Credential, CredentialStore, PassError, ValidationError};
use serde_json::json;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Lookup and save
// ============================================================================

#[test]
fn test_upsert_then_find_returns_input() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("data.json"));

    let cases = [
        ("example.com", "a@b.com", "Xy9#mN2qLp"),
        ("no-email.org", "", "secret"),
        ("ünïcode.de", "ü@x.de", "pässwörd"),
        ("with space.com", "x@y.z", "p w"),
    ];

    for (website, email, password) in cases {
        store.upsert(website, email, password).unwrap();
        assert_eq!(
            store.find(website).unwrap(),
            Some(Credential::new(website, email, password)),
            "round trip failed for {website}"
        );
    }
}

#[test]
fn test_find_unknown_website() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("data.json"));

    // File absent.
    assert_eq!(store.find("never.com").unwrap(), None);

    // File present, key absent.
    store.upsert("site.com", "", "pw").unwrap();
    assert_eq!(store.find("never.com").unwrap(), None);
}

#[test]
fn test_find_is_exact_match() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("data.json"));
    store.upsert("Site.com", "", "pw").unwrap();

    assert!(store.find("Site.com").unwrap().is_some());
    assert_eq!(store.find("site.com").unwrap(), None);
    assert_eq!(store.find("Site.com ").unwrap(), None);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_empty_fields_rejected_without_touching_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = CredentialStore::new(&path);

    // Nothing saved yet: a rejected upsert must not create the file.
    let err = store.upsert("", "u@u.com", "pw").unwrap_err();
    assert!(matches!(
        err,
        PassError::Validation(ValidationError::EmptyWebsite)
    ));
    assert!(!path.exists());

    store.upsert("site.com", "u@u.com", "pw12#A").unwrap();
    let before = fs::read(&path).unwrap();

    let err = store.upsert("site.com", "new@x.com", "").unwrap_err();
    assert!(matches!(
        err,
        PassError::Validation(ValidationError::EmptyPassword)
    ));
    let err = store.upsert("", "new@x.com", "pw").unwrap_err();
    assert!(err.is_validation());

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_whitespace_values_are_not_empty() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("data.json"));

    store.upsert("site.com", "", " ").unwrap();
    assert_eq!(
        store.find("site.com").unwrap(),
        Some(Credential::new("site.com", "", " "))
    );

    store.upsert(" ", "", "pw").unwrap();
    assert_eq!(
        store.find(" ").unwrap(),
        Some(Credential::new(" ", "", "pw"))
    );
}

#[test]
fn test_email_may_be_empty() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("data.json"));
    store.upsert("site.com", "", "pw").unwrap();
    assert_eq!(store.find("site.com").unwrap().unwrap().email, "");
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_load_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("data.json"));
    assert_eq!(store.load().unwrap(), store.load().unwrap());

    store.upsert("a.com", "a@a.com", "one").unwrap();
    store.upsert("b.com", "b@b.com", "two").unwrap();
    assert_eq!(store.load().unwrap(), store.load().unwrap());
}

#[test]
fn test_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let before = {
        let store = CredentialStore::new(&path);
        store.upsert("a.com", "a@a.com", "one").unwrap();
        store.upsert("b.com", "b@b.com", "two").unwrap();
        store.load().unwrap()
    };

    let reopened = CredentialStore::new(&path);
    assert_eq!(reopened.load().unwrap(), before);
    assert_eq!(
        reopened.find("b.com").unwrap(),
        Some(Credential::new("b.com", "b@b.com", "two"))
    );
}

#[test]
fn test_first_save_scenario() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = CredentialStore::new(&path);
    assert!(!path.exists());

    store.upsert("site.com", "u@u.com", "pw12#A").unwrap();

    assert_eq!(
        read_json(&path),
        json!({"site.com": {"email": "u@u.com", "password": "pw12#A"}})
    );
    assert_eq!(
        store.find("site.com").unwrap(),
        Some(Credential::new("site.com", "u@u.com", "pw12#A"))
    );
    assert_eq!(store.find("other.com").unwrap(), None);
}

#[test]
fn test_overwrite_replaces_whole_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(
        &path,
        r#"{
    "a.com": {"email": "old@x.com", "password": "oldpass"},
    "b.com": {"email": "b@x.com", "password": "bpass"}
}"#,
    )
    .unwrap();

    let store = CredentialStore::new(&path);
    store.upsert("a.com", "new@x.com", "newpass1!").unwrap();

    assert_eq!(
        read_json(&path),
        json!({
            "a.com": {"email": "new@x.com", "password": "newpass1!"},
            "b.com": {"email": "b@x.com", "password": "bpass"}
        })
    );

    // Overwritten key keeps its place.
    let keys: Vec<String> = store.load().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a.com", "b.com"]);
}

#[test]
fn test_new_keys_appended_in_order() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("data.json"));
    for site in ["zeta.com", "alpha.com", "mid.com"] {
        store.upsert(site, "", "pw").unwrap();
    }

    let keys: Vec<String> = store.load().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["zeta.com", "alpha.com", "mid.com"]);
}

// ============================================================================
// Corrupt data
// ============================================================================

#[test]
fn test_corrupt_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = CredentialStore::new(&path);

    let bad_contents = [
        "",
        "not json",
        "[1, 2, 3]",
        r#"{"a.com": "just a string"}"#,
        r#"{"a.com": {"email": "x"}}"#,
        r#"{"a.com": {"email": "x", "password": "y", "extra": 1}}"#,
        r#"{"a.com": {"email": "x", "password": 5}}"#,
    ];

    for content in bad_contents {
        fs::write(&path, content).unwrap();
        match store.load() {
            Err(PassError::CorruptStore { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected CorruptStore for {content:?}, got {other:?}"),
        }
        assert!(matches!(
            store.find("a.com"),
            Err(PassError::CorruptStore { .. })
        ));
    }
}

#[test]
fn test_non_utf8_file_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, [0xff, 0xfe, b'{', b'}']).unwrap();

    let store = CredentialStore::new(&path);
    match store.load() {
        Err(PassError::CorruptStore { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected CorruptStore, got {other:?}"),
    }
    assert!(matches!(
        store.upsert("a.com", "", "pw"),
        Err(PassError::CorruptStore { .. })
    ));
    assert_eq!(fs::read(&path).unwrap(), vec![0xff, 0xfe, b'{', b'}']);
}

#[test]
fn test_upsert_does_not_repair_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, "{ broken").unwrap();

    let store = CredentialStore::new(&path);
    assert!(matches!(
        store.upsert("a.com", "", "pw"),
        Err(PassError::CorruptStore { .. })
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ broken");
}

#[test]
fn test_empty_object_is_valid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, "{}").unwrap();

    let store = CredentialStore::new(&path);
    assert!(store.load().unwrap().is_empty());
    assert!(store.exists());
}

#[cfg(unix)]
#[test]
fn test_failed_write_keeps_previous_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("locked");
    fs::create_dir(&data_dir).unwrap();
    let path = data_dir.join("data.json");

    let store = CredentialStore::new(&path);
    store.upsert("a.com", "a@a.com", "one").unwrap();
    let before = fs::read(&path).unwrap();

    // No temp file can be created in a read-only directory.
    fs::set_permissions(&data_dir, fs::Permissions::from_mode(0o500)).unwrap();
    let result = store.upsert("b.com", "b@b.com", "two");
    fs::set_permissions(&data_dir, fs::Permissions::from_mode(0o700)).unwrap();

    // Root ignores directory permissions.
    if result.is_ok() {
        return;
    }
    assert!(matches!(result, Err(PassError::Io(_))));
    assert_eq!(fs::read(&path).unwrap(), before);
}

// ============================================================================
// Default location
// ============================================================================

#[test]
#[serial]
fn test_default_store_uses_working_directory() {
    let dir = tempdir().unwrap();
    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let store = CredentialStore::default();
    let result = store.upsert("site.com", "", "pw");

    std::env::set_current_dir(original).unwrap();
    result.unwrap();

    assert!(dir.path().join("data.json").is_file());
}
