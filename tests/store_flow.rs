//! End-to-end store flows against a real filesystem.

use std::path::Path;

use chrono::DateTime;
use pretty_assertions::assert_eq;

use stencil::context::ServiceContext;
use stencil::deps;
use stencil::error::StoreError;
use stencil::hash;
use stencil::migrate;
use stencil::resolver::SetAliasOutcome;
use stencil::store::TemplateStore;
use stencil::template::{Template, TemplateFile, TemplateRules};

fn sample_template(name: &str) -> Template {
    Template {
        id: String::new(),
        name: name.to_string(),
        version: "1.0.0".to_string(),
        description: format!("{name} service"),
        root_folder: ".".to_string(),
        folders: vec!["src".to_string()],
        files: vec![TemplateFile {
            path: "src/main.py".to_string(),
            content: Some("print('hi')\n".to_string()),
            source_path: None,
        }],
        variables: vec![],
        rules: TemplateRules::default(),
        dependencies: vec![],
        created: DateTime::UNIX_EPOCH,
        updated: DateTime::UNIX_EPOCH,
        aliases: vec![],
    }
}

#[test]
fn create_alias_resolve_and_delete_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ServiceContext::live();
    let store = TemplateStore::new(&ctx, dir.path());

    let stored = store.create(&sample_template("web")).unwrap();
    assert!(dir.path().join(&stored.id).join("template.json").exists());

    assert_eq!(
        store.resolver().set_alias(&ctx, "web", &stored.id).unwrap(),
        SetAliasOutcome::Bound
    );
    assert!(dir.path().join("aliases.json").exists());

    // Full id, short hash, and alias all resolve to the same template.
    assert_eq!(store.get(&stored.id).unwrap().id, stored.id);
    assert_eq!(store.get(&stored.id[..8]).unwrap().id, stored.id);
    assert_eq!(store.get("web").unwrap().id, stored.id);

    let deleted = store.delete("web").unwrap();
    assert_eq!(deleted, stored.id);
    assert!(!dir.path().join(&stored.id).exists());
    assert!(matches!(store.get("web"), Err(StoreError::NotFound(_))));
}

#[test]
fn export_then_import_into_empty_store_round_trips() {
    let source_dir = tempfile::tempdir().unwrap();
    let target_dir = tempfile::tempdir().unwrap();
    let ctx = ServiceContext::live();
    let source = TemplateStore::new(&ctx, source_dir.path());
    let target = TemplateStore::new(&ctx, target_dir.path());

    let mut template = sample_template("api");
    template.files.push(TemplateFile {
        path: "config.py".to_string(),
        content: None,
        source_path: Some("config.py".to_string()),
    });
    let stored = source.create(&template).unwrap();
    std::fs::create_dir_all(source_dir.path().join(&stored.id).join("files")).unwrap();
    std::fs::write(
        source_dir.path().join(&stored.id).join("files").join("config.py"),
        "DEBUG = False\n",
    )
    .unwrap();

    let bundle_path = source_dir.path().join("api.export.json");
    source.export(&stored.id, &bundle_path).unwrap();

    let imported = target.import(&bundle_path).unwrap();

    assert_eq!(imported.id, stored.id);
    assert!(stencil::store::validate(&imported).is_empty());
    let payload = std::fs::read_to_string(
        target_dir.path().join(&stored.id).join("files").join("config.py"),
    )
    .unwrap();
    assert_eq!(payload, "DEBUG = False\n");
}

#[test]
fn dependency_closure_spans_stores_contents() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ServiceContext::live();
    let store = TemplateStore::new(&ctx, dir.path());

    let base = store.create(&sample_template("base")).unwrap();
    let mut mid_template = sample_template("mid");
    mid_template.dependencies = vec![base.id.clone()];
    let mid = store.create(&mid_template).unwrap();
    let mut top_template = sample_template("top");
    top_template.dependencies = vec![mid.id.clone()];
    let top = store.create(&top_template).unwrap();

    let closure = deps::closure(&store, &top.id[..10]).unwrap();
    let ids: Vec<&str> = closure.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![mid.id.as_str(), base.id.as_str()]);
}

#[test]
fn legacy_store_migrates_and_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ServiceContext::live();
    let store = TemplateStore::new(&ctx, dir.path());

    // Seed a legacy-identified template the way the pre-hash layout did.
    let mut legacy = sample_template("fastapi");
    legacy.id = "python-fastapi".to_string();
    let legacy_dir = dir.path().join("python-fastapi");
    std::fs::create_dir_all(&legacy_dir).unwrap();
    std::fs::write(
        legacy_dir.join("template.json"),
        serde_json::to_string_pretty(&legacy).unwrap(),
    )
    .unwrap();

    let record = migrate::migrate_all(&store).unwrap();
    assert_eq!(record.migrated.len(), 1);
    assert!(record.failed.is_empty());
    let new_id = &record.migrated[0].new_id;
    assert!(hash::is_content_hash(new_id));
    assert!(!legacy_dir.exists());
    assert!(dir.path().join(new_id).join("template.json").exists());

    // The backup directory holds exactly one backup, named after the old id.
    let backups: Vec<_> = std::fs::read_dir(&record.backup_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(backups, vec!["python-fastapi.backup.json"]);

    // Rollback replays the backup into the legacy location.
    let restored = migrate::rollback(&store, &record.backup_dir).unwrap();
    assert_eq!(restored, 1);
    let replayed: Template = serde_json::from_str(
        &std::fs::read_to_string(legacy_dir.join("template.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(replayed.id, "python-fastapi");
}

#[test]
fn two_stores_in_one_process_stay_independent() {
    let ctx = ServiceContext::in_memory();
    let first = TemplateStore::new(&ctx, Path::new("/first"));
    let second = TemplateStore::new(&ctx, Path::new("/second"));

    let stored = first.create(&sample_template("web")).unwrap();
    first.resolver().set_alias(&ctx, "web", &stored.id).unwrap();

    // The alias lives in the first store's map only.
    assert!(matches!(second.get("web"), Err(StoreError::NotFound(_))));
    assert!(second.list().unwrap().is_empty());
    assert_eq!(first.list().unwrap().len(), 1);
}
