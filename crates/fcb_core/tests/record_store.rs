use fcb_core::domain::FactCheckResult;
use fcb_core::store::{RecordStore, SqliteRecordStore};
use tempfile::tempdir;

fn result(claim: &str) -> FactCheckResult {
    FactCheckResult {
        claim: claim.to_string(),
        claim_type: "Factual".to_string(),
        initial_response: "true".to_string(),
        assumptions: vec![],
        assumption_verdicts: vec![],
        gathered_evidence: vec![],
        final_answer: "True.".to_string(),
    }
}

#[test]
fn init_creates_database_in_nested_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("fact_checks.db");
    let store = SqliteRecordStore::new(&path);

    store.init().expect("init");
    assert!(path.exists());
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn save_is_visible_to_a_fresh_store_on_the_same_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fact_checks.db");
    let store = SqliteRecordStore::new(&path);
    store.init().unwrap();

    let saved = store.save(&result("Paris is in France")).expect("save");
    assert!(saved.id > 0);

    let reopened = SqliteRecordStore::new(&path);
    let all = reopened.load_all().unwrap();
    assert_eq!(all, vec![saved]);
}

#[test]
fn clear_then_reload_is_empty() {
    let dir = tempdir().unwrap();
    let store = SqliteRecordStore::new(dir.path().join("fact_checks.db"));
    store.init().unwrap();

    store.save(&result("a")).unwrap();
    store.save(&result("b")).unwrap();
    assert_eq!(store.clear().unwrap(), 2);

    assert!(store.load_all().unwrap().is_empty());
    assert!(SqliteRecordStore::new(store.db_path()).load_all().unwrap().is_empty());
}
