use std::fs;

use questionnaire::{
    ConfigStore, FileStore, LiveTest, Question, TestConfig, TestSession, LIVE_TEST_KEY,
};

fn config() -> TestConfig {
    let question = Question::new("Why?", ["a", "b", "c", "d"].map(String::from), 2).unwrap();
    TestConfig::new(vec![question], 45).unwrap()
}

#[test]
fn test_live_test_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut live = LiveTest::new(FileStore::new(dir.path()));
    live.save(&config()).unwrap();

    let mut reopened = LiveTest::new(FileStore::new(dir.path()));
    let loaded = reopened.load().unwrap().unwrap();
    assert_eq!(loaded, config());
    assert_eq!(loaded.time_limit_secs(), 45 * 60);

    let blob = reopened.store().get(LIVE_TEST_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(json["timeLimit"], 45);
    assert_eq!(json["questions"][0]["correctAnswerIndex"], 2);
}

#[test]
fn test_corrupt_live_test_is_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{}.json", LIVE_TEST_KEY));
    fs::write(&path, "{ not json").unwrap();

    let mut live = LiveTest::new(FileStore::new(dir.path()));
    assert_eq!(live.load().unwrap(), None);
    assert!(!path.exists());

    assert!(TestSession::new(live.load().unwrap().as_ref()).is_err());
}

#[test]
fn test_out_of_range_answer_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{}.json", LIVE_TEST_KEY));
    let blob = r#"{"questions":[{"question":"q","options":["a","b","c","d"],"correctAnswerIndex":7}],"timeLimit":10}"#;
    fs::write(&path, blob).unwrap();

    let mut live = LiveTest::new(FileStore::new(dir.path()));
    assert_eq!(live.load().unwrap(), None);
    assert!(!path.exists());
}

#[test]
fn test_reset_removes_live_test() {
    let dir = tempfile::tempdir().unwrap();
    let mut live = LiveTest::new(FileStore::new(dir.path()));
    live.save(&config()).unwrap();
    live.clear().unwrap();
    live.clear().unwrap();
    assert_eq!(live.load().unwrap(), None);
}
