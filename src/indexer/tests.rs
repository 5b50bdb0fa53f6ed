use super::*;
use tempfile::TempDir;

fn test_builder(temp_dir: &TempDir) -> VectorIndexBuilder {
    let config = crate::config::Config::load(temp_dir.path()).expect("can load config");
    VectorIndexBuilder::new(&config).expect("can create builder")
}

#[test]
fn index_key_strips_the_extension() {
    assert_eq!(index_key("report.pdf"), "report");
    assert_eq!(index_key("archive.tar.gz"), "archive.tar");
    assert_eq!(index_key("no-extension"), "no-extension");
}

#[test]
fn index_key_is_stable_for_a_filename() {
    assert_eq!(index_key("report.pdf"), index_key("report.pdf"));
}

#[tokio::test]
async fn empty_text_is_rejected_before_any_work() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let builder = test_builder(&temp_dir);

    let result = builder.build_and_persist("", "report").await;
    assert!(matches!(result, Err(IndexError::EmptyText)));

    let result = builder.build_and_persist("   \n\n  ", "report").await;
    assert!(matches!(result, Err(IndexError::EmptyText)));

    // Nothing was written under the indexes directory.
    assert!(!temp_dir.path().join("indexes").exists());
}
