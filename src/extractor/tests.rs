use super::*;
use tempfile::TempDir;

#[tokio::test]
async fn missing_file_is_distinguished_from_parse_failure() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let path = temp_dir.path().join("never-written.pdf");

    let result = PdfTextExtractor.extract(&path).await;
    assert!(matches!(result, Err(ExtractionError::NotFound(_))));
}

#[tokio::test]
async fn unparseable_bytes_fail_extraction() {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let path = temp_dir.path().join("bogus.pdf");
    std::fs::write(&path, b"this is not a pdf").expect("can write file");

    let result = PdfTextExtractor.extract(&path).await;
    assert!(matches!(result, Err(ExtractionError::Parse(_))));
}

#[test]
fn extract_bytes_rejects_garbage() {
    assert!(PdfTextExtractor.extract_bytes(b"%PDF-not-really").is_err());
}
