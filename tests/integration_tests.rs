//! Integration tests for document input

use cv_match::input::manager::{expand_corpus_paths, InputManager};
use std::path::{Path, PathBuf};

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
    // Headings survive as their own lines
    assert!(text.lines().any(|line| line == "PROJECTS"));
}

#[tokio::test]
async fn test_extract_document() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let document = manager.extract_document(path).await.unwrap();
    assert_eq!(document.byte_len, document.text.len());
    assert_eq!(document.source, "tests/fixtures/sample_resume.txt");
    assert!(document.char_count() > 100);
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    // First extraction
    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    // Second extraction should use cache
    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[test]
fn test_corpus_directory_expansion_is_sorted() {
    let paths = expand_corpus_paths(&[
        PathBuf::from("tests/fixtures/references"),
        PathBuf::from("tests/fixtures/sample_job.txt"),
    ])
    .unwrap();

    assert_eq!(
        paths,
        vec![
            PathBuf::from("tests/fixtures/references/a_designer.txt"),
            PathBuf::from("tests/fixtures/references/b_submitted_earlier.txt"),
            PathBuf::from("tests/fixtures/sample_job.txt"),
        ]
    );
}

#[tokio::test]
async fn test_load_corpus() {
    let mut manager = InputManager::new().with_cache(false);
    let corpus = manager
        .load_corpus(&[PathBuf::from("tests/fixtures/references")])
        .await
        .unwrap();

    assert_eq!(corpus.len(), 2);
    assert!(corpus[0].text.contains("Product Designer"));
    assert_eq!(manager.cache_size(), 0);
}
