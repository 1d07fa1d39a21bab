//! End-to-end ingestion tests over in-memory fakes
//!
//! Covers:
//! 1. Batch fan-out, progress accounting and registry contents
//! 2. Background task observation through the status map
//! 3. Page tagging for multi-page PDFs
//! 4. Failure handling: embedding errors and dimension mismatches
//! 5. Document deletion from index and registry

mod common;

use common::{stack, stack_with, words, TestEmbedder};
use docqa_core::{DocQaError, TaskState};
use std::collections::HashSet;
use std::time::Duration;

#[tokio::test]
async fn test_ingest_120_chunks_in_three_batches() {
    let stack = stack();

    // 95_300 words -> 120 chunks at an 800-word stride
    let bytes = words(95_300).into_bytes();
    stack
        .coordinator
        .run_ingest(bytes, "big.txt".to_string(), "task-a".to_string())
        .await;

    let ids = stack.coordinator.vector_ids("big.txt").unwrap();
    assert_eq!(ids.len(), 120);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), 120, "vector ids must be unique per chunk");
    assert_eq!(stack.store.vector_count("test-index"), 120);
}

#[tokio::test]
async fn test_background_ingest_reaches_completed_status() {
    common::init_tracing();
    let stack = stack();
    let bytes = words(95_300).into_bytes();
    let task_id = stack.coordinator.start_ingest(bytes, "big.txt".to_string());

    let status = stack.coordinator.status(&task_id).expect("status registered");
    assert_eq!(status.filename, "big.txt");

    let mut waited = Duration::ZERO;
    let status = loop {
        let status = stack.coordinator.status(&task_id).unwrap();
        if status.status != TaskState::Processing {
            break status;
        }
        assert!(waited < Duration::from_secs(5), "ingestion never finished");
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += Duration::from_millis(10);
    };

    assert_eq!(status.status, TaskState::Completed);
    assert_eq!(status.total_chunks, 120);
    assert_eq!(status.processed_chunks, 120);
    assert_eq!(status.progress, 100.0);
    assert!(status.error.is_none());
    assert_eq!(stack.coordinator.documents(), vec!["big.txt".to_string()]);
}

#[tokio::test]
async fn test_two_page_pdf_chunks_tagged_per_page() {
    let stack = stack_with(TestEmbedder::new(), vec![words(3000), words(500)]);
    let task_id = stack
        .coordinator
        .start_ingest(b"%PDF".to_vec(), "paper.pdf".to_string());

    loop {
        let status = stack.coordinator.status(&task_id).unwrap();
        if status.status != TaskState::Processing {
            assert_eq!(status.status, TaskState::Completed);
            // 3000 words -> 4 chunks on page 1; 500 words -> 1 chunk on page 2
            assert_eq!(status.total_chunks, 5);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let ids = stack.coordinator.vector_ids("paper.pdf").unwrap();
    assert_eq!(ids.len(), 5);
    // Deterministic ids derived from filename and chunk index
    assert!(ids.contains(&"paper.pdf-chunk-0".to_string()));
}

#[tokio::test]
async fn test_embedding_failure_marks_task_failed() {
    // Word w95000 lands in the last batch; earlier batches may still land
    let stack = stack_with(TestEmbedder::failing_on("w95000"), Vec::new());
    let bytes = words(95_300).into_bytes();
    let task_id = stack.coordinator.start_ingest(bytes, "bad.txt".to_string());

    let status = loop {
        let status = stack.coordinator.status(&task_id).unwrap();
        if status.status != TaskState::Processing {
            break status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    };

    assert_eq!(status.status, TaskState::Failed);
    let error = status.error.expect("failure reason recorded");
    assert!(error.contains("embedding backend rejected text"), "got: {error}");

    // Successful batches are not rolled back; partial ingestion is visible
    let remaining = stack.coordinator.vector_ids("bad.txt").unwrap_or_default();
    assert!(remaining.len() < 120);
}

#[tokio::test]
async fn test_dimension_mismatch_marks_task_failed() {
    // Probe chunk embeds at 3 dims; a later chunk comes back with 4
    let stack = stack_with(TestEmbedder::oversized_on("w95000"), Vec::new());
    let bytes = words(95_300).into_bytes();
    let task_id = stack.coordinator.start_ingest(bytes, "odd.txt".to_string());

    let status = loop {
        let status = stack.coordinator.status(&task_id).unwrap();
        if status.status != TaskState::Processing {
            break status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    };

    assert_eq!(status.status, TaskState::Failed);
    let error = status.error.unwrap();
    assert!(error.contains("dimension mismatch"), "got: {error}");
}

#[tokio::test]
async fn test_empty_document_completes_with_no_vectors() {
    let stack = stack();
    let task_id = stack.coordinator.start_ingest(Vec::new(), "empty.txt".to_string());

    let status = loop {
        let status = stack.coordinator.status(&task_id).unwrap();
        if status.status != TaskState::Processing {
            break status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    };

    assert_eq!(status.status, TaskState::Completed);
    assert_eq!(status.total_chunks, 0);
    assert!(stack.coordinator.vector_ids("empty.txt").is_none());
}

#[tokio::test]
async fn test_unsupported_type_fails_the_task() {
    let stack = stack();
    let task_id = stack
        .coordinator
        .start_ingest(b"GIF89a".to_vec(), "pic.gif".to_string());

    let status = loop {
        let status = stack.coordinator.status(&task_id).unwrap();
        if status.status != TaskState::Processing {
            break status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    };

    assert_eq!(status.status, TaskState::Failed);
    assert!(status.error.unwrap().contains("Unsupported file type"));
}

#[tokio::test]
async fn test_delete_document_clears_index_and_registry() {
    let stack = stack();
    let bytes = words(95_300).into_bytes();
    stack
        .coordinator
        .run_ingest(bytes, "doomed.txt".to_string(), "t".to_string())
        .await;
    assert_eq!(stack.store.vector_count("test-index"), 120);

    stack.coordinator.delete_document("doomed.txt").await.unwrap();

    assert_eq!(stack.store.vector_count("test-index"), 0);
    assert!(stack.coordinator.vector_ids("doomed.txt").is_none());
    assert!(stack.coordinator.documents().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_document_is_not_found() {
    let stack = stack();
    let err = stack.coordinator.delete_document("ghost.txt").await.unwrap_err();
    assert!(matches!(err, DocQaError::DocumentNotFound(_)));
}

#[tokio::test]
async fn test_reupload_overwrites_same_ids() {
    let stack = stack();
    let bytes = words(1000).into_bytes();
    stack
        .coordinator
        .run_ingest(bytes.clone(), "dup.txt".to_string(), "t1".to_string())
        .await;
    assert_eq!(stack.store.vector_count("test-index"), 2);

    // Same filename and chunk indexes: upsert overwrites, count is stable
    stack
        .coordinator
        .run_ingest(bytes, "dup.txt".to_string(), "t2".to_string())
        .await;
    assert_eq!(stack.store.vector_count("test-index"), 2);
}
