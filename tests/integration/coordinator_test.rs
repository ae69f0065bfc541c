//! Large-file coordination end to end with in-process backends

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use reviewpack::compress::{CompressionConfig, COMPRESSED_SECTION_MARKER};
use reviewpack::review::{
    LargeFileConfig, LargeFileCoordinator, LargeFileRequest, LargeFileResult, ProgressReporter,
    ReviewError,
};

use crate::helpers::{python_source, FixedBackend, MarkerFailBackend};

fn config() -> LargeFileConfig {
    LargeFileConfig::default()
}

// ============================================
// Single File
// ============================================

#[test]
fn fifty_thousand_char_file_is_compressed_before_the_model_sees_it() {
    let backend = MarkerFailBackend::new("NEVER_PRESENT");
    let coordinator =
        LargeFileCoordinator::new(config(), CompressionConfig::default(), backend);
    let request = LargeFileRequest::new("app/service.py", python_source(50_000));

    assert!(coordinator.is_large(&request));
    let result = coordinator.process_one(&request).unwrap();

    assert_eq!(result.score, Some(1));
    assert_eq!(result.suggestions.len(), 2);

    let prompts = coordinator.backend().prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("app/service.py"));
    assert!(prompts[0].contains(COMPRESSED_SECTION_MARKER));
    assert!(prompts[0].chars().count() < 50_000);
}

#[test]
fn small_file_is_rejected_by_process_one() {
    let backend = FixedBackend::new("- something");
    let coordinator =
        LargeFileCoordinator::new(config(), CompressionConfig::default(), backend);
    let request = LargeFileRequest::new("tiny.py", "print(1)\n");

    let err = coordinator.process_one(&request).unwrap_err();
    assert!(matches!(err, ReviewError::NotLarge { .. }));
    assert_eq!(coordinator.backend().calls(), 0);
}

#[test]
fn plain_reply_falls_back_to_raw_lines() {
    let backend = FixedBackend::new("No issues found.");
    let coordinator =
        LargeFileCoordinator::new(config(), CompressionConfig::default(), backend);
    let request = LargeFileRequest::new("clean.py", python_source(25_000));

    let result = coordinator.process_one(&request).unwrap();
    assert_eq!(result.suggestions, ["No issues found."]);
    assert_eq!(result.score, Some(1));
    assert!(!result.is_error());
}

#[test]
fn disabled_large_file_handling_treats_nothing_as_large() {
    let backend = FixedBackend::new("- x");
    let coordinator = LargeFileCoordinator::new(
        LargeFileConfig {
            enabled: false,
            ..config()
        },
        CompressionConfig::default(),
        backend,
    );
    let request = LargeFileRequest::new("big.py", python_source(60_000));

    assert!(!coordinator.is_large(&request));
    assert!(coordinator.plan_batches(&[request]).is_empty());
}

// ============================================
// Batches
// ============================================

fn five_requests() -> Vec<LargeFileRequest> {
    (0..5)
        .map(|i| {
            let mut content = python_source(21_000 + i * 500);
            if i == 2 {
                content = format!("# FAIL_HERE\n{}", content);
            }
            LargeFileRequest::new(format!("pkg/module_{}.py", i), content)
        })
        .collect()
}

#[test]
fn one_failing_file_does_not_stop_the_others() {
    let backend = MarkerFailBackend::new("FAIL_HERE");
    let coordinator =
        LargeFileCoordinator::new(config(), CompressionConfig::default(), backend);

    let results = coordinator.review_all(&five_requests());

    assert_eq!(results.len(), 5);
    assert_eq!(coordinator.backend().prompt_count(), 5);

    let failed = &results["pkg/module_2.py"];
    assert!(failed.is_error());
    assert_eq!(failed.score, Some(0));
    assert!(failed.suggestions[0].starts_with(LargeFileResult::ERROR_PREFIX));

    for i in [0, 1, 3, 4] {
        let result = &results[&format!("pkg/module_{}.py", i)];
        assert_eq!(result.score, Some(1), "module_{}", i);
        assert!(!result.is_error());
    }
}

#[test]
fn batches_respect_the_token_ceiling_and_order() {
    let backend = FixedBackend::new("- x");
    let coordinator =
        LargeFileCoordinator::new(config(), CompressionConfig::default(), backend);
    let requests = five_requests();

    let batches = coordinator.plan_batches(&requests);
    let planned: Vec<&str> = batches
        .iter()
        .flat_map(|b| b.entries.iter().map(|e| e.file_path()))
        .collect();
    let expected: Vec<&str> = requests.iter().map(|r| r.file_path.as_str()).collect();

    assert_eq!(planned, expected);
    for (i, batch) in batches.iter().enumerate() {
        assert_eq!(batch.id, i);
        assert!(!batch.is_empty());
        assert!(batch.len() == 1 || batch.total_tokens() <= 4_000);
    }
}

#[test]
fn skipped_small_files_are_not_planned() {
    let backend = FixedBackend::new("- x");
    let coordinator =
        LargeFileCoordinator::new(config(), CompressionConfig::default(), backend);
    let requests = vec![
        LargeFileRequest::new("small.py", "x = 1\n"),
        LargeFileRequest::new("big.py", python_source(30_000)),
    ];

    let batches = coordinator.plan_batches(&requests);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].entries[0].file_path(), "big.py");
}

#[test]
fn parallel_workers_produce_the_same_results() {
    let requests = five_requests();

    let sequential = LargeFileCoordinator::new(
        config(),
        CompressionConfig::default(),
        MarkerFailBackend::new("FAIL_HERE"),
    )
    .review_all(&requests);

    let parallel = LargeFileCoordinator::new(
        LargeFileConfig {
            workers: 4,
            max_batch_tokens: 1_000_000,
            ..config()
        },
        CompressionConfig::default(),
        MarkerFailBackend::new("FAIL_HERE"),
    )
    .review_all(&requests);

    assert_eq!(sequential, parallel);
}

#[test]
fn progress_reaches_the_total() {
    let backend = FixedBackend::new("- x");
    let coordinator =
        LargeFileCoordinator::new(config(), CompressionConfig::default(), backend);
    let requests = five_requests();
    let batches = coordinator.plan_batches(&requests);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let progress = ProgressReporter::with_callback(5, move |_, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    coordinator.process_batches_with_progress(&batches, &progress);

    assert_eq!(progress.get_progress(), (5, 5));
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}
