//! The generator loop: one external call per item, results in input order.
//!
//! A failed item never aborts its siblings. Whatever the backend, failure
//! arrives as a response starting with the `"Error:"` sentinel; the loop
//! records a `--- ERROR PROCESSING <KIND> <n> ---` placeholder in that slot
//! and moves on.
//!
//! With `concurrency == 1` (the default) calls are strictly sequential. Higher
//! values keep up to N calls in flight through an ordered buffered stream, so
//! the output order is still the input order.

use crate::error::ItemError;
use crate::output::{ItemKind, ItemResult, RunStats};
use crate::progress::ProgressCallback;
use crate::prompts::{frame_item, is_error_sentinel};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Anything that turns a prompt into text.
///
/// Implementations never return an error value: failures are reported as a
/// string starting with `"Error:"`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> String;
}

/// How one generator-loop run frames and labels its items.
#[derive(Clone, Copy)]
pub struct LoopSpec<'a> {
    pub kind: ItemKind,
    pub template: &'a str,
    pub separator: &'a str,
    pub concurrency: usize,
    pub progress: Option<&'a ProgressCallback>,
}

/// Run every item through `generator`, returning one result per item in
/// input order, plus run totals.
pub async fn run_items<G>(
    items: &[String],
    generator: &G,
    plan: LoopSpec<'_>,
) -> (Vec<ItemResult>, RunStats)
where
    G: TextGenerator + ?Sized,
{
    let start = Instant::now();
    let total = items.len();
    info!("Generating {} {} items", total, plan.kind);

    if let Some(cb) = plan.progress {
        cb.on_run_start(plan.kind, total);
    }

    let results: Vec<ItemResult> = if plan.concurrency <= 1 {
        let mut results = Vec::with_capacity(total);
        for (index, item) in items.iter().enumerate() {
            results.push(process_item(index, item, total, generator, plan).await);
        }
        results
    } else {
        stream::iter(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| process_item(index, item, total, generator, plan)),
        )
        .buffered(plan.concurrency)
        .collect()
        .await
    };

    let stats = RunStats::from_results(&results, start.elapsed().as_millis() as u64);
    if let Some(cb) = plan.progress {
        cb.on_run_complete(plan.kind, total, stats.succeeded);
    }
    info!(
        "{} generation complete: {}/{} succeeded in {}ms",
        plan.kind, stats.succeeded, stats.total_items, stats.duration_ms
    );

    (results, stats)
}

async fn process_item<G>(
    index: usize,
    item: &str,
    total: usize,
    generator: &G,
    plan: LoopSpec<'_>,
) -> ItemResult
where
    G: TextGenerator + ?Sized,
{
    let number = index + 1;
    let start = Instant::now();
    debug!("Processing {} {}/{}", plan.kind, number, total);
    if let Some(cb) = plan.progress {
        cb.on_item_start(plan.kind, number, total);
    }

    let request = frame_item(plan.template, plan.separator, item);
    let response = generator.generate(&request).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    if is_error_sentinel(&response) {
        warn!("Relay error on {} {}: {}", plan.kind, number, response);
        if let Some(cb) = plan.progress {
            cb.on_item_error(plan.kind, number, total, &response);
        }
        return ItemResult {
            index,
            kind: plan.kind,
            text: plan.kind.error_placeholder(number),
            duration_ms,
            error: Some(ItemError::RelayFailed {
                kind: plan.kind.label().to_string(),
                number,
                detail: response,
            }),
        };
    }

    if let Some(cb) = plan.progress {
        cb.on_item_complete(plan.kind, number, total, response.chars().count());
    }
    ItemResult {
        index,
        kind: plan.kind,
        text: response,
        duration_ms,
        error: None,
    }
}

/// Texts of `results` in order, placeholders included.
pub fn texts(results: &[ItemResult]) -> Vec<&str> {
    results.iter().map(|r| r.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::GenerationProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Echoes the last line of the request; fails when it contains "FAIL".
    struct EchoGenerator {
        calls: Mutex<Vec<String>>,
    }

    impl EchoGenerator {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> String {
            self.calls.lock().unwrap().push(prompt.to_string());
            let item = prompt.rsplit('\n').next().unwrap_or_default();
            if item.contains("FAIL") {
                "Error: Relay server responded with status 500. Details: boom".to_string()
            } else {
                format!("out:{item}")
            }
        }
    }

    fn plan(kind: ItemKind) -> LoopSpec<'static> {
        LoopSpec {
            kind,
            template: "T",
            separator: "\n",
            concurrency: 1,
            progress: None,
        }
    }

    fn items(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn failed_item_becomes_placeholder_and_loop_continues() {
        let generator = EchoGenerator::new();
        let (results, stats) =
            run_items(&items(&["one", "FAIL", "three"]), &generator, plan(ItemKind::Scene)).await;

        assert_eq!(
            texts(&results),
            vec!["out:one", "--- ERROR PROCESSING SCENE 2 ---", "out:three"]
        );
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 1);
        match &results[1].error {
            Some(ItemError::RelayFailed { number, detail, .. }) => {
                assert_eq!(*number, 2);
                assert!(detail.starts_with("Error:"));
            }
            None => panic!("item 2 should carry its relay error"),
        }
    }

    #[tokio::test]
    async fn requests_are_template_separator_item() {
        let generator = EchoGenerator::new();
        let plan = LoopSpec {
            template: "Draw panels.",
            separator: "\n\n--- SCRIPT CHUNK ---\n\n",
            ..plan(ItemKind::Chunk)
        };
        run_items(&items(&["INT. BARN"]), &generator, plan).await;
        assert_eq!(
            generator.calls.lock().unwrap().as_slice(),
            ["Draw panels.\n\n--- SCRIPT CHUNK ---\n\nINT. BARN"]
        );
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let generator = EchoGenerator::new();
        let (results, stats) = run_items(&[], &generator, plan(ItemKind::Chunk)).await;
        assert!(results.is_empty());
        assert_eq!(stats.total_items, 0);
        assert!(generator.calls.lock().unwrap().is_empty());
    }

    /// Sleeps longer for earlier items so completions arrive reversed.
    struct SlowFirst;

    #[async_trait]
    impl TextGenerator for SlowFirst {
        async fn generate(&self, prompt: &str) -> String {
            let n: u64 = prompt.rsplit('\n').next().unwrap_or("0").parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(40 - n * 10)).await;
            format!("r{n}")
        }
    }

    #[tokio::test]
    async fn concurrent_run_preserves_input_order() {
        let plan = LoopSpec {
            concurrency: 4,
            ..plan(ItemKind::Chunk)
        };
        let (results, _) = run_items(&items(&["0", "1", "2", "3"]), &SlowFirst, plan).await;
        assert_eq!(texts(&results), vec!["r0", "r1", "r2", "r3"]);
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[derive(Default)]
    struct Counter {
        completes: AtomicUsize,
        errors: AtomicUsize,
        run_success: AtomicUsize,
    }

    impl GenerationProgressCallback for Counter {
        fn on_item_complete(&self, _k: ItemKind, _n: usize, _t: usize, _len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_item_error(&self, _k: ItemKind, _n: usize, _t: usize, _e: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_run_complete(&self, _k: ItemKind, _t: usize, success: usize) {
            self.run_success.store(success, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn progress_callback_sees_every_item() {
        let counter = Arc::new(Counter::default());
        let cb: ProgressCallback = counter.clone();
        let plan = LoopSpec {
            progress: Some(&cb),
            ..plan(ItemKind::Chunk)
        };
        run_items(&items(&["a", "FAIL", "c", "FAIL"]), &EchoGenerator::new(), plan).await;
        assert_eq!(counter.completes.load(Ordering::SeqCst), 2);
        assert_eq!(counter.errors.load(Ordering::SeqCst), 2);
        assert_eq!(counter.run_success.load(Ordering::SeqCst), 2);
    }
}
