//! Batch execution: parallel, sequential, and pipeline with accumulation.

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::{Dispatcher, SkillInvocationResult};
use crate::types::{Params, SkillCall};

/// How a batch of calls is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// All calls concurrently. No data flows between calls.
    #[default]
    Parallel,
    /// One after another, independently.
    Sequential,
    /// One after another; each success feeds later calls.
    Pipeline,
}

/// Ordered results of a batch plus summary counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResults {
    pub results: Vec<SkillInvocationResult>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchResults {
    pub fn new(results: Vec<SkillInvocationResult>) -> Self {
        let total = results.len();
        let successful = results.iter().filter(|r| r.is_success()).count();
        Self {
            results,
            total,
            successful,
            failed: total - successful,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// First successful result for a skill.
    pub fn result_for(&self, skill_name: &str) -> Option<&Params> {
        self.results
            .iter()
            .filter(|r| r.skill_name == skill_name)
            .find_map(|r| r.result())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SkillInvocationResult> {
        self.results.iter()
    }
}

impl IntoIterator for BatchResults {
    type Item = SkillInvocationResult;
    type IntoIter = std::vec::IntoIter<SkillInvocationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

/// Declared parameters overlaid with the accumulator. Accumulated values win.
pub fn effective_parameters(declared: &Params, accumulator: &Params) -> Params {
    let mut effective = declared.clone();
    for (key, value) in accumulator {
        effective.insert(key.clone(), value.clone());
    }
    effective
}

impl Dispatcher {
    /// Run all calls concurrently. Results are in input order.
    pub async fn invoke_parallel(&self, calls: Vec<SkillCall>) -> BatchResults {
        tracing::info!("Invoking {} skills in parallel", calls.len());
        let futures = calls.into_iter().map(|call| async move {
            let SkillCall { skill, parameters } = call;
            self.invoke(&skill, parameters).await
        });
        BatchResults::new(join_all(futures).await)
    }

    /// Run calls one after another without passing data between them.
    pub async fn invoke_sequential(&self, calls: Vec<SkillCall>) -> BatchResults {
        tracing::info!("Invoking {} skills sequentially", calls.len());
        let mut results = Vec::with_capacity(calls.len());
        for SkillCall { skill, parameters } in calls {
            results.push(self.invoke(&skill, parameters).await);
        }
        BatchResults::new(results)
    }

    /// Run calls in order, merging each successful result into an
    /// accumulator that overrides the declared parameters of later calls.
    /// Failures are recorded and the pipeline continues.
    pub async fn invoke_pipeline(&self, calls: Vec<SkillCall>) -> BatchResults {
        tracing::info!("Invoking {} skills as a pipeline", calls.len());
        let mut accumulator = Params::new();
        let mut results = Vec::with_capacity(calls.len());

        for SkillCall { skill, parameters } in calls {
            let effective = effective_parameters(&parameters, &accumulator);
            let result = self.invoke(&skill, effective).await;
            match result.result() {
                Some(output) => {
                    for (key, value) in output {
                        accumulator.insert(key.clone(), value.clone());
                    }
                }
                None => tracing::debug!(skill = skill.as_str(), "pipeline step failed, continuing"),
            }
            results.push(result);
        }
        BatchResults::new(results)
    }

    pub async fn run_batch(&self, mode: BatchMode, calls: Vec<SkillCall>) -> BatchResults {
        match mode {
            BatchMode::Parallel => self.invoke_parallel(calls).await,
            BatchMode::Sequential => self.invoke_sequential(calls).await,
            BatchMode::Pipeline => self.invoke_pipeline(calls).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::{dispatcher_with, scripted, Mode};
    use crate::dispatch::InvocationError;
    use crate::skill::into_params;
    use serde_json::json;
    use std::time::{Duration, Instant};

    #[test]
    fn accumulator_wins_over_declared() {
        let declared = into_params(json!({"a": 1, "b": 2}));
        let accumulator = into_params(json!({"a": 5}));
        let effective = effective_parameters(&declared, &accumulator);
        assert_eq!(effective, into_params(json!({"a": 5, "b": 2})));
    }

    #[tokio::test]
    async fn parallel_preserves_input_order() {
        let dispatcher = dispatcher_with(vec![
            scripted("slow", vec![], Mode::Sleep(150)),
            scripted("fast", vec![], Mode::Sleep(1)),
        ]);
        let calls = vec![
            SkillCall::new("slow", Params::new()),
            SkillCall::new("fast", Params::new()),
            SkillCall::new("slow", Params::new()),
        ];

        let start = Instant::now();
        let batch = dispatcher.invoke_parallel(calls).await;
        let elapsed = start.elapsed();

        assert_eq!(batch.results[0].skill_name, "slow");
        assert_eq!(batch.results[1].skill_name, "fast");
        assert_eq!(batch.results[2].skill_name, "slow");
        assert!(batch.all_succeeded());
        // Sequential would take at least 301ms.
        assert!(elapsed < Duration::from_millis(290));
    }

    #[tokio::test]
    async fn parallel_failures_are_independent() {
        let dispatcher = Dispatcher::with_builtin_skills();
        let batch = dispatcher
            .invoke_parallel(vec![
                SkillCall::with_json("get_weather", json!({"destination": "Tokyo"})),
                SkillCall::with_json("teleport", json!({})),
                SkillCall::with_json("query_prices", json!({})),
            ])
            .await;

        assert_eq!(batch.total, 3);
        assert_eq!(batch.successful, 1);
        assert_eq!(batch.failed, 2);
        assert!(matches!(
            batch.results[1].error(),
            Some(InvocationError::NotFound { .. })
        ));
        assert!(matches!(
            batch.results[2].error(),
            Some(InvocationError::Validation { .. })
        ));
        assert_eq!(dispatcher.history_len(), 3);
    }

    #[tokio::test]
    async fn pipeline_feeds_later_steps() {
        let dispatcher = dispatcher_with(vec![
            scripted("first", vec![], Mode::Fixed(json!({"a": 5, "from_first": true}))),
            scripted("second", vec!["from_first"], Mode::Echo),
        ]);
        let batch = dispatcher
            .invoke_pipeline(vec![
                SkillCall::with_json("first", json!({})),
                SkillCall::with_json("second", json!({"a": 1, "b": 2})),
            ])
            .await;

        assert!(batch.all_succeeded());
        let second = batch.results[1].result().unwrap();
        assert_eq!(second["a"], 5);
        assert_eq!(second["b"], 2);
        assert_eq!(second["from_first"], true);
    }

    #[tokio::test]
    async fn pipeline_continues_after_failure() {
        let dispatcher = dispatcher_with(vec![
            scripted("seed", vec![], Mode::Fixed(json!({"destination": "Paris"}))),
            scripted("broken", vec![], Mode::Fail("nope")),
            scripted("tail", vec!["destination"], Mode::Echo),
        ]);
        let batch = dispatcher
            .invoke_pipeline(vec![
                SkillCall::with_json("seed", json!({})),
                SkillCall::with_json("broken", json!({})),
                SkillCall::with_json("tail", json!({})),
            ])
            .await;

        assert_eq!(batch.successful, 2);
        assert_eq!(batch.failed, 1);
        assert!(!batch.results[1].is_success());
        assert_eq!(batch.results[2].result().unwrap()["destination"], "Paris");
    }

    #[tokio::test]
    async fn sequential_does_not_accumulate() {
        let dispatcher = dispatcher_with(vec![
            scripted("seed", vec![], Mode::Fixed(json!({"destination": "Paris"}))),
            scripted("tail", vec!["destination"], Mode::Echo),
        ]);
        let batch = dispatcher
            .run_batch(
                BatchMode::Sequential,
                vec![
                    SkillCall::with_json("seed", json!({})),
                    SkillCall::with_json("tail", json!({})),
                ],
            )
            .await;

        assert!(batch.results[0].is_success());
        assert!(matches!(
            batch.results[1].error(),
            Some(InvocationError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn empty_batch() {
        let dispatcher = Dispatcher::with_builtin_skills();
        for mode in [BatchMode::Parallel, BatchMode::Sequential, BatchMode::Pipeline] {
            let batch = dispatcher.run_batch(mode, Vec::new()).await;
            assert_eq!(batch.total, 0);
            assert!(batch.all_succeeded());
        }
    }

    #[test]
    fn batch_results_serialize_counts() {
        let batch = BatchResults::new(vec![SkillInvocationResult::succeeded(
            "echo",
            Params::new(),
        )]);
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["successful"], 1);
        assert_eq!(value["failed"], 0);
        assert_eq!(value["results"][0]["success"], true);
    }

    #[test]
    fn batch_mode_parses_lowercase() {
        let mode: BatchMode = serde_json::from_value(json!("pipeline")).unwrap();
        assert_eq!(mode, BatchMode::Pipeline);
        assert_eq!(BatchMode::default(), BatchMode::Parallel);
    }
}
