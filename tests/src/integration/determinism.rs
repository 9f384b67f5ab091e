//! # Determinism and Idempotency
//!
//! Same inputs, same bytes. An existing output is never rebuilt without
//! `force`.

#[cfg(test)]
mod tests {
    use std::fs;

    use genesis_runtime::{PipelineOutcome, Step};
    use gf_04_deployment::testing::fixture_param;
    use gf_04_deployment::InMemoryEnvironment;
    use serde_json::Value;

    use crate::integration::{run_pipeline, workspace};

    #[tokio::test]
    async fn test_two_runs_produce_identical_bytes() {
        let param = fixture_param(1000);

        let (_first_dir, first) = workspace(&param);
        let (result, _) = run_pipeline(&first, &InMemoryEnvironment::default()).await;
        result.unwrap();

        let (_second_dir, second) = workspace(&param);
        let (result, _) = run_pipeline(&second, &InMemoryEnvironment::default()).await;
        result.unwrap();

        let a = fs::read(first.output_path()).unwrap();
        let b = fs::read(second.output_path()).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_alloc_keys_sorted_and_lowercase() {
        let (_dir, config) = workspace(&fixture_param(1000));
        let (result, _) = run_pipeline(&config, &InMemoryEnvironment::default()).await;
        result.unwrap();

        let doc: Value = serde_json::from_slice(&fs::read(config.output_path()).unwrap()).unwrap();
        let keys: Vec<&String> = doc["alloc"].as_object().unwrap().keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(keys.iter().all(|k| {
            k.len() == 40 && !k.starts_with("0x") && *k == &k.to_lowercase()
        }));
        assert!(doc["config"]["chainId"].is_u64());
        assert_eq!(doc["timestamp"], "0x6553f100");
    }

    #[tokio::test]
    async fn test_second_run_without_force_is_a_no_op() {
        let (_dir, config) = workspace(&fixture_param(1000));
        let (result, _) = run_pipeline(&config, &InMemoryEnvironment::default()).await;
        result.unwrap();
        let written = fs::read(config.output_path()).unwrap();
        let modified = fs::metadata(config.output_path()).unwrap().modified().unwrap();

        let env = InMemoryEnvironment::default();
        let (result, log) = run_pipeline(&config, &env).await;

        assert!(matches!(result, Ok(PipelineOutcome::Skipped { .. })));
        assert_eq!(env.call_count(), 0);
        assert_eq!(log.steps(), vec![Step::CheckOutput]);
        assert_eq!(fs::read(config.output_path()).unwrap(), written);
        assert_eq!(
            fs::metadata(config.output_path()).unwrap().modified().unwrap(),
            modified
        );
    }
}
