//! # Pipeline Flow
//!
//! Validator funding in strict and relaxed mode, the completeness check
//! after relocation, and parameter errors stopping the run early.

#[cfg(test)]
mod tests {
    use std::fs;

    use genesis_runtime::{ErrorCategory, PipelineError, PipelineOutcome, Step, StepOutcome};
    use gf_02_parameters::{BalanceParam, ParamError};
    use gf_03_state_capture::CaptureError;
    use gf_04_deployment::testing::{fixture_param, FIXTURE_THRESHOLD_SAT};
    use gf_04_deployment::{EnvironmentCall, InMemoryEnvironment};
    use gf_05_genesis_assembly::read_genesis;
    use shared_types::{sat_to_wei, Address, Contract, Quantity, U256};

    use crate::integration::{run_pipeline, workspace};

    fn sent_transactions(env: &InMemoryEnvironment) -> usize {
        env.journal()
            .iter()
            .filter(|call| matches!(call, EnvironmentCall::Send(_)))
            .count()
    }

    // =========================================================================
    // FUNDING
    // =========================================================================

    #[tokio::test]
    async fn test_strict_exact_funding_stakes_threshold() {
        let (_dir, config) = workspace(&fixture_param(FIXTURE_THRESHOLD_SAT));
        let env = InMemoryEnvironment::default();

        let (result, log) = run_pipeline(&config, &env).await;

        assert!(matches!(result, Ok(PipelineOutcome::Written { .. })));
        assert!(log
            .records()
            .iter()
            .all(|r| !matches!(r.outcome, StepOutcome::Failed(_))));

        let genesis = read_genesis(&config.output_path()).unwrap();
        let locking = genesis
            .account(&Contract::Locking.canonical_address())
            .unwrap();
        assert!(locking.balance >= sat_to_wei(FIXTURE_THRESHOLD_SAT));
        assert!(!locking.code.is_empty());
    }

    #[tokio::test]
    async fn test_strict_underfunded_owner_aborts() {
        let (_dir, config) = workspace(&fixture_param(FIXTURE_THRESHOLD_SAT - 1));
        let env = InMemoryEnvironment::default();

        let (result, log) = run_pipeline(&config, &env).await;

        let err = result.unwrap_err();
        match &err {
            PipelineError::Param(ParamError::FundingMismatch {
                required, staged, ..
            }) => {
                assert_eq!(*required, sat_to_wei(FIXTURE_THRESHOLD_SAT));
                assert_eq!(*staged, sat_to_wei(FIXTURE_THRESHOLD_SAT - 1));
            }
            other => panic!("expected a funding mismatch, got {other}"),
        }
        assert_eq!(err.category(), ErrorCategory::Consistency);
        assert_eq!(log.outcome(Step::Deploy), None);
        assert_eq!(sent_transactions(&env), 0);
        assert!(!config.output_path().exists());
    }

    #[tokio::test]
    async fn test_relaxed_mode_tops_up_owner() {
        let mut param = fixture_param(FIXTURE_THRESHOLD_SAT / 2);
        param.locking.strict = false;
        let (_dir, config) = workspace(&param);
        let env = InMemoryEnvironment::default();

        let (result, _) = run_pipeline(&config, &env).await;

        assert!(result.is_ok());
        let genesis = read_genesis(&config.output_path()).unwrap();
        let locking = genesis
            .account(&Contract::Locking.canonical_address())
            .unwrap();
        assert!(locking.balance >= sat_to_wei(FIXTURE_THRESHOLD_SAT));
    }

    // =========================================================================
    // COMPLETENESS
    // =========================================================================

    #[tokio::test]
    async fn test_missing_contract_state_blocks_output() {
        // Learn where Relayer lands; the in-memory environment is deterministic.
        let (_probe_dir, probe) = workspace(&fixture_param(FIXTURE_THRESHOLD_SAT));
        let (result, _) = run_pipeline(&probe, &InMemoryEnvironment::default()).await;
        let Ok(PipelineOutcome::Written { contracts, .. }) = result else {
            panic!("probe run failed");
        };
        let relayer = contracts
            .iter()
            .find(|c| c.contract == Contract::Relayer)
            .unwrap()
            .ephemeral;

        let (_dir, config) = workspace(&fixture_param(FIXTURE_THRESHOLD_SAT));
        let env = InMemoryEnvironment::default();
        env.omit_from_dump(relayer);

        let (result, log) = run_pipeline(&config, &env).await;

        match result {
            Err(PipelineError::Capture(CaptureError::IncompleteDeployment {
                expected,
                found,
                missing,
            })) => {
                assert_eq!(expected, Contract::COUNT);
                assert_eq!(found, Contract::COUNT - 1);
                assert_eq!(missing, vec![Contract::Relayer]);
            }
            other => panic!("expected an incomplete deployment, got {other:?}"),
        }
        assert!(matches!(log.outcome(Step::Relocate), Some(StepOutcome::Failed(_))));
        assert_eq!(log.outcome(Step::Write), None);
        assert!(!config.output_path().exists());
    }

    // =========================================================================
    // PARAMETER GATES
    // =========================================================================

    #[tokio::test]
    async fn test_short_prefix_never_reaches_deployment() {
        let mut param = fixture_param(FIXTURE_THRESHOLD_SAT);
        param.bridge.deposit_prefix_magic = "GTT".into();
        let (_dir, config) = workspace(&param);
        let env = InMemoryEnvironment::default();

        let (result, log) = run_pipeline(&config, &env).await;

        assert!(matches!(
            result,
            Err(PipelineError::Param(ParamError::InvalidPrefixLength { actual: 3 }))
        ));
        assert_eq!(
            result.as_ref().unwrap_err().category(),
            ErrorCategory::Validation
        );
        assert_eq!(log.outcome(Step::Deploy), None);
        assert_eq!(sent_transactions(&env), 0);
    }

    #[tokio::test]
    async fn test_malformed_param_file_rejected_at_load() {
        let (_dir, config) = workspace(&fixture_param(FIXTURE_THRESHOLD_SAT));
        fs::write(&config.param_path, br#"{"Bridge": {"owner": 7}}"#).unwrap();
        let env = InMemoryEnvironment::default();

        let (result, log) = run_pipeline(&config, &env).await;

        assert!(matches!(
            result,
            Err(PipelineError::Param(ParamError::InvalidShape { .. }))
        ));
        assert!(matches!(log.outcome(Step::LoadParams), Some(StepOutcome::Failed(_))));
        assert_eq!(env.call_count(), 0);
    }

    // =========================================================================
    // EXTRA ALLOCATIONS
    // =========================================================================

    #[tokio::test]
    async fn test_extra_balances_allocated() {
        let user = Address::new([0x55; 20]);
        let mut param = fixture_param(FIXTURE_THRESHOLD_SAT);
        param.balances.push(BalanceParam {
            address: user,
            value: Quantity::new(U256::from(42u64)),
            nonce: Some(3),
        });
        let (_dir, config) = workspace(&param);

        let (result, _) = run_pipeline(&config, &InMemoryEnvironment::default()).await;

        assert!(result.is_ok());
        let genesis = read_genesis(&config.output_path()).unwrap();
        let account = genesis.account(&user).unwrap();
        assert_eq!(account.balance, U256::from(42u64));
        assert_eq!(account.nonce, 3);
    }

    #[tokio::test]
    async fn test_repeated_balance_address_rejected() {
        let user = Address::new([0x55; 20]);
        let mut param = fixture_param(FIXTURE_THRESHOLD_SAT);
        for value in [1u64, 2] {
            param.balances.push(BalanceParam {
                address: user,
                value: Quantity::new(U256::from(value)),
                nonce: None,
            });
        }
        let (_dir, config) = workspace(&param);
        let env = InMemoryEnvironment::default();

        let (result, log) = run_pipeline(&config, &env).await;

        assert_eq!(
            result.as_ref().unwrap_err().category(),
            ErrorCategory::Validation
        );
        assert!(matches!(
            result,
            Err(PipelineError::Param(ParamError::DuplicateBalance(address))) if address == user
        ));
        assert_eq!(log.outcome(Step::Deploy), None);
        assert_eq!(sent_transactions(&env), 0);
        assert!(!config.output_path().exists());
    }
}
