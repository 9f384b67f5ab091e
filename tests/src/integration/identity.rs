//! # Validator Identity
//!
//! Consensus addresses derived from either key encoding, and declared
//! addresses that do not match their key.

#[cfg(test)]
mod tests {
    use genesis_runtime::{PipelineError, PipelineOutcome, Step, StepOutcome};
    use gf_01_address_derivation::{
        derive_consensus_address, derive_identity, parse_public_key, parse_secret_key,
        sign_ownership,
    };
    use gf_02_parameters::{ParamError, ValidatorParam};
    use gf_04_deployment::testing::{
        fixture_param, FIXTURE_CHAIN_ID, FIXTURE_SECRET, FIXTURE_VALIDATOR_OWNER,
    };
    use gf_04_deployment::{EnvironmentCall, InMemoryEnvironment};
    use k256::ecdsa::SigningKey;
    use proptest::prelude::*;
    use shared_types::Address;

    use crate::integration::{run_pipeline, workspace};

    // =========================================================================
    // DERIVATION
    // =========================================================================

    fn encodings(key: &SigningKey) -> (String, String) {
        let public = key.verifying_key();
        (
            hex::encode(public.to_encoded_point(true).as_bytes()),
            hex::encode(public.to_encoded_point(false).as_bytes()),
        )
    }

    #[test]
    fn test_consensus_address_same_for_both_encodings() {
        let key = parse_secret_key(FIXTURE_SECRET).unwrap();
        let (compressed, uncompressed) = encodings(&key);

        let from_compressed = derive_consensus_address(&parse_public_key(&compressed).unwrap());
        let from_uncompressed =
            derive_consensus_address(&parse_public_key(&uncompressed).unwrap());

        assert_eq!(from_compressed, from_uncompressed);
        assert_eq!(
            from_compressed,
            derive_consensus_address(&parse_public_key(&compressed).unwrap())
        );
        assert_eq!(
            from_compressed,
            derive_identity(key.verifying_key()).consensus_address
        );
    }

    proptest! {
        #[test]
        fn prop_consensus_address_ignores_encoding(seed in any::<[u8; 32]>()) {
            let key = SigningKey::from_slice(&seed);
            prop_assume!(key.is_ok());
            let key = key.unwrap();
            let (compressed, uncompressed) = encodings(&key);

            let a = derive_consensus_address(&parse_public_key(&compressed).unwrap());
            let b = derive_consensus_address(&parse_public_key(&uncompressed).unwrap());
            prop_assert_eq!(a, b);
            prop_assert_eq!(a, derive_consensus_address(&parse_public_key(&compressed).unwrap()));
        }
    }

    // =========================================================================
    // DECLARED ADDRESSES
    // =========================================================================

    fn signed_validator(declared: Option<Address>) -> ValidatorParam {
        let key = parse_secret_key(FIXTURE_SECRET).unwrap();
        let identity = derive_identity(key.verifying_key());
        let signature = sign_ownership(FIXTURE_CHAIN_ID, &key, &FIXTURE_VALIDATOR_OWNER).unwrap();
        ValidatorParam::Signed {
            owner: FIXTURE_VALIDATOR_OWNER,
            pubkey: hex::encode(identity.compressed),
            signature: signature.to_string(),
            validator: declared.unwrap_or(identity.consensus_address),
        }
    }

    #[tokio::test]
    async fn test_address_mismatch_rejected_before_any_call() {
        let mut param = fixture_param(1000);
        param.locking.validators = vec![signed_validator(Some(Address::new([0xee; 20])))];
        let (_dir, mut config) = workspace(&param);
        config.chain_id = Some(FIXTURE_CHAIN_ID);
        let env = InMemoryEnvironment::default();

        let (result, log) = run_pipeline(&config, &env).await;

        assert!(matches!(
            result,
            Err(PipelineError::Param(ParamError::AddressMismatch { .. }))
        ));
        assert!(env.journal().is_empty());
        assert!(matches!(log.outcome(Step::Validate), Some(StepOutcome::Failed(_))));
        assert!(!config.output_path().exists());
    }

    #[tokio::test]
    async fn test_address_mismatch_with_live_chain_id_only_reads() {
        let mut param = fixture_param(1000);
        param.locking.validators = vec![signed_validator(Some(Address::new([0xee; 20])))];
        let (_dir, config) = workspace(&param);
        let env = InMemoryEnvironment::default();

        let (result, _) = run_pipeline(&config, &env).await;

        assert!(result.is_err());
        assert_eq!(env.journal(), vec![EnvironmentCall::ChainId]);
    }

    #[tokio::test]
    async fn test_signed_validator_matches_secret_form() {
        let mut param = fixture_param(1000);
        param.locking.validators = vec![signed_validator(None)];
        let (_dir, config) = workspace(&param);
        let env = InMemoryEnvironment::default();

        let (result, _) = run_pipeline(&config, &env).await;

        assert!(matches!(result, Ok(PipelineOutcome::Written { .. })));
    }
}
