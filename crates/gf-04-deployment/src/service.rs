//! # Deployment Orchestrator
//!
//! Deploys and initializes the genesis contracts on the ephemeral
//! environment, one contract at a time, in [`Contract::ALL`] order. Every
//! call is awaited to confirmation before the next one is issued.
//!
//! ## Flow
//!
//! ```text
//! GoatToken ──mirror──→ canonical token ──┐
//!                                        ├─→ GoatDao, Locking reward lookup
//! Bridge ──seed deposits──→ owner balances ─→ Locking validator funding
//! ```

use gf_01_address_derivation::Signature65;
use gf_02_parameters::{ValidatedBridge, ValidatedParams, ValidatedValidator};
use gf_03_state_capture::decode_dump;
use shared_types::{
    ether_to_wei, executors, Address, Contract, DeployedContract, Hash, U256,
};
use tracing::{debug, info, instrument, warn};

use crate::domain::abi::{decode_uint, AbiValue};
use crate::domain::artifact::{Artifact, ArtifactStore};
use crate::domain::entities::{DeploymentReport, Transaction};
use crate::domain::errors::DeploymentError;
use crate::ports::environment::Environment;

/// Native balance sent to each validator owner before it calls Locking.
pub const OWNER_GAS_MONEY_ETHER: u64 = 1;

/// Native balance given to the relayer executor before replaying deposits.
pub const EXECUTOR_GAS_MONEY_ETHER: u64 = 1;

/// Drives one deployment run against an [`Environment`].
pub struct DeploymentOrchestrator<'a, E: Environment + ?Sized> {
    env: &'a E,
    artifacts: &'a ArtifactStore,
}

/// A deployed contract together with the artifact used to call it.
struct Handle {
    artifact: Artifact,
    address: Address,
}

impl<'a, E: Environment + ?Sized> DeploymentOrchestrator<'a, E> {
    pub fn new(env: &'a E, artifacts: &'a ArtifactStore) -> Self {
        Self { env, artifacts }
    }

    /// Deploys every genesis contract and returns the address table.
    ///
    /// Any failing call aborts the run; the environment is left as is.
    #[instrument(skip_all, fields(signer = %signer))]
    pub async fn run(
        &self,
        params: &ValidatedParams,
        signer: Address,
    ) -> Result<DeploymentReport, DeploymentError> {
        let mut contracts = Vec::with_capacity(Contract::COUNT);

        let token = self.deploy_goat_token(params, signer).await?;
        contracts.push(DeployedContract::new(Contract::GoatToken, token.address));

        let dao = self
            .deploy(
                Contract::GoatDao,
                signer,
                &[AbiValue::Address(Contract::GoatToken.canonical_address())],
            )
            .await?;
        contracts.push(DeployedContract::new(Contract::GoatDao, dao.address));

        let foundation = self
            .deploy(
                Contract::GoatFoundation,
                signer,
                &[AbiValue::Address(params.foundation_owner)],
            )
            .await?;
        contracts.push(DeployedContract::new(
            Contract::GoatFoundation,
            foundation.address,
        ));

        let checkpoint = &params.checkpoint;
        let bitcoin = self
            .deploy(
                Contract::BitcoinCheckpoint,
                signer,
                &[
                    AbiValue::uint(checkpoint.height),
                    AbiValue::bytes32(checkpoint.hash.0),
                    AbiValue::String(checkpoint.network.clone()),
                ],
            )
            .await?;
        contracts.push(DeployedContract::new(
            Contract::BitcoinCheckpoint,
            bitcoin.address,
        ));

        let wrapped = self.deploy(Contract::WrappedBitcoin, signer, &[]).await?;
        contracts.push(DeployedContract::new(
            Contract::WrappedBitcoin,
            wrapped.address,
        ));

        let bridge = self.deploy_bridge(&params.bridge, signer).await?;
        contracts.push(DeployedContract::new(Contract::Bridge, bridge.address));

        let relayer = self.deploy_relayer(params, signer).await?;
        contracts.push(DeployedContract::new(Contract::Relayer, relayer.address));

        let locking = self.deploy_locking(params, signer, &token.artifact).await?;
        contracts.push(DeployedContract::new(Contract::Locking, locking.address));

        let factory = self
            .deploy(Contract::LockingTokenFactory, signer, &[])
            .await?;
        contracts.push(DeployedContract::new(
            Contract::LockingTokenFactory,
            factory.address,
        ));

        info!(count = contracts.len(), "all genesis contracts deployed");
        Ok(DeploymentReport { signer, contracts })
    }

    // =========================================================================
    // PER-CONTRACT STEPS
    // =========================================================================

    #[instrument(skip_all, fields(contract = "GoatToken"))]
    async fn deploy_goat_token(
        &self,
        params: &ValidatedParams,
        signer: Address,
    ) -> Result<Handle, DeploymentError> {
        let token = self
            .deploy(Contract::GoatToken, signer, &[AbiValue::Address(signer)])
            .await?;

        for (to, value) in &params.goat_token.transfers {
            self.invoke(
                &token,
                signer,
                "transfer",
                &[AbiValue::Address(*to), AbiValue::Uint(*value)],
            )
            .await?;
        }

        let remainder = self
            .query_uint(&token, "balanceOf", &[AbiValue::Address(signer)])
            .await?;
        if !remainder.is_zero() {
            self.invoke(
                &token,
                signer,
                "transfer",
                &[
                    AbiValue::Address(params.goat_token.owner),
                    AbiValue::Uint(remainder),
                ],
            )
            .await?;
        }

        self.mirror(Contract::GoatToken, token.address).await?;
        Ok(token)
    }

    #[instrument(skip_all, fields(contract = "Bridge", deposits = bridge.deposits.len()))]
    async fn deploy_bridge(
        &self,
        bridge: &ValidatedBridge,
        signer: Address,
    ) -> Result<Handle, DeploymentError> {
        let handle = self
            .deploy(Contract::Bridge, signer, &[AbiValue::Address(signer)])
            .await?;

        self.invoke(
            &handle,
            signer,
            "setDepositTax",
            &[
                AbiValue::uint(bridge.deposit_tax_bp),
                AbiValue::Uint(bridge.max_deposit_tax),
            ],
        )
        .await?;
        self.invoke(
            &handle,
            signer,
            "setWithdrawalTax",
            &[
                AbiValue::uint(bridge.withdrawal_tax_bp),
                AbiValue::Uint(bridge.max_withdrawal_tax),
            ],
        )
        .await?;
        self.invoke(
            &handle,
            signer,
            "setMinDeposit",
            &[AbiValue::Uint(bridge.min_deposit)],
        )
        .await?;
        self.invoke(
            &handle,
            signer,
            "setMinWithdrawal",
            &[AbiValue::Uint(bridge.min_withdrawal)],
        )
        .await?;
        self.invoke(
            &handle,
            signer,
            "setConfirmationNumber",
            &[AbiValue::uint(bridge.confirmation_number)],
        )
        .await?;
        self.invoke(
            &handle,
            signer,
            "setDepositPrefixMagic",
            &[AbiValue::FixedBytes(bridge.prefix_magic.to_vec())],
        )
        .await?;

        if !bridge.deposits.is_empty() {
            let executor = executors::RELAYER;
            if self.env.balance(executor).await?.is_zero() {
                self.env
                    .set_balance(executor, ether_to_wei(EXECUTOR_GAS_MONEY_ETHER))
                    .await?;
            }

            for deposit in &bridge.deposits {
                self.invoke(
                    &handle,
                    executor,
                    "deposit",
                    &[
                        AbiValue::bytes32(deposit.txid.0),
                        AbiValue::uint(u64::from(deposit.txout)),
                        AbiValue::Address(deposit.recipient),
                        AbiValue::Uint(deposit.amount),
                        AbiValue::Uint(U256::zero()),
                    ],
                )
                .await?;

                let balance = self.env.balance(deposit.recipient).await?;
                self.env
                    .set_balance(deposit.recipient, balance.saturating_add(deposit.amount))
                    .await?;
                debug!(recipient = %deposit.recipient, amount = %deposit.amount, "seed deposit credited");
            }
        }

        self.invoke(
            &handle,
            signer,
            "transferOwnership",
            &[AbiValue::Address(bridge.owner)],
        )
        .await?;
        Ok(handle)
    }

    #[instrument(skip_all, fields(contract = "Relayer", voters = params.relayer.voters.len()))]
    async fn deploy_relayer(
        &self,
        params: &ValidatedParams,
        signer: Address,
    ) -> Result<Handle, DeploymentError> {
        let handle = self
            .deploy(Contract::Relayer, signer, &[AbiValue::Address(signer)])
            .await?;

        for voter in &params.relayer.voters {
            self.invoke(
                &handle,
                signer,
                "addVoter",
                &[
                    AbiValue::Address(voter.address),
                    AbiValue::bytes32(voter.vote_key_hash.0),
                ],
            )
            .await?;
        }

        self.invoke(
            &handle,
            signer,
            "transferOwnership",
            &[AbiValue::Address(params.relayer.owner)],
        )
        .await?;
        Ok(handle)
    }

    #[instrument(skip_all, fields(contract = "Locking", validators = params.locking.validators.len()))]
    async fn deploy_locking(
        &self,
        params: &ValidatedParams,
        signer: Address,
        token_artifact: &Artifact,
    ) -> Result<Handle, DeploymentError> {
        let locking = &params.locking;
        let canonical_token = Handle {
            artifact: token_artifact.clone(),
            address: Contract::GoatToken.canonical_address(),
        };

        let reward = self
            .query_uint(
                &canonical_token,
                "balanceOf",
                &[AbiValue::Address(Contract::Locking.canonical_address())],
            )
            .await?;
        info!(%reward, "locking reward pool");

        let handle = self
            .deploy(
                Contract::Locking,
                signer,
                &[
                    AbiValue::Address(signer),
                    AbiValue::Address(canonical_token.address),
                    AbiValue::Uint(reward),
                ],
            )
            .await?;

        for token in &locking.tokens {
            self.invoke(
                &handle,
                signer,
                "addToken",
                &[
                    AbiValue::Address(token.address),
                    AbiValue::uint(token.weight),
                    AbiValue::Uint(token.limit),
                    AbiValue::Uint(token.threshold),
                ],
            )
            .await?;
        }

        for validator in &locking.validators {
            self.register_validator(params, signer, &handle, &canonical_token, validator)
                .await?;
        }

        for address in &locking.allow_list {
            self.invoke(&handle, signer, "approve", &[AbiValue::Address(*address)])
                .await?;
        }

        if locking.open_claim {
            self.invoke(&handle, signer, "openClaim", &[]).await?;
        }

        self.invoke(
            &handle,
            signer,
            "transferOwnership",
            &[AbiValue::Address(locking.owner)],
        )
        .await?;
        Ok(handle)
    }

    #[instrument(skip_all, fields(validator = %validator.identity.consensus_address, owner = %validator.owner))]
    async fn register_validator(
        &self,
        params: &ValidatedParams,
        signer: Address,
        locking: &Handle,
        token: &Handle,
        validator: &ValidatedValidator,
    ) -> Result<(), DeploymentError> {
        let owner = validator.owner;
        let threshold = params.locking.native_threshold;

        let available = self.env.balance(owner).await?;
        if available < threshold {
            if params.locking.strict {
                return Err(DeploymentError::FundingMismatch {
                    owner,
                    required: threshold,
                    available,
                });
            }
            let shortfall = threshold - available;
            warn!(%owner, %shortfall, "topping up validator owner from signer");
            self.env
                .send(Transaction::transfer(signer, owner, shortfall))
                .await?;
        }

        self.env
            .send(Transaction::transfer(
                signer,
                owner,
                ether_to_wei(OWNER_GAS_MONEY_ETHER),
            ))
            .await?;

        if let Some(reward_threshold) = params.locking.reward_threshold {
            let held = self
                .query_uint(token, "balanceOf", &[AbiValue::Address(owner)])
                .await?;
            if held < reward_threshold {
                return Err(DeploymentError::InsufficientTokenBalance {
                    owner,
                    required: reward_threshold,
                    available: held,
                });
            }
            self.invoke(
                token,
                owner,
                "approve",
                &[
                    AbiValue::Address(locking.address),
                    AbiValue::Uint(U256::MAX),
                ],
            )
            .await?;
        }

        self.invoke(
            locking,
            signer,
            "approve",
            &[AbiValue::Address(validator.identity.consensus_address)],
        )
        .await?;

        let Signature65 { r, s, .. } = validator.signature;
        let [first, second] = validator.identity.halves;
        let data = locking.artifact.encode_call(
            "create",
            &[
                AbiValue::FixedArray(vec![AbiValue::bytes32(first), AbiValue::bytes32(second)]),
                AbiValue::bytes32(r),
                AbiValue::bytes32(s),
                AbiValue::uint(u64::from(validator.signature.eth_v())),
            ],
        )?;
        self.env
            .send(Transaction {
                from: owner,
                to: Some(locking.address),
                data,
                value: threshold,
            })
            .await?;

        info!("validator registered");
        Ok(())
    }

    // =========================================================================
    // CALL HELPERS
    // =========================================================================

    async fn deploy(
        &self,
        contract: Contract,
        from: Address,
        args: &[AbiValue],
    ) -> Result<Handle, DeploymentError> {
        let artifact = self.artifacts.load(contract.artifact_name())?;
        let init_code = artifact.encode_deploy(args)?;
        let address = self.env.deploy(from, init_code, U256::zero()).await?;
        info!(contract = contract.name(), %address, "contract deployed");
        Ok(Handle { artifact, address })
    }

    async fn invoke(
        &self,
        target: &Handle,
        from: Address,
        function: &str,
        args: &[AbiValue],
    ) -> Result<(), DeploymentError> {
        let data = target.artifact.encode_call(function, args)?;
        let receipt = self
            .env
            .send(Transaction::call(from, target.address, data))
            .await?;
        debug!(
            contract = %target.artifact.name,
            function,
            tx_hash = %receipt.tx_hash,
            "call confirmed"
        );
        Ok(())
    }

    async fn query_uint(
        &self,
        target: &Handle,
        function: &str,
        args: &[AbiValue],
    ) -> Result<U256, DeploymentError> {
        let data = target.artifact.encode_call(function, args)?;
        let result = self.env.call(target.address, data).await?;
        Ok(decode_uint(result.as_slice())?)
    }

    /// Copies a deployed contract's code and storage to its canonical
    /// address so later contracts can reference it there.
    async fn mirror(&self, contract: Contract, ephemeral: Address) -> Result<(), DeploymentError> {
        let dump = decode_dump(&self.env.dump_state().await?)?;
        let account = dump
            .accounts
            .get(&ephemeral)
            .ok_or(DeploymentError::MissingAccount(contract))?;

        let canonical = contract.canonical_address();
        self.env.set_code(canonical, account.code.clone()).await?;
        for (slot, value) in &account.storage {
            self.env
                .set_storage_at(canonical, word(*slot), word(*value))
                .await?;
        }
        debug!(
            contract = contract.name(),
            %canonical,
            slots = account.storage.len(),
            "mirrored to canonical address"
        );
        Ok(())
    }
}

fn word(value: U256) -> Hash {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    Hash::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{EnvironmentCall, InMemoryEnvironment};
    use crate::domain::abi::selector;
    use crate::domain::errors::EnvironmentError;
    use crate::testing::*;
    use gf_02_parameters::{validate, ValidationContext};
    use shared_types::{sat_to_wei, Bytes};

    fn validated(deposit_sat: u64) -> ValidatedParams {
        validate(
            &fixture_param(deposit_sat),
            &ValidationContext {
                chain_id: FIXTURE_CHAIN_ID,
            },
        )
        .unwrap()
    }

    async fn signer(env: &InMemoryEnvironment) -> Address {
        env.accounts().await.unwrap()[0]
    }

    fn selectors_sent(env: &InMemoryEnvironment) -> Vec<[u8; 4]> {
        env.transactions()
            .iter()
            .filter(|tx| tx.to.is_some())
            .filter_map(Transaction::selector)
            .collect()
    }

    #[tokio::test]
    async fn test_deploys_every_contract_in_order() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts();
        let signer = signer(&env).await;

        let report = DeploymentOrchestrator::new(&env, &artifacts)
            .run(&validated(FIXTURE_THRESHOLD_SAT), signer)
            .await
            .unwrap();

        let order: Vec<Contract> = report.contracts.iter().map(|c| c.contract).collect();
        assert_eq!(order, Contract::ALL.to_vec());
        assert_eq!(report.signer, signer);
        for deployed in &report.contracts {
            assert!(env.account(deployed.ephemeral).is_some());
            assert_eq!(deployed.canonical, deployed.contract.canonical_address());
        }
    }

    #[tokio::test]
    async fn test_token_mirrored_to_canonical_address() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts();
        let signer = signer(&env).await;

        let report = DeploymentOrchestrator::new(&env, &artifacts)
            .run(&validated(FIXTURE_THRESHOLD_SAT), signer)
            .await
            .unwrap();

        let ephemeral = env.account(report.contracts[0].ephemeral).unwrap();
        let canonical = env
            .account(Contract::GoatToken.canonical_address())
            .unwrap();
        assert_eq!(ephemeral.code, canonical.code);
    }

    #[tokio::test]
    async fn test_bridge_and_locking_calls() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts();
        let signer = signer(&env).await;

        DeploymentOrchestrator::new(&env, &artifacts)
            .run(&validated(FIXTURE_THRESHOLD_SAT), signer)
            .await
            .unwrap();

        let sent = selectors_sent(&env);
        let position = |sig: &str| sent.iter().position(|s| *s == selector(sig)).unwrap();

        assert!(position("setDepositTax(uint16,uint256)") < position("deposit(bytes32,uint32,address,uint256,uint256)"));
        assert!(position("addToken(address,uint64,uint256,uint256)") < position("create(bytes32[2],bytes32,bytes32,uint8)"));
        assert!(position("approve(address)") < position("create(bytes32[2],bytes32,bytes32,uint8)"));

        let deposit = env
            .transactions()
            .into_iter()
            .find(|tx| tx.selector() == Some(selector("deposit(bytes32,uint32,address,uint256,uint256)")))
            .unwrap();
        assert_eq!(deposit.from, executors::RELAYER);

        let create = env
            .transactions()
            .into_iter()
            .find(|tx| tx.selector() == Some(selector("create(bytes32[2],bytes32,bytes32,uint8)")))
            .unwrap();
        assert_eq!(create.from, FIXTURE_VALIDATOR_OWNER);
        assert_eq!(create.value, sat_to_wei(FIXTURE_THRESHOLD_SAT));
        assert_eq!(create.data.len(), 4 + 5 * 32);
    }

    #[tokio::test]
    async fn test_locking_receives_threshold() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts();
        let signer = signer(&env).await;

        let report = DeploymentOrchestrator::new(&env, &artifacts)
            .run(&validated(FIXTURE_THRESHOLD_SAT), signer)
            .await
            .unwrap();

        let locking = report
            .contracts
            .iter()
            .find(|c| c.contract == Contract::Locking)
            .unwrap();
        assert!(env.account(locking.ephemeral).unwrap().balance >= sat_to_wei(FIXTURE_THRESHOLD_SAT));
    }

    #[tokio::test]
    async fn test_strict_underfunded_owner_rejected() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts();
        let signer = signer(&env).await;

        // Validation accepted the deposit; the live balance is what falls short.
        let mut params = validated(FIXTURE_THRESHOLD_SAT);
        params.bridge.deposits.clear();
        let result = DeploymentOrchestrator::new(&env, &artifacts)
            .run(&params, signer)
            .await;
        assert_eq!(
            result,
            Err(DeploymentError::FundingMismatch {
                owner: FIXTURE_VALIDATOR_OWNER,
                required: sat_to_wei(FIXTURE_THRESHOLD_SAT),
                available: U256::zero(),
            })
        );
    }

    #[tokio::test]
    async fn test_non_strict_tops_up_shortfall() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts();
        let signer = signer(&env).await;

        let mut params = validated(FIXTURE_THRESHOLD_SAT);
        params.bridge.deposits.clear();
        params.locking.strict = false;

        DeploymentOrchestrator::new(&env, &artifacts)
            .run(&params, signer)
            .await
            .unwrap();

        let top_up = env
            .transactions()
            .into_iter()
            .find(|tx| tx.to == Some(FIXTURE_VALIDATOR_OWNER) && tx.value == sat_to_wei(FIXTURE_THRESHOLD_SAT));
        assert!(top_up.is_some());
    }

    #[tokio::test]
    async fn test_reward_threshold_checks_token_balance() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts();
        let signer = signer(&env).await;

        let mut params = validated(FIXTURE_THRESHOLD_SAT);
        params.locking.reward_threshold = Some(U256::from(100));

        let result = DeploymentOrchestrator::new(&env, &artifacts)
            .run(&params, signer)
            .await;
        assert_eq!(
            result,
            Err(DeploymentError::InsufficientTokenBalance {
                owner: FIXTURE_VALIDATOR_OWNER,
                required: U256::from(100),
                available: U256::zero(),
            })
        );

        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let mut word = [0u8; 32];
        U256::from(100).to_big_endian(&mut word);
        env.respond_to_selector(
            Contract::GoatToken.canonical_address(),
            selector("balanceOf(address)"),
            Bytes::from(word.to_vec()),
        );
        DeploymentOrchestrator::new(&env, &artifacts)
            .run(&params, signer)
            .await
            .unwrap();
        let approvals = env
            .transactions()
            .into_iter()
            .filter(|tx| tx.selector() == Some(selector("approve(address,uint256)")))
            .count();
        assert_eq!(approvals, 1);
    }

    #[tokio::test]
    async fn test_failed_call_aborts_run() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts();
        let signer = signer(&env).await;
        env.fail_on(selector("addVoter(address,bytes32)"), "execution reverted");

        let result = DeploymentOrchestrator::new(&env, &artifacts)
            .run(&validated(FIXTURE_THRESHOLD_SAT), signer)
            .await;
        assert_eq!(
            result,
            Err(DeploymentError::Environment(EnvironmentError::Injected(
                "execution reverted".into()
            )))
        );
        assert!(!env
            .journal()
            .iter()
            .any(|call| matches!(call, EnvironmentCall::Send(tx) if tx.selector() == Some(selector("addToken(address,uint64,uint256,uint256)")))));
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let env = InMemoryEnvironment::new(FIXTURE_CHAIN_ID);
        let artifacts = fixture_artifacts_without(Contract::Relayer);
        let signer = signer(&env).await;

        let result = DeploymentOrchestrator::new(&env, &artifacts)
            .run(&validated(FIXTURE_THRESHOLD_SAT), signer)
            .await;
        assert!(matches!(result, Err(DeploymentError::Artifact(_))));
    }
}
