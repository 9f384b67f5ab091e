//! # Parameter Validator
//!
//! A pure pass over [`GenesisParam`]. Every check is a hard failure; nothing
//! is coerced. Runs before the ephemeral environment sees a single call.

use std::collections::{BTreeMap, HashSet};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use gf_01_address_derivation as derivation;
use shared_types::{decode_fixed, decode_hex, sat_to_wei, Address, Contract, Hash, U256};
use tracing::debug;

use super::errors::ParamError;
use super::param::{
    BalanceParam, BitcoinParam, BridgeParam, GenesisParam, LockingParam, RelayerParam, ValidatorParam,
    VoterParam,
};
use super::validated::{
    Checkpoint, ExtraBalance, FundingPlan, LockingToken, SeedDeposit, ValidatedBridge,
    ValidatedLocking, ValidatedParams, ValidatedRelayer, ValidatedToken, ValidatedValidator,
    Voter,
};

/// Upper bound of a tax rate, 100% in basis points.
pub const MAX_BASIS_POINTS: u64 = 10_000;

/// Inputs that come from the run rather than the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub chain_id: u64,
}

/// Validates a parameter set for the given chain.
pub fn validate(
    param: &GenesisParam,
    ctx: &ValidationContext,
) -> Result<ValidatedParams, ParamError> {
    let bridge = validate_bridge(&param.bridge)?;
    let checkpoint = validate_checkpoint(&param.bitcoin)?;
    let relayer = validate_relayer(&param.relayer)?;
    let locking = validate_locking(&param.locking, ctx.chain_id)?;
    let funding = plan_funding(&locking, &bridge.deposits)?;

    let balances = validate_balances(&param.balances)?;

    debug!(
        validators = locking.validators.len(),
        voters = relayer.voters.len(),
        deposits = bridge.deposits.len(),
        "parameters validated"
    );

    Ok(ValidatedParams {
        chain_id: ctx.chain_id,
        goat_token: ValidatedToken {
            owner: param.goat_token.owner,
            transfers: param
                .goat_token
                .transfers
                .iter()
                .map(|t| (t.to, t.value.value()))
                .collect(),
        },
        foundation_owner: param.goat_foundation.owner,
        bridge,
        checkpoint,
        relayer,
        locking,
        funding,
        balances,
    })
}

/// One allocation per address; a repeated address would silently collapse.
fn validate_balances(balances: &[BalanceParam]) -> Result<Vec<ExtraBalance>, ParamError> {
    let mut seen = HashSet::new();
    balances
        .iter()
        .map(|b| {
            if !seen.insert(b.address) {
                return Err(ParamError::DuplicateBalance(b.address));
            }
            Ok(ExtraBalance {
                address: b.address,
                value: b.value.value(),
                nonce: b.nonce.unwrap_or(0),
            })
        })
        .collect()
}

// =============================================================================
// BRIDGE
// =============================================================================

/// Decodes the deposit prefix magic to its 4 raw bytes.
///
/// A 4-character ASCII value is taken verbatim. Any other ASCII value is
/// read as base64, the byte encoding the consensus layer uses. Non-ASCII
/// input is rejected.
pub fn decode_prefix_magic(value: &str) -> Result<[u8; 4], ParamError> {
    if !value.is_ascii() {
        return Err(ParamError::InvalidPrefixMagic(value.to_string()));
    }
    let raw = if value.len() == 4 {
        value.as_bytes().to_vec()
    } else {
        BASE64
            .decode(value)
            .map_err(|_| ParamError::InvalidPrefixLength {
                actual: value.len(),
            })?
    };
    <[u8; 4]>::try_from(raw.as_slice())
        .map_err(|_| ParamError::InvalidPrefixLength { actual: raw.len() })
}

fn validate_bridge(bridge: &BridgeParam) -> Result<ValidatedBridge, ParamError> {
    if bridge.deposit_tax_bp > MAX_BASIS_POINTS {
        return Err(ParamError::InvalidTaxBasisPoints {
            field: "depositTaxBP",
            value: bridge.deposit_tax_bp,
        });
    }
    if bridge.withdrawal_tax_bp > MAX_BASIS_POINTS {
        return Err(ParamError::InvalidTaxBasisPoints {
            field: "withdrawalTaxBP",
            value: bridge.withdrawal_tax_bp,
        });
    }

    let prefix_magic = decode_prefix_magic(&bridge.deposit_prefix_magic)?;

    if bridge.confirmation_number == 0 {
        return Err(ParamError::InvalidConfirmationNumber);
    }

    let deposits = bridge
        .deposits
        .iter()
        .enumerate()
        .map(|(index, deposit)| {
            if deposit.txid.starts_with("0x") || deposit.txid.starts_with("0X") {
                return Err(ParamError::PrefixedTxid {
                    index,
                    txid: deposit.txid.clone(),
                });
            }
            let txid = decode_fixed::<32>(&deposit.txid).map_err(|e| ParamError::InvalidTxid {
                index,
                reason: e.to_string(),
            })?;
            Ok(SeedDeposit {
                txid: Hash::new(txid).reversed(),
                txout: deposit.txout,
                recipient: deposit.address,
                amount: sat_to_wei(deposit.satoshi),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedBridge {
        owner: bridge.owner,
        prefix_magic,
        deposit_tax_bp: bridge.deposit_tax_bp,
        max_deposit_tax: sat_to_wei(bridge.max_deposit_tax_in_sat),
        withdrawal_tax_bp: bridge.withdrawal_tax_bp,
        max_withdrawal_tax: sat_to_wei(bridge.max_withdrawal_tax_in_sat),
        min_deposit: sat_to_wei(bridge.min_deposit_in_sat),
        min_withdrawal: sat_to_wei(bridge.min_withdrawal_in_sat),
        confirmation_number: bridge.confirmation_number,
        deposits,
    })
}

fn validate_checkpoint(bitcoin: &BitcoinParam) -> Result<Checkpoint, ParamError> {
    let hash = decode_fixed::<32>(&bitcoin.hash)
        .map_err(|e| ParamError::InvalidCheckpointHash(e.to_string()))?;
    if bitcoin.network.trim().is_empty() {
        return Err(ParamError::EmptyNetwork);
    }
    Ok(Checkpoint {
        height: bitcoin.height,
        hash: Hash::new(hash).reversed(),
        network: bitcoin.network.clone(),
    })
}

// =============================================================================
// RELAYER
// =============================================================================

fn validate_relayer(relayer: &RelayerParam) -> Result<ValidatedRelayer, ParamError> {
    let mut seen = HashSet::new();
    let mut voters = Vec::with_capacity(relayer.voters.len());

    for (index, voter) in relayer.voters.iter().enumerate() {
        let context = format!("voter #{index}");
        let voter = match voter {
            VoterParam::Keys {
                tx_key,
                vote_key,
                address,
            } => {
                let tx_key = decode_hex(tx_key).map_err(|e| ParamError::MalformedKey {
                    context: context.clone(),
                    reason: e.to_string(),
                })?;
                let derived = derivation::voter_address(&tx_key)
                    .map_err(|e| ParamError::derivation(context.clone(), e))?;
                if let Some(declared) = address {
                    derivation::check_declared(declared, &derived)
                        .map_err(|e| ParamError::derivation(context.clone(), e))?;
                }
                let vote_key = decode_hex(vote_key).map_err(|e| ParamError::MalformedKey {
                    context: context.clone(),
                    reason: e.to_string(),
                })?;
                let vote_key_hash = derivation::vote_key_hash(&vote_key)
                    .map_err(|e| ParamError::derivation(context, e))?;
                Voter {
                    address: derived,
                    vote_key_hash,
                }
            }
            VoterParam::Derived {
                address,
                vote_key_hash,
            } => {
                let hash = decode_fixed::<32>(vote_key_hash).map_err(|e| {
                    ParamError::InvalidVoteKeyHash {
                        index,
                        reason: e.to_string(),
                    }
                })?;
                Voter {
                    address: *address,
                    vote_key_hash: Hash::new(hash),
                }
            }
        };

        if !seen.insert(voter.address) {
            return Err(ParamError::DuplicateVoter(voter.address));
        }
        voters.push(voter);
    }

    Ok(ValidatedRelayer {
        owner: relayer.owner,
        voters,
    })
}

// =============================================================================
// LOCKING
// =============================================================================

fn validate_locking(locking: &LockingParam, chain_id: u64) -> Result<ValidatedLocking, ParamError> {
    if locking.tokens.is_empty() {
        return Err(ParamError::EmptyTokenRegistry);
    }

    let reward_token = Contract::GoatToken.canonical_address();
    let mut seen = HashSet::new();
    let mut native_threshold = None;
    let mut reward_threshold = None;
    let mut tokens = Vec::with_capacity(locking.tokens.len());

    for token in &locking.tokens {
        if !seen.insert(token.address) {
            return Err(ParamError::DuplicateToken(token.address));
        }
        let threshold = token.threshold.value();
        if token.address.is_zero() {
            native_threshold = Some(threshold);
        } else if token.address == reward_token {
            if !threshold.is_zero() {
                reward_threshold = Some(threshold);
            }
        } else if !threshold.is_zero() {
            return Err(ParamError::UnexpectedThreshold {
                token: token.address,
            });
        }
        tokens.push(LockingToken {
            address: token.address,
            weight: token.weight,
            limit: token.limit.value(),
            threshold,
        });
    }

    let native_threshold = match native_threshold {
        Some(threshold) if !threshold.is_zero() => threshold,
        _ => return Err(ParamError::MissingNativeThreshold),
    };

    let mut seen_validators = HashSet::new();
    let mut validators = Vec::with_capacity(locking.validators.len());
    for (index, validator) in locking.validators.iter().enumerate() {
        let validated = validate_validator(index, validator, chain_id)?;
        if !seen_validators.insert(validated.identity.consensus_address) {
            return Err(ParamError::DuplicateValidator(
                validated.identity.consensus_address,
            ));
        }
        validators.push(validated);
    }

    Ok(ValidatedLocking {
        owner: locking.owner,
        tokens,
        validators,
        allow_list: locking.allow_list.clone(),
        strict: locking.strict,
        gas_revenue: locking.gas.map(|g| g.value()).unwrap_or_default(),
        open_claim: locking.claim,
        native_threshold,
        reward_threshold,
    })
}

fn validate_validator(
    index: usize,
    validator: &ValidatorParam,
    chain_id: u64,
) -> Result<ValidatedValidator, ParamError> {
    let context = format!("validator #{index}");
    let fail = |e| ParamError::derivation(context.clone(), e);

    match validator {
        ValidatorParam::Signed {
            owner,
            pubkey,
            signature,
            validator,
        } => {
            let key = derivation::parse_public_key(pubkey).map_err(fail)?;
            let identity = derivation::derive_identity(&key);
            derivation::check_declared(validator, &identity.consensus_address).map_err(fail)?;
            let signature = derivation::Signature65::parse(signature).map_err(fail)?;
            derivation::verify_ownership(chain_id, &identity, owner, &signature).map_err(fail)?;
            Ok(ValidatedValidator {
                owner: *owner,
                identity,
                signature,
            })
        }
        ValidatorParam::Secret { owner, prvkey } => {
            let key = derivation::parse_secret_key(prvkey).map_err(fail)?;
            let identity = derivation::derive_identity(key.verifying_key());
            let signature = derivation::sign_ownership(chain_id, &key, owner).map_err(fail)?;
            Ok(ValidatedValidator {
                owner: *owner,
                identity,
                signature,
            })
        }
    }
}

// =============================================================================
// FUNDING
// =============================================================================

/// Compares what each owner receives from seed deposits with what its
/// validators lock. Strict mode requires an exact match.
fn plan_funding(
    locking: &ValidatedLocking,
    deposits: &[SeedDeposit],
) -> Result<Vec<FundingPlan>, ParamError> {
    let mut required: BTreeMap<Address, U256> = BTreeMap::new();
    for validator in &locking.validators {
        let entry = required.entry(validator.owner).or_default();
        *entry = entry.saturating_add(locking.native_threshold);
    }

    let mut plans = Vec::with_capacity(required.len());
    for (owner, required) in required {
        let staged = deposits
            .iter()
            .filter(|d| d.recipient == owner)
            .fold(U256::zero(), |acc, d| acc.saturating_add(d.amount));

        if locking.strict && staged != required {
            return Err(ParamError::FundingMismatch {
                owner,
                required,
                staged,
            });
        }
        plans.push(FundingPlan {
            owner,
            staged,
            required,
        });
    }
    Ok(plans)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::param::*;
    use shared_types::Quantity;

    const CHAIN_ID: u64 = 48815;
    const SECRET: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn native_token(threshold: u64) -> TokenParam {
        TokenParam {
            address: Address::ZERO,
            weight: 12000,
            limit: Quantity::ZERO,
            threshold: Quantity::from(threshold),
        }
    }

    /// One validator in secret form, owner funded by a single 1000 sat deposit.
    fn fixture() -> GenesisParam {
        GenesisParam {
            goat_token: GoatTokenParam {
                owner: addr(1),
                transfers: vec![],
            },
            goat_dao: EmptyParam::default(),
            goat_foundation: OwnerParam { owner: addr(1) },
            bridge: BridgeParam {
                owner: addr(1),
                deposit_prefix_magic: "GOAT".into(),
                deposit_tax_bp: 2,
                max_deposit_tax_in_sat: 1_000_000,
                withdrawal_tax_bp: 20,
                max_withdrawal_tax_in_sat: 2_000_000,
                min_deposit_in_sat: 100_000,
                min_withdrawal_in_sat: 100_000,
                confirmation_number: 6,
                deposits: vec![DepositParam {
                    txid: "e3d8ffcc9e8e0a6e3a9d1b9c3d4f1a2b3c4d5e6f708192a3b4c5d6e7f8091a2b".into(),
                    txout: 0,
                    address: addr(4),
                    satoshi: 1000,
                }],
            },
            bitcoin: BitcoinParam {
                height: 0,
                hash: "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206".into(),
                network: "regtest".into(),
            },
            wrapped_bitcoin: EmptyParam::default(),
            relayer: RelayerParam {
                owner: addr(1),
                voters: vec![],
            },
            locking: LockingParam {
                owner: addr(1),
                tokens: vec![native_token(10_000_000_000_000)],
                validators: vec![ValidatorParam::Secret {
                    owner: addr(4),
                    prvkey: SECRET.into(),
                }],
                allow_list: vec![],
                strict: true,
                gas: None,
                claim: false,
            },
            locking_token_factory: EmptyParam::default(),
            balances: vec![],
            consensus: Default::default(),
        }
    }

    fn ctx() -> ValidationContext {
        ValidationContext { chain_id: CHAIN_ID }
    }

    /// Converts the fixture's secret-form validator into the signed form.
    fn signed_validator(owner: Address, chain_id: u64) -> (ValidatorParam, Address) {
        let key = derivation::parse_secret_key(SECRET).unwrap();
        let identity = derivation::derive_identity(key.verifying_key());
        let signature = derivation::sign_ownership(chain_id, &key, &owner).unwrap();
        (
            ValidatorParam::Signed {
                owner,
                pubkey: hex::encode(identity.compressed),
                signature: signature.to_string(),
                validator: identity.consensus_address,
            },
            identity.consensus_address,
        )
    }

    #[test]
    fn test_valid_fixture_passes() {
        let validated = validate(&fixture(), &ctx()).unwrap();
        assert_eq!(validated.chain_id, CHAIN_ID);
        assert_eq!(validated.bridge.prefix_magic, *b"GOAT");
        assert_eq!(validated.bridge.min_deposit, sat_to_wei(100_000));
        assert_eq!(validated.locking.validators.len(), 1);
        assert_eq!(validated.funding.len(), 1);
        assert_eq!(validated.funding[0].shortfall(), U256::zero());
    }

    #[test]
    fn test_txid_and_checkpoint_are_reversed() {
        let validated = validate(&fixture(), &ctx()).unwrap();
        assert_eq!(validated.bridge.deposits[0].txid.0[0], 0x2b);
        assert_eq!(validated.bridge.deposits[0].txid.0[31], 0xe3);
        assert_eq!(validated.checkpoint.hash.0[0], 0x06);
        assert_eq!(validated.checkpoint.hash.0[31], 0x0f);
    }

    #[test]
    fn test_tax_basis_points_bounded() {
        let mut param = fixture();
        param.bridge.deposit_tax_bp = 10_000;
        assert!(validate(&param, &ctx()).is_ok());

        param.bridge.deposit_tax_bp = 10_001;
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::InvalidTaxBasisPoints {
                field: "depositTaxBP",
                value: 10_001
            })
        );

        let mut param = fixture();
        param.bridge.withdrawal_tax_bp = 20_000;
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::InvalidTaxBasisPoints { field: "withdrawalTaxBP", .. })
        ));
    }

    #[test]
    fn test_prefix_magic_forms() {
        assert_eq!(decode_prefix_magic("GOAT").unwrap(), *b"GOAT");
        assert_eq!(decode_prefix_magic("R1RWMQ==").unwrap(), *b"GTV1");
        assert_eq!(
            decode_prefix_magic("GOA"),
            Err(ParamError::InvalidPrefixLength { actual: 3 })
        );
        assert_eq!(
            decode_prefix_magic("GOATS"),
            Err(ParamError::InvalidPrefixLength { actual: 5 })
        );
        assert_eq!(
            decode_prefix_magic("R1RWMTI="),
            Err(ParamError::InvalidPrefixLength { actual: 5 })
        );
    }

    #[test]
    fn test_non_ascii_prefix_not_taken_as_raw_bytes() {
        // "GTé" is 4 bytes of UTF-8.
        assert_eq!("GT\u{e9}".len(), 4);
        assert!(matches!(
            decode_prefix_magic("GT\u{e9}"),
            Err(ParamError::InvalidPrefixMagic(_))
        ));
        assert!(matches!(
            decode_prefix_magic("G\u{20ac}"),
            Err(ParamError::InvalidPrefixMagic(_))
        ));
    }

    #[test]
    fn test_three_byte_prefix_rejected() {
        let mut param = fixture();
        param.bridge.deposit_prefix_magic = "GOA".into();
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::InvalidPrefixLength { actual: 3 })
        );
    }

    #[test]
    fn test_zero_confirmation_rejected() {
        let mut param = fixture();
        param.bridge.confirmation_number = 0;
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::InvalidConfirmationNumber)
        );
    }

    #[test]
    fn test_prefixed_txid_rejected() {
        let mut param = fixture();
        let txid = format!("0x{}", param.bridge.deposits[0].txid);
        param.bridge.deposits[0].txid = txid.clone();
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::PrefixedTxid { index: 0, txid })
        );
    }

    #[test]
    fn test_short_txid_rejected() {
        let mut param = fixture();
        param.bridge.deposits[0].txid = "abcd".into();
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::InvalidTxid { index: 0, .. })
        ));
    }

    #[test]
    fn test_checkpoint_checks() {
        let mut param = fixture();
        param.bitcoin.network = " ".into();
        assert_eq!(validate(&param, &ctx()), Err(ParamError::EmptyNetwork));

        let mut param = fixture();
        param.bitcoin.hash = "00".into();
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::InvalidCheckpointHash(_))
        ));
    }

    #[test]
    fn test_native_threshold_required() {
        let mut param = fixture();
        param.locking.tokens = vec![native_token(0)];
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::MissingNativeThreshold)
        );

        let mut param = fixture();
        param.locking.tokens[0].address = addr(9);
        param.locking.tokens[0].threshold = Quantity::ZERO;
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::MissingNativeThreshold)
        );

        let mut param = fixture();
        param.locking.tokens.clear();
        assert_eq!(validate(&param, &ctx()), Err(ParamError::EmptyTokenRegistry));
    }

    #[test]
    fn test_unexpected_threshold_rejected() {
        let mut param = fixture();
        param.locking.tokens.push(TokenParam {
            address: addr(9),
            weight: 1,
            limit: Quantity::ZERO,
            threshold: Quantity::from(1),
        });
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::UnexpectedThreshold { token: addr(9) })
        );
    }

    #[test]
    fn test_reward_token_may_carry_threshold() {
        let mut param = fixture();
        param.locking.tokens.push(TokenParam {
            address: Contract::GoatToken.canonical_address(),
            weight: 1,
            limit: Quantity::ZERO,
            threshold: Quantity::from(42),
        });
        let validated = validate(&param, &ctx()).unwrap();
        assert_eq!(validated.locking.reward_threshold, Some(U256::from(42)));
    }

    #[test]
    fn test_duplicate_token_rejected() {
        let mut param = fixture();
        param.locking.tokens.push(native_token(1));
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::DuplicateToken(Address::ZERO))
        );
    }

    #[test]
    fn test_signed_validator_passes() {
        let mut param = fixture();
        let (validator, _) = signed_validator(addr(4), CHAIN_ID);
        param.locking.validators = vec![validator];
        assert!(validate(&param, &ctx()).is_ok());
    }

    #[test]
    fn test_declared_address_mismatch_rejected() {
        let mut param = fixture();
        let (mut validator, derived) = signed_validator(addr(4), CHAIN_ID);
        if let ValidatorParam::Signed { validator: v, .. } = &mut validator {
            *v = addr(0xee);
        }
        param.locking.validators = vec![validator];
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::AddressMismatch {
                context: "validator #0".into(),
                declared: addr(0xee),
                derived,
            })
        );
    }

    #[test]
    fn test_signature_for_other_chain_rejected() {
        let mut param = fixture();
        let (validator, _) = signed_validator(addr(4), CHAIN_ID + 1);
        param.locking.validators = vec![validator];
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::AddressMismatch { .. }) | Err(ParamError::MalformedSignature { .. })
        ));
    }

    #[test]
    fn test_duplicate_validator_rejected() {
        let mut param = fixture();
        param.locking.validators.push(param.locking.validators[0].clone());
        param.bridge.deposits[0].satoshi = 2000;
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::DuplicateValidator(_))
        ));
    }

    #[test]
    fn test_strict_funding_must_match_exactly() {
        let mut param = fixture();
        param.bridge.deposits[0].satoshi = 999;
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::FundingMismatch {
                owner: addr(4),
                required: sat_to_wei(1000),
                staged: sat_to_wei(999),
            })
        );

        param.bridge.deposits[0].satoshi = 1001;
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::FundingMismatch { .. })
        ));
    }

    #[test]
    fn test_non_strict_records_shortfall() {
        let mut param = fixture();
        param.locking.strict = false;
        param.bridge.deposits[0].satoshi = 999;
        let validated = validate(&param, &ctx()).unwrap();
        assert_eq!(validated.funding[0].shortfall(), sat_to_wei(1));
    }

    #[test]
    fn test_voter_forms() {
        let tx_key =
            hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
                .unwrap();
        let mut param = fixture();
        param.relayer.voters = vec![
            VoterParam::Keys {
                tx_key: hex::encode(&tx_key),
                vote_key: hex::encode([5u8; 96]),
                address: Some(derivation::voter_address(&tx_key).unwrap()),
            },
            VoterParam::Derived {
                address: addr(7),
                vote_key_hash: format!("0x{}", hex::encode([1u8; 32])),
            },
        ];
        let validated = validate(&param, &ctx()).unwrap();
        assert_eq!(validated.relayer.voters.len(), 2);
        assert_eq!(
            validated.relayer.voters[0].vote_key_hash,
            derivation::vote_key_hash(&[5u8; 96]).unwrap()
        );
    }

    #[test]
    fn test_voter_key_checks() {
        let mut param = fixture();
        param.relayer.voters = vec![VoterParam::Keys {
            tx_key: format!("04{}", "11".repeat(32)),
            vote_key: hex::encode([5u8; 96]),
            address: None,
        }];
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::MalformedKey { .. })
        ));

        param.relayer.voters = vec![VoterParam::Keys {
            tx_key: "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798".into(),
            vote_key: hex::encode([5u8; 95]),
            address: None,
        }];
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::MalformedKey { .. })
        ));

        param.relayer.voters = vec![VoterParam::Keys {
            tx_key: "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798".into(),
            vote_key: hex::encode([5u8; 96]),
            address: Some(addr(3)),
        }];
        assert!(matches!(
            validate(&param, &ctx()),
            Err(ParamError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_voter_rejected() {
        let mut param = fixture();
        let voter = VoterParam::Derived {
            address: addr(7),
            vote_key_hash: hex::encode([1u8; 32]),
        };
        param.relayer.voters = vec![voter.clone(), voter];
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::DuplicateVoter(addr(7)))
        );
    }

    #[test]
    fn test_duplicate_balance_rejected() {
        let mut param = fixture();
        param.balances = vec![
            BalanceParam {
                address: addr(0x55),
                value: Quantity::from(1u64),
                nonce: None,
            },
            BalanceParam {
                address: addr(0x56),
                value: Quantity::from(1u64),
                nonce: None,
            },
            BalanceParam {
                address: addr(0x55),
                value: Quantity::from(2u64),
                nonce: Some(1),
            },
        ];
        assert_eq!(
            validate(&param, &ctx()),
            Err(ParamError::DuplicateBalance(addr(0x55)))
        );

        param.balances.pop();
        let validated = validate(&param, &ctx()).unwrap();
        assert_eq!(validated.balances.len(), 2);
        assert_eq!(validated.balances[0].value, U256::from(1));
    }
}
