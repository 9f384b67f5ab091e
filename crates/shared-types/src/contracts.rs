//! # Predeployed Contract Table
//!
//! The fixed set of logical contracts that make up a genesis allocation,
//! in deployment order, with the canonical address each must occupy.
//!
//! | Contract | Artifact | Canonical |
//! |----------|----------|-----------|
//! | GoatToken | `GoatToken` | `0xbc10..0001` |
//! | GoatDao | `GoatDAO` | `0xbc10..0da0` |
//! | GoatFoundation | `GoatFoundation` | `0xbc10..0002` |
//! | BitcoinCheckpoint | `Bitcoin` | `0xbc10..0005` |
//! | WrappedBitcoin | `WrappedGoatBitcoin` | `0xbc10..0000` |
//! | Bridge | `Bridge` | `0xbc10..0003` |
//! | Relayer | `Relayer` | `0xbc10..0006` |
//! | Locking | `Locking` | `0xbc10..0004` |
//! | LockingTokenFactory | `LockingTokenFactory` | `0xbc10..0007` |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::Address;

/// Builds a system address: `0xbc10` followed by zeros and a 16-bit suffix.
const fn system_address(suffix: u16) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xbc;
    bytes[1] = 0x10;
    bytes[18] = (suffix >> 8) as u8;
    bytes[19] = (suffix & 0xff) as u8;
    Address::new(bytes)
}

/// Consensus-layer system senders.
pub mod executors {
    use super::system_address;
    use crate::entities::Address;

    /// Relayer executor; seed deposits are replayed from this account.
    pub const RELAYER: Address = system_address(0x1000);

    /// Locking executor.
    pub const LOCKING: Address = system_address(0x1001);
}

/// A logical contract of the genesis set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Contract {
    GoatToken,
    GoatDao,
    GoatFoundation,
    BitcoinCheckpoint,
    WrappedBitcoin,
    Bridge,
    Relayer,
    Locking,
    LockingTokenFactory,
}

impl Contract {
    /// Every logical contract, in deployment order.
    pub const ALL: [Contract; 9] = [
        Contract::GoatToken,
        Contract::GoatDao,
        Contract::GoatFoundation,
        Contract::BitcoinCheckpoint,
        Contract::WrappedBitcoin,
        Contract::Bridge,
        Contract::Relayer,
        Contract::Locking,
        Contract::LockingTokenFactory,
    ];

    /// Number of accounts a complete deployment relocates.
    pub const COUNT: usize = Self::ALL.len();

    /// Name of the compiled artifact holding the ABI and creation code.
    #[must_use]
    pub const fn artifact_name(&self) -> &'static str {
        match self {
            Contract::GoatToken => "GoatToken",
            Contract::GoatDao => "GoatDAO",
            Contract::GoatFoundation => "GoatFoundation",
            Contract::BitcoinCheckpoint => "Bitcoin",
            Contract::WrappedBitcoin => "WrappedGoatBitcoin",
            Contract::Bridge => "Bridge",
            Contract::Relayer => "Relayer",
            Contract::Locking => "Locking",
            Contract::LockingTokenFactory => "LockingTokenFactory",
        }
    }

    /// The address this contract occupies in the genesis allocation.
    #[must_use]
    pub const fn canonical_address(&self) -> Address {
        match self {
            Contract::WrappedBitcoin => system_address(0x0000),
            Contract::GoatToken => system_address(0x0001),
            Contract::GoatFoundation => system_address(0x0002),
            Contract::Bridge => system_address(0x0003),
            Contract::Locking => system_address(0x0004),
            Contract::BitcoinCheckpoint => system_address(0x0005),
            Contract::Relayer => system_address(0x0006),
            Contract::LockingTokenFactory => system_address(0x0007),
            Contract::GoatDao => system_address(0x0da0),
        }
    }

    /// Looks a contract up by canonical address.
    #[must_use]
    pub fn from_canonical(address: &Address) -> Option<Contract> {
        Self::ALL
            .into_iter()
            .find(|c| c.canonical_address() == *address)
    }

    /// Logical name used in logs and step records.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Contract::GoatToken => "GoatToken",
            Contract::GoatDao => "GoatDao",
            Contract::GoatFoundation => "GoatFoundation",
            Contract::BitcoinCheckpoint => "BitcoinCheckpoint",
            Contract::WrappedBitcoin => "WrappedBitcoin",
            Contract::Bridge => "Bridge",
            Contract::Relayer => "Relayer",
            Contract::Locking => "Locking",
            Contract::LockingTokenFactory => "LockingTokenFactory",
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A contract deployed on the ephemeral environment.
///
/// Created once during orchestration and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub contract: Contract,
    pub ephemeral: Address,
    pub canonical: Address,
}

impl DeployedContract {
    /// Pairs an ephemeral address with the contract's canonical one.
    #[must_use]
    pub const fn new(contract: Contract, ephemeral: Address) -> Self {
        Self {
            contract,
            ephemeral,
            canonical: contract.canonical_address(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_addresses_match_table() {
        assert_eq!(
            Contract::GoatDao.canonical_address().to_string(),
            "0xbc10000000000000000000000000000000000da0"
        );
        assert_eq!(
            Contract::WrappedBitcoin.canonical_address().to_string(),
            "0xbc10000000000000000000000000000000000000"
        );
        assert_eq!(
            Contract::LockingTokenFactory.canonical_address().to_string(),
            "0xbc10000000000000000000000000000000000007"
        );
        assert_eq!(
            executors::RELAYER.to_string(),
            "0xbc10000000000000000000000000000000001000"
        );
        assert_eq!(
            executors::LOCKING.to_string(),
            "0xbc10000000000000000000000000000000001001"
        );
    }

    #[test]
    fn test_canonical_addresses_unique() {
        let set: HashSet<_> = Contract::ALL.iter().map(Contract::canonical_address).collect();
        assert_eq!(set.len(), Contract::COUNT);
    }

    #[test]
    fn test_from_canonical_roundtrip() {
        for contract in Contract::ALL {
            assert_eq!(
                Contract::from_canonical(&contract.canonical_address()),
                Some(contract)
            );
        }
        assert_eq!(Contract::from_canonical(&Address::ZERO), None);
    }

    #[test]
    fn test_deployment_order_starts_with_token() {
        assert_eq!(Contract::ALL[0], Contract::GoatToken);
        assert_eq!(Contract::ALL[Contract::COUNT - 1], Contract::LockingTokenFactory);
    }
}
