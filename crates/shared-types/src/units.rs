//! Unit conversions between satoshi, wei and ether.

use crate::entities::U256;

/// Wei per satoshi. The wrapped asset has 18 decimals, Bitcoin has 8.
pub const SATOSHI_IN_WEI: u64 = 10_000_000_000;

/// Wei per ether.
pub const ETHER_IN_WEI: u64 = 1_000_000_000_000_000_000;

/// Converts satoshi into wei.
#[must_use]
pub fn sat_to_wei(satoshi: u64) -> U256 {
    U256::from(satoshi) * U256::from(SATOSHI_IN_WEI)
}

/// Converts whole ether into wei.
#[must_use]
pub fn ether_to_wei(ether: u64) -> U256 {
    U256::from(ether) * U256::from(ETHER_IN_WEI)
}
