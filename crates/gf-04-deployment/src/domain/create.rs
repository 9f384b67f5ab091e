//! # CREATE Address Derivation
//!
//! `keccak256(rlp([sender, nonce]))[12..]`, used by the in-memory
//! environment to place deployed contracts where a real node would.

use sha3::{Digest, Keccak256};
use shared_types::Address;

/// Address of the contract `sender` creates with `nonce`.
#[must_use]
pub fn compute_contract_address(sender: Address, nonce: u64) -> Address {
    let mut content = Vec::with_capacity(30);

    // 20-byte string: 0x80 + 20
    content.push(0x94);
    content.extend_from_slice(sender.as_bytes());

    if nonce == 0 {
        content.push(0x80);
    } else if nonce < 128 {
        content.push(nonce as u8);
    } else {
        let bytes = nonce.to_be_bytes();
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
        content.push(0x80 + (8 - start) as u8);
        content.extend_from_slice(&bytes[start..]);
    }

    // Content never reaches 56 bytes, so the short list header applies.
    let mut rlp = Vec::with_capacity(content.len() + 1);
    rlp.push(0xc0 + content.len() as u8);
    rlp.extend_from_slice(&content);

    let hash = Keccak256::digest(&rlp);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..32]);
    Address::new(address)
}
