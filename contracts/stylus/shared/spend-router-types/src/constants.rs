use alloy_primitives::{address, Address};

/// Sentinel used by the Spend Permission Manager for the chain's native asset.
pub const NATIVE_TOKEN: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// One ABI word.
pub const WORD_LEN: usize = 32;

/// `abi.encode(address app, address recipient)`.
pub const EXTRA_DATA_LEN: usize = 2 * WORD_LEN;
