//! Router constants.

use stylus_sdk::alloy_primitives::U256;

pub use spend_router_types::NATIVE_TOKEN;

/// Pending-receipt value meaning "no inflow expected".
pub const NOTHING_EXPECTED: U256 = U256::ZERO;
