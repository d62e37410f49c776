use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, U256};

/// The Spend Permission Manager refused the spend (allowance, window, revocation, ...).
///
/// Recovered by the router: it turns into a `false` return, never a revert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    Reverted(Vec<u8>),
}

/// Errors while moving funds out of the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The call reverted (rejecting recipient, insufficient balance, ...).
    CallFailed(Vec<u8>),
    /// Token returned `false`.
    ReturnedFalse,
    /// Token returned data that is not a single ABI `bool`.
    MalformedReturn,
    /// Token address has no code, so an empty return proves nothing.
    NoCode,
}

/// Fatal routing errors. Any of these aborts the whole call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    ReentrantCall,
    ZeroAmount,
    InvalidSpender { spender: Address, router: Address },
    MalformedExtraData { length: usize, extra_data: Vec<u8> },
    UnauthorizedSender { sender: Address, app: Address },
    ZeroRecipientAddress,
    NativeTransferFailed { recipient: Address, amount: U256, cause: TransferError },
    TokenTransferFailed { token: Address, recipient: Address, amount: U256, cause: TransferError },
    UnauthorizedReceive { sender: Address, value: U256 },
    UnexpectedAmount { received: U256, expected: U256 },
}
