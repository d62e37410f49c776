//! Spend permission construction.

use alloc::vec::Vec;

use alloy_primitives::{
    aliases::{U160, U48},
    Address, U256,
};

use crate::{constants::NATIVE_TOKEN, extra_data::{encode_extra_data, ExtraDataError}};

/// Spend permission as defined by the Spend Permission Manager.
///
/// Field order and widths match the Solidity struct:
/// `(address account, address spender, address token, uint160 allowance, uint48 period,
/// uint48 start, uint48 end, uint256 salt, bytes extraData)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendPermission {
    /// Account granting the funds.
    pub account: Address,
    /// Only this address may spend; for routed permissions this is the router itself.
    pub spender: Address,
    /// ERC-20 address, or [`NATIVE_TOKEN`].
    pub token: Address,
    /// Maximum spendable per period.
    pub allowance: U160,
    pub period: U48,
    pub start: U48,
    pub end: U48,
    pub salt: U256,
    pub extra_data: Vec<u8>,
}

impl SpendPermission {
    pub fn is_native(&self) -> bool {
        self.token == NATIVE_TOKEN
    }
}

/// Account-side terms of a permission (everything except routing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionTerms {
    pub account: Address,
    pub token: Address,
    pub allowance: U160,
    pub period: U48,
    pub start: U48,
    pub end: U48,
    pub salt: U256,
}

/// Build a permission routed through `router`: spender is the router and the extra data
/// names `app` and `recipient`.
///
/// Nothing is submitted anywhere; the granter still has to approve the result with the
/// Spend Permission Manager.
pub fn construct_permission(
    router: Address,
    app: Address,
    recipient: Address,
    terms: PermissionTerms,
) -> Result<SpendPermission, ExtraDataError> {
    let extra_data = encode_extra_data(app, recipient)?;
    Ok(SpendPermission {
        account: terms.account,
        spender: router,
        token: terms.token,
        allowance: terms.allowance,
        period: terms.period,
        start: terms.start,
        end: terms.end,
        salt: terms.salt,
        extra_data,
    })
}
