//! Outbound calls made by the router.
//!
//! All calls flush the storage cache first: the lock and the armed pending receipt must be
//! visible to the frame that re-enters the router (`receive`, or a rejected nested spend).

use stylus_sdk::{
    alloy_primitives::{aliases::U160, Address, U256},
    alloy_sol_types::SolCall,
    call::RawCall,
};

use spend_router_types::SpendPermission;

use crate::{
    errors::{AuthorityError, TransferError},
    interfaces::{ISpendPermissionManager, IERC20},
};

/// `ISpendPermissionManager.spend(permission, amount)`.
pub fn call_spend(
    manager: Address,
    permission: &SpendPermission,
    amount: U160,
) -> Result<(), AuthorityError> {
    let calldata = ISpendPermissionManager::spendCall {
        spendPermission: permission.into(),
        value: amount,
    }
    .abi_encode();

    unsafe { RawCall::new().flush_storage_cache().call(manager, &calldata) }
        .map(|_| ())
        .map_err(AuthorityError::Reverted)
}

/// Send `amount` of the native asset to `to` with all remaining gas.
pub fn transfer_native(to: Address, amount: U256) -> Result<(), TransferError> {
    unsafe {
        RawCall::new_with_value(amount)
            .flush_storage_cache()
            .call(to, &[])
    }
    .map(|_| ())
    .map_err(TransferError::CallFailed)
}

/// `IERC20.transfer(to, amount)` with SafeERC20 return handling.
///
/// `token_code_size` is the token's code size, read by the caller before the call.
pub fn transfer_token(
    token: Address,
    token_code_size: usize,
    to: Address,
    amount: U256,
) -> Result<(), TransferError> {
    let calldata = IERC20::transferCall { to, amount }.abi_encode();

    let out = unsafe { RawCall::new().flush_storage_cache().call(token, &calldata) }
        .map_err(TransferError::CallFailed)?;
    check_transfer_return(&out, token_code_size)
}

/// Tokens that return nothing are accepted only if they have code; tokens that return must
/// return exactly `true`.
pub fn check_transfer_return(out: &[u8], token_code_size: usize) -> Result<(), TransferError> {
    if out.is_empty() {
        if token_code_size == 0 {
            return Err(TransferError::NoCode);
        }
        return Ok(());
    }
    if out.len() < 32 {
        return Err(TransferError::MalformedReturn);
    }
    match U256::from_be_slice(&out[0..32]) {
        word if word == U256::from(1u8) => Ok(()),
        word if word.is_zero() => Err(TransferError::ReturnedFalse),
        _ => Err(TransferError::MalformedReturn),
    }
}
