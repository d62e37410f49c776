//! Routing core.
//!
//! Everything the router decides lives here, written against [`RouterHost`] so the same code
//! runs on-chain (storage + raw calls, see `router.rs`) and against an in-memory ledger in tests.
//!
//! Failure policy differs per collaborator:
//! - the Spend Permission Manager's `spend` failing is *recovered* (`Ok(false)`);
//! - forwarding failing is *fatal* (`Err`), because the router already holds the funds.

use stylus_sdk::alloy_primitives::{aliases::U160, Address, U256};

use spend_router_types::{decode_extra_data, SpendPermission};

use crate::{
    constants::NOTHING_EXPECTED,
    errors::{AuthorityError, RouteError, TransferError},
};

/// Audit record of a completed routing call (emitted as `RoutingCompleted`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRecord {
    pub recipient: Address,
    pub app: Address,
    pub account: Address,
    pub token: Address,
    pub amount: U256,
}

/// Environment the routing core runs in.
///
/// The lock and pending-receipt slots must be persistent: both are read again by a nested
/// frame (`receive` during `spend`, or a reentrant `executeSpend`).
pub trait RouterHost {
    /// Address of this router.
    fn router(&self) -> Address;
    /// Immediate caller of the current frame.
    fn caller(&self) -> Address;

    fn entered(&self) -> bool;
    fn set_entered(&mut self, entered: bool);

    fn expected_amount(&self) -> U256;
    fn set_expected_amount(&mut self, amount: U256);

    /// `ISpendPermissionManager.spend(permission, amount)`; pays `amount` into the router.
    fn spend(&mut self, permission: &SpendPermission, amount: U160) -> Result<(), AuthorityError>;
    fn transfer_native(&mut self, to: Address, amount: U256) -> Result<(), TransferError>;
    fn transfer_token(&mut self, token: Address, to: Address, amount: U256) -> Result<(), TransferError>;

    fn emit_routing_completed(&mut self, record: &RoutingRecord);
}

/// Route `amount` of `permission.token` from `permission.account` to the recipient encoded in
/// the permission's extra data.
///
/// Returns `Ok(true)` when funds moved, `Ok(false)` when the Spend Permission Manager refused
/// the spend (nothing moved), and `Err` for every fatal condition.
pub fn execute_spend<H: RouterHost>(
    host: &mut H,
    permission: &SpendPermission,
    amount: U160,
) -> Result<bool, RouteError> {
    if host.entered() {
        return Err(RouteError::ReentrantCall);
    }
    host.set_entered(true);

    let result = route(host, permission, amount);

    // Cleanup runs on every branch.
    host.set_expected_amount(NOTHING_EXPECTED);
    host.set_entered(false);
    result
}

fn route<H: RouterHost>(
    host: &mut H,
    permission: &SpendPermission,
    amount: U160,
) -> Result<bool, RouteError> {
    if amount.is_zero() {
        return Err(RouteError::ZeroAmount);
    }

    let router = host.router();
    if permission.spender != router {
        return Err(RouteError::InvalidSpender {
            spender: permission.spender,
            router,
        });
    }

    let extra = decode_extra_data(&permission.extra_data).map_err(|_| {
        RouteError::MalformedExtraData {
            length: permission.extra_data.len(),
            extra_data: permission.extra_data.clone(),
        }
    })?;

    let sender = host.caller();
    if sender != extra.app {
        return Err(RouteError::UnauthorizedSender {
            sender,
            app: extra.app,
        });
    }
    if extra.recipient == Address::ZERO {
        return Err(RouteError::ZeroRecipientAddress);
    }

    let value = U256::from(amount);

    // Arm the receive guard before the manager pays us.
    host.set_expected_amount(value);
    let spent = host.spend(permission, amount);
    host.set_expected_amount(NOTHING_EXPECTED);

    if spent.is_err() {
        return Ok(false);
    }

    if permission.is_native() {
        host.transfer_native(extra.recipient, value)
            .map_err(|cause| RouteError::NativeTransferFailed {
                recipient: extra.recipient,
                amount: value,
                cause,
            })?;
    } else {
        host.transfer_token(permission.token, extra.recipient, value)
            .map_err(|cause| RouteError::TokenTransferFailed {
                token: permission.token,
                recipient: extra.recipient,
                amount: value,
                cause,
            })?;
    }

    host.emit_routing_completed(&RoutingRecord {
        recipient: extra.recipient,
        app: extra.app,
        account: permission.account,
        token: permission.token,
        amount: value,
    });
    Ok(true)
}

/// Validate a native-asset inflow of `value` from `sender`.
///
/// Only the single armed inflow of a routing call in flight is accepted; accepting it disarms
/// the guard.
pub fn check_receive<H: RouterHost>(host: &mut H, sender: Address, value: U256) -> Result<(), RouteError> {
    let expected = host.expected_amount();
    if expected == NOTHING_EXPECTED {
        return Err(RouteError::UnauthorizedReceive { sender, value });
    }
    if value != expected {
        return Err(RouteError::UnexpectedAmount {
            received: value,
            expected,
        });
    }
    host.set_expected_amount(NOTHING_EXPECTED);
    Ok(())
}
