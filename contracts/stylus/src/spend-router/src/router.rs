//! Stylus entrypoint for the Spend Router.
//!
//! ABI surface:
//! - `executeSpend(SpendPermission, uint160) returns (bool)`: route funds for the app named in
//!   the permission's extra data.
//! - `constructPermission(...)`, `encodeExtraData`, `decodeExtraData`: pure formatting helpers
//!   for granters.
//! - `receive()`: accepts exactly the inflow an in-flight `executeSpend` is waiting for.
//!
//! Routing decisions live in [`crate::routing`]; this module only binds them to storage,
//! raw calls and logs.

use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{
        aliases::{U160, U48},
        Address, U256,
    },
    prelude::*,
    stylus_core,
};

use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

use spend_router_types::{
    construct_permission, decode_extra_data, encode_extra_data, ExtraDataError, PermissionTerms,
    SpendPermission,
};

use crate::{
    errors::{AuthorityError, RouteError, TransferError},
    interfaces::RoutingCompleted,
    routing::{self, RouterHost, RoutingRecord},
    transfer,
};

sol! {
    error ReentrantCall();
    error ZeroAmount();
    error InvalidSpender(address spender, address router);
    error MalformedExtraData(uint256 length, bytes extraData);
    error UnauthorizedSender(address sender, address app);
    error ZeroAppAddress();
    error ZeroRecipientAddress();
    error UnauthorizedReceive(address sender, uint256 value);
    error UnexpectedAmount(uint256 received, uint256 expected);
    error NativeTransferFailed(address recipient, uint256 amount);
    error TokenTransferFailed(address token, address recipient, uint256 amount);
}

#[derive(SolidityError)]
pub enum RouterError {
    ReentrantCall(ReentrantCall),
    ZeroAmount(ZeroAmount),
    InvalidSpender(InvalidSpender),
    MalformedExtraData(MalformedExtraData),
    UnauthorizedSender(UnauthorizedSender),
    ZeroAppAddress(ZeroAppAddress),
    ZeroRecipientAddress(ZeroRecipientAddress),
    UnauthorizedReceive(UnauthorizedReceive),
    UnexpectedAmount(UnexpectedAmount),
    NativeTransferFailed(NativeTransferFailed),
    TokenTransferFailed(TokenTransferFailed),
}

impl From<RouteError> for RouterError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::ReentrantCall => RouterError::ReentrantCall(ReentrantCall {}),
            RouteError::ZeroAmount => RouterError::ZeroAmount(ZeroAmount {}),
            RouteError::InvalidSpender { spender, router } => {
                RouterError::InvalidSpender(InvalidSpender { spender, router })
            }
            RouteError::MalformedExtraData { length, extra_data } => {
                RouterError::MalformedExtraData(MalformedExtraData {
                    length: U256::from(length),
                    extraData: extra_data.into(),
                })
            }
            RouteError::UnauthorizedSender { sender, app } => {
                RouterError::UnauthorizedSender(UnauthorizedSender { sender, app })
            }
            RouteError::ZeroRecipientAddress => {
                RouterError::ZeroRecipientAddress(ZeroRecipientAddress {})
            }
            RouteError::UnauthorizedReceive { sender, value } => {
                RouterError::UnauthorizedReceive(UnauthorizedReceive { sender, value })
            }
            RouteError::UnexpectedAmount { received, expected } => {
                RouterError::UnexpectedAmount(UnexpectedAmount { received, expected })
            }
            RouteError::NativeTransferFailed { recipient, amount, .. } => {
                RouterError::NativeTransferFailed(NativeTransferFailed { recipient, amount })
            }
            RouteError::TokenTransferFailed {
                token,
                recipient,
                amount,
                ..
            } => RouterError::TokenTransferFailed(TokenTransferFailed {
                token,
                recipient,
                amount,
            }),
        }
    }
}

impl From<ExtraDataError> for RouterError {
    fn from(err: ExtraDataError) -> Self {
        match err {
            ExtraDataError::ZeroAppAddress => RouterError::ZeroAppAddress(ZeroAppAddress {}),
            ExtraDataError::ZeroRecipientAddress => {
                RouterError::ZeroRecipientAddress(ZeroRecipientAddress {})
            }
            ExtraDataError::MalformedExtraData { length, extra_data } => {
                RouterError::MalformedExtraData(MalformedExtraData {
                    length: U256::from(length),
                    extraData: extra_data.into(),
                })
            }
        }
    }
}

/// `SpendPermission` as an ABI tuple:
/// `(account, spender, token, allowance, period, start, end, salt, extraData)`.
pub type SpendPermissionTuple = (Address, Address, Address, U160, U48, U48, U48, U256, Bytes);

fn permission_from_tuple(permission: SpendPermissionTuple) -> SpendPermission {
    let (account, spender, token, allowance, period, start, end, salt, extra_data) = permission;
    SpendPermission {
        account,
        spender,
        token,
        allowance,
        period,
        start,
        end,
        salt,
        extra_data: extra_data.to_vec(),
    }
}

fn permission_to_tuple(permission: SpendPermission) -> SpendPermissionTuple {
    (
        permission.account,
        permission.spender,
        permission.token,
        permission.allowance,
        permission.period,
        permission.start,
        permission.end,
        permission.salt,
        Bytes::from(permission.extra_data),
    )
}

sol_storage! {
    #[entrypoint]
    pub struct SpendRouter {
        /// Spend Permission Manager this router spends through. Fixed at deployment.
        address permission_manager;

        /// Native-asset amount the in-flight `executeSpend` is waiting for; zero when idle.
        uint256 expected_amount;

        /// Non-reentrant lock around `executeSpend`.
        bool entered;
    }
}

#[public]
impl SpendRouter {
    #[constructor]
    pub fn constructor(&mut self, permission_manager: Address) {
        if permission_manager == Address::ZERO {
            panic!("Invalid permission manager");
        }
        self.permission_manager.set(permission_manager);
    }

    /// Spend `amount` through `permission` and forward it to the encoded recipient.
    ///
    /// Returns `false` (no revert) when the Spend Permission Manager refuses the spend, so
    /// callers must check the result.
    pub fn execute_spend(
        &mut self,
        permission: SpendPermissionTuple,
        amount: U160,
    ) -> Result<bool, RouterError> {
        let permission = permission_from_tuple(permission);
        Ok(routing::execute_spend(self, &permission, amount)?)
    }

    /// Build a permission whose spender is this router and whose extra data routes to
    /// `recipient` on behalf of `app`.
    #[allow(clippy::too_many_arguments)]
    pub fn construct_permission(
        &self,
        account: Address,
        app: Address,
        recipient: Address,
        token: Address,
        allowance: U160,
        period: U48,
        start: U48,
        end: U48,
        salt: U256,
    ) -> Result<SpendPermissionTuple, RouterError> {
        let terms = PermissionTerms {
            account,
            token,
            allowance,
            period,
            start,
            end,
            salt,
        };
        let permission = construct_permission(self.vm().contract_address(), app, recipient, terms)?;
        Ok(permission_to_tuple(permission))
    }

    pub fn encode_extra_data(&self, app: Address, recipient: Address) -> Result<Bytes, RouterError> {
        Ok(Bytes::from(encode_extra_data(app, recipient)?))
    }

    pub fn decode_extra_data(&self, extra_data: Bytes) -> Result<(Address, Address), RouterError> {
        let decoded = decode_extra_data(&extra_data)?;
        Ok((decoded.app, decoded.recipient))
    }

    pub fn permission_manager(&self) -> Address {
        self.permission_manager.get()
    }

    pub fn expected_amount(&self) -> U256 {
        self.expected_amount.get()
    }

    #[receive]
    #[payable]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        let sender = self.vm().msg_sender();
        let value = self.vm().msg_value();
        routing::check_receive(self, sender, value).map_err(|err| RouterError::from(err).into())
    }
}

impl RouterHost for SpendRouter {
    fn router(&self) -> Address {
        self.vm().contract_address()
    }

    fn caller(&self) -> Address {
        self.vm().msg_sender()
    }

    fn entered(&self) -> bool {
        self.entered.get()
    }

    fn set_entered(&mut self, entered: bool) {
        self.entered.set(entered);
    }

    fn expected_amount(&self) -> U256 {
        self.expected_amount.get()
    }

    fn set_expected_amount(&mut self, amount: U256) {
        self.expected_amount.set(amount);
    }

    fn spend(&mut self, permission: &SpendPermission, amount: U160) -> Result<(), AuthorityError> {
        transfer::call_spend(self.permission_manager.get(), permission, amount)
    }

    fn transfer_native(&mut self, to: Address, amount: U256) -> Result<(), TransferError> {
        transfer::transfer_native(to, amount)
    }

    fn transfer_token(&mut self, token: Address, to: Address, amount: U256) -> Result<(), TransferError> {
        transfer::transfer_token(token, self.vm().code_size(token), to, amount)
    }

    fn emit_routing_completed(&mut self, record: &RoutingRecord) {
        stylus_core::log(
            self.vm(),
            RoutingCompleted {
                recipient: record.recipient,
                app: record.app,
                account: record.account,
                token: record.token,
                amount: record.amount,
            },
        );
    }
}
