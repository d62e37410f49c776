//! Off-chain helpers for Spend Router permissions: build them, hash and sign them for the
//! Spend Permission Manager, and produce `executeSpend` calldata for apps.

pub mod abi;
pub mod encoder;
pub mod types;

pub use encoder::{
    execute_spend_calldata, execute_spend_calldata_hex, sign_permission, spend_permission_digest,
};
pub use types::{ManagerDomain, RoutedPermission};

#[cfg(test)]
mod tests;
