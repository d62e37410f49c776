//! Spend Router.
//!
//! Pulls funds from an account through a Spend Permission Manager permission whose spender is
//! this contract, then forwards exactly that amount to the recipient named in the permission's
//! extra data. Only the app named in the same extra data may trigger it.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

pub mod constants;
pub mod errors;
pub mod interfaces;
pub mod router;
pub mod routing;
pub mod transfer;

pub use router::SpendRouter;
