//! Types shared by the Spend Router contract and its off-chain tooling.
//!
//! Everything here is pure and `no_std`, so the exact same extra-data codec runs inside the
//! Stylus WASM binary and in the encoder used by permission granters.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod constants;
pub mod extra_data;
pub mod permission;

pub use constants::{EXTRA_DATA_LEN, NATIVE_TOKEN};
pub use extra_data::{decode_extra_data, encode_extra_data, ExtraData, ExtraDataError};
pub use permission::{construct_permission, PermissionTerms, SpendPermission};
