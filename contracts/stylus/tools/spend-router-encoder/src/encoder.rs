use alloy_primitives::{aliases::U160, FixedBytes, U256};
use alloy_sol_types::SolCall;
use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};
use spend_router_types::SpendPermission;

use crate::abi::ISpendRouter;
use crate::types::ManagerDomain;

const DOMAIN_NAME: &[u8] = b"Spend Permission Manager";
const DOMAIN_VERSION: &[u8] = b"1";

const SPEND_PERMISSION_TYPE: &[u8] = b"SpendPermission(address account,address spender,address token,uint160 allowance,uint48 period,uint48 start,uint48 end,uint256 salt,bytes extraData)";

/// ABI calldata for `executeSpend(permission, amount)`, as submitted by the app.
pub fn execute_spend_calldata(permission: &SpendPermission, amount: U160) -> Vec<u8> {
    ISpendRouter::executeSpendCall {
        permission: permission.into(),
        amount,
    }
    .abi_encode()
}

/// Same as [`execute_spend_calldata`], `0x`-prefixed hex.
pub fn execute_spend_calldata_hex(permission: &SpendPermission, amount: U160) -> String {
    format!("0x{}", hex::encode(execute_spend_calldata(permission, amount)))
}

fn keccak256_bytes(bytes: &[u8]) -> FixedBytes<32> {
    let mut h = Keccak256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut b = [0u8; 32];
    b.copy_from_slice(out.as_slice());
    FixedBytes(b)
}

fn push_word(buf: &mut Vec<u8>, tail: &[u8]) {
    let mut word = [0u8; 32];
    word[32 - tail.len()..].copy_from_slice(tail);
    buf.extend_from_slice(&word);
}

/// EIP-712 digest the granter signs for `approveWithSignature` on the Spend Permission Manager.
pub fn spend_permission_digest(permission: &SpendPermission, domain: &ManagerDomain) -> FixedBytes<32> {
    let domain_type_hash = keccak256_bytes(
        b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
    );
    let mut domain_buf = Vec::with_capacity(32 * 5);
    domain_buf.extend_from_slice(domain_type_hash.as_slice());
    domain_buf.extend_from_slice(keccak256_bytes(DOMAIN_NAME).as_slice());
    domain_buf.extend_from_slice(keccak256_bytes(DOMAIN_VERSION).as_slice());
    domain_buf.extend_from_slice(&U256::from(domain.chain_id).to_be_bytes::<32>());
    push_word(&mut domain_buf, domain.manager.as_slice());
    let domain_separator = keccak256_bytes(&domain_buf);

    let mut struct_buf = Vec::with_capacity(32 * 10);
    struct_buf.extend_from_slice(keccak256_bytes(SPEND_PERMISSION_TYPE).as_slice());
    push_word(&mut struct_buf, permission.account.as_slice());
    push_word(&mut struct_buf, permission.spender.as_slice());
    push_word(&mut struct_buf, permission.token.as_slice());
    struct_buf.extend_from_slice(&U256::from(permission.allowance).to_be_bytes::<32>());
    struct_buf.extend_from_slice(&U256::from(permission.period).to_be_bytes::<32>());
    struct_buf.extend_from_slice(&U256::from(permission.start).to_be_bytes::<32>());
    struct_buf.extend_from_slice(&U256::from(permission.end).to_be_bytes::<32>());
    struct_buf.extend_from_slice(&permission.salt.to_be_bytes::<32>());
    // Dynamic `bytes` are hashed in place.
    struct_buf.extend_from_slice(keccak256_bytes(&permission.extra_data).as_slice());
    let struct_hash = keccak256_bytes(&struct_buf);

    let mut final_buf = Vec::with_capacity(2 + 32 + 32);
    final_buf.extend_from_slice(b"\x19\x01");
    final_buf.extend_from_slice(domain_separator.as_slice());
    final_buf.extend_from_slice(struct_hash.as_slice());
    keccak256_bytes(&final_buf)
}

/// Sign the permission digest; returns the 65-byte `r || s || v` signature (`v` in {27, 28}).
pub fn sign_permission(
    permission: &SpendPermission,
    domain: &ManagerDomain,
    signing_key: &SigningKey,
) -> Result<Vec<u8>, k256::ecdsa::Error> {
    let digest = spend_permission_digest(permission, domain);
    let (signature, recovery_id) = signing_key.sign_prehash_recoverable(digest.as_slice())?;
    let (r, s) = signature.split_bytes();

    let mut sig_bytes = Vec::with_capacity(65);
    sig_bytes.extend_from_slice(r.as_slice());
    sig_bytes.extend_from_slice(s.as_slice());
    sig_bytes.push(27 + recovery_id.to_byte());
    Ok(sig_bytes)
}
