use crate::abi::{self, ISpendRouter};
use crate::encoder::{execute_spend_calldata, execute_spend_calldata_hex, sign_permission, spend_permission_digest};
use crate::types::{ManagerDomain, RoutedPermission};
use alloy_primitives::{address, aliases::{U160, U48}, Address, U256};
use alloy_sol_types::{eip712_domain, SolCall, SolStruct};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use spend_router_types::{decode_extra_data, ExtraDataError, PermissionTerms, NATIVE_TOKEN};

const ROUTER: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
const MANAGER: Address = address!("f85210B21cC50302F477BA56686d2019dC9b67Ad");
const ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const APP: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
const RECIPIENT: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

fn routed(app: Address, recipient: Address) -> RoutedPermission {
    RoutedPermission {
        router: ROUTER,
        app,
        recipient,
        terms: PermissionTerms {
            account: ACCOUNT,
            token: NATIVE_TOKEN,
            allowance: U160::from(1_000_000_000_000_000_000u128),
            period: U48::from(86_400u64),
            start: U48::from(1_700_000_000u64),
            end: U48::from(1_800_000_000u64),
            salt: U256::from(1u64),
        },
    }
}

fn domain() -> ManagerDomain {
    ManagerDomain {
        chain_id: 8453,
        manager: MANAGER,
    }
}

#[test]
fn test_build_routes_through_router() {
    let permission = routed(APP, RECIPIENT).build().unwrap();
    assert_eq!(permission.spender, ROUTER);
    let extra = decode_extra_data(&permission.extra_data).unwrap();
    assert_eq!(extra.app, APP);
    assert_eq!(extra.recipient, RECIPIENT);
}

#[test]
fn test_build_rejects_zero_recipient() {
    assert_eq!(
        routed(APP, Address::ZERO).build().unwrap_err(),
        ExtraDataError::ZeroRecipientAddress
    );
}

#[test]
fn test_execute_spend_calldata() {
    let permission = routed(APP, RECIPIENT).build().unwrap();
    let amount = U160::from(500_000_000_000_000_000u128);
    let calldata = execute_spend_calldata(&permission, amount);

    assert_eq!(calldata[..4], ISpendRouter::executeSpendCall::SELECTOR);
    let decoded = ISpendRouter::executeSpendCall::abi_decode(&calldata, true).unwrap();
    assert_eq!(decoded.amount, amount);
    assert_eq!(spend_router_types::SpendPermission::from(decoded.permission), permission);

    let hex = execute_spend_calldata_hex(&permission, amount);
    assert!(hex.starts_with("0x"));
    assert_eq!(hex.len(), 2 + calldata.len() * 2);
}

#[test]
fn test_digest_matches_typed_data_hash() {
    let permission = routed(APP, RECIPIENT).build().unwrap();
    let typed_domain = eip712_domain! {
        name: "Spend Permission Manager",
        version: "1",
        chain_id: 8453,
        verifying_contract: MANAGER,
    };
    let expected = abi::SpendPermission::from(&permission).eip712_signing_hash(&typed_domain);
    assert_eq!(spend_permission_digest(&permission, &domain()), expected);
}

#[test]
fn test_digest_binds_chain_and_extra_data() {
    let permission = routed(APP, RECIPIENT).build().unwrap();
    let other_chain = ManagerDomain {
        chain_id: 42161,
        manager: MANAGER,
    };
    assert_ne!(
        spend_permission_digest(&permission, &domain()),
        spend_permission_digest(&permission, &other_chain)
    );

    let rerouted = routed(APP, ACCOUNT).build().unwrap();
    assert_ne!(
        spend_permission_digest(&permission, &domain()),
        spend_permission_digest(&rerouted, &domain())
    );
}

#[test]
fn test_sign_permission_recovers_signer() {
    let key = SigningKey::from_slice(&[0x11u8; 32]).unwrap();
    let permission = routed(APP, RECIPIENT).build().unwrap();
    let sig = sign_permission(&permission, &domain(), &key).unwrap();

    assert_eq!(sig.len(), 65);
    assert!(sig[64] == 27 || sig[64] == 28);

    let signature = Signature::from_slice(&sig[..64]).unwrap();
    let recovery_id = RecoveryId::from_byte(sig[64] - 27).unwrap();
    let digest = spend_permission_digest(&permission, &domain());
    let recovered = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id).unwrap();
    assert_eq!(&recovered, key.verifying_key());
}
