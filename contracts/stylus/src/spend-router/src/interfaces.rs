//! Solidity ABI definitions for the router's collaborators and its event.

use alloc::vec::Vec;

use stylus_sdk::{
    alloy_primitives::Bytes,
    alloy_sol_types::sol,
};

use spend_router_types::SpendPermission as Permission;

sol! {
    /// Spend Permission Manager struct (field order is part of the ABI).
    struct SpendPermission {
        address account;
        address spender;
        address token;
        uint160 allowance;
        uint48 period;
        uint48 start;
        uint48 end;
        uint256 salt;
        bytes extraData;
    }

    interface ISpendPermissionManager {
        function spend(SpendPermission spendPermission, uint160 value) external;
    }

    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }

    event RoutingCompleted(
        address indexed recipient,
        address indexed app,
        address indexed account,
        address token,
        uint256 amount
    );
}

impl From<&Permission> for SpendPermission {
    fn from(p: &Permission) -> Self {
        SpendPermission {
            account: p.account,
            spender: p.spender,
            token: p.token,
            allowance: p.allowance,
            period: p.period,
            start: p.start,
            end: p.end,
            salt: p.salt,
            extraData: Bytes::from(p.extra_data.clone()),
        }
    }
}

impl From<SpendPermission> for Permission {
    fn from(p: SpendPermission) -> Self {
        Permission {
            account: p.account,
            spender: p.spender,
            token: p.token,
            allowance: p.allowance,
            period: p.period,
            start: p.start,
            end: p.end,
            salt: p.salt,
            extra_data: Vec::from(p.extraData.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylus_sdk::{
        alloy_primitives::{
            address,
            aliases::{U160, U48},
            U256,
        },
        alloy_sol_types::SolCall,
    };

    #[test]
    fn test_permission_conversion_keeps_fields() {
        let permission = Permission {
            account: address!("00000000000000000000000000000000000acc01"),
            spender: address!("00000000000000000000000000000000000f0f0f"),
            token: spend_router_types::NATIVE_TOKEN,
            allowance: U160::from(5u64),
            period: U48::from(86_400u64),
            start: U48::from(1u64),
            end: U48::from((1u64 << 48) - 1),
            salt: U256::from(9u64),
            extra_data: vec![1, 2, 3],
        };

        let abi = SpendPermission::from(&permission);
        assert_eq!(abi.end, U48::from((1u64 << 48) - 1));
        assert_eq!(abi.extraData.as_ref(), &[1u8, 2, 3]);
        assert_eq!(Permission::from(abi), permission);
    }

    #[test]
    fn test_spend_selector() {
        // keccak256("spend((address,address,address,uint160,uint48,uint48,uint48,uint256,bytes),uint160)")
        let expected = stylus_sdk::alloy_primitives::keccak256(
            b"spend((address,address,address,uint160,uint48,uint48,uint48,uint256,bytes),uint160)",
        );
        assert_eq!(ISpendPermissionManager::spendCall::SELECTOR, expected[..4]);
    }
}
