//! ABI bindings shared with the on-chain router.

use alloy_primitives::Bytes;
use alloy_sol_types::sol;
use spend_router_types::SpendPermission as Permission;

sol! {
    /// Spend Permission Manager struct; also the EIP-712 primary type.
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

    interface ISpendRouter {
        function executeSpend(SpendPermission permission, uint160 amount) external returns (bool);
    }
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
            extra_data: p.extraData.to_vec(),
        }
    }
}
