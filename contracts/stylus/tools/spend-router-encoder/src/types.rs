use alloy_primitives::Address;
use spend_router_types::{construct_permission, ExtraDataError, PermissionTerms, SpendPermission};

/// EIP-712 domain of the Spend Permission Manager a permission is approved with.
#[derive(Clone, Copy, Debug)]
pub struct ManagerDomain {
    pub chain_id: u64,
    /// Spend Permission Manager address (the verifying contract).
    pub manager: Address,
}

/// Inputs a granter needs to produce a permission routed through a deployed router.
#[derive(Clone, Debug)]
pub struct RoutedPermission {
    /// Deployed Spend Router (becomes the permission's spender).
    pub router: Address,
    /// App allowed to call `executeSpend`.
    pub app: Address,
    /// Final receiver of routed funds.
    pub recipient: Address,
    pub terms: PermissionTerms,
}

impl RoutedPermission {
    pub fn build(&self) -> Result<SpendPermission, ExtraDataError> {
        construct_permission(self.router, self.app, self.recipient, self.terms)
    }
}
