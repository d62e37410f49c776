//! Devnet checks against a deployed router.
//!
//! Needs `RPC_URL`, `STYLUS_CONTRACT_ADDRESS` and `PRIV_KEY_PATH` (a `.env` file works).
//! Run with `cargo test -p spend-router --test devnet -- --ignored`.

use std::sync::Arc;

use ethers::{
    middleware::SignerMiddleware,
    prelude::abigen,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TransactionRequest, U256},
};
use eyre::{eyre, Result};

abigen!(
    SpendRouter,
    r#"[
        function permissionManager() external view returns (address)
        function expectedAmount() external view returns (uint256)
        function encodeExtraData(address app, address recipient) external view returns (bytes)
        function decodeExtraData(bytes extraData) external view returns (address, address)
    ]"#
);

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

async fn connect() -> Result<(Arc<Client>, Address)> {
    dotenv::dotenv().ok();
    let rpc_url = std::env::var("RPC_URL").map_err(|_| eyre!("No RPC_URL set"))?;
    let contract = std::env::var("STYLUS_CONTRACT_ADDRESS")
        .map_err(|_| eyre!("No STYLUS_CONTRACT_ADDRESS set"))?;
    let priv_key_path = std::env::var("PRIV_KEY_PATH").map_err(|_| eyre!("No PRIV_KEY_PATH set"))?;

    let provider = Provider::<Http>::try_from(rpc_url)?;
    let chain_id = provider.get_chainid().await?.as_u64();
    let privkey = std::fs::read_to_string(priv_key_path)?;
    let wallet = privkey.trim().parse::<LocalWallet>()?.with_chain_id(chain_id);

    let client = Arc::new(SignerMiddleware::new(provider, wallet));
    Ok((client, contract.parse()?))
}

#[tokio::test]
#[ignore]
async fn test_router_is_idle_and_configured() -> Result<()> {
    let (client, address) = connect().await?;
    let router = SpendRouter::new(address, client);

    assert_ne!(router.permission_manager().call().await?, Address::zero());
    assert_eq!(router.expected_amount().call().await?, U256::zero());
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_extra_data_round_trips_on_chain() -> Result<()> {
    let (client, address) = connect().await?;
    let router = SpendRouter::new(address, client);

    let app: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse()?;
    let recipient: Address = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".parse()?;
    let encoded = router.encode_extra_data(app, recipient).call().await?;
    assert_eq!(encoded.len(), 64);

    let decoded = router.decode_extra_data(encoded).call().await?;
    assert_eq!(decoded, (app, recipient));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_unsolicited_deposit_reverts() -> Result<()> {
    let (client, address) = connect().await?;

    let tx = TransactionRequest::new().to(address).value(1u64);
    let sent = client.send_transaction(tx, None).await;
    assert!(sent.is_err(), "router accepted a deposit outside executeSpend");
    Ok(())
}
