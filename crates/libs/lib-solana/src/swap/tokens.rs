//! # Swap Token List
//!
//! Built-in token list for the swap widget. Only Base (chain 8453) is bundled;
//! lookups for any other chain fall back to the Base list.

use serde::Serialize;

pub const BASE_CHAIN_ID: u64 = 8453;

/// Placeholder address the swap API uses for the chain's native asset.
pub const NATIVE_TOKEN_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Token metadata shown in the token selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub symbol: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub decimals: u8,
    #[serde(rename = "logoURI")]
    pub logo_uri: &'static str,
    pub chain_id: u64,
}

macro_rules! base_token {
    ($symbol:literal, $name:literal, $address:expr, $decimals:literal, $logo:literal) => {
        Token {
            symbol: $symbol,
            name: $name,
            address: $address,
            decimals: $decimals,
            logo_uri: $logo,
            chain_id: BASE_CHAIN_ID,
        }
    };
}

static BASE_TOKENS: [Token; 6] = [
    base_token!(
        "ETH",
        "Ethereum",
        NATIVE_TOKEN_ADDRESS,
        18,
        "https://raw.githubusercontent.com/0xProject/protocol/development/contracts/integrations/test/tokens/eth.png"
    ),
    base_token!(
        "USDC",
        "USD Coin",
        "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
        6,
        "https://raw.githubusercontent.com/0xProject/protocol/development/contracts/integrations/test/tokens/usdc.png"
    ),
    base_token!(
        "DAI",
        "Dai Stablecoin",
        "0x50c5725949A6F0c72E6C4a641F24049A917DB0Cb",
        18,
        "https://raw.githubusercontent.com/0xProject/protocol/development/contracts/integrations/test/tokens/dai.png"
    ),
    base_token!(
        "USDT",
        "Tether USD",
        "0xd9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA",
        6,
        "https://raw.githubusercontent.com/0xProject/protocol/development/contracts/integrations/test/tokens/usdt.png"
    ),
    base_token!(
        "WETH",
        "Wrapped Ether",
        "0x4200000000000000000000000000000000000006",
        18,
        "https://raw.githubusercontent.com/0xProject/protocol/development/contracts/integrations/test/tokens/weth.png"
    ),
    base_token!(
        "LINK",
        "ChainLink Token",
        "0x88D2dbBb3BFe7dBF6eaBD5A7006BE3F9C0e094D8",
        18,
        "https://assets.coingecko.com/coins/images/877/small/chainlink-new-logo.png"
    ),
];

/// Tokens available on `chain_id`.
pub fn tokens_for_chain(chain_id: u64) -> &'static [Token] {
    match chain_id {
        BASE_CHAIN_ID => &BASE_TOKENS,
        _ => &BASE_TOKENS,
    }
}

/// Case-insensitive lookup by contract address.
pub fn find_token_by_address(address: &str, chain_id: u64) -> Option<&'static Token> {
    tokens_for_chain(chain_id)
        .iter()
        .find(|t| t.address.eq_ignore_ascii_case(address))
}

/// Case-insensitive lookup by symbol.
pub fn find_token_by_symbol(symbol: &str, chain_id: u64) -> Option<&'static Token> {
    tokens_for_chain(chain_id)
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}
