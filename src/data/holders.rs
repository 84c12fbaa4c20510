//! ERC-20 holder balances rebuilt from the token's `Transfer` log history.
//!
//! Balances are kept as signed 256-bit integers while replaying, so any value a
//! `uint256` transfer can carry is accounted for exactly.

use std::collections::HashMap;
use std::sync::Arc;

use ethers::abi::parse_abi;
use ethers::contract::Contract;
use ethers::prelude::{Address, Http, Middleware, Provider};
use ethers::types::{BlockNumber, Filter, I256, Log, U256};
use log::{debug, info};
use tokio::runtime::Runtime;

use crate::error::AppError;

const TRANSFER_EVENT: &str = "Transfer(address,address,uint256)";
const DEFAULT_RPC_URL: &str = "https://zircuit1-mainnet.liquify.com";
pub const DEFAULT_TOKEN: &str = "0x58024021Fe3eF613fA76e2f36A3Da97eb1454C36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// A holder with a positive balance (raw token units).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    pub address: Address,
    pub balance: U256,
}

/// Replay transfers into balances.
///
/// Mints (from the zero address) only credit the receiver. Only strictly
/// positive balances are returned, largest first (ties by address).
pub fn reconstruct_balances(events: &[TransferEvent]) -> Result<Vec<Holder>, AppError> {
    let mut balances: HashMap<Address, I256> = HashMap::new();

    for ev in events {
        let value = I256::try_from(ev.value)
            .map_err(|_| AppError::upstream(format!("Transfer value {} exceeds int256.", ev.value)))?;

        if ev.from != Address::zero() {
            let b = balances.entry(ev.from).or_insert_with(I256::zero);
            *b = b
                .checked_sub(value)
                .ok_or_else(|| AppError::upstream(format!("Balance underflow for {:?}.", ev.from)))?;
        }
        let b = balances.entry(ev.to).or_insert_with(I256::zero);
        *b = b
            .checked_add(value)
            .ok_or_else(|| AppError::upstream(format!("Balance overflow for {:?}.", ev.to)))?;
    }

    let mut holders: Vec<Holder> = balances
        .into_iter()
        .filter(|(_, b)| b.is_positive())
        .map(|(address, b)| Holder {
            address,
            balance: b.into_raw(),
        })
        .collect();
    holders.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.address.cmp(&b.address)));
    Ok(holders)
}

/// Scale a raw amount by `10^decimals` without losing precision.
///
/// Trailing fractional zeros are dropped (`2.500` -> `2.5`, `42.0` -> `42`).
pub fn display_units(amount: U256, decimals: u8) -> String {
    let Ok(text) = ethers::utils::format_units(amount, u32::from(decimals)) else {
        return amount.to_string();
    };
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Checksummed hex form of an address.
pub fn display_address(address: &Address) -> String {
    ethers::utils::to_checksum(address, None)
}

/// Decode a `Transfer(address indexed, address indexed, uint256)` log.
pub fn decode_transfer(log: &Log) -> Result<TransferEvent, AppError> {
    if log.topics.len() < 3 {
        return Err(AppError::upstream(format!(
            "Transfer log has {} topics, expected 3.",
            log.topics.len()
        )));
    }
    let data = log.data.as_ref();
    if data.len() < 32 {
        return Err(AppError::upstream(format!(
            "Transfer log data is {} bytes, expected 32.",
            data.len()
        )));
    }
    Ok(TransferEvent {
        from: Address::from_slice(&log.topics[1].as_bytes()[12..]),
        to: Address::from_slice(&log.topics[2].as_bytes()[12..]),
        value: U256::from_big_endian(&data[..32]),
    })
}

pub struct HolderClient {
    provider: Arc<Provider<Http>>,
    runtime: Runtime,
}

impl HolderClient {
    /// Build a client, reading `GV_RPC_URL` (optional) from the environment / `.env`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let rpc_url = std::env::var("GV_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let provider = Provider::<Http>::try_from(rpc_url.as_str())
            .map_err(|e| AppError::config(format!("Invalid RPC URL '{rpc_url}': {e}")))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::config(format!("Failed to start async runtime: {e}")))?;
        Ok(Self {
            provider: Arc::new(provider),
            runtime,
        })
    }

    /// Fetch every `Transfer` log ever emitted by `token`.
    pub fn fetch_transfers(&self, token: Address) -> Result<Vec<TransferEvent>, AppError> {
        info!("querying Transfer logs for {}", display_address(&token));
        let filter = Filter::new()
            .address(token)
            .event(TRANSFER_EVENT)
            .from_block(BlockNumber::Earliest)
            .to_block(BlockNumber::Latest);

        let logs = self
            .runtime
            .block_on(self.provider.get_logs(&filter))
            .map_err(|e| AppError::upstream(format!("eth_getLogs failed: {e}")))?;

        debug!("received {} transfer logs", logs.len());
        logs.iter().map(decode_transfer).collect()
    }

    pub fn fetch_decimals(&self, token: Address) -> Result<u8, AppError> {
        let abi = parse_abi(&["function decimals() view returns (uint8)"])
            .map_err(|e| AppError::config(format!("Invalid token ABI: {e}")))?;
        let contract = Contract::new(token, abi, self.provider.clone());
        let call = contract
            .method::<_, u8>("decimals", ())
            .map_err(|e| AppError::config(format!("Failed to encode decimals(): {e}")))?;
        self.runtime
            .block_on(call.call())
            .map_err(|e| AppError::upstream(format!("decimals() call failed: {e}")))
    }
}

/// Parse a token address given on the command line.
pub fn parse_token(raw: &str) -> Result<Address, AppError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| AppError::config(format!("Invalid token address '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Bytes, H256};

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn transfer(from: Address, to: Address, value: U256) -> TransferEvent {
        TransferEvent { from, to, value }
    }

    fn transfer_log(from: Address, to: Address, value: U256) -> Log {
        let mut data = [0u8; 32];
        value.to_big_endian(&mut data);
        Log {
            topics: vec![H256::zero(), H256::from(from), H256::from(to)],
            data: Bytes::from(data.to_vec()),
            ..Default::default()
        }
    }

    #[test]
    fn replays_mints_and_transfers() {
        let (a, b, c) = (addr(1), addr(2), addr(3));
        let events = vec![
            transfer(Address::zero(), a, U256::from(1_000)),
            transfer(a, b, U256::from(300)),
            transfer(b, c, U256::from(300)),
            transfer(Address::zero(), b, U256::from(50)),
        ];
        let holders = reconstruct_balances(&events).unwrap();
        assert_eq!(
            holders,
            vec![
                Holder { address: a, balance: U256::from(700) },
                Holder { address: c, balance: U256::from(300) },
                Holder { address: b, balance: U256::from(50) },
            ]
        );
    }

    #[test]
    fn burns_accumulate_on_zero_address() {
        let a = addr(1);
        let events = vec![
            transfer(Address::zero(), a, U256::from(10)),
            transfer(a, Address::zero(), U256::from(10)),
        ];
        let holders = reconstruct_balances(&events).unwrap();
        assert_eq!(holders.len(), 1);
        assert_eq!(holders[0].address, Address::zero());
        assert_eq!(holders[0].balance, U256::from(10));
    }

    #[test]
    fn balances_beyond_128_bits_are_exact() {
        let (a, b) = (addr(1), addr(2));
        let big = U256::from(i128::MAX as u128) + U256::from(10);
        let events = vec![
            transfer(Address::zero(), a, big),
            transfer(a, b, U256::from(5)),
            transfer(Address::zero(), b, U256::one() << 200usize),
        ];
        let holders = reconstruct_balances(&events).unwrap();
        assert_eq!(holders[0].address, b);
        assert_eq!(holders[0].balance, (U256::one() << 200usize) + U256::from(5));
        assert_eq!(holders[1].address, a);
        assert_eq!(holders[1].balance, big - U256::from(5));
    }

    #[test]
    fn values_past_int256_are_rejected() {
        let events = vec![transfer(Address::zero(), addr(1), U256::MAX)];
        assert_eq!(reconstruct_balances(&events).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn decodes_transfer_log() {
        let to = addr(0xabcdef);
        let ev = decode_transfer(&transfer_log(Address::zero(), to, U256::from(1_000))).unwrap();
        assert_eq!(ev.from, Address::zero());
        assert_eq!(ev.to, to);
        assert_eq!(ev.value, U256::from(1_000));
    }

    #[test]
    fn decodes_values_of_two_to_the_128() {
        let value = U256::one() << 128usize;
        let ev = decode_transfer(&transfer_log(addr(1), addr(2), value)).unwrap();
        assert_eq!(ev.value, value);
    }

    #[test]
    fn rejects_short_logs() {
        let mut log = transfer_log(addr(1), addr(2), U256::one());
        log.topics.truncate(1);
        assert_eq!(decode_transfer(&log).unwrap_err().exit_code(), 4);

        let mut log = transfer_log(addr(1), addr(2), U256::one());
        log.data = Bytes::from(vec![0u8; 4]);
        assert_eq!(decode_transfer(&log).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn displays_units() {
        let amount = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(display_units(amount, 18), "1.5");
        assert_eq!(display_units(U256::from(2_500), 3), "2.5");
        assert_eq!(display_units(U256::from(3_000), 3), "3");
        assert_eq!(display_units(U256::from(42), 0), "42");
    }

    #[test]
    fn parses_token_addresses() {
        assert_eq!(parse_token(DEFAULT_TOKEN).unwrap(), DEFAULT_TOKEN.parse::<Address>().unwrap());
        assert_eq!(parse_token("0x12").unwrap_err().exit_code(), 2);
    }
}
