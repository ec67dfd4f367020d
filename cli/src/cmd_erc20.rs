//! `chaincall balances | allowances | eth-balances`

use anyhow::{Context, Result};
use alloy_primitives::{Address, U256};
use chaincall_evm::erc20;
use serde_json::Value;
use std::str::FromStr;
use std::time::Instant;

use crate::format::print_rows;
use crate::Session;

/// `<owner>:<spender>` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub owner: Address,
    pub spender: Address,
}

impl FromStr for Pair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, spender) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <owner>:<spender>, got '{s}'"))?;
        let parse = |part: &str| {
            Address::from_str(part.trim()).map_err(|e| format!("invalid address '{part}': {e}"))
        };
        Ok(Self {
            owner: parse(owner)?,
            spender: parse(spender)?,
        })
    }
}

fn print_amounts(session: &Session, labels: Vec<String>, amounts: Vec<U256>) {
    let rows = labels
        .into_iter()
        .zip(amounts)
        .map(|(label, amount)| (label, Value::String(amount.to_string())));
    print_rows(rows, session.json);
}

pub async fn balances(session: &Session, token: Address, holders: &[Address]) -> Result<()> {
    let start = Instant::now();
    let amounts = erc20::balance_of(&session.client, holders, token, &session.options)
        .await
        .with_context(|| format!("balanceOf on {token}"))?;
    tracing::info!(
        holders = holders.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "balances fetched"
    );

    print_amounts(session, holders.iter().map(|h| h.to_string()).collect(), amounts);
    Ok(())
}

pub async fn allowances(session: &Session, token: Address, pairs: &[Pair]) -> Result<()> {
    let start = Instant::now();
    let tuples: Vec<(Address, Address)> = pairs.iter().map(|p| (p.owner, p.spender)).collect();
    let amounts = erc20::allowance(&session.client, &tuples, token, &session.options)
        .await
        .with_context(|| format!("allowance on {token}"))?;
    tracing::info!(
        pairs = pairs.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "allowances fetched"
    );

    let labels = pairs
        .iter()
        .map(|p| format!("{}:{}", p.owner, p.spender))
        .collect();
    print_amounts(session, labels, amounts);
    Ok(())
}

pub async fn eth_balances(session: &Session, holders: &[Address]) -> Result<()> {
    let start = Instant::now();
    let aggregator = session.client.aggregator();
    let amounts = erc20::eth_balances(&session.client, holders, &session.options)
        .await
        .with_context(|| format!("getEthBalance via {aggregator}"))?;
    tracing::info!(
        holders = holders.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "native balances fetched"
    );

    print_amounts(session, holders.iter().map(|h| h.to_string()).collect(), amounts);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chaincall_batch::MulticallClient;
    use chaincall_core::{AggregateResult, Call, CallExecutor, CallOptions, ExecuteError};
    use std::sync::Arc;

    #[test]
    fn pair_parses() {
        let pair: Pair = "0x1111111111111111111111111111111111111111:0x2222222222222222222222222222222222222222"
            .parse()
            .unwrap();
        assert_eq!(pair.owner, Address::repeat_byte(0x11));
        assert_eq!(pair.spender, Address::repeat_byte(0x22));
    }

    #[test]
    fn pair_needs_a_separator() {
        let err = "0x1111111111111111111111111111111111111111"
            .parse::<Pair>()
            .unwrap_err();
        assert!(err.contains("<owner>:<spender>"));
    }

    #[test]
    fn pair_rejects_bad_addresses() {
        assert!("0x11:0x22".parse::<Pair>().is_err());
    }

    struct Unreachable;

    #[async_trait]
    impl CallExecutor for Unreachable {
        async fn aggregate(
            &self,
            _aggregator: Address,
            _options: &CallOptions,
            _calls: Vec<Call>,
        ) -> Result<AggregateResult, ExecuteError> {
            Err(ExecuteError::Transport("connection refused".into()))
        }
    }

    fn offline_session() -> Session {
        Session {
            client: MulticallClient::new(Arc::new(Unreachable)),
            options: CallOptions::default(),
            json: false,
        }
    }

    #[tokio::test]
    async fn every_lookup_names_what_failed() {
        let session = offline_session();
        let holders = [Address::repeat_byte(1)];
        let token = Address::repeat_byte(0xEE);

        let err = eth_balances(&session, &holders).await.unwrap_err();
        assert!(err.to_string().starts_with("getEthBalance via 0xcA11"));
        assert!(format!("{err:#}").contains("connection refused"));

        let err = balances(&session, token, &holders).await.unwrap_err();
        assert!(err.to_string().starts_with("balanceOf on"));

        let pairs = [Pair {
            owner: Address::repeat_byte(1),
            spender: Address::repeat_byte(2),
        }];
        let err = allowances(&session, token, &pairs).await.unwrap_err();
        assert!(err.to_string().starts_with("allowance on"));
    }
}
