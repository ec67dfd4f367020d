//! Engine configuration.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Multicall3, deployed at the same address on most EVM chains.
pub const DEFAULT_MULTICALL_ADDRESS: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

/// `-1` = no limit on in-flight aggregate calls.
pub const DEFAULT_MAX_CONCURRENT_CALLS: i64 = -1;

/// Inputs per aggregate call when a request does not say otherwise.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 5_000;

/// Settings shared by every invocation of one engine instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticallConfig {
    /// Aggregator contract; unset or zero means [`DEFAULT_MULTICALL_ADDRESS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicall_address: Option<Address>,
    /// `0` = crate default, negative = unlimited, positive = cap.
    #[serde(default)]
    pub max_concurrent_calls: i64,
}

impl MulticallConfig {
    pub fn with_multicall_address(mut self, address: Address) -> Self {
        self.multicall_address = Some(address);
        self
    }

    pub fn with_max_concurrent_calls(mut self, n: i64) -> Self {
        self.max_concurrent_calls = n;
        self
    }

    /// The aggregator address with the default applied.
    pub fn aggregator(&self) -> Address {
        match self.multicall_address {
            Some(addr) if !addr.is_zero() => addr,
            _ => DEFAULT_MULTICALL_ADDRESS,
        }
    }

    /// The concurrency bound with the default applied.
    pub fn concurrency(&self) -> Concurrency {
        Concurrency::from_setting(self.max_concurrent_calls)
            .or_else(|| Concurrency::from_setting(DEFAULT_MAX_CONCURRENT_CALLS))
            .unwrap_or(Concurrency::Unlimited)
    }
}

/// How many aggregate calls may be in flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    Unlimited,
    Limited(NonZeroUsize),
}

impl Concurrency {
    /// Interpret a raw signed setting.
    ///
    /// `0` returns `None` so the caller can fall back to its own default.
    pub fn from_setting(n: i64) -> Option<Self> {
        match n {
            0 => None,
            n if n < 0 => Some(Self::Unlimited),
            n => Some(
                usize::try_from(n)
                    .ok()
                    .and_then(NonZeroUsize::new)
                    .map_or(Self::Unlimited, Self::Limited),
            ),
        }
    }

    /// Number of dispatch slots to open for `batches` batches. Never zero.
    pub fn slots(self, batches: usize) -> usize {
        match self {
            Self::Unlimited => batches.max(1),
            Self::Limited(n) => n.get().min(batches.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_falls_back_to_default() {
        assert_eq!(MulticallConfig::default().aggregator(), DEFAULT_MULTICALL_ADDRESS);
        let zeroed = MulticallConfig::default().with_multicall_address(Address::ZERO);
        assert_eq!(zeroed.aggregator(), DEFAULT_MULTICALL_ADDRESS);

        let custom = Address::repeat_byte(0x11);
        let cfg = MulticallConfig::default().with_multicall_address(custom);
        assert_eq!(cfg.aggregator(), custom);
    }

    #[test]
    fn concurrency_settings() {
        assert_eq!(Concurrency::from_setting(0), None);
        assert_eq!(Concurrency::from_setting(-1), Some(Concurrency::Unlimited));
        assert_eq!(
            Concurrency::from_setting(4),
            Some(Concurrency::Limited(NonZeroUsize::new(4).unwrap()))
        );
        // 0 in the config means the crate default, which is unlimited
        assert_eq!(MulticallConfig::default().concurrency(), Concurrency::Unlimited);
    }

    #[test]
    fn slots_never_zero() {
        assert_eq!(Concurrency::Unlimited.slots(0), 1);
        assert_eq!(Concurrency::Unlimited.slots(7), 7);
        let two = Concurrency::Limited(NonZeroUsize::new(2).unwrap());
        assert_eq!(two.slots(7), 2);
        assert_eq!(two.slots(1), 1);
    }

    #[test]
    fn config_from_json() {
        let cfg: MulticallConfig = serde_json::from_str(
            r#"{"multicall_address":"0x1111111111111111111111111111111111111111","max_concurrent_calls":8}"#,
        )
        .unwrap();
        assert_eq!(cfg.aggregator(), Address::repeat_byte(0x11));
        assert_eq!(
            cfg.concurrency(),
            Concurrency::Limited(NonZeroUsize::new(8).unwrap())
        );

        let empty: MulticallConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, MulticallConfig::default());
    }
}
