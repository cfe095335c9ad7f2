//! Gas sufficiency evaluation for the L1 claim transaction.
//!
//! Everything here is advisory: the numbers improve the user experience but
//! their absence must never block a submission. Only a *known* shortfall
//! (balance and cost both resolved, balance too low) halts the pipeline.

use alloy_primitives::U256;
use wallet::TokenBalance;

/// Gas limit used when estimation fails. Conservative upper bound for the
/// bridge claim call.
pub const FALLBACK_CLAIM_GAS_LIMIT: u64 = 300_000;

/// Whether the signing account can cover the claim's gas cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sufficiency {
    Sufficient,
    Insufficient,
    /// Balance or price lookup failed; treated as sufficient. The wallet
    /// is a better judge than a half-informed heuristic.
    Unknown,
}

/// Outcome of the advisory gas/balance checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasCheckResult {
    pub estimated_gas_units: U256,
    pub gas_price_wei: Option<U256>,
    pub native_balance_wei: Option<U256>,
    pub sufficiency: Sufficiency,
}

impl GasCheckResult {
    /// Combine whatever the advisory lookups produced into a verdict.
    pub fn evaluate(
        estimated_gas_units: U256,
        gas_price_wei: Option<U256>,
        native_balance_wei: Option<U256>,
    ) -> Self {
        let sufficiency = match (gas_price_wei, native_balance_wei) {
            (Some(price), Some(balance)) => {
                if balance < estimated_gas_units.saturating_mul(price) {
                    Sufficiency::Insufficient
                } else {
                    Sufficiency::Sufficient
                }
            }
            // Cost or balance unknown: do not block.
            _ => Sufficiency::Unknown,
        };

        Self {
            estimated_gas_units,
            gas_price_wei,
            native_balance_wei,
            sufficiency,
        }
    }

    /// Only an explicit shortfall halts the pipeline.
    pub const fn blocks_submission(&self) -> bool {
        matches!(self.sufficiency, Sufficiency::Insufficient)
    }

    /// The estimated total gas cost, when the price is known.
    pub fn required_wei(&self) -> Option<U256> {
        self.gas_price_wei
            .map(|price| self.estimated_gas_units.saturating_mul(price))
    }
}

/// Pick the native-token balance out of an account's balance list.
pub fn native_balance(balances: &[TokenBalance]) -> Option<U256> {
    balances
        .iter()
        .find(|balance| balance.is_native())
        .map(|balance| balance.amount_wei)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    #[test]
    fn known_shortfall_is_insufficient() {
        let check = GasCheckResult::evaluate(
            U256::from(100_000),
            Some(U256::from(10)),
            Some(U256::from(999_999)),
        );
        assert_eq!(check.sufficiency, Sufficiency::Insufficient);
        assert!(check.blocks_submission());
        assert_eq!(check.required_wei(), Some(U256::from(1_000_000)));
    }

    #[test]
    fn exact_balance_is_sufficient() {
        let check = GasCheckResult::evaluate(
            U256::from(100_000),
            Some(U256::from(10)),
            Some(U256::from(1_000_000)),
        );
        assert_eq!(check.sufficiency, Sufficiency::Sufficient);
        assert!(!check.blocks_submission());
    }

    #[test]
    fn missing_price_is_unknown_and_does_not_block() {
        let check =
            GasCheckResult::evaluate(U256::from(100_000), None, Some(U256::from(1)));
        assert_eq!(check.sufficiency, Sufficiency::Unknown);
        assert!(!check.blocks_submission());
        assert_eq!(check.required_wei(), None);
    }

    #[test]
    fn missing_balance_is_unknown_and_does_not_block() {
        let check =
            GasCheckResult::evaluate(U256::from(100_000), Some(U256::from(10)), None);
        assert_eq!(check.sufficiency, Sufficiency::Unknown);
        assert!(!check.blocks_submission());
    }

    #[test]
    fn native_balance_ignores_erc20_entries() {
        let balances = vec![
            TokenBalance {
                token_address: Address::repeat_byte(1),
                amount_wei: U256::from(500),
            },
            TokenBalance {
                token_address: Address::ZERO,
                amount_wei: U256::from(42),
            },
        ];
        assert_eq!(native_balance(&balances), Some(U256::from(42)));
        assert_eq!(native_balance(&balances[..1]), None);
    }
}
