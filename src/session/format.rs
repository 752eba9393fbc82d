//! Balance formatting.

use crate::chain::types::Coin;
use crate::config::schema::CurrencyConfig;

/// Render a base-denomination integer amount with two decimals, rounding half up.
///
/// Returns `None` when `amount` is not a non-negative integer.
pub fn format_amount(amount: &str, decimals: u32) -> Option<String> {
    let raw: u128 = amount.trim().parse().ok()?;

    let cents = if decimals >= 2 {
        let divisor = 10u128.checked_pow(decimals - 2)?;
        let rounding = if (raw % divisor) * 2 >= divisor && divisor > 1 { 1 } else { 0 };
        raw / divisor + rounding
    } else {
        raw.checked_mul(10u128.pow(2 - decimals))?
    };

    Some(format!("{}.{:02}", cents / 100, cents % 100))
}

/// Display the stake balance, e.g. `"1.00 STAKE"`; `"0 STAKE"` when absent.
pub fn format_balance(balance: &[Coin], currency: &CurrencyConfig) -> String {
    balance
        .iter()
        .find(|coin| coin.denom == currency.coin_minimal_denom)
        .and_then(|coin| format_amount(&coin.amount, currency.coin_decimals))
        .map(|amount| format!("{} {}", amount, currency.coin_denom))
        .unwrap_or_else(|| format!("0 {}", currency.coin_denom))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stake() -> CurrencyConfig {
        CurrencyConfig {
            coin_denom: "STAKE".into(),
            coin_minimal_denom: "stake".into(),
            coin_decimals: 6,
        }
    }

    #[test]
    fn test_one_million_base_units() {
        let balance = vec![Coin::new("stake", "1000000")];
        assert_eq!(format_balance(&balance, &stake()), "1.00 STAKE");
    }

    #[test]
    fn test_picks_stake_among_denoms() {
        let balance = vec![Coin::new("token", "500000"), Coin::new("stake", "2500000")];
        assert_eq!(format_balance(&balance, &stake()), "2.50 STAKE");
    }

    #[test]
    fn test_missing_stake() {
        assert_eq!(format_balance(&[], &stake()), "0 STAKE");
        assert_eq!(format_balance(&[Coin::new("token", "1")], &stake()), "0 STAKE");
    }

    #[test]
    fn test_rounding_and_large_amounts() {
        assert_eq!(format_amount("1234567", 6).as_deref(), Some("1.23"));
        assert_eq!(format_amount("1235000", 6).as_deref(), Some("1.24"));
        assert_eq!(format_amount("4999", 6).as_deref(), Some("0.00"));
        assert_eq!(format_amount("5000", 6).as_deref(), Some("0.01"));
        assert_eq!(
            format_amount("123456789012345678901234", 6).as_deref(),
            Some("123456789012345678.90")
        );
    }

    #[test]
    fn test_small_decimals() {
        assert_eq!(format_amount("7", 0).as_deref(), Some("7.00"));
        assert_eq!(format_amount("75", 1).as_deref(), Some("7.50"));
        assert_eq!(format_amount("75", 2).as_deref(), Some("0.75"));
    }

    #[test]
    fn test_non_integer_amount() {
        assert_eq!(format_amount("abc", 6), None);
        assert_eq!(format_amount("-5", 6), None);
        assert_eq!(format_balance(&[Coin::new("stake", "1.5")], &stake()), "0 STAKE");
    }
}
