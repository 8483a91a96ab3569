//! Rounding and comparison helpers shared by the tax policies.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to whole cents, with midpoints going away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxtrack_core::calculations::common::round_cents;
///
/// assert_eq!(round_cents(dec!(1744.994)), dec!(1744.99));
/// assert_eq!(round_cents(dec!(1744.995)), dec!(1745.00));
/// ```
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `value`, or zero when it is negative.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
