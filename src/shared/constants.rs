/// Lowest accepted doctor price
pub const MIN_PRICE: i64 = 0;

/// Highest accepted doctor price
pub const MAX_PRICE: i64 = 100_000;
