/// Amount selection and swap quoting
use rand::Rng;

/// Decimal places of every amount sent to the platform
pub const AMOUNT_DECIMALS: usize = 8;

/// Uniform amount in `[min, max)`; `min` when the range is empty
pub fn random_amount<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Destination amount priced through both tokens' catalog prices
///
/// A non-positive destination price is treated as 1.
pub fn compute_to_amount(from_amount: f64, from_price: f64, to_price: f64) -> f64 {
    let divisor = if to_price > 0.0 { to_price } else { 1.0 };
    from_amount * from_price / divisor
}

/// Fixed 8-decimal string, the wire format for amounts
pub fn format_amount(amount: f64) -> String {
    format!("{:.*}", AMOUNT_DECIMALS, amount)
}
