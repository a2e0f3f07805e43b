//! Stateless helpers shared by the table and the loader

use std::num::ParseFloatError;

/// Returns true if `n` is prime
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor: usize = 2;
    while let Some(square) = divisor.checked_mul(divisor) {
        if square > n {
            break;
        }
        if n.checked_rem(divisor) == Some(0) {
            return false;
        }
        divisor = divisor.saturating_add(1);
    }
    true
}

/// Returns the first prime greater than or equal to `n`
#[must_use]
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(1);
    }
    candidate
}

/// Converts a currency cell such as `"$1,234.50"` into a number.
///
/// Every occurrence of `symbol` and of the `,` thousands separator is stripped before
/// parsing. A blank cell is treated as `0.0`.
///
/// # Errors
///
/// Returns the float parse error if what remains is not a number.
pub fn parse_currency(cell: &str, symbol: char) -> Result<f64, ParseFloatError> {
    let cleaned: String = cell.chars().filter(|&c| c != symbol && c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() { Ok(0.0) } else { cleaned.parse() }
}
