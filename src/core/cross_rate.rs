//! Cross-rate derivation through a common reference currency

/// Converts `amount` FROM -> REFERENCE -> TO using rates that are all quoted
/// against the provider's own base currency.
///
/// Divisors are not guarded here; callers check the rates are present and
/// non-zero first.
pub fn triangulate(reference_rate: f64, from_rate: f64, to_rate: f64, amount: f64) -> f64 {
    let from_in_reference = reference_rate * amount / from_rate;
    reference_rate * from_in_reference / to_rate
}

/// A rate usable as a divisor: finite and non-zero.
pub fn usable_rate(rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| r.is_finite() && *r != 0.0)
}
