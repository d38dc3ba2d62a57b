//! Rupee amounts: compact display units and 2-dp rounding.

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;
const THOUSAND: f64 = 1_000.0;

/// Format a rupee amount in the compact Indian style used across the wizard:
/// `₹1.25Cr`, `₹4.5L`, `₹12.0K`, `₹950`.
pub fn format_inr(amount: f64) -> String {
    if amount >= CRORE {
        format!("₹{:.2}Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("₹{:.1}L", amount / LAKH)
    } else if amount >= THOUSAND {
        format!("₹{:.1}K", amount / THOUSAND)
    } else {
        format!("₹{:.0}", amount)
    }
}

/// Round to paise.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
