//! Discount percentage labels for promotional prices.

/// Sale tag for products without a running promotion.
pub const NO_DISCOUNT: &str = "discount 0%";

/// Formats the discount from `original` down to `current` as
/// `"discount N%"`.
///
/// Returns [`NO_DISCOUNT`] when either price is missing, when `current` is
/// not below `original`, or when `original` is not positive. The percentage
/// is rounded half-to-even, so 12.5 % becomes 12 % and 37.5 % becomes 38 %.
#[must_use]
pub fn compute_discount(original: Option<f64>, current: Option<f64>) -> String {
    let (Some(original), Some(current)) = (original, current) else {
        return NO_DISCOUNT.to_string();
    };
    if original <= current || original <= 0.0 {
        return NO_DISCOUNT.to_string();
    }

    let percent = ((original - current) / original * 100.0).round_ties_even();
    // Bounded to (0, 100] for non-negative prices.
    #[allow(clippy::cast_possible_truncation)]
    let percent = percent as i64;
    format!("discount {percent}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_percent_off() {
        assert_eq!(compute_discount(Some(100.0), Some(80.0)), "discount 20%");
    }

    #[test]
    fn equal_prices_have_no_discount() {
        assert_eq!(compute_discount(Some(100.0), Some(100.0)), NO_DISCOUNT);
    }

    #[test]
    fn price_increase_has_no_discount() {
        assert_eq!(compute_discount(Some(100.0), Some(120.0)), NO_DISCOUNT);
    }

    #[test]
    fn missing_original_has_no_discount() {
        assert_eq!(compute_discount(None, Some(80.0)), NO_DISCOUNT);
    }

    #[test]
    fn missing_current_has_no_discount() {
        assert_eq!(compute_discount(Some(100.0), None), NO_DISCOUNT);
    }

    #[test]
    fn one_third_off_rounds_down() {
        assert_eq!(compute_discount(Some(150.0), Some(100.0)), "discount 33%");
    }

    #[test]
    fn two_thirds_off_rounds_up() {
        assert_eq!(compute_discount(Some(150.0), Some(50.0)), "discount 67%");
    }

    #[test]
    fn halfway_rounds_to_even() {
        // 12.5% and 37.5%, both exact in binary.
        assert_eq!(compute_discount(Some(200.0), Some(175.0)), "discount 12%");
        assert_eq!(compute_discount(Some(200.0), Some(125.0)), "discount 38%");
    }

    #[test]
    fn free_item_is_full_discount() {
        assert_eq!(compute_discount(Some(99.0), Some(0.0)), "discount 100%");
    }

    #[test]
    fn non_positive_original_has_no_discount() {
        assert_eq!(compute_discount(Some(-10.0), Some(-20.0)), NO_DISCOUNT);
    }
}
