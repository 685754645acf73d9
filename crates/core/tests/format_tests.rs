// ═══════════════════════════════════════════════════════════════════
// Formatter Tests — format_price, format_quantity, format_percent
// ═══════════════════════════════════════════════════════════════════

use coinledger_core::format::{format_percent, format_price, format_quantity};

// ═══════════════════════════════════════════════════════════════════
// format_price
// ═══════════════════════════════════════════════════════════════════

mod price {
    use super::*;

    #[test]
    fn sub_unit_price_keeps_four_decimals() {
        assert_eq!(format_price(0.0001234), "0.0001");
    }

    #[test]
    fn above_one_always_two_decimals() {
        assert_eq!(format_price(1234.5), "1,234.50");
    }

    #[test]
    fn integral_value_gets_two_zero_decimals() {
        assert_eq!(format_price(123.0), "123.00");
        assert_eq!(format_price(0.0), "0.00");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_price(1_000_000.0), "1,000,000.00");
        assert_eq!(format_price(999999.99), "999,999.99");
    }

    #[test]
    fn sub_unit_trims_trailing_zeros() {
        assert_eq!(format_price(0.5), "0.5");
        assert_eq!(format_price(0.25), "0.25");
    }

    #[test]
    fn sub_unit_keeps_at_least_one_digit() {
        // All four visible decimals are zero → collapse to a single "0"
        assert_eq!(format_price(0.00001), "0.0");
    }

    #[test]
    fn decimals_are_truncated_not_rounded() {
        assert_eq!(format_price(1.999), "1.99");
        assert_eq!(format_price(42.429), "42.42");
    }

    #[test]
    fn negative_values() {
        assert_eq!(format_price(-1234.5), "-1,234.50");
        assert_eq!(format_price(-0.0001234), "-0.0001");
    }

    #[test]
    fn reformat_is_stable() {
        // Formatting a value whose rendering is already minimal changes nothing
        for value in [0.5, 0.0001, 123.45, 7.0] {
            let first = format_price(value);
            let reparsed: f64 = first.replace(',', "").parse().unwrap();
            assert_eq!(format_price(reparsed), first);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// format_quantity
// ═══════════════════════════════════════════════════════════════════

mod quantity {
    use super::*;

    #[test]
    fn transaction_level_caps_at_eight_decimals() {
        assert_eq!(format_quantity(0.123456789, true), "0.12345678");
    }

    #[test]
    fn holding_level_caps_at_four_decimals() {
        assert_eq!(format_quantity(0.123456789, false), "0.1234");
    }

    #[test]
    fn integral_value_gets_one_zero_decimal() {
        assert_eq!(format_quantity(2.0, true), "2.0");
        assert_eq!(format_quantity(0.0, false), "0.0");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_quantity(1234.5, false), "1,234.5");
        assert_eq!(format_quantity(12345.678901234, true), "12,345.67890123");
    }

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(format_quantity(1.5, true), "1.5");
        assert_eq!(format_quantity(0.10000001, false), "0.1");
    }

    #[test]
    fn negative_values() {
        assert_eq!(format_quantity(-3.25, false), "-3.25");
    }
}

// ═══════════════════════════════════════════════════════════════════
// format_percent
// ═══════════════════════════════════════════════════════════════════

mod percent {
    use super::*;

    #[test]
    fn fixed_two_decimals() {
        assert_eq!(format_percent(33.333333), "33.33%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn negative_values() {
        assert_eq!(format_percent(-5.0), "-5.00%");
    }
}
