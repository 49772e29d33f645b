//! Price-list item pricing: cost, sale price, margin and retail price.
//!
//! A price-list item keeps four related numbers in sync:
//!
//! - `margin  = (sale - cost) / sale * 100` (margin on sale, 0 when sale is 0)
//! - `retail  = sale * (1 + tax / 100)` (tax-inclusive price, PVP)
//! - `sale    = retail / (1 + tax / 100)`
//! - `sale    = cost / (1 - margin / 100)` for margin < 100
//!
//! Writers send the cost, the tax rate and exactly one *driver*; the other
//! two values are derived here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{round_cents, to_decimal, to_f64};
use crate::validation::{require_bounded, validate_non_negative, validate_percentage};

/// Margins at or above this value cannot be reached from a finite cost.
pub const MAX_MARGIN_PERCENT: f64 = 100.0;

/// The value the user edited; the other two are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "driver", content = "value", rename_all = "snake_case")]
pub enum PriceDriver {
    /// Net sale price (tax excluded).
    Sale(f64),
    /// Margin on sale, in percent.
    Margin(f64),
    /// Tax-inclusive retail price.
    Retail(f64),
}

/// Fully resolved item prices, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemPrices {
    pub cost_price: f64,
    pub sale_price: f64,
    pub margin_percent: f64,
    pub tax_rate: f64,
    pub retail_price: f64,
}

// ---------------------------------------------------------------------------
// Primitive derivations
// ---------------------------------------------------------------------------

fn tax_factor(tax_rate: Decimal) -> Decimal {
    Decimal::ONE + tax_rate / Decimal::ONE_HUNDRED
}

/// Margin on sale in percent. A zero sale price yields a zero margin.
pub fn margin_percent(cost: Decimal, sale: Decimal) -> Decimal {
    if sale.is_zero() {
        return Decimal::ZERO;
    }
    (sale - cost) / sale * Decimal::ONE_HUNDRED
}

/// Tax-inclusive price from a net sale price.
pub fn retail_from_sale(sale: Decimal, tax_rate: Decimal) -> Decimal {
    sale * tax_factor(tax_rate)
}

/// Net sale price from a tax-inclusive price.
pub fn sale_from_retail(retail: Decimal, tax_rate: Decimal) -> Decimal {
    // tax_rate is validated to [0, 100], so the factor is >= 1.
    retail / tax_factor(tax_rate)
}

/// Net sale price that yields `margin` percent on sale over `cost`.
pub fn sale_from_margin(cost: Decimal, margin: Decimal) -> Result<Decimal, String> {
    let divisor = Decimal::ONE - margin / Decimal::ONE_HUNDRED;
    if divisor <= Decimal::ZERO {
        return Err(format!(
            "Margin must be below {MAX_MARGIN_PERCENT}%, got {margin}%"
        ));
    }
    Ok(cost / divisor)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve all item prices from the cost, the tax rate and one driver.
pub fn resolve_prices(cost: f64, tax_rate: f64, driver: PriceDriver) -> Result<ItemPrices, String> {
    validate_non_negative("cost_price", cost)?;
    validate_percentage("tax_rate", tax_rate)?;

    let cost_d = round_cents(to_decimal(cost));
    let tax_d = to_decimal(tax_rate);

    let (sale, retail) = match driver {
        PriceDriver::Sale(sale) => {
            validate_non_negative("sale_price", sale)?;
            let sale = round_cents(to_decimal(sale));
            (sale, round_cents(retail_from_sale(sale, tax_d)))
        }
        PriceDriver::Retail(retail) => {
            validate_non_negative("retail_price", retail)?;
            let retail = round_cents(to_decimal(retail));
            (round_cents(sale_from_retail(retail, tax_d)), retail)
        }
        PriceDriver::Margin(margin) => {
            require_bounded("margin_percent", margin)?;
            let sale = round_cents(sale_from_margin(cost_d, to_decimal(margin))?);
            (sale, round_cents(retail_from_sale(sale, tax_d)))
        }
    };

    require_bounded("sale_price", to_f64(sale))?;
    require_bounded("retail_price", to_f64(retail))?;

    Ok(ItemPrices {
        cost_price: to_f64(cost_d),
        sale_price: to_f64(sale),
        margin_percent: to_f64(margin_percent(cost_d, sale)),
        tax_rate: to_f64(tax_d),
        retail_price: to_f64(retail),
    })
}

/// Raise (or lower, with a negative percent) the sale price of an item,
/// recomputing margin and retail price. The result is floored at zero.
pub fn reprice(current: &ItemPrices, percent: f64) -> Result<ItemPrices, String> {
    require_bounded("percent", percent)?;
    if percent <= -100.0 {
        return Err(format!("Repricing percent must be above -100, got {percent}"));
    }
    let factor = Decimal::ONE + to_decimal(percent) / Decimal::ONE_HUNDRED;
    let sale = to_decimal(current.sale_price)
        .checked_mul(factor)
        .ok_or_else(|| format!("Repricing by {percent}% is out of range"))?
        .max(Decimal::ZERO);
    resolve_prices(
        current.cost_price,
        current.tax_rate,
        PriceDriver::Sale(to_f64(sale)),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_driver_derives_margin_and_retail() {
        let p = resolve_prices(6.0, 10.0, PriceDriver::Sale(10.0)).unwrap();
        assert_eq!(p.sale_price, 10.0);
        assert_eq!(p.margin_percent, 40.0);
        assert_eq!(p.retail_price, 11.0);
    }

    #[test]
    fn retail_driver_strips_tax() {
        let p = resolve_prices(50.0, 21.0, PriceDriver::Retail(121.0)).unwrap();
        assert_eq!(p.sale_price, 100.0);
        assert_eq!(p.margin_percent, 50.0);
        assert_eq!(p.retail_price, 121.0);
    }

    #[test]
    fn margin_driver_marks_up_cost() {
        let p = resolve_prices(75.0, 0.0, PriceDriver::Margin(25.0)).unwrap();
        assert_eq!(p.sale_price, 100.0);
        assert_eq!(p.margin_percent, 25.0);
        assert_eq!(p.retail_price, 100.0);
    }

    #[test]
    fn zero_sale_price_gives_zero_margin() {
        let p = resolve_prices(5.0, 21.0, PriceDriver::Sale(0.0)).unwrap();
        assert_eq!(p.margin_percent, 0.0);
        assert_eq!(p.retail_price, 0.0);
    }

    #[test]
    fn full_margin_is_rejected() {
        let err = resolve_prices(5.0, 21.0, PriceDriver::Margin(100.0)).unwrap_err();
        assert!(err.contains("below 100"));
        assert!(resolve_prices(5.0, 21.0, PriceDriver::Margin(150.0)).is_err());
    }

    #[test]
    fn sale_below_cost_yields_negative_margin() {
        let p = resolve_prices(12.0, 0.0, PriceDriver::Sale(10.0)).unwrap();
        assert_eq!(p.margin_percent, -20.0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(resolve_prices(-1.0, 21.0, PriceDriver::Sale(1.0)).is_err());
        assert!(resolve_prices(1.0, 121.0, PriceDriver::Sale(1.0)).is_err());
        assert!(resolve_prices(1.0, 21.0, PriceDriver::Retail(f64::INFINITY)).is_err());
    }

    #[test]
    fn reprice_raises_sale_and_keeps_relations() {
        let p = resolve_prices(6.0, 10.0, PriceDriver::Sale(10.0)).unwrap();
        let r = reprice(&p, 10.0).unwrap();
        assert_eq!(r.sale_price, 11.0);
        assert_eq!(r.retail_price, 12.1);
        assert_eq!(r.cost_price, 6.0);
    }

    #[test]
    fn reprice_rejects_minus_hundred() {
        let p = resolve_prices(6.0, 10.0, PriceDriver::Sale(10.0)).unwrap();
        assert!(reprice(&p, -100.0).is_err());
    }

    #[test]
    fn driver_deserializes_from_tagged_json() {
        let d: PriceDriver =
            serde_json::from_str(r#"{"driver":"margin","value":30}"#).unwrap();
        assert_eq!(d, PriceDriver::Margin(30.0));
    }

    #[test]
    fn oversized_cost_is_rejected() {
        let err = resolve_prices(1e29, 21.0, PriceDriver::Sale(5.0)).unwrap_err();
        assert!(err.starts_with("cost_price"));
        assert!(resolve_prices(5.0, 21.0, PriceDriver::Retail(1e30)).is_err());
    }

    #[test]
    fn derived_sale_price_must_stay_in_range() {
        // A margin this close to 100% multiplies the cost past the bound.
        let err = resolve_prices(1e9, 0.0, PriceDriver::Margin(99.9999)).unwrap_err();
        assert!(err.starts_with("sale_price"));
    }

    #[test]
    fn reprice_rejects_runaway_percent() {
        let p = resolve_prices(60.0, 21.0, PriceDriver::Sale(100.0)).unwrap();
        assert!(reprice(&p, 1e13).is_err());
    }
}
