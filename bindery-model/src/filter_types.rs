//! Admin-facing filter bands over stock and price.
//!
//! The bands partition their domain with no gaps and no overlap, so a
//! book always lands in exactly one band. The stock band uses a fixed
//! threshold that is deliberately independent of each book's own
//! `min_stock_level`.

use rust_decimal::Decimal;

/// Fixed ceiling for the [`StockBand::Low`] band.
pub const LOW_STOCK_CEILING: u32 = 5;

/// Stock-level band used by the admin book list.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StockBand {
    /// `stock_quantity == 0`
    Out,
    /// `0 < stock_quantity <= 5`
    Low,
    /// `stock_quantity > 5`
    Good,
}

impl StockBand {
    /// Classify a stock quantity into its band.
    pub fn classify(stock_quantity: u32) -> Self {
        if stock_quantity == 0 {
            StockBand::Out
        } else if stock_quantity <= LOW_STOCK_CEILING {
            StockBand::Low
        } else {
            StockBand::Good
        }
    }

    pub fn contains(self, stock_quantity: u32) -> bool {
        Self::classify(stock_quantity) == self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockBand::Out => "out",
            StockBand::Low => "low",
            StockBand::Good => "good",
        }
    }
}

/// Price band used by the admin book list.
///
/// Lower bounds are inclusive, upper bounds exclusive: a book priced
/// exactly 20.00 falls in `From20To50`, not `Under20`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PriceBand {
    Under20,
    From20To50,
    From50To100,
    Over100,
}

impl PriceBand {
    /// Classify a price into its band.
    pub fn classify(price: Decimal) -> Self {
        if price < Decimal::from(20) {
            PriceBand::Under20
        } else if price < Decimal::from(50) {
            PriceBand::From20To50
        } else if price < Decimal::from(100) {
            PriceBand::From50To100
        } else {
            PriceBand::Over100
        }
    }

    pub fn contains(self, price: Decimal) -> bool {
        Self::classify(price) == self
    }

    /// Inclusive lower / exclusive upper bounds for query assembly.
    pub fn bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        match self {
            PriceBand::Under20 => (None, Some(Decimal::from(20))),
            PriceBand::From20To50 => {
                (Some(Decimal::from(20)), Some(Decimal::from(50)))
            }
            PriceBand::From50To100 => {
                (Some(Decimal::from(50)), Some(Decimal::from(100)))
            }
            PriceBand::Over100 => (Some(Decimal::from(100)), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_bands_partition_quantities() {
        assert_eq!(StockBand::classify(0), StockBand::Out);
        assert_eq!(StockBand::classify(1), StockBand::Low);
        assert_eq!(StockBand::classify(3), StockBand::Low);
        assert_eq!(StockBand::classify(5), StockBand::Low);
        assert_eq!(StockBand::classify(6), StockBand::Good);
        assert_eq!(StockBand::classify(10), StockBand::Good);

        // exactly one band claims each quantity
        for qty in 0..20 {
            let claims = [StockBand::Out, StockBand::Low, StockBand::Good]
                .iter()
                .filter(|band| band.contains(qty))
                .count();
            assert_eq!(claims, 1, "quantity {qty} claimed by {claims} bands");
        }
    }

    #[test]
    fn price_band_lower_bounds_are_inclusive() {
        assert_eq!(
            PriceBand::classify(Decimal::new(1999, 2)),
            PriceBand::Under20
        );
        assert_eq!(
            PriceBand::classify(Decimal::from(20)),
            PriceBand::From20To50
        );
        assert_eq!(
            PriceBand::classify(Decimal::new(4999, 2)),
            PriceBand::From20To50
        );
        assert_eq!(
            PriceBand::classify(Decimal::from(50)),
            PriceBand::From50To100
        );
        assert_eq!(
            PriceBand::classify(Decimal::from(100)),
            PriceBand::Over100
        );
    }

    #[test]
    fn price_bands_partition_prices() {
        let bands = [
            PriceBand::Under20,
            PriceBand::From20To50,
            PriceBand::From50To100,
            PriceBand::Over100,
        ];
        for cents in (0..15000).step_by(250) {
            let price = Decimal::new(cents, 2);
            let claims =
                bands.iter().filter(|band| band.contains(price)).count();
            assert_eq!(claims, 1, "price {price} claimed by {claims} bands");
        }
    }

    #[test]
    fn bounds_agree_with_classification() {
        for band in [
            PriceBand::Under20,
            PriceBand::From20To50,
            PriceBand::From50To100,
            PriceBand::Over100,
        ] {
            let (lo, hi) = band.bounds();
            if let Some(lo) = lo {
                assert!(band.contains(lo));
            }
            if let Some(hi) = hi {
                assert!(!band.contains(hi));
            }
        }
    }
}
