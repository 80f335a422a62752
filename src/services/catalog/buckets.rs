//! Stock and price buckets used by the admin article listing.

use crate::entities::catalog::article;
use rust_decimal::Decimal;
use sea_orm::{sea_query::SimpleExpr, ColumnTrait};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

const LOW_STOCK_BELOW: i32 = 10;
const HIGH_STOCK_ABOVE: i32 = 50;
const CHEAP_BELOW: i64 = 50;
const PREMIUM_ABOVE: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Empty,
    Low,
    Medium,
    High,
}

impl StockLevel {
    const ALL: [StockLevel; 4] = [Self::Empty, Self::Low, Self::Medium, Self::High];

    pub fn classify(stock: i32) -> Self {
        match stock {
            s if s <= 0 => Self::Empty,
            s if s < LOW_STOCK_BELOW => Self::Low,
            s if s <= HIGH_STOCK_ABOVE => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Store predicate selecting the articles in this bucket.
    pub fn condition(&self) -> SimpleExpr {
        let stock = article::Column::Stock;
        match self {
            Self::Empty => stock.eq(0),
            Self::Low => stock.gt(0).and(stock.lt(LOW_STOCK_BELOW)),
            Self::Medium => stock.between(LOW_STOCK_BELOW, HIGH_STOCK_ABOVE),
            Self::High => stock.gt(HIGH_STOCK_ABOVE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Low,
    Medium,
    High,
}

impl PriceRange {
    const ALL: [PriceRange; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn classify(price: Decimal) -> Self {
        if price < Decimal::from(CHEAP_BELOW) {
            Self::Low
        } else if price <= Decimal::from(PREMIUM_ABOVE) {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn condition(&self) -> SimpleExpr {
        let price = article::Column::Price;
        match self {
            Self::Low => price.lt(Decimal::from(CHEAP_BELOW)),
            Self::Medium => price.between(Decimal::from(CHEAP_BELOW), Decimal::from(PREMIUM_ABOVE)),
            Self::High => price.gt(Decimal::from(PREMIUM_ABOVE)),
        }
    }
}

fn invalid_choice(value: &str) -> String {
    format!(
        "Select a valid choice. {} is not one of the available choices.",
        value
    )
}

impl FromStr for StockLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| invalid_choice(s))
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| invalid_choice(s))
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(0, StockLevel::Empty)]
    #[case(1, StockLevel::Low)]
    #[case(9, StockLevel::Low)]
    #[case(10, StockLevel::Medium)]
    #[case(50, StockLevel::Medium)]
    #[case(51, StockLevel::High)]
    fn stock_boundaries(#[case] stock: i32, #[case] expected: StockLevel) {
        assert_eq!(StockLevel::classify(stock), expected);
    }

    #[rstest]
    #[case(dec!(0), PriceRange::Low)]
    #[case(dec!(49.99), PriceRange::Low)]
    #[case(dec!(50), PriceRange::Medium)]
    #[case(dec!(200.00), PriceRange::Medium)]
    #[case(dec!(200.01), PriceRange::High)]
    fn price_boundaries(#[case] price: Decimal, #[case] expected: PriceRange) {
        assert_eq!(PriceRange::classify(price), expected);
    }

    #[test]
    fn parses_query_values() {
        assert_eq!("medium".parse::<StockLevel>(), Ok(StockLevel::Medium));
        assert_eq!("high".parse::<PriceRange>(), Ok(PriceRange::High));
        let err = "huge".parse::<StockLevel>().unwrap_err();
        assert!(err.contains("huge is not one of the available choices"));
    }

    proptest! {
        #[test]
        fn stock_classification_is_monotone(a in 0i32..10_000, b in 0i32..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(StockLevel::classify(lo) <= StockLevel::classify(hi));
        }

        #[test]
        fn price_classification_is_monotone(a in 0i64..10_000_000, b in 0i64..10_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (lo, hi) = (Decimal::new(lo, 2), Decimal::new(hi, 2));
            prop_assert!(PriceRange::classify(lo) <= PriceRange::classify(hi));
        }
    }
}
