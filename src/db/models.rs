use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed non-fund holding categories, one value each per day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetCategory {
    PreciousMetals,
    Crypto,
    PhysicalGold,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 3] = [
        AssetCategory::PreciousMetals,
        AssetCategory::Crypto,
        AssetCategory::PhysicalGold,
    ];

    /// Stable identifier, also used as the asset matrix column id
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::PreciousMetals => "precious_metals",
            AssetCategory::Crypto => "crypto",
            AssetCategory::PhysicalGold => "physical_gold",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::PreciousMetals => "Precious Metals",
            AssetCategory::Crypto => "Crypto",
            AssetCategory::PhysicalGold => "Physical Gold",
        }
    }
}

impl FromStr for AssetCategory {
    type Err = ();

    /// Accepts identifiers and header labels: "precious_metals",
    /// "Precious Metals", "crypto_tl", "PHYSICAL-GOLD"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-'], "_");
        let normalized = normalized.strip_suffix("_tl").unwrap_or(&normalized);

        match normalized {
            "precious_metals" | "metals" => Ok(AssetCategory::PreciousMetals),
            "crypto" => Ok(AssetCategory::Crypto),
            "physical_gold" | "gold" => Ok(AssetCategory::PhysicalGold),
            _ => Err(()),
        }
    }
}

/// Daily value of a single fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub fund_code: String,
    pub fund_name: String,
    pub value: Decimal,
}

/// Daily values of the fixed asset categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub precious_metals: Decimal,
    pub crypto: Decimal,
    pub physical_gold: Decimal,
}

impl AssetRecord {
    pub fn value_of(&self, category: AssetCategory) -> Decimal {
        match category {
            AssetCategory::PreciousMetals => self.precious_metals,
            AssetCategory::Crypto => self.crypto,
            AssetCategory::PhysicalGold => self.physical_gold,
        }
    }
}

/// Outcome of an insert against a uniqueness-constrained table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    /// Rejected by the unique key; the stored row is untouched
    Duplicate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_category_parses_header_variants() {
        assert_eq!(
            "Precious Metals".parse::<AssetCategory>(),
            Ok(AssetCategory::PreciousMetals)
        );
        assert_eq!("crypto_tl".parse::<AssetCategory>(), Ok(AssetCategory::Crypto));
        assert_eq!(
            "PHYSICAL-GOLD".parse::<AssetCategory>(),
            Ok(AssetCategory::PhysicalGold)
        );
        assert!("stocks".parse::<AssetCategory>().is_err());
    }

    #[test]
    fn test_asset_category_round_trips_identifier() {
        for category in AssetCategory::ALL {
            assert_eq!(category.as_str().parse::<AssetCategory>(), Ok(category));
        }
    }
}
