use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "navigation_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub label: String,
    /// Absolute URL or site-relative path.
    pub url: String,
    pub location: LinkLocation,
    pub sort_order: i32,
    pub open_in_new_tab: bool,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Where a navigation link is rendered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum LinkLocation {
    #[default]
    #[serde(rename = "header")]
    #[sea_orm(string_value = "header")]
    Header,
    #[serde(rename = "footer_col1")]
    #[sea_orm(string_value = "footer_col1")]
    FooterCol1,
    #[serde(rename = "footer_col2")]
    #[sea_orm(string_value = "footer_col2")]
    FooterCol2,
}

impl LinkLocation {
    pub const ALL: [LinkLocation; 3] = [Self::Header, Self::FooterCol1, Self::FooterCol2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::FooterCol1 => "footer_col1",
            Self::FooterCol2 => "footer_col2",
        }
    }

    /// Human-readable label shown in the admin.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Header => "Cabecera",
            Self::FooterCol1 => "Pie de Página - Columna 1",
            Self::FooterCol2 => "Pie de Página - Columna 2",
        }
    }
}

impl fmt::Display for LinkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|location| location.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    s.trim()
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_round_trips_through_wire_names() {
        for location in LinkLocation::ALL {
            assert_eq!(location.as_str().parse::<LinkLocation>(), Ok(location));
            let json = serde_json::to_string(&location).unwrap();
            assert_eq!(json, format!("\"{}\"", location.as_str()));
        }
    }

    #[test]
    fn unknown_location_is_rejected() {
        assert!("sidebar".parse::<LinkLocation>().is_err());
    }

    #[test]
    fn header_is_default_and_sorts_first() {
        assert_eq!(LinkLocation::default(), LinkLocation::Header);
        assert!(LinkLocation::Header < LinkLocation::FooterCol1);
    }
}
