//! Menu response structures.
//!
//! The menu endpoint returns the list of every period served at the
//! location that day alongside the categories of the one requested period.

use serde::{Deserialize, Serialize};

/// Marker the API uses for an item with no description
const EMPTY_DESCRIPTION: &str = "~";

/// A meal period (breakfast, lunch, dinner...) at a location on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: String,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub value: Option<String>,
    #[serde(default)]
    pub uom: Option<String>,
}

impl Nutrient {
    pub fn display(&self) -> String {
        match (&self.value, &self.uom) {
            (Some(value), Some(uom)) => format!("{}: {}{}", self.name, value, uom),
            (Some(value), None) => format!("{}: {}", self.name, value),
            _ => format!("{}: -", self.name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub calories: f64,
    #[serde(default)]
    pub portion: String,
}

impl Item {
    /// Description, unless the API sent its empty marker
    pub fn description(&self) -> Option<&str> {
        self.desc
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty() && *d != EMPTY_DESCRIPTION)
    }

    pub fn ingredients(&self) -> Option<&str> {
        self.ingredients.as_deref().map(str::trim).filter(|i| !i.is_empty())
    }

    pub fn calories_display(&self) -> String {
        format!("{} cal", self.calories.round() as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeriodMenu {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Menu {
    pub periods: PeriodMenu,
}

/// Body of `GET /v1/location/{id}/periods/{period}`.
/// A day with no published menu fails to decode here, since `menu.periods`
/// is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuResponse {
    pub periods: Vec<Period>,
    pub menu: Menu,
}

impl MenuResponse {
    /// Period ids in the order the API returned them
    pub fn period_ids(&self) -> Vec<String> {
        self.periods.iter().map(|p| p.id.clone()).collect()
    }

    pub fn into_result(self) -> MenuResult {
        MenuResult {
            categories: self.menu.periods.categories,
            periods: self.periods,
        }
    }
}

/// What a successful menu fetch hands back to the display layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuResult {
    pub categories: Vec<Category>,
    pub periods: Vec<Period>,
}

impl MenuResult {
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

// Helper to deserialize a number that may arrive as a string
fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct NumberVisitor;

    impl<'de> de::Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let v = v.trim();
            if v.is_empty() {
                return Ok(0.0);
            }
            v.parse().map_err(|_| E::custom(format!("invalid number: {v}")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(0.0)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

// Helper to deserialize string or number as Option<String>
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct StringOrNumberVisitor;

    impl<'de> de::Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(v.to_string()))
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}
