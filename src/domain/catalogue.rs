use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// Catalogue - the price list orders are placed against
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOption {
    pub name: String,
    pub price_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueItem {
    /// Position on the printed price list, referenced by `N:amount`.
    pub menu_number: u32,
    pub name: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub unit_price_cents: u64,
    /// Selectable options, addressed by 1-based position.
    #[serde(default)]
    pub options: Vec<ItemOption>,
}

impl CatalogueItem {
    pub fn option(&self, position: u32) -> Option<&ItemOption> {
        let idx = usize::try_from(position).ok()?.checked_sub(1)?;
        self.options.get(idx)
    }
}

fn default_unit() -> String {
    "unit".to_string()
}

fn default_currency() -> String {
    "R".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    pub id: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub items: Vec<CatalogueItem>,
}

impl Catalogue {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn item(&self, menu_number: u32) -> Option<&CatalogueItem> {
        self.items.iter().find(|i| i.menu_number == menu_number)
    }

    pub fn format_price(&self, cents: u64) -> String {
        format!("{}{}.{:02}", self.currency, cents / 100, cents % 100)
    }

    /// Render the price list as chat text, items ordered by menu number.
    pub fn render_price_list(&self) -> String {
        let mut items: Vec<&CatalogueItem> = self.items.iter().collect();
        items.sort_by_key(|i| i.menu_number);

        let mut out = String::from("Price list:\n");
        for item in items {
            if item.options.is_empty() {
                let _ = writeln!(
                    out,
                    "{}. {} - {} per {}",
                    item.menu_number,
                    item.name,
                    self.format_price(item.unit_price_cents),
                    item.unit
                );
            } else {
                let _ = writeln!(out, "{}. {} ({} options)", item.menu_number, item.name, item.unit);
                for (pos, option) in item.options.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "    {}. {} - {}",
                        pos + 1,
                        option.name,
                        self.format_price(option.price_cents)
                    );
                }
            }
        }
        out.trim_end().to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_catalogue() -> Catalogue {
        Catalogue::from_json(
            r#"{
                "id": 1,
                "items": [
                    { "menu_number": 9, "name": "Peanut butter breath", "unit": "gram", "unit_price_cents": 12000 },
                    { "menu_number": 6, "name": "Strawberry cheesecake", "unit": "gram", "unit_price_cents": 10000 },
                    { "menu_number": 10, "name": "Cannisters", "unit": "cannister", "options": [
                        { "name": "Blue dream", "price_cents": 35000 },
                        { "name": "Slurricane", "price_cents": 40000 },
                        { "name": "GMO", "price_cents": 38000 }
                    ] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_option_lookup_is_one_based() {
        let catalogue = sample_catalogue();
        let cannisters = catalogue.item(10).unwrap();

        assert_eq!(cannisters.option(1).unwrap().name, "Blue dream");
        assert_eq!(cannisters.option(3).unwrap().name, "GMO");
        assert!(cannisters.option(0).is_none());
        assert!(cannisters.option(4).is_none());
    }

    #[test]
    fn test_render_price_list_sorted_by_menu_number() {
        let text = sample_catalogue().render_price_list();
        let six = text.find("6. Strawberry").unwrap();
        let nine = text.find("9. Peanut").unwrap();
        let ten = text.find("10. Cannisters").unwrap();

        assert!(six < nine && nine < ten);
        assert!(text.contains("9. Peanut butter breath - R120.00 per gram"));
        assert!(text.contains("    2. Slurricane - R400.00"));
    }

    #[test]
    fn test_default_currency_and_unit() {
        let catalogue = Catalogue::from_json(r#"{"id": 2, "items": [{"menu_number": 1, "name": "Tea"}]}"#).unwrap();
        assert_eq!(catalogue.currency, "R");
        assert_eq!(catalogue.items[0].unit, "unit");
        assert_eq!(catalogue.format_price(1505), "R15.05");
    }
}
