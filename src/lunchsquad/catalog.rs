//! Option sets offered by each restaurant.
//!
//! The catalog is plain data loaded from `config.json` (or the built-in
//! defaults). Each option has a stable `value` code that ends up in stored
//! orders and a `label` used for display. Lookups of unknown codes fall back
//! to the code itself so that records written against an older catalog still
//! render.

use crate::model::Kind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Label for `code` in `choices`, or the code itself when it is unknown.
pub fn label_for<'a>(choices: &'a [Choice], code: &'a str) -> &'a str {
    choices
        .iter()
        .find(|c| c.value == code)
        .map(|c| c.label.as_str())
        .unwrap_or(code)
}

fn choices(pairs: &[(&str, &str)]) -> Vec<Choice> {
    pairs.iter().map(|(v, l)| Choice::new(*v, *l)).collect()
}

/// Codes double as labels for restaurants that never had separate codes.
fn plain(labels: &[&str]) -> Vec<Choice> {
    labels.iter().map(|l| Choice::new(*l, *l)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedCatalog {
    pub label: String,
    pub max_number: u32,
}

impl Default for NumberedCatalog {
    fn default() -> Self {
        Self {
            label: "YamYam".to_string(),
            max_number: 73,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KebabCatalog {
    pub label: String,
    pub venues: Vec<Choice>,
    pub products: Vec<Choice>,
    /// The product code that needs a `boxStyle`.
    pub box_product: String,
    pub box_styles: Vec<Choice>,
    pub sauces: Vec<Choice>,
    pub max_sauces: usize,
    pub modifiers: Vec<Choice>,
    /// Cap on standard modifiers; custom ones are not counted.
    pub max_modifiers: usize,
    pub spice_levels: Vec<Choice>,
}

impl Default for KebabCatalog {
    fn default() -> Self {
        Self {
            label: "Döner".to_string(),
            venues: choices(&[
                ("bruder", "Döner Bruder"),
                ("king", "King Kebabo's"),
                ("aldi", "Aldi Döner"),
            ]),
            products: choices(&[
                ("doner", "Döner"),
                ("durum", "Dürüm"),
                ("falafel-doner", "Falafel-Döner"),
                ("falafel-durum", "Falafel-Dürüm"),
                ("box", "Dönerbox"),
            ]),
            box_product: "box".to_string(),
            box_styles: choices(&[("pommes", "with fries"), ("salat", "with salad")]),
            sauces: choices(&[
                ("knoblauch", "Knoblauch"),
                ("jogurt", "Jogurt"),
                ("cocktail", "Cocktail"),
            ]),
            max_sauces: 2,
            modifiers: choices(&[
                ("ohne-zwiebel", "no onion"),
                ("ohne-tomate", "no tomato"),
                ("ohne-blaukraut", "no red cabbage"),
                ("ohne-salat", "no lettuce"),
                ("ohne-sosse", "no sauce"),
                ("ohne-grillgemuese", "no grilled vegetables"),
                ("ohne-gurke", "no cucumber"),
            ]),
            max_modifiers: 3,
            spice_levels: choices(&[
                ("none", "not spicy"),
                ("normal", "medium"),
                ("extra", "extra spicy"),
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliCategory {
    #[default]
    Standard,
    Salad,
    Bakery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliProduct {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub category: DeliCategory,
    #[serde(default)]
    pub sauce_required: bool,
}

impl DeliProduct {
    pub fn new(value: impl Into<String>, category: DeliCategory) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            category,
            sauce_required: false,
        }
    }

    pub fn with_sauce_required(mut self, required: bool) -> Self {
        self.sauce_required = required;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliCatalog {
    pub label: String,
    pub products: Vec<DeliProduct>,
    pub salads: Vec<Choice>,
    pub sauces: Vec<Choice>,
}

impl DeliCatalog {
    pub fn product(&self, code: &str) -> Option<&DeliProduct> {
        self.products.iter().find(|p| p.value == code)
    }

    /// Unknown products are treated as standard items without a sauce rule.
    pub fn category(&self, code: &str) -> DeliCategory {
        self.product(code).map(|p| p.category).unwrap_or_default()
    }

    pub fn product_label<'a>(&'a self, code: &'a str) -> &'a str {
        self.product(code).map(|p| p.label.as_str()).unwrap_or(code)
    }
}

impl Default for DeliCatalog {
    fn default() -> Self {
        Self {
            label: "Edeka".to_string(),
            products: vec![
                DeliProduct::new("Leberkässemmel", DeliCategory::Standard),
                DeliProduct::new("Bratensemmel", DeliCategory::Standard),
                DeliProduct::new("Schnitzelsemmel", DeliCategory::Standard),
                DeliProduct::new("Salat", DeliCategory::Salad),
                DeliProduct::new("Bäcker", DeliCategory::Bakery),
            ],
            salads: plain(&[
                "Greek Salat",
                "Hühnchen Salat",
                "Vegetarischer Salat",
                "Käse Salat",
                "Asia Salat",
            ]),
            sauces: plain(&["Ketchup", "Mayonnaise", "Senf", "Remoulade", "Curry Sauce"]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Catalog {
    pub numbered: NumberedCatalog,
    pub kebab: KebabCatalog,
    pub deli: DeliCatalog,
}

impl Catalog {
    pub fn restaurant_label(&self, kind: Kind) -> &str {
        match kind {
            Kind::Numbered => &self.numbered.label,
            Kind::Kebab => &self.kebab.label,
            Kind::Deli => &self.deli.label,
        }
    }
}
