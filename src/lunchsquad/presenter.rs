//! Display projection of stored orders.
//!
//! Turns raw [`Order`]s into [`DisplayRow`]s with human labels. Rows remember
//! the position of their order in the store, so a filtered or sorted listing
//! can still be used to address records for removal.

use crate::catalog::{label_for, Catalog, DeliCategory};
use crate::model::{DeliMeal, KebabMeal, Kind, Meal, Modifier, Order};
use chrono::Local;
use std::cmp::Ordering;
use std::str::FromStr;

/// Shown in place of an empty list or missing value.
pub const NONE_LABEL: &str = "none";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// 0-based index of the order in the store.
    pub position: usize,
    pub kind: Kind,
    pub timestamp: String,
    pub submitter: String,
    pub restaurant: String,
    pub summary: String,
    pub detail: String,
}

/// Row order of a projection. Rows keep store order unless a key is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Input,
    Timestamp,
    Submitter,
    Restaurant,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "input" | "none" => Ok(SortKey::Input),
            "time" | "timestamp" => Ok(SortKey::Timestamp),
            "name" | "submitter" => Ok(SortKey::Submitter),
            "restaurant" => Ok(SortKey::Restaurant),
            _ => Err(format!("Unknown sort key: {} (expected input, time, name or restaurant)", s)),
        }
    }
}

/// Selects which orders appear in a projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub kind: Option<Kind>,
    /// Case-insensitive substring of the submitter.
    pub submitter: Option<String>,
}

impl OrderFilter {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.submitter.is_none()
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(kind) = self.kind {
            if order.kind() != kind {
                return false;
            }
        }
        match &self.submitter {
            Some(needle) => order
                .submitter
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            None => true,
        }
    }
}

/// The three labelled parts of a kebab order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KebabParts {
    pub sauces: String,
    pub extras: String,
    pub spice: String,
}

fn join_or_none(items: Vec<String>) -> String {
    if items.is_empty() {
        NONE_LABEL.to_string()
    } else {
        items.join(", ")
    }
}

pub fn kebab_parts(meal: &KebabMeal, catalog: &Catalog) -> KebabParts {
    let rules = &catalog.kebab;
    let sauces = meal
        .sauces
        .iter()
        .map(|s| label_for(&rules.sauces, s).to_string())
        .collect();
    let extras = meal
        .modifiers
        .iter()
        .map(|m| match m {
            Modifier::Standard(code) => label_for(&rules.modifiers, code).to_string(),
            Modifier::Custom(text) => text.clone(),
        })
        .collect();
    let spice = if meal.spice_level.trim().is_empty() {
        NONE_LABEL.to_string()
    } else {
        label_for(&rules.spice_levels, &meal.spice_level).to_string()
    };
    KebabParts {
        sauces: join_or_none(sauces),
        extras: join_or_none(extras),
        spice,
    }
}

pub fn kebab_summary(meal: &KebabMeal, catalog: &Catalog) -> String {
    let rules = &catalog.kebab;
    let product = label_for(&rules.products, &meal.product);
    let venue = label_for(&rules.venues, &meal.venue);
    match meal.box_style.as_deref() {
        Some(style) if meal.product == rules.box_product => format!(
            "{} ({}) ({})",
            product,
            label_for(&rules.box_styles, style),
            venue
        ),
        _ => format!("{} ({})", product, venue),
    }
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn deli_summary_detail(meal: &DeliMeal, catalog: &Catalog) -> (String, String) {
    let deli = &catalog.deli;
    let product = deli.product_label(&meal.product).to_string();
    match deli.category(&meal.product) {
        DeliCategory::Salad => {
            let summary = match non_blank(&meal.salad_choice) {
                Some(choice) => label_for(&deli.salads, choice).to_string(),
                None => product,
            };
            (summary, non_blank(&meal.note).unwrap_or_default().to_string())
        }
        DeliCategory::Bakery => (
            product,
            non_blank(&meal.bakery_free_text)
                .unwrap_or_default()
                .to_string(),
        ),
        DeliCategory::Standard => {
            let sauce = non_blank(&meal.sauce)
                .map(|s| label_for(&deli.sauces, s))
                .unwrap_or(NONE_LABEL);
            let detail = match non_blank(&meal.note) {
                Some(note) => format!("Sauce: {}; Note: {}", sauce, note),
                None => format!("Sauce: {}", sauce),
            };
            (product, detail)
        }
    }
}

/// Summary and detail text for one meal.
pub fn describe(meal: &Meal, catalog: &Catalog) -> (String, String) {
    match meal {
        Meal::Numbered(m) => (format!("No. {}", m.item_number), String::new()),
        Meal::Kebab(m) => {
            let parts = kebab_parts(m, catalog);
            (
                kebab_summary(m, catalog),
                format!(
                    "Sauces: {}, Extras: {}, Spice: {}",
                    parts.sauces, parts.extras, parts.spice
                ),
            )
        }
        Meal::Deli(m) => deli_summary_detail(m, catalog),
    }
}

pub fn row(position: usize, order: &Order, catalog: &Catalog) -> DisplayRow {
    let (summary, detail) = describe(&order.meal, catalog);
    DisplayRow {
        position,
        kind: order.kind(),
        timestamp: order
            .created_at
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        submitter: order.submitter.clone(),
        restaurant: catalog.restaurant_label(order.kind()).to_string(),
        summary,
        detail,
    }
}

fn compare(a: &Order, b: &Order, sort: SortKey, catalog: &Catalog) -> Ordering {
    match sort {
        SortKey::Input => Ordering::Equal,
        SortKey::Timestamp => a.created_at.cmp(&b.created_at),
        SortKey::Submitter => a.submitter.to_lowercase().cmp(&b.submitter.to_lowercase()),
        SortKey::Restaurant => catalog
            .restaurant_label(a.kind())
            .cmp(catalog.restaurant_label(b.kind())),
    }
}

/// Project every order, sorted by `sort`. Equal keys keep store order.
pub fn project(orders: &[Order], catalog: &Catalog, sort: SortKey) -> Vec<DisplayRow> {
    project_filtered(orders, catalog, sort, &OrderFilter::default())
}

pub fn project_filtered(
    orders: &[Order],
    catalog: &Catalog,
    sort: SortKey,
    filter: &OrderFilter,
) -> Vec<DisplayRow> {
    let mut selected: Vec<(usize, &Order)> = orders
        .iter()
        .enumerate()
        .filter(|(_, o)| filter.matches(o))
        .collect();
    if sort != SortKey::Input {
        // sort_by is stable
        selected.sort_by(|(_, a), (_, b)| compare(a, b, sort, catalog));
    }
    selected
        .into_iter()
        .map(|(i, o)| row(i, o, catalog))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumberedMeal, Order};
    use chrono::{TimeZone, Utc};

    fn at(min: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 11, min, 0).unwrap()
    }

    fn numbered(name: &str, min: u32, n: u32) -> Order {
        Order::new(name, at(min), Meal::Numbered(NumberedMeal { item_number: n }))
    }

    fn kebab(name: &str, min: u32, meal: KebabMeal) -> Order {
        Order::new(name, at(min), Meal::Kebab(meal))
    }

    fn deli(name: &str, min: u32, meal: DeliMeal) -> Order {
        Order::new(name, at(min), Meal::Deli(meal))
    }

    #[test]
    fn test_numbered_row() {
        let cat = Catalog::default();
        let r = row(3, &numbered("Anna", 5, 42), &cat);
        assert_eq!(r.position, 3);
        assert_eq!(r.summary, "No. 42");
        assert_eq!(r.detail, "");
        assert_eq!(r.restaurant, "YamYam");
        assert_eq!(
            r.timestamp,
            at(5).with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
        );
    }

    #[test]
    fn test_kebab_row_with_box_and_custom_extras() {
        let cat = Catalog::default();
        let meal = KebabMeal::new("bruder", "box")
            .with_box_style("pommes")
            .with_sauces(["knoblauch"])
            .with_modifiers(vec![Modifier::standard("ohne-zwiebel"), Modifier::custom("extra Käse")])
            .with_spice_level("extra");
        let r = row(0, &kebab("Ümit", 0, meal), &cat);
        assert_eq!(r.summary, "Dönerbox (with fries) (Döner Bruder)");
        assert_eq!(
            r.detail,
            "Sauces: Knoblauch, Extras: no onion, extra Käse, Spice: extra spicy"
        );
    }

    #[test]
    fn test_kebab_empty_lists_and_unknown_codes() {
        let cat = Catalog::default();
        let meal = KebabMeal::new("lidl", "doner").with_spice_level("volcano");
        let r = row(0, &kebab("Bo", 0, meal), &cat);
        assert_eq!(r.summary, "Döner (lidl)");
        assert_eq!(r.detail, "Sauces: none, Extras: none, Spice: volcano");
    }

    #[test]
    fn test_deli_rows() {
        let cat = Catalog::default();
        let salad = deli("A", 0, DeliMeal::new("Salat").with_salad_choice("Asia Salat"));
        let r = row(0, &salad, &cat);
        assert_eq!((r.summary.as_str(), r.detail.as_str()), ("Asia Salat", ""));

        let bakery = deli("A", 0, DeliMeal::new("Bäcker").with_bakery_free_text("Brezel"));
        let r = row(0, &bakery, &cat);
        assert_eq!((r.summary.as_str(), r.detail.as_str()), ("Bäcker", "Brezel"));

        let plain = deli("A", 0, DeliMeal::new("Leberkässemmel"));
        assert_eq!(row(0, &plain, &cat).detail, "Sauce: none");

        let sauced = deli(
            "A",
            0,
            DeliMeal::new("Leberkässemmel").with_sauce("Senf").with_note("warm"),
        );
        assert_eq!(row(0, &sauced, &cat).detail, "Sauce: Senf; Note: warm");
    }

    #[test]
    fn test_sort_is_stable_and_case_insensitive() {
        let cat = Catalog::default();
        let orders = vec![
            numbered("bob", 3, 1),
            numbered("Anna", 2, 2),
            numbered("Bob", 1, 3),
            numbered("anna", 4, 4),
        ];

        let by_name: Vec<usize> = project(&orders, &cat, SortKey::Submitter)
            .iter()
            .map(|r| r.position)
            .collect();
        assert_eq!(by_name, vec![1, 3, 0, 2]);

        let by_time: Vec<usize> = project(&orders, &cat, SortKey::Timestamp)
            .iter()
            .map(|r| r.position)
            .collect();
        assert_eq!(by_time, vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_sort_by_restaurant_keeps_ties_in_order() {
        let cat = Catalog::default();
        let orders = vec![
            numbered("a", 0, 1),
            deli("b", 1, DeliMeal::new("Bratensemmel")),
            kebab("c", 2, KebabMeal::new("king", "durum")),
            numbered("d", 3, 2),
        ];
        let labels: Vec<(String, usize)> = project(&orders, &cat, SortKey::Restaurant)
            .into_iter()
            .map(|r| (r.restaurant, r.position))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Döner".to_string(), 2),
                ("Edeka".to_string(), 1),
                ("YamYam".to_string(), 0),
                ("YamYam".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_filter_keeps_original_positions() {
        let cat = Catalog::default();
        let orders = vec![
            numbered("Anna", 0, 1),
            kebab("Jörg", 1, KebabMeal::new("king", "durum")),
            numbered("Hannah", 2, 2),
        ];
        let filter = OrderFilter {
            kind: Some(Kind::Numbered),
            submitter: Some("ANN".into()),
        };
        let rows = project_filtered(&orders, &cat, SortKey::Timestamp, &filter);
        let positions: Vec<usize> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 2]);
        assert!(OrderFilter::default().is_empty());
    }

    #[test]
    fn test_default_projection_keeps_store_order() {
        let cat = Catalog::default();
        let orders = vec![
            Order::new(
                "First",
                Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
                Meal::Numbered(NumberedMeal { item_number: 1 }),
            ),
            numbered("Second", 0, 2),
        ];
        let names: Vec<String> = project(&orders, &cat, SortKey::default())
            .into_iter()
            .map(|r| r.submitter)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!("none".parse::<SortKey>().unwrap(), SortKey::Input);
    }

    #[test]
    fn test_projection_is_pure() {
        let cat = Catalog::default();
        let orders = vec![numbered("b", 1, 1), numbered("a", 0, 2)];
        let before = orders.clone();
        let _ = project(&orders, &cat, SortKey::Submitter);
        assert_eq!(orders, before);
    }
}
