use crate::catalog::{Catalog, DeliCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix marking a free-text modifier in the stored representation.
pub const CUSTOM_PREFIX: &str = "custom:";

/// The restaurant family an order belongs to.
///
/// The wire names (`mealA`, `mealB`, `mealC`) are stable; display labels
/// come from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    /// Pick a dish by its menu number.
    #[serde(rename = "mealA")]
    Numbered,
    /// Build-your-own kebab with sauces, extras and spice level.
    #[serde(rename = "mealB")]
    Kebab,
    /// Supermarket counter: sandwiches, salad bar, bakery.
    #[serde(rename = "mealC")]
    Deli,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Numbered, Kind::Kebab, Kind::Deli];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Numbered => "mealA",
            Kind::Kebab => "mealB",
            Kind::Deli => "mealC",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "meala" | "a" | "numbered" => Ok(Kind::Numbered),
            "mealb" | "b" | "kebab" => Ok(Kind::Kebab),
            "mealc" | "c" | "deli" => Ok(Kind::Deli),
            _ => Err(format!(
                "Unknown restaurant kind: {} (expected numbered, kebab or deli)",
                s
            )),
        }
    }
}

/// An entry in a kebab order's modifier list.
///
/// Stored as a plain string; custom entries carry the `custom:` prefix so that
/// files written by older versions keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Modifier {
    Standard(String),
    Custom(String),
}

impl Modifier {
    pub fn standard(code: impl Into<String>) -> Self {
        Modifier::Standard(code.into())
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Modifier::Custom(text.into())
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Modifier::Custom(_))
    }

    /// The code (standard) or the free text (custom), without any prefix.
    pub fn text(&self) -> &str {
        match self {
            Modifier::Standard(s) | Modifier::Custom(s) => s,
        }
    }
}

impl From<String> for Modifier {
    fn from(raw: String) -> Self {
        match raw.strip_prefix(CUSTOM_PREFIX) {
            Some(text) => Modifier::Custom(text.to_string()),
            None => Modifier::Standard(raw),
        }
    }
}

impl From<Modifier> for String {
    fn from(m: Modifier) -> Self {
        match m {
            Modifier::Standard(code) => code,
            Modifier::Custom(text) => format!("{}{}", CUSTOM_PREFIX, text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedMeal {
    pub item_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KebabMeal {
    pub venue: String,
    pub product: String,
    #[serde(default)]
    pub sauces: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub spice_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_style: Option<String>,
}

impl KebabMeal {
    pub fn new(venue: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            product: product.into(),
            ..Default::default()
        }
    }

    pub fn with_sauces<I, S>(mut self, sauces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sauces = sauces.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_spice_level(mut self, level: impl Into<String>) -> Self {
        self.spice_level = level.into();
        self
    }

    pub fn with_box_style(mut self, style: impl Into<String>) -> Self {
        self.box_style = Some(style.into());
        self
    }

    pub fn standard_modifier_count(&self) -> usize {
        self.modifiers.iter().filter(|m| !m.is_custom()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliMeal {
    pub product: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salad_choice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bakery_free_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sauce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DeliMeal {
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            ..Default::default()
        }
    }

    pub fn with_salad_choice(mut self, choice: impl Into<String>) -> Self {
        self.salad_choice = Some(choice.into());
        self
    }

    pub fn with_bakery_free_text(mut self, text: impl Into<String>) -> Self {
        self.bakery_free_text = Some(text.into());
        self
    }

    pub fn with_sauce(mut self, sauce: impl Into<String>) -> Self {
        self.sauce = Some(sauce.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// The variant-specific part of an order, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Meal {
    #[serde(rename = "mealA")]
    Numbered(NumberedMeal),
    #[serde(rename = "mealB")]
    Kebab(KebabMeal),
    #[serde(rename = "mealC")]
    Deli(DeliMeal),
}

impl Meal {
    pub fn kind(&self) -> Kind {
        match self {
            Meal::Numbered(_) => Kind::Numbered,
            Meal::Kebab(_) => Kind::Kebab,
            Meal::Deli(_) => Kind::Deli,
        }
    }
}

/// A stored lunch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub submitter: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub meal: Meal,
}

impl Order {
    pub fn new(submitter: impl Into<String>, created_at: DateTime<Utc>, meal: Meal) -> Self {
        Self {
            submitter: submitter.into(),
            created_at,
            meal,
        }
    }

    pub fn kind(&self) -> Kind {
        self.meal.kind()
    }

    /// Structural check used when accepting records in bulk.
    ///
    /// Verifies that the fields every record of this kind must carry are
    /// present and non-blank, including the ones the catalog makes
    /// conditional (box style, salad choice, bakery text). Option codes are
    /// not checked against the catalog; unknown codes display as-is.
    pub fn check_shape(&self, catalog: &Catalog) -> Result<(), String> {
        if self.submitter.trim().is_empty() {
            return Err("submitter is empty".to_string());
        }
        match &self.meal {
            Meal::Numbered(m) if m.item_number == 0 => Err("itemNumber must be positive".into()),
            Meal::Numbered(_) => Ok(()),
            Meal::Kebab(m) if m.venue.trim().is_empty() => Err("venue is empty".into()),
            Meal::Kebab(m) if m.product.trim().is_empty() => Err("product is empty".into()),
            Meal::Kebab(m) if m.product == catalog.kebab.box_product && blank(&m.box_style) => {
                Err("boxStyle is required for this product".into())
            }
            Meal::Kebab(_) => Ok(()),
            Meal::Deli(m) if m.product.trim().is_empty() => Err("product is empty".into()),
            Meal::Deli(m) => match catalog.deli.category(&m.product) {
                DeliCategory::Salad if blank(&m.salad_choice) => {
                    Err("saladChoice is required for this product".into())
                }
                DeliCategory::Bakery if blank(&m.bakery_free_text) => {
                    Err("bakeryFreeText is required for this product".into())
                }
                _ => Ok(()),
            },
        }
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Form input for the variant part of an order, before validation.
///
/// Differs from [`Meal`] only where the form collects raw text that still
/// needs parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealForm {
    Numbered { item_number: String },
    Kebab(KebabMeal),
    Deli(DeliMeal),
}

impl MealForm {
    pub fn kind(&self) -> Kind {
        match self {
            MealForm::Numbered { .. } => Kind::Numbered,
            MealForm::Kebab(_) => Kind::Kebab,
            MealForm::Deli(_) => Kind::Deli,
        }
    }
}

/// An order as submitted by a user: no timestamp, unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub submitter: String,
    pub meal: MealForm,
}

impl Candidate {
    pub fn numbered(submitter: impl Into<String>, item_number: impl Into<String>) -> Self {
        Self {
            submitter: submitter.into(),
            meal: MealForm::Numbered {
                item_number: item_number.into(),
            },
        }
    }

    pub fn kebab(submitter: impl Into<String>, meal: KebabMeal) -> Self {
        Self {
            submitter: submitter.into(),
            meal: MealForm::Kebab(meal),
        }
    }

    pub fn deli(submitter: impl Into<String>, meal: DeliMeal) -> Self {
        Self {
            submitter: submitter.into(),
            meal: MealForm::Deli(meal),
        }
    }
}

/// RFC 3339 on write; on read also accepts the offset-less local timestamps
/// that older exports contain.
mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, TimeZone};
    use serde_json::json;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, h, m, 0).unwrap()
    }

    #[test]
    fn test_custom_modifier_uses_prefix_on_the_wire() {
        let meal = KebabMeal::new("bruder", "doner")
            .with_modifiers(vec![Modifier::standard("ohne-zwiebel"), Modifier::custom("extra Käse")]);
        let value = serde_json::to_value(&meal).unwrap();
        assert_eq!(value["modifiers"], json!(["ohne-zwiebel", "custom:extra Käse"]));

        let back: KebabMeal = serde_json::from_value(value).unwrap();
        assert_eq!(back.modifiers[1], Modifier::Custom("extra Käse".into()));
        assert_eq!(back.standard_modifier_count(), 1);
    }

    #[test]
    fn test_order_is_flat_and_tagged_by_kind() {
        let order = Order::new("Anna", at(11, 30), Meal::Numbered(NumberedMeal { item_number: 42 }));
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(
            value,
            json!({
                "submitter": "Anna",
                "createdAt": "2026-10-18T11:30:00Z",
                "kind": "mealA",
                "itemNumber": 42
            })
        );
    }

    #[test]
    fn test_key_order_is_stable() {
        let order = Order::new(
            "Jörg",
            at(12, 0),
            Meal::Deli(DeliMeal::new("Bäcker").with_bakery_free_text("2 Brezeln")),
        );
        let text = serde_json::to_string(&order).unwrap();
        assert_eq!(
            text,
            r#"{"submitter":"Jörg","createdAt":"2026-10-18T12:00:00Z","kind":"mealC","product":"Bäcker","bakeryFreeText":"2 Brezeln"}"#
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let raw = json!({"submitter": "A", "createdAt": "2026-10-18T11:30:00Z", "kind": "pizza"});
        assert!(serde_json::from_value::<Order>(raw).is_err());
    }

    #[test]
    fn test_legacy_naive_timestamp_is_read_as_local_time() {
        let parsed = timestamp::parse("2024-05-01T12:30:00.123456").unwrap();
        let expected = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 5, 1)
                    .unwrap()
                    .and_hms_micro_opt(12, 30, 0, 123456)
                    .unwrap(),
            )
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, expected);
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_check_shape() {
        let cat = Catalog::default();
        let ok = Order::new("A", at(1, 0), Meal::Kebab(KebabMeal::new("king", "durum")));
        assert!(ok.check_shape(&cat).is_ok());

        let blank = Order::new("  ", at(1, 0), Meal::Kebab(KebabMeal::new("king", "durum")));
        assert_eq!(blank.check_shape(&cat).unwrap_err(), "submitter is empty");

        let no_product = Order::new("A", at(1, 0), Meal::Deli(DeliMeal::new("")));
        assert!(no_product.check_shape(&cat).is_err());
    }

    #[test]
    fn test_check_shape_conditional_fields() {
        let cat = Catalog::default();
        let shape = |meal: Meal| Order::new("A", at(1, 0), meal).check_shape(&cat);

        assert_eq!(
            shape(Meal::Kebab(KebabMeal::new("king", "box"))).unwrap_err(),
            "boxStyle is required for this product"
        );
        assert!(shape(Meal::Kebab(KebabMeal::new("king", "box").with_box_style("pommes"))).is_ok());

        assert_eq!(
            shape(Meal::Deli(DeliMeal::new("Salat").with_salad_choice(" "))).unwrap_err(),
            "saladChoice is required for this product"
        );
        assert!(shape(Meal::Deli(DeliMeal::new("Salat").with_salad_choice("Asia Salat"))).is_ok());

        assert_eq!(
            shape(Meal::Deli(DeliMeal::new("Bäcker"))).unwrap_err(),
            "bakeryFreeText is required for this product"
        );
        assert!(shape(Meal::Deli(DeliMeal::new("Leberkässemmel"))).is_ok());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("kebab".parse::<Kind>().unwrap(), Kind::Kebab);
        assert_eq!("mealC".parse::<Kind>().unwrap(), Kind::Deli);
        assert_eq!("mealA".parse::<Kind>().unwrap(), Kind::Numbered);
        assert!("sushi".parse::<Kind>().is_err());
    }
}
