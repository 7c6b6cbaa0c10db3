//! Business rules for submitted orders.
//!
//! Checks run in a fixed order and stop at the first violation, so a form
//! can always point at a single field. Nothing here touches storage.

use crate::catalog::{Catalog, DeliCategory};
use crate::error::ValidationError;
use crate::model::{Candidate, DeliMeal, KebabMeal, Meal, MealForm, NumberedMeal};

/// Validate a candidate and return the meal it describes.
pub fn check(candidate: &Candidate, catalog: &Catalog) -> Result<Meal, ValidationError> {
    if candidate.submitter.trim().is_empty() {
        return Err(ValidationError::MissingField("submitter"));
    }

    match &candidate.meal {
        MealForm::Numbered { item_number } => {
            check_item_number(item_number, catalog.numbered.max_number).map(|item_number| {
                Meal::Numbered(NumberedMeal { item_number })
            })
        }
        MealForm::Kebab(meal) => check_kebab(meal, catalog).map(|_| Meal::Kebab(meal.clone())),
        MealForm::Deli(meal) => check_deli(meal, catalog).map(|_| Meal::Deli(meal.clone())),
    }
}

/// Same rules as [`check`], discarding the validated meal.
pub fn validate(candidate: &Candidate, catalog: &Catalog) -> Result<(), ValidationError> {
    check(candidate, catalog).map(|_| ())
}

fn check_item_number(raw: &str, max: u32) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingField("itemNumber"));
    }
    let value: i64 = raw.parse().map_err(|_| ValidationError::NotANumber {
        field: "itemNumber",
        input: raw.to_string(),
    })?;
    if value < 1 || value > i64::from(max) {
        return Err(ValidationError::OutOfRange {
            field: "itemNumber",
            value,
            min: 1,
            max,
        });
    }
    // in range, so it fits
    Ok(value as u32)
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn blank_opt(s: &Option<String>) -> bool {
    s.as_deref().map(blank).unwrap_or(true)
}

fn check_kebab(meal: &KebabMeal, catalog: &Catalog) -> Result<(), ValidationError> {
    let rules = &catalog.kebab;
    if blank(&meal.venue) {
        return Err(ValidationError::MissingField("venue"));
    }
    if blank(&meal.product) {
        return Err(ValidationError::MissingField("product"));
    }
    if meal.product == rules.box_product && blank_opt(&meal.box_style) {
        return Err(ValidationError::MissingField("boxStyle"));
    }
    if meal.sauces.len() > rules.max_sauces {
        return Err(ValidationError::TooMany {
            field: "sauces",
            max: rules.max_sauces,
            count: meal.sauces.len(),
        });
    }
    let standard = meal.standard_modifier_count();
    if standard > rules.max_modifiers {
        return Err(ValidationError::TooMany {
            field: "modifiers",
            max: rules.max_modifiers,
            count: standard,
        });
    }
    Ok(())
}

fn check_deli(meal: &DeliMeal, catalog: &Catalog) -> Result<(), ValidationError> {
    if blank(&meal.product) {
        return Err(ValidationError::MissingField("product"));
    }
    match catalog.deli.product(&meal.product) {
        Some(p) if p.category == DeliCategory::Salad => {
            if blank_opt(&meal.salad_choice) {
                return Err(ValidationError::MissingField("saladChoice"));
            }
        }
        Some(p) if p.category == DeliCategory::Bakery => {
            if blank_opt(&meal.bakery_free_text) {
                return Err(ValidationError::MissingField("bakeryFreeText"));
            }
        }
        Some(p) if p.sauce_required && blank_opt(&meal.sauce) => {
            return Err(ValidationError::MissingField("sauce"));
        }
        _ => {}
    }
    Ok(())
}
