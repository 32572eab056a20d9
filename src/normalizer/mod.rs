//! Turning raw model output into domain records.
//!
//! Models are asked for JSON but tend to wrap it in prose, so each parser
//! slices from the first opening bracket to the last closing one before
//! decoding. Nothing here retries; a caller may re-prompt on failure.

mod ingredient;

pub use ingredient::parse_ingredient_text;

use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::NormalizeError;
use crate::model::{Instruction, MacroNutrition, Nutrition, Recipe, SourceType};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelRecipe {
    title: Option<String>,
    description: Option<String>,
    servings: Option<f64>,
    prep_time: Option<f64>,
    cook_time: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    ingredients: Vec<ModelIngredient>,
    #[serde(default, deserialize_with = "null_as_default")]
    instructions: Vec<ModelStep>,
    notes: Option<String>,
    nutrition: Option<ModelNutrition>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelIngredient {
    Line(String),
    Described {
        #[serde(default, deserialize_with = "null_as_default")]
        description: String,
    },
}

#[derive(Deserialize)]
struct ModelStep {
    #[serde(alias = "stepNumber", default)]
    step_number: Option<u32>,
    #[serde(alias = "description", alias = "text", default, deserialize_with = "null_as_default")]
    instruction: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ModelNutrition {
    #[serde(deserialize_with = "null_as_default")]
    calories: f64,
    #[serde(deserialize_with = "null_as_default")]
    protein: f64,
    #[serde(deserialize_with = "null_as_default")]
    carbs: f64,
    #[serde(deserialize_with = "null_as_default")]
    fat: f64,
    #[serde(deserialize_with = "null_as_default")]
    fiber: f64,
    #[serde(deserialize_with = "null_as_default")]
    sugar: f64,
    #[serde(deserialize_with = "null_as_default")]
    saturated_fat: f64,
    #[serde(deserialize_with = "null_as_default")]
    cholesterol: f64,
    #[serde(deserialize_with = "null_as_default")]
    sodium: f64,
}

/// Models write `null` for values they don't know; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Slice the outermost `open`..`close` span out of `response`.
fn json_span(response: &str, open: char, close: char) -> Result<&str, NormalizeError> {
    let start = response.find(open).ok_or(NormalizeError::NoJsonFound)?;
    let end = response.rfind(close).ok_or(NormalizeError::NoJsonFound)?;
    if end < start {
        return Err(NormalizeError::NoJsonFound);
    }
    Ok(&response[start..=end])
}

/// Model-supplied counts arrive as JSON numbers that may be fractional or negative.
fn whole(value: Option<f64>) -> u32 {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round() as u32)
        .unwrap_or(0)
}

/// Normalize a recipe response. A recipe without a title is an error, never a partial result.
pub fn parse_recipe_response(response: &str) -> Result<Recipe, NormalizeError> {
    let json = json_span(response, '{', '}')?;
    let parsed: ModelRecipe = serde_json::from_str(json)?;

    let title = parsed.title.unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return Err(NormalizeError::MissingTitle);
    }

    let ingredients = parsed
        .ingredients
        .into_iter()
        .map(|ingredient| match ingredient {
            ModelIngredient::Line(line) => parse_ingredient_text(&line),
            ModelIngredient::Described { description } => parse_ingredient_text(&description),
        })
        .collect();

    let nutrition = parsed.nutrition.map(|n| Nutrition {
        calories: n.calories,
        per_serving: true,
        macros: MacroNutrition {
            protein: n.protein,
            carbs: n.carbs,
            fat: n.fat,
            fiber: n.fiber,
            sugar: n.sugar,
            saturated_fat: n.saturated_fat,
            cholesterol: n.cholesterol,
            sodium: n.sodium,
        },
    });

    let recipe = Recipe {
        title,
        description: parsed.description.unwrap_or_default(),
        notes: parsed.notes.unwrap_or_default(),
        servings: whole(parsed.servings),
        prep_time: whole(parsed.prep_time),
        cook_time: whole(parsed.cook_time),
        ingredients,
        instructions: number_steps(parsed.instructions),
        nutrition,
        source_type: SourceType::Text,
        status: "draft".to_string(),
        ..Default::default()
    };
    debug!(
        "Normalized recipe '{}' ({} ingredients, {} steps)",
        recipe.title,
        recipe.ingredients.len(),
        recipe.instructions.len()
    );
    Ok(recipe)
}

/// Normalize an instruction list response.
pub fn parse_instructions_response(response: &str) -> Result<Vec<Instruction>, NormalizeError> {
    let json = json_span(response, '[', ']')?;
    let steps: Vec<ModelStep> = serde_json::from_str(json)?;
    Ok(number_steps(steps))
}

/// Model-supplied step numbers are trusted; missing or zero ones become the 1-based position.
fn number_steps(steps: Vec<ModelStep>) -> Vec<Instruction> {
    steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| Instruction {
            step_number: step
                .step_number
                .filter(|n| *n > 0)
                .unwrap_or(index as u32 + 1),
            instruction: step.instruction.trim().to_string(),
        })
        .collect()
}

/// Normalize a `{"item": "CATEGORY"}` response into labels aligned with `items`.
///
/// Each item is looked up by name (exact, then case-insensitive), then by
/// position. A positional entry whose key names another item is never reused.
/// Items that cannot be matched get an empty label.
pub fn parse_categories_response(
    response: &str,
    items: &[String],
) -> Result<Vec<String>, NormalizeError> {
    let json = json_span(response, '{', '}')?;
    let mapping: Map<String, Value> = serde_json::from_str(json)?;

    let by_name = |item: &str| {
        mapping
            .iter()
            .find(|(key, _)| key.as_str() == item)
            .or_else(|| {
                mapping
                    .iter()
                    .find(|(key, _)| key.trim().eq_ignore_ascii_case(item.trim()))
            })
    };
    let claimed: HashSet<&String> = items
        .iter()
        .filter_map(|item| by_name(item.as_str()).map(|(key, _)| key))
        .collect();
    let positional: Vec<(&String, &Value)> = mapping.iter().collect();

    let labels = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let value = by_name(item.as_str()).map(|(_, value)| value).or_else(|| {
                positional
                    .get(index)
                    .filter(|(key, _)| !claimed.contains(key))
                    .map(|(_, value)| *value)
            });
            value
                .and_then(Value::as_str)
                .map(|label| label.trim().to_string())
                .unwrap_or_default()
        })
        .collect();
    Ok(labels)
}
