use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an imported recipe came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceType {
    Url,
    Pdf,
    #[default]
    Text,
}

/// A structured recipe produced by normalization.
///
/// A normalized recipe always has a non-empty title. The id, owner and
/// privacy fields are only populated for recipes loaded from storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub notes: String,
    pub servings: u32,
    /// in minutes
    pub prep_time: u32,
    /// in minutes
    pub cook_time: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    pub source_type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: String,
    #[serde(default)]
    pub is_private: bool,
}

/// One ingredient line, decomposed into its parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// The raw line the other fields were parsed from
    pub description: String,
    /// 0 when no quantity could be parsed
    pub amount: f64,
    pub unit: String,
    pub notes: String,
}

impl Ingredient {
    /// The label used for shopping lists and categorization
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.description
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// 1-based
    pub step_number: u32,
    pub instruction: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub per_serving: bool,
    #[serde(flatten)]
    pub macros: MacroNutrition,
}

/// Macro nutrients; grams unless noted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroNutrition {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub saturated_fat: f64,
    /// in mg
    pub cholesterol: f64,
    /// in mg
    pub sodium: f64,
}

/// Shopping list categories, one per store department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Produce,
    Meat,
    Dairy,
    Bakery,
    Pantry,
    Frozen,
    Beverages,
    Household,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Produce,
        Category::Meat,
        Category::Dairy,
        Category::Bakery,
        Category::Pantry,
        Category::Frozen,
        Category::Beverages,
        Category::Household,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "PRODUCE",
            Category::Meat => "MEAT",
            Category::Dairy => "DAIRY",
            Category::Bakery => "BAKERY",
            Category::Pantry => "PANTRY",
            Category::Frozen => "FROZEN",
            Category::Beverages => "BEVERAGES",
            Category::Household => "HOUSEHOLD",
            Category::Other => "OTHER",
        }
    }

    /// Map a free-form label onto a category, OTHER when it is not one of ours
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| format!("unknown category: {}", label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    #[default]
    Category,
    Store,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub sort_type: SortType,
    pub store_chain_id: Option<String>,
    pub items: Vec<ShoppingListItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Assigned by storage; empty for items not yet saved
    pub id: String,
    pub list_id: String,
    pub recipe_id: Option<String>,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub category: Category,
    pub is_checked: bool,
    pub notes: String,
}

/// A single item a user asks to put on a list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItemRequest {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    /// Categorized through the model when absent
    pub category: Option<Category>,
    pub notes: String,
}

/// A store chain's physical layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreChain {
    pub id: String,
    pub name: String,
    pub country: String,
    pub layout: Vec<StoreSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    pub order: i32,
    pub name: String,
    pub categories: Vec<Category>,
}

/// A model a user can pick, as stored by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiModel {
    pub name: String,
    pub provider: String,
    pub model_version: String,
}

/// A user's stored model preference
#[derive(Clone, Serialize, Deserialize)]
pub struct UserAiConfig {
    pub user_id: String,
    pub model: AiModel,
    /// Empty means "use the system key"
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl fmt::Debug for UserAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAiConfig")
            .field("user_id", &self.user_id)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_are_case_insensitive() {
        assert_eq!(Category::from_label("produce"), Category::Produce);
        assert_eq!(Category::from_label(" Dairy "), Category::Dairy);
        assert_eq!(Category::from_label("SNACKS"), Category::Other);
        assert_eq!(Category::from_label(""), Category::Other);
    }

    #[test]
    fn test_category_serializes_uppercase() {
        let json = serde_json::to_string(&Category::Beverages).unwrap();
        assert_eq!(json, "\"BEVERAGES\"");
        let parsed: Category = serde_json::from_str("\"HOUSEHOLD\"").unwrap();
        assert_eq!(parsed, Category::Household);
    }

    #[test]
    fn test_ingredient_display_name_falls_back_to_description() {
        let ingredient = Ingredient {
            description: "a pinch of love".to_string(),
            ..Default::default()
        };
        assert_eq!(ingredient.display_name(), "a pinch of love");
    }

    #[test]
    fn test_user_ai_config_debug_hides_key() {
        let config = UserAiConfig {
            user_id: "u1".to_string(),
            model: AiModel {
                name: "GPT-4".to_string(),
                provider: "openai".to_string(),
                model_version: "gpt-4".to_string(),
            },
            api_key: "sk-user-secret".to_string(),
        };
        assert!(!format!("{:?}", config).contains("sk-user-secret"));
    }
}
