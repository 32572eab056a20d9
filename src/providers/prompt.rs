/// Prompt asking for a whole recipe as JSON.
///
/// The templates live in `.txt` files next to this module and are embedded
/// at compile time with `include_str!`, so they can be edited without
/// dealing with Rust string syntax.
pub const RECIPE_PROMPT: &str = include_str!("recipe_prompt.txt");

/// Prompt asking for a JSON array of numbered steps
pub const INSTRUCTIONS_PROMPT: &str = include_str!("instructions_prompt.txt");

/// Prompt asking for an item -> category JSON object
pub const CATEGORIZE_PROMPT: &str = include_str!("categorize_prompt.txt");

/// `content_type` describes the source to the model, e.g. "webpage" or "PDF".
pub fn build_recipe_prompt(content: &str, content_type: &str) -> String {
    // Content goes in last so placeholders inside it are left alone
    RECIPE_PROMPT
        .replace("{content_type}", content_type)
        .replace("{content}", content)
}

pub fn build_instructions_prompt(content: &str) -> String {
    INSTRUCTIONS_PROMPT.replace("{content}", content)
}

pub fn build_categorize_prompt(items: &[String]) -> String {
    let listed = serde_json::to_string(items).unwrap_or_else(|_| items.join("\n"));
    CATEGORIZE_PROMPT.replace("{items}", &listed)
}
