//! Ingredient line decomposition.
//!
//! Grammar: `[quantity][unit] name [(notes)]`. Quantity accepts integers,
//! decimals, `a/b` fractions, mixed numbers and vulgar fraction glyphs.
//! Nothing here fails: whatever cannot be recognized stays at its zero value.

use crate::model::Ingredient;

/// Units spelled with two words; everything else is a single token.
const COMPOUND_UNITS: &[&str] = &[
    "fl oz",
    "fl. oz",
    "fluid ounce",
    "fluid ounces",
    "level tbsp",
    "level tsp",
    "heaped tbsp",
    "heaped tsp",
];

const VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('½', 0.5),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅛', 0.125),
];

/// Split an ingredient description into amount, unit, name and notes.
pub fn parse_ingredient_text(description: &str) -> Ingredient {
    let (main, notes) = split_notes(description.trim());
    let mut tokens: Vec<String> = main.split_whitespace().map(str::to_string).collect();

    let mut ingredient = Ingredient {
        description: description.trim().to_string(),
        notes,
        ..Default::default()
    };

    let Some((amount, consumed)) = take_quantity(&mut tokens) else {
        ingredient.name = tokens.join(" ");
        return ingredient;
    };
    ingredient.amount = amount;
    tokens.drain(..consumed);

    let unit_len = unit_length(&tokens);
    // A lone word after the quantity is what we're buying, not how it's measured
    if unit_len > 0 && unit_len < tokens.len() {
        ingredient.unit = tokens[..unit_len].join(" ");
        tokens.drain(..unit_len);
    }
    ingredient.name = tokens.join(" ");
    ingredient
}

/// Separate a parenthesized note from the rest of the line.
fn split_notes(text: &str) -> (String, String) {
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if close > open => {
            let notes = text[open + 1..close].trim().to_string();
            let main = format!("{} {}", &text[..open], &text[close + 1..]);
            (main, notes)
        }
        _ => (text.to_string(), String::new()),
    }
}

/// Parse a leading quantity, returning the amount and how many tokens it spans.
///
/// A glued unit such as `200g` is split in place so the unit becomes the next token.
fn take_quantity(tokens: &mut Vec<String>) -> Option<(f64, usize)> {
    let first = tokens.first()?.clone();

    let split_at = first
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i);
    if let Some(i) = split_at {
        if i == 0 {
            return None;
        }
        let (number, unit) = first.split_at(i);
        let amount = parse_number(number)?;
        tokens[0] = number.to_string();
        tokens.insert(1, unit.to_string());
        return Some((amount, 1));
    }

    let whole = parse_number(&first)?;
    if !first.contains(['/', '.']) && !has_vulgar_fraction(&first) {
        if let Some(fraction) = tokens
            .get(1)
            .filter(|t| t.contains('/') || is_vulgar_fraction(t))
            .and_then(|t| parse_number(t))
        {
            return Some((whole + fraction, 2));
        }
    }
    Some((whole, 1))
}

/// Integers, decimals, `a/b` fractions and vulgar fractions (`1½`).
/// A zero denominator reads as 0 rather than failing.
fn parse_number(token: &str) -> Option<f64> {
    if let Some(glyph) = token.chars().last().and_then(vulgar_value) {
        let prefix = &token[..token.len() - token.chars().last()?.len_utf8()];
        if prefix.is_empty() {
            return Some(glyph);
        }
        return parse_plain(prefix).map(|whole| whole + glyph);
    }

    if let Some((num, den)) = token.split_once('/') {
        let num = parse_plain(num)?;
        let den = parse_plain(den)?;
        return Some(if den == 0.0 { 0.0 } else { num / den });
    }

    parse_plain(token)
}

fn parse_plain(token: &str) -> Option<f64> {
    let valid = !token.is_empty()
        && token.chars().next().is_some_and(|c| c.is_ascii_digit())
        && token.chars().all(|c| c.is_ascii_digit() || c == '.')
        && token.matches('.').count() <= 1;
    if !valid {
        return None;
    }
    token.parse().ok()
}

fn vulgar_value(c: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, value)| *value)
}

fn is_vulgar_fraction(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if vulgar_value(c).is_some())
}

fn has_vulgar_fraction(token: &str) -> bool {
    token.chars().any(|c| vulgar_value(c).is_some())
}

/// How many leading tokens form the unit: 0, 1 or 2.
fn unit_length(tokens: &[String]) -> usize {
    if let [first, second, ..] = tokens {
        let pair = format!("{} {}", first, second).to_lowercase();
        if COMPOUND_UNITS.contains(&pair.as_str()) {
            return 2;
        }
    }
    match tokens.first() {
        Some(word) if word.chars().all(char::is_alphabetic) => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_full_grammar() {
        let ingredient = parse_ingredient_text("2 cups flour (sifted)");
        assert_close(ingredient.amount, 2.0);
        assert_eq!(ingredient.unit, "cups");
        assert_eq!(ingredient.name, "flour");
        assert_eq!(ingredient.notes, "sifted");
        assert_eq!(ingredient.description, "2 cups flour (sifted)");
    }

    #[test]
    fn test_decimal_amount() {
        let ingredient = parse_ingredient_text("1.5 tbsp olive oil (extra virgin)");
        assert_close(ingredient.amount, 1.5);
        assert_eq!(ingredient.unit, "tbsp");
        assert_eq!(ingredient.name, "olive oil");
        assert_eq!(ingredient.notes, "extra virgin");
    }

    #[test]
    fn test_simple_fraction() {
        let ingredient = parse_ingredient_text("1/2 cup sugar");
        assert_close(ingredient.amount, 0.5);
        assert_eq!(ingredient.unit, "cup");
        assert_eq!(ingredient.name, "sugar");
        assert_eq!(ingredient.notes, "");
    }

    #[test]
    fn test_zero_denominator_is_zero_amount() {
        let ingredient = parse_ingredient_text("1/0 cup x");
        assert_close(ingredient.amount, 0.0);
        assert_eq!(ingredient.unit, "cup");
        assert_eq!(ingredient.name, "x");
    }

    #[test]
    fn test_no_quantity_keeps_whole_text_as_name() {
        let ingredient = parse_ingredient_text("salt and pepper to taste");
        assert_close(ingredient.amount, 0.0);
        assert_eq!(ingredient.unit, "");
        assert_eq!(ingredient.name, "salt and pepper to taste");
    }

    #[test]
    fn test_no_quantity_with_notes() {
        let ingredient = parse_ingredient_text("fresh basil (optional)");
        assert_close(ingredient.amount, 0.0);
        assert_eq!(ingredient.name, "fresh basil");
        assert_eq!(ingredient.notes, "optional");
    }

    #[test]
    fn test_mixed_number() {
        let ingredient = parse_ingredient_text("1 1/2 cups milk");
        assert_close(ingredient.amount, 1.5);
        assert_eq!(ingredient.unit, "cups");
        assert_eq!(ingredient.name, "milk");
    }

    #[test]
    fn test_vulgar_fractions() {
        let ingredient = parse_ingredient_text("½ tsp salt");
        assert_close(ingredient.amount, 0.5);
        assert_eq!(ingredient.unit, "tsp");

        let ingredient = parse_ingredient_text("1½ cups rice");
        assert_close(ingredient.amount, 1.5);
        assert_eq!(ingredient.name, "rice");

        let ingredient = parse_ingredient_text("2 ¼ cups stock");
        assert_close(ingredient.amount, 2.25);
        assert_eq!(ingredient.unit, "cups");
    }

    #[test]
    fn test_glued_unit() {
        let ingredient = parse_ingredient_text("200g dark chocolate");
        assert_close(ingredient.amount, 200.0);
        assert_eq!(ingredient.unit, "g");
        assert_eq!(ingredient.name, "dark chocolate");
    }

    #[test]
    fn test_two_word_unit() {
        let ingredient = parse_ingredient_text("4 fl oz cream");
        assert_close(ingredient.amount, 4.0);
        assert_eq!(ingredient.unit, "fl oz");
        assert_eq!(ingredient.name, "cream");
    }

    #[test]
    fn test_single_word_after_quantity_is_the_name() {
        let ingredient = parse_ingredient_text("3 eggs");
        assert_close(ingredient.amount, 3.0);
        assert_eq!(ingredient.unit, "");
        assert_eq!(ingredient.name, "eggs");
    }

    #[test]
    fn test_notes_in_the_middle() {
        let ingredient = parse_ingredient_text("1 cup (packed) brown sugar");
        assert_close(ingredient.amount, 1.0);
        assert_eq!(ingredient.unit, "cup");
        assert_eq!(ingredient.name, "brown sugar");
        assert_eq!(ingredient.notes, "packed");
    }

    #[test]
    fn test_degenerate_inputs_never_panic() {
        for input in ["", "   ", "(", ")", "()", "/", "1/", "/2 cups", "1..2 cups", "½"] {
            let _ = parse_ingredient_text(input);
        }
        let ingredient = parse_ingredient_text("");
        assert_eq!(ingredient, Ingredient::default());
    }
}
