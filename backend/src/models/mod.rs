//! Domain models for the drinks menu.
//!
//! - [`Drink`] - A menu item with its full recipe
//! - [`Ingredient`] - One recipe part
//! - [`DrinkSummary`] - Public view of a drink, without ingredient names
//! - [`DrinkInput`] - Create/update payload as clients send it

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Drinks
// =============================================================================

/// One part of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name, e.g. "milk"
    pub name: String,
    /// Display color
    pub color: String,
    /// Relative number of parts
    pub parts: u32,
}

/// Ingredient as shown on the public menu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientSummary {
    pub color: String,
    pub parts: u32,
}

/// A drink on the menu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Drink {
    /// Store-assigned id
    pub id: u64,
    /// Unique title
    pub title: String,
    /// Recipe, in pour order
    pub recipe: Vec<Ingredient>,
}

/// Public view of a drink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrinkSummary {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<IngredientSummary>,
}

impl Drink {
    /// Public representation: colors and parts only.
    pub fn short(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| IngredientSummary {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }

    /// Full representation, ingredient names included.
    pub fn long(&self) -> Drink {
        self.clone()
    }
}

// =============================================================================
// Client payload
// =============================================================================

/// Recipe as sent by clients: a list, or a single ingredient.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(list) => list,
            RecipeInput::One(single) => vec![single],
        }
    }
}

/// Body of `POST /drinks` and `PATCH /drinks/{id}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DrinkInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

impl DrinkInput {
    /// Parse a JSON value into a payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Require a non-empty title and recipe; yields the title and recipe.
    pub fn validate(self) -> Result<(String, Vec<Ingredient>), ValidationError> {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(ValidationError::MissingTitle),
        };
        let recipe = self.recipe.map(RecipeInput::into_vec).unwrap_or_default();
        if recipe.is_empty() {
            return Err(ValidationError::EmptyRecipe);
        }
        Ok((title, recipe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mocha() -> Drink {
        Drink {
            id: 4,
            title: "mocha".into(),
            recipe: vec![
                Ingredient { name: "espresso".into(), color: "brown".into(), parts: 1 },
                Ingredient { name: "chocolate".into(), color: "#3b1f0e".into(), parts: 2 },
            ],
        }
    }

    #[test]
    fn test_short_hides_ingredient_names() {
        let value = serde_json::to_value(mocha().short()).unwrap();

        assert_eq!(value["title"], "mocha");
        assert_eq!(value["recipe"][1], json!({"color": "#3b1f0e", "parts": 2}));
        assert!(value["recipe"][0].get("name").is_none());
    }

    #[test]
    fn test_long_keeps_ingredient_names() {
        let value = serde_json::to_value(mocha().long()).unwrap();
        assert_eq!(value["recipe"][0]["name"], "espresso");
        assert_eq!(value["id"], 4);
    }

    #[test]
    fn test_input_accepts_single_ingredient() {
        let input = DrinkInput::from_value(json!({
            "title": "water",
            "recipe": {"name": "water", "color": "blue", "parts": 1}
        }))
        .unwrap();

        let (title, recipe) = input.validate().unwrap();
        assert_eq!(title, "water");
        assert_eq!(recipe.len(), 1);
    }

    #[test]
    fn test_input_requires_title_and_recipe() {
        let no_title = DrinkInput::from_value(json!({
            "title": "",
            "recipe": [{"name": "milk", "color": "white", "parts": 1}]
        }))
        .unwrap();
        assert_eq!(no_title.validate(), Err(ValidationError::MissingTitle));

        let no_recipe = DrinkInput::from_value(json!({"title": "air", "recipe": []})).unwrap();
        assert_eq!(no_recipe.validate(), Err(ValidationError::EmptyRecipe));

        let missing = DrinkInput::from_value(json!({"title": "air"})).unwrap();
        assert_eq!(missing.validate(), Err(ValidationError::EmptyRecipe));
    }

    #[test]
    fn test_input_rejects_malformed_recipe() {
        let err = DrinkInput::from_value(json!({"title": "x", "recipe": [{"color": "red"}]})).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }
}
