//! Drink Store - Persist the menu
//!
//! Keeps all drinks in memory and mirrors them to a single JSON file after
//! every change. Titles are unique; ids are never reused while the drink
//! with the highest id still exists.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::models::{Drink, Ingredient};

/// File the store uses when none is configured (relative to current dir)
pub const DEFAULT_STORE_PATH: &str = ".coffee-shop/drinks.json";

/// Menu storage
#[derive(Debug, Default)]
pub struct DrinkStore {
    /// Backing file, `None` for a purely in-memory store
    path: Option<PathBuf>,
    /// Drinks by id
    drinks: BTreeMap<u64, Drink>,
}

impl DrinkStore {
    /// Open the store at `path`, loading existing drinks.
    ///
    /// A missing file is an empty menu; it is created on the first write.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = PathBuf::from(path.as_ref());
        let mut store = Self {
            path: Some(path.clone()),
            drinks: BTreeMap::new(),
        };

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                let drinks: Vec<Drink> = serde_json::from_str(&content)?;
                store.drinks = drinks.into_iter().map(|d| (d.id, d)).collect();
            }
        }

        tracing::debug!(path = %path.display(), drinks = store.drinks.len(), "Drink store opened");
        Ok(store)
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All drinks ordered by id.
    pub fn list(&self) -> Vec<&Drink> {
        self.drinks.values().collect()
    }

    pub fn len(&self) -> usize {
        self.drinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drinks.is_empty()
    }

    /// Get a drink by id.
    pub fn get(&self, id: u64) -> StoreResult<&Drink> {
        self.drinks.get(&id).ok_or(StoreError::NotFound(id))
    }

    /// Add a drink and return it with its new id.
    pub fn insert(&mut self, title: String, recipe: Vec<Ingredient>) -> StoreResult<Drink> {
        self.ensure_unique_title(&title, None)?;

        let id = self.next_id()?;
        let drink = Drink { id, title, recipe };
        let mut drinks = self.drinks.clone();
        drinks.insert(id, drink.clone());
        self.commit(drinks)?;

        tracing::info!(id, title = %drink.title, "Drink created");
        Ok(drink)
    }

    /// Replace title and recipe of an existing drink.
    pub fn update(&mut self, id: u64, title: String, recipe: Vec<Ingredient>) -> StoreResult<Drink> {
        self.get(id)?;
        self.ensure_unique_title(&title, Some(id))?;

        let drink = Drink { id, title, recipe };
        let mut drinks = self.drinks.clone();
        drinks.insert(id, drink.clone());
        self.commit(drinks)?;

        tracing::info!(id, title = %drink.title, "Drink updated");
        Ok(drink)
    }

    /// Remove a drink.
    pub fn delete(&mut self, id: u64) -> StoreResult<Drink> {
        let mut drinks = self.drinks.clone();
        let drink = drinks.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.commit(drinks)?;

        tracing::info!(id, title = %drink.title, "Drink deleted");
        Ok(drink)
    }

    /// Drop every drink and seed the starter menu.
    pub fn reset(&mut self) -> StoreResult<()> {
        let water = Drink {
            id: 1,
            title: "water".to_string(),
            recipe: vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        };
        self.commit(BTreeMap::from([(water.id, water)]))?;

        tracing::info!("Drink store reset to starter menu");
        Ok(())
    }

    fn next_id(&self) -> StoreResult<u64> {
        match self.drinks.keys().next_back() {
            None => Ok(1),
            Some(last) => last.checked_add(1).ok_or(StoreError::IdsExhausted),
        }
    }

    fn ensure_unique_title(&self, title: &str, except: Option<u64>) -> StoreResult<()> {
        let taken = self
            .drinks
            .values()
            .any(|d| d.title == title && Some(d.id) != except);
        if taken {
            return Err(StoreError::DuplicateTitle(title.to_string()));
        }
        Ok(())
    }

    /// Write `drinks` to disk, then make it the live menu.
    ///
    /// On a failed write the live menu is left as it was.
    fn commit(&mut self, drinks: BTreeMap<u64, Drink>) -> StoreResult<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }

            let list: Vec<&Drink> = drinks.values().collect();
            let content = serde_json::to_string_pretty(&list)?;
            fs::write(path, content)?;
        }

        self.drinks = drinks;
        Ok(())
    }
}
