//! Catalog
//!
//! Reference data for the menu: pizzas and the toppings that can be added to
//! them. Catalog entries are immutable once loaded.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    configuration::{Cheese, ConfigurationError, Crust, PizzaConfiguration, Sauce, Size, ToppingSet},
    fixtures::{FixtureError, menu::MenuFixture},
};

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two pizzas share an id.
    #[error("duplicate pizza id: {0}")]
    DuplicatePizza(String),

    /// Two toppings share an id.
    #[error("duplicate topping id: {0}")]
    DuplicateTopping(String),

    /// A pizza has a zero or negative base price.
    #[error("pizza {0} must have a positive base price")]
    InvalidBasePrice(String),

    /// A topping has a negative price.
    #[error("topping {0} must not have a negative price")]
    InvalidToppingPrice(String),
}

/// Topping category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToppingCategory {
    /// Meat
    Meat,

    /// Vegetable
    Vegetable,

    /// Premium
    Premium,
}

impl ToppingCategory {
    /// All topping categories in menu order.
    pub const ALL: [ToppingCategory; 3] = [Self::Meat, Self::Vegetable, Self::Premium];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Meat => "meat",
            Self::Vegetable => "vegetable",
            Self::Premium => "premium",
        }
    }
}

/// A topping that can be added to any pizza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topping {
    /// Topping id
    pub id: String,

    /// Display name
    pub name: String,

    /// Category
    pub category: ToppingCategory,

    /// Price added to the pizza
    pub price: Decimal,
}

/// Pizza category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PizzaCategory {
    /// Classic
    Classic,

    /// Premium
    Premium,

    /// Vegetarian
    Vegetarian,

    /// Specialty
    Specialty,
}

impl PizzaCategory {
    /// All pizza categories in menu order.
    pub const ALL: [PizzaCategory; 4] = [
        Self::Classic,
        Self::Specialty,
        Self::Premium,
        Self::Vegetarian,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Premium => "premium",
            Self::Vegetarian => "vegetarian",
            Self::Specialty => "specialty",
        }
    }
}

/// A pizza on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pizza {
    /// Pizza id
    pub id: String,

    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Category
    pub category: PizzaCategory,

    /// Price of a medium pizza with a regular crust and no extra toppings
    pub base_price: Decimal,

    /// Image reference
    pub image: String,

    /// Whether the pizza is featured as popular
    pub popular: bool,
}

/// Catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pizzas: Vec<Pizza>,
    toppings: Vec<Topping>,
    pizza_index: FxHashMap<String, usize>,
    topping_index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, preserving the given display order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if ids are duplicated or prices are out of range.
    pub fn new(pizzas: Vec<Pizza>, toppings: Vec<Topping>) -> Result<Self, CatalogError> {
        let mut pizza_index = FxHashMap::default();

        for (idx, pizza) in pizzas.iter().enumerate() {
            if pizza.base_price <= Decimal::ZERO {
                return Err(CatalogError::InvalidBasePrice(pizza.id.clone()));
            }

            if pizza_index.insert(pizza.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicatePizza(pizza.id.clone()));
            }
        }

        let mut topping_index = FxHashMap::default();

        for (idx, topping) in toppings.iter().enumerate() {
            if topping.price < Decimal::ZERO {
                return Err(CatalogError::InvalidToppingPrice(topping.id.clone()));
            }

            if topping_index.insert(topping.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateTopping(topping.id.clone()));
            }
        }

        Ok(Self {
            pizzas,
            toppings,
            pizza_index,
            topping_index,
        })
    }

    /// Parse a catalog from a YAML menu document.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the document is malformed or fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FixtureError> {
        MenuFixture::from_yaml_str(yaml)?.try_into()
    }

    /// Load a catalog from a YAML menu file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// All pizzas in menu order.
    pub fn pizzas(&self) -> &[Pizza] {
        &self.pizzas
    }

    /// All toppings in menu order.
    pub fn toppings(&self) -> &[Topping] {
        &self.toppings
    }

    /// Look up a pizza by id.
    pub fn pizza(&self, id: &str) -> Option<&Pizza> {
        self.pizzas.get(*self.pizza_index.get(id)?)
    }

    /// Look up a topping by id.
    pub fn topping(&self, id: &str) -> Option<&Topping> {
        self.toppings.get(*self.topping_index.get(id)?)
    }

    /// Pizzas in the given category.
    pub fn pizzas_in(&self, category: PizzaCategory) -> impl Iterator<Item = &Pizza> {
        self.pizzas.iter().filter(move |p| p.category == category)
    }

    /// Pizzas flagged as popular.
    pub fn popular(&self) -> impl Iterator<Item = &Pizza> {
        self.pizzas.iter().filter(|p| p.popular)
    }

    /// Toppings in the given category.
    pub fn toppings_in(&self, category: ToppingCategory) -> impl Iterator<Item = &Topping> {
        self.toppings.iter().filter(move |t| t.category == category)
    }

    /// Resolve topping ids against the catalog and assemble a configuration.
    ///
    /// Repeated topping ids collapse into one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownTopping`] for an id not in the catalog.
    pub fn configure<S: AsRef<str>>(
        &self,
        size: Size,
        crust: Crust,
        sauce: Sauce,
        cheese: Cheese,
        topping_ids: &[S],
    ) -> Result<PizzaConfiguration, ConfigurationError> {
        let toppings = topping_ids
            .iter()
            .map(|id| {
                self.topping(id.as_ref())
                    .cloned()
                    .ok_or_else(|| ConfigurationError::UnknownTopping(id.as_ref().to_string()))
            })
            .collect::<Result<ToppingSet, _>>()?;

        Ok(PizzaConfiguration {
            size,
            crust,
            sauce,
            cheese,
            toppings,
        })
    }
}
