//! Menu Fixtures

use serde::Deserialize;

use crate::{
    catalog::{Catalog, Pizza, PizzaCategory, Topping, ToppingCategory},
    fixtures::{FixtureError, parse_price},
};

/// Menu as laid out in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Pizzas in display order
    pub pizzas: Vec<PizzaFixture>,

    /// Toppings in display order
    pub toppings: Vec<ToppingFixture>,
}

impl MenuFixture {
    /// Parse a menu from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the text is not a valid menu document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }
}

/// Pizza Fixture
#[derive(Debug, Deserialize)]
pub struct PizzaFixture {
    /// Pizza id
    pub id: String,

    /// Display name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Category
    pub category: PizzaCategory,

    /// Base price (e.g. "12.99")
    pub base_price: String,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Popular flag
    #[serde(default)]
    pub popular: bool,
}

impl TryFrom<PizzaFixture> for Pizza {
    type Error = FixtureError;

    fn try_from(fixture: PizzaFixture) -> Result<Self, Self::Error> {
        Ok(Pizza {
            base_price: parse_price(&fixture.base_price)?,
            id: fixture.id,
            name: fixture.name,
            description: fixture.description,
            category: fixture.category,
            image: fixture.image,
            popular: fixture.popular,
        })
    }
}

/// Topping Fixture
#[derive(Debug, Deserialize)]
pub struct ToppingFixture {
    /// Topping id
    pub id: String,

    /// Display name
    pub name: String,

    /// Category
    pub category: ToppingCategory,

    /// Price (e.g. "1.50")
    pub price: String,
}

impl TryFrom<ToppingFixture> for Topping {
    type Error = FixtureError;

    fn try_from(fixture: ToppingFixture) -> Result<Self, Self::Error> {
        Ok(Topping {
            price: parse_price(&fixture.price)?,
            id: fixture.id,
            name: fixture.name,
            category: fixture.category,
        })
    }
}

impl TryFrom<MenuFixture> for Catalog {
    type Error = FixtureError;

    fn try_from(fixture: MenuFixture) -> Result<Self, Self::Error> {
        let pizzas = fixture
            .pizzas
            .into_iter()
            .map(Pizza::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let toppings = fixture
            .toppings
            .into_iter()
            .map(Topping::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog::new(pizzas, toppings)?)
    }
}
