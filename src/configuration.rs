//! Pizza Configuration
//!
//! The closed set of choices a customer makes when customizing a pizza. Raw
//! selections (CLI arguments, request bodies) are parsed into these types at
//! the boundary, so the pricing and cart code only ever sees valid values.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::catalog::Topping;

/// Errors raised while turning a raw selection into a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The size name is not one of the offered sizes.
    #[error("unknown size: {0}")]
    UnknownSize(String),

    /// The crust name is not one of the offered crusts.
    #[error("unknown crust: {0}")]
    UnknownCrust(String),

    /// The sauce name is not one of the offered sauces.
    #[error("unknown sauce: {0}")]
    UnknownSauce(String),

    /// The cheese option is not one of the offered options.
    #[error("unknown cheese option: {0}")]
    UnknownCheese(String),

    /// A topping id does not exist in the catalog.
    #[error("unknown topping: {0}")]
    UnknownTopping(String),
}

/// Pizza size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    /// Small
    Small,

    /// Medium
    #[default]
    Medium,

    /// Large
    Large,

    /// Extra large
    Xl,
}

impl Size {
    /// Every size, smallest first.
    pub const ALL: [Size; 4] = [Size::Small, Size::Medium, Size::Large, Size::Xl];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Xl => "xl",
        }
    }
}

impl FromStr for Size {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigurationError::UnknownSize(s.to_string()))
    }
}

/// Crust type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crust {
    /// Thin crust
    Thin,

    /// Regular crust
    #[default]
    Regular,

    /// Thick crust
    Thick,

    /// Cheese-stuffed crust
    Stuffed,
}

impl Crust {
    /// Every crust type.
    pub const ALL: [Crust; 4] = [Crust::Thin, Crust::Regular, Crust::Thick, Crust::Stuffed];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Thin => "thin",
            Self::Regular => "regular",
            Self::Thick => "thick",
            Self::Stuffed => "stuffed",
        }
    }
}

impl FromStr for Crust {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|crust| crust.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigurationError::UnknownCrust(s.to_string()))
    }
}

/// Sauce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sauce {
    /// Tomato
    #[default]
    Tomato,

    /// Barbecue
    Bbq,

    /// White (garlic cream)
    White,

    /// Pesto
    Pesto,
}

impl Sauce {
    /// Every sauce.
    pub const ALL: [Sauce; 4] = [Sauce::Tomato, Sauce::Bbq, Sauce::White, Sauce::Pesto];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Tomato => "tomato",
            Self::Bbq => "bbq",
            Self::White => "white",
            Self::Pesto => "pesto",
        }
    }
}

impl FromStr for Sauce {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sauce| sauce.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigurationError::UnknownSauce(s.to_string()))
    }
}

/// Cheese option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cheese {
    /// Regular amount
    #[default]
    Regular,

    /// Extra cheese
    Extra,

    /// Light cheese
    Light,

    /// No cheese
    None,
}

impl Cheese {
    /// Every cheese option.
    pub const ALL: [Cheese; 4] = [Cheese::Regular, Cheese::Extra, Cheese::Light, Cheese::None];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Extra => "extra",
            Self::Light => "light",
            Self::None => "none",
        }
    }
}

impl FromStr for Cheese {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cheese| cheese.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigurationError::UnknownCheese(s.to_string()))
    }
}

macro_rules! display_via_to_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.to_str())
                }
            }
        )+
    };
}

display_via_to_str!(Size, Crust, Sauce, Cheese);

/// A set of toppings, at most one per topping id.
///
/// Toppings are kept sorted by id, so two sets holding the same ids compare
/// equal regardless of the order they were chosen in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Topping>", into = "Vec<Topping>")]
pub struct ToppingSet {
    toppings: SmallVec<[Topping; 4]>,
}

impl ToppingSet {
    /// An empty topping set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a topping. Returns `false` if a topping with the same id was
    /// already present, in which case the set is unchanged.
    pub fn insert(&mut self, topping: Topping) -> bool {
        match self
            .toppings
            .binary_search_by(|existing| existing.id.as_str().cmp(topping.id.as_str()))
        {
            Ok(_) => false,
            Err(position) => {
                self.toppings.insert(position, topping);
                true
            }
        }
    }

    /// Whether a topping with this id is in the set.
    pub fn contains(&self, id: &str) -> bool {
        self.toppings
            .binary_search_by(|existing| existing.id.as_str().cmp(id))
            .is_ok()
    }

    /// Iterate the toppings in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Topping> {
        self.toppings.iter()
    }

    /// Number of toppings.
    pub fn len(&self) -> usize {
        self.toppings.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.toppings.is_empty()
    }
}

impl PartialEq for ToppingSet {
    fn eq(&self, other: &Self) -> bool {
        self.toppings.len() == other.toppings.len()
            && self
                .toppings
                .iter()
                .zip(other.toppings.iter())
                .all(|(a, b)| a.id == b.id)
    }
}

impl Eq for ToppingSet {}

impl FromIterator<Topping> for ToppingSet {
    fn from_iter<I: IntoIterator<Item = Topping>>(iter: I) -> Self {
        let mut set = Self::empty();

        for topping in iter {
            set.insert(topping);
        }

        set
    }
}

impl From<Vec<Topping>> for ToppingSet {
    fn from(toppings: Vec<Topping>) -> Self {
        toppings.into_iter().collect()
    }
}

impl From<ToppingSet> for Vec<Topping> {
    fn from(set: ToppingSet) -> Self {
        set.toppings.into_vec()
    }
}

/// A fully specified pizza customization.
///
/// Equality is the cart's notion of "the same pizza": matching size, crust,
/// sauce and cheese plus an identical set of topping ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaConfiguration {
    /// Size
    pub size: Size,

    /// Crust
    pub crust: Crust,

    /// Sauce (price neutral)
    pub sauce: Sauce,

    /// Cheese (price neutral)
    pub cheese: Cheese,

    /// Extra toppings
    pub toppings: ToppingSet,
}

impl PizzaConfiguration {
    /// Create a configuration from its parts.
    pub fn new(
        size: Size,
        crust: Crust,
        sauce: Sauce,
        cheese: Cheese,
        toppings: impl IntoIterator<Item = Topping>,
    ) -> Self {
        Self {
            size,
            crust,
            sauce,
            cheese,
            toppings: toppings.into_iter().collect(),
        }
    }

    /// One-line description, e.g. `large, stuffed crust, tomato, regular cheese + Bacon, Pepperoni`.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}, {} crust, {}, {} cheese",
            self.size, self.crust, self.sauce, self.cheese
        );

        if !self.toppings.is_empty() {
            let names: Vec<&str> = self.toppings.iter().map(|t| t.name.as_str()).collect();
            summary.push_str(" + ");
            summary.push_str(&names.join(", "));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::catalog::ToppingCategory;

    use super::*;

    fn topping(id: &str, cents: i64) -> Topping {
        Topping {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: ToppingCategory::Meat,
            price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn enums_parse_case_insensitively() -> TestResult {
        assert_eq!("XL".parse::<Size>()?, Size::Xl);
        assert_eq!(" stuffed ".parse::<Crust>()?, Crust::Stuffed);
        assert_eq!("BBQ".parse::<Sauce>()?, Sauce::Bbq);
        assert_eq!("none".parse::<Cheese>()?, Cheese::None);

        Ok(())
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "huge".parse::<Size>(),
            Err(ConfigurationError::UnknownSize("huge".to_string()))
        );
        assert!(matches!(
            "deep".parse::<Crust>(),
            Err(ConfigurationError::UnknownCrust(_))
        ));
        assert!(matches!(
            "ranch".parse::<Sauce>(),
            Err(ConfigurationError::UnknownSauce(_))
        ));
        assert!(matches!(
            "double".parse::<Cheese>(),
            Err(ConfigurationError::UnknownCheese(_))
        ));
    }

    #[test]
    fn defaults_match_customizer_defaults() {
        let config = PizzaConfiguration::default();

        assert_eq!(config.size, Size::Medium);
        assert_eq!(config.crust, Crust::Regular);
        assert_eq!(config.sauce, Sauce::Tomato);
        assert_eq!(config.cheese, Cheese::Regular);
        assert!(config.toppings.is_empty());
    }

    #[test]
    fn topping_set_ignores_duplicate_ids() {
        let mut set = ToppingSet::empty();

        assert!(set.insert(topping("t1", 150)));
        assert!(!set.insert(topping("t1", 999)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn topping_sets_compare_as_sets() {
        let a: ToppingSet = [topping("t1", 150), topping("t3", 200)].into_iter().collect();
        let b: ToppingSet = [topping("t3", 200), topping("t1", 150)].into_iter().collect();
        let c: ToppingSet = [topping("t1", 150)].into_iter().collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn contains_looks_up_by_id() {
        let set: ToppingSet = [topping("t2", 150), topping("t1", 150)].into_iter().collect();

        assert!(set.contains("t1"));
        assert!(set.contains("t2"));
        assert!(!set.contains("t3"));
    }

    #[test]
    fn configurations_differing_only_in_sauce_are_not_equivalent() {
        let a = PizzaConfiguration::new(Size::Large, Crust::Thin, Sauce::Tomato, Cheese::Regular, []);
        let b = PizzaConfiguration::new(Size::Large, Crust::Thin, Sauce::Pesto, Cheese::Regular, []);

        assert_ne!(a, b);
    }

    #[test]
    fn deserialized_toppings_are_canonicalized() -> TestResult {
        let json = r#"[
            {"id":"t3","name":"Bacon","category":"meat","price":"2.00"},
            {"id":"t1","name":"Pepperoni","category":"meat","price":"1.50"},
            {"id":"t3","name":"Bacon","category":"meat","price":"2.00"}
        ]"#;

        let set: ToppingSet = serde_json::from_str(json)?;
        let ids: Vec<&str> = set.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, ["t1", "t3"]);

        Ok(())
    }

    #[test]
    fn summary_lists_toppings() {
        let config = PizzaConfiguration::new(
            Size::Large,
            Crust::Stuffed,
            Sauce::Tomato,
            Cheese::Regular,
            [topping("t1", 150)],
        );

        assert_eq!(
            config.summary(),
            "large, stuffed crust, tomato, regular cheese + T1"
        );
    }
}
