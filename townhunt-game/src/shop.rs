//! Shop collaborator contract.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TownError;
use crate::hunter::Hunter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopChoice {
    Buy,
    Sell,
}

impl ShopChoice {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for ShopChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShopChoice {
    type Err = TownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "buy" => Ok(Self::Buy),
            "s" | "sell" => Ok(Self::Sell),
            other => Err(TownError::UnknownShopChoice {
                input: other.to_string(),
            }),
        }
    }
}

/// A shop runs its own transactions and messaging; the town only hands over the hunter.
pub trait Shop {
    fn enter<H: Hunter + ?Sized>(&mut self, hunter: &mut H, choice: ShopChoice);
}

impl<S: Shop + ?Sized> Shop for &mut S {
    fn enter<H: Hunter + ?Sized>(&mut self, hunter: &mut H, choice: ShopChoice) {
        (**self).enter(hunter, choice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!("b".parse::<ShopChoice>().unwrap(), ShopChoice::Buy);
        assert_eq!(" SELL ".parse::<ShopChoice>().unwrap(), ShopChoice::Sell);
        assert_eq!(
            "haggle".parse::<ShopChoice>(),
            Err(TownError::UnknownShopChoice {
                input: "haggle".to_string()
            })
        );
    }
}
