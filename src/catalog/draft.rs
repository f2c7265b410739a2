//! Editable draft of a new product.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::api::NewProduct;

/// One editable field of the add-product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Price,
    Img,
    Description,
}

impl DraftField {
    /// Form input name.
    pub fn name(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Price => "price",
            DraftField::Img => "img",
            DraftField::Description => "description",
        }
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(DraftField::Title),
            "price" => Ok(DraftField::Price),
            "img" => Ok(DraftField::Img),
            "description" => Ok(DraftField::Description),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(DraftField),

    #[error("price '{0}' is not a number")]
    InvalidPrice(String),

    #[error("price must not be negative")]
    NegativePrice,
}

/// Raw form text for a product that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub title: String,
    pub price: String,
    pub img: String,
    pub description: String,
}

impl Draft {
    /// Replace one field; the last write wins.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Title => &mut self.title,
            DraftField::Price => &mut self.price,
            DraftField::Img => &mut self.img,
            DraftField::Description => &mut self.description,
        };
        *slot = value.into();
    }

    /// Apply the required-field policy and produce the create body.
    ///
    /// Text fields must contain something other than whitespace and are sent as typed.
    /// Price must parse as a finite number that is not negative.
    pub fn validate(&self) -> Result<NewProduct, DraftError> {
        for (field, value) in [
            (DraftField::Title, &self.title),
            (DraftField::Price, &self.price),
            (DraftField::Img, &self.img),
            (DraftField::Description, &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(DraftError::Missing(field));
            }
        }

        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| DraftError::InvalidPrice(self.price.clone()))?;
        if price < 0.0 {
            return Err(DraftError::NegativePrice);
        }

        Ok(NewProduct {
            title: self.title.clone(),
            price,
            img: self.img.clone(),
            description: self.description.clone(),
        })
    }
}
