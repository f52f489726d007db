//! Normalizes product options from Spree storefront JSON:API responses.

pub mod config;
pub mod error;
pub mod jsonapi;
pub mod options;
pub mod product;

pub use error::{Error, Result};
pub use jsonapi::{Document, IncludedLookup, Resource};
pub use options::{NormalizedOption, NormalizedOptionValue, expand_options};
pub use product::{ProductOptions, expand_document, expand_product_options};
