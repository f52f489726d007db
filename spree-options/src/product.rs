use serde::Serialize;

use crate::error::Result;
use crate::jsonapi::{Document, IncludedLookup, Resource, find_included_of_type};
use crate::options::{NormalizedOption, OPTION_VALUE_TYPE, fold_option_values};

pub const PRODUCT_TYPE: &str = "product";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptions {
    pub product_id: Option<String>,
    pub options: Vec<NormalizedOption>,
}

/// Variants linked from a product, the default variant first.
pub fn product_variants<'a, L>(lookup: &'a L, product: &Resource) -> Vec<&'a Resource>
where
    L: IncludedLookup + ?Sized,
{
    let mut variants = find_included_of_type(lookup, product, "default_variant");
    for variant in find_included_of_type(lookup, product, "variants") {
        if !variants.iter().any(|seen| seen.id == variant.id) {
            variants.push(variant);
        }
    }
    variants
}

/// Collects the options of every variant of `product`.
///
/// # Errors
///
/// Fails on the first option value that cannot be folded, see
/// [`crate::options::expand_options`].
pub fn expand_product_options<L>(lookup: &L, product: &Resource) -> Result<Vec<NormalizedOption>>
where
    L: IncludedLookup + ?Sized,
{
    let variants = product_variants(lookup, product);
    tracing::debug!(product = %product.id, variants = variants.len(), "expanding product options");

    let option_values = variants
        .iter()
        .flat_map(|variant| find_included_of_type(lookup, variant, "option_values"));

    fold_option_values(lookup, option_values)
}

/// Expands options for each product in the primary data.
///
/// A document without products (e.g. a bare list of option values) is
/// folded from the `option_value` resources in `included` instead.
pub fn expand_document(document: &Document) -> Result<Vec<ProductOptions>> {
    let products: Vec<_> = document
        .primary_resources()
        .into_iter()
        .filter(|resource| resource.resource_type == PRODUCT_TYPE)
        .collect();

    if products.is_empty() {
        tracing::info!("no products in primary data, folding included option values");
        let option_values = document
            .included
            .iter()
            .filter(|resource| resource.resource_type == OPTION_VALUE_TYPE);

        return Ok(vec![ProductOptions {
            product_id: None,
            options: fold_option_values(document, option_values)?,
        }]);
    }

    products
        .into_iter()
        .map(|product| -> Result<ProductOptions> {
            Ok(ProductOptions {
                product_id: Some(product.id.clone()),
                options: expand_product_options(document, product)?,
            })
        })
        .collect()
}
