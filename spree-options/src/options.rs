use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::jsonapi::{IncludedLookup, Resource};

pub const OPTION_VALUE_TYPE: &str = "option_value";
pub const OPTION_TYPE_RELATIONSHIP: &str = "option_type";

/// Display name that marks an option type as the colour picker.
pub const COLOR_DISPLAY_NAME: &str = "Color";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOption {
    pub id: String,
    pub display_name: String,
    pub values: Vec<NormalizedOptionValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOptionValue {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_colors: Option<Vec<String>>,
}

impl NormalizedOption {
    #[must_use]
    pub fn is_color(&self) -> bool {
        self.display_name == COLOR_DISPLAY_NAME
    }
}

/// Folds one `option_value` resource into the accumulated options.
///
/// The option type is resolved through `lookup` only the first time its id
/// is seen. Values are deduplicated by label within their option and the
/// first occurrence wins. The returned vector is a fresh copy; on error
/// nothing is returned and `accumulated` is untouched.
///
/// # Errors
///
/// Returns [`Error::ReferentialIntegrity`] if the option type is not in the
/// side table, and [`Error::MissingRelationship`] or
/// [`Error::MissingAttribute`] if either resource lacks a field the fold
/// reads.
pub fn expand_options<L>(
    lookup: &L,
    option_value: &Resource,
    accumulated: &[NormalizedOption],
) -> Result<Vec<NormalizedOption>>
where
    L: IncludedLookup + ?Sized,
{
    let option_type_ref = option_value.relationship_identifier(OPTION_TYPE_RELATIONSHIP)?;
    let mut expanded = accumulated.to_vec();

    let idx = match expanded
        .iter()
        .position(|option| option.id == option_type_ref.id)
    {
        Some(idx) => idx,
        None => {
            let option_type = lookup
                .find_included(&option_type_ref.resource_type, &option_type_ref.id)
                .ok_or_else(|| Error::ReferentialIntegrity {
                    id: option_type_ref.id.clone(),
                })?;

            expanded.push(NormalizedOption {
                id: option_type.id.clone(),
                display_name: option_type.attribute_str("presentation")?.to_owned(),
                values: Vec::new(),
            });
            expanded.len() - 1
        }
    };
    let option = &mut expanded[idx];

    let is_color = option.is_color();
    let presentation = option_value.attribute_str("presentation")?;
    let label = if is_color {
        option_value.attribute_str("name")?
    } else {
        presentation
    };

    if option.values.iter().any(|value| value.label == label) {
        tracing::trace!(option = %option.id, label, "option value already present");
        return Ok(expanded);
    }

    tracing::debug!(option = %option.id, label, is_color, "adding option value");
    option.values.push(NormalizedOptionValue {
        label: label.to_owned(),
        hex_colors: is_color.then(|| vec![presentation.to_owned()]),
    });

    Ok(expanded)
}

/// Runs [`expand_options`] over `option_values`, starting from no options.
pub fn fold_option_values<'a, L, I>(lookup: &L, option_values: I) -> Result<Vec<NormalizedOption>>
where
    L: IncludedLookup + ?Sized,
    I: IntoIterator<Item = &'a Resource>,
{
    option_values
        .into_iter()
        .try_fold(Vec::new(), |accumulated, option_value| {
            expand_options(lookup, option_value, &accumulated)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(value: serde_json::Value) -> Resource {
        serde_json::from_value(value).unwrap()
    }

    fn option_type(id: &str, presentation: &str) -> Resource {
        resource(json!({
            "type": "option_type",
            "id": id,
            "attributes": { "name": presentation.to_lowercase(), "presentation": presentation }
        }))
    }

    fn option_value(id: &str, option_type_id: &str, name: &str, presentation: &str) -> Resource {
        resource(json!({
            "type": "option_value",
            "id": id,
            "attributes": { "name": name, "presentation": presentation },
            "relationships": {
                "option_type": { "data": { "type": "option_type", "id": option_type_id } }
            }
        }))
    }

    fn plain(label: &str) -> NormalizedOptionValue {
        NormalizedOptionValue {
            label: label.into(),
            hex_colors: None,
        }
    }

    #[test]
    fn first_value_creates_option_from_side_table() {
        let included = [option_type("1", "Size")];
        let large = option_value("11", "1", "large", "Large");

        let options = expand_options(&included[..], &large, &[]).unwrap();

        assert_eq!(
            options,
            [NormalizedOption {
                id: "1".into(),
                display_name: "Size".into(),
                values: vec![plain("Large")],
            }]
        );
    }

    #[test]
    fn existing_option_is_replaced_in_place() {
        let included = [option_type("1", "Size"), option_type("2", "Material")];
        let options = fold_option_values(
            &included[..],
            &[
                option_value("11", "1", "large", "Large"),
                option_value("21", "2", "cotton", "Cotton"),
                option_value("12", "1", "small", "Small"),
            ],
        )
        .unwrap();

        let ids: Vec<_> = options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(options[0].values, [plain("Large"), plain("Small")]);
        assert_eq!(options[1].values, [plain("Cotton")]);
    }

    #[test]
    fn existing_option_does_not_need_side_table() {
        let included = [option_type("1", "Size")];
        let first = expand_options(&included[..], &option_value("11", "1", "l", "Large"), &[])
            .unwrap();

        let empty: [Resource; 0] = [];
        let second =
            expand_options(&empty[..], &option_value("12", "1", "s", "Small"), &first).unwrap();
        assert_eq!(second[0].values, [plain("Large"), plain("Small")]);
    }

    #[test]
    fn duplicate_label_keeps_first_occurrence() {
        let included = [option_type("2", "Color")];
        let red = option_value("21", "2", "Red", "#FF0000");
        let other_red = option_value("22", "2", "Red", "#EE0000");

        let once = expand_options(&included[..], &red, &[]).unwrap();
        let twice = expand_options(&included[..], &other_red, &once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(
            twice[0].values[0].hex_colors.as_deref(),
            Some(&["#FF0000".to_string()][..])
        );
    }

    #[test]
    fn color_match_is_exact() {
        let included = [option_type("3", "color"), option_type("4", "Colour")];
        let options = fold_option_values(
            &included[..],
            &[
                option_value("31", "3", "Red", "#FF0000"),
                option_value("41", "4", "Blue", "#0000FF"),
            ],
        )
        .unwrap();

        assert_eq!(options[0].values, [plain("#FF0000")]);
        assert_eq!(options[1].values, [plain("#0000FF")]);
    }

    #[test]
    fn missing_option_type_is_referential_integrity_error() {
        let included = [option_type("1", "Size")];
        let accumulated = expand_options(&included[..], &option_value("11", "1", "l", "Large"), &[])
            .unwrap();
        let before = accumulated.clone();

        let err = expand_options(&included[..], &option_value("91", "9", "x", "X"), &accumulated)
            .unwrap_err();

        assert_eq!(err, Error::ReferentialIntegrity { id: "9".into() });
        assert_eq!(err.to_string(), "Option type with id 9 not found.");
        assert_eq!(accumulated, before);
    }

    #[test]
    fn malformed_option_value_is_reported() {
        let included = [option_type("1", "Size")];
        let orphan = resource(json!({
            "type": "option_value",
            "id": "11",
            "attributes": { "name": "l", "presentation": "Large" }
        }));
        assert!(matches!(
            expand_options(&included[..], &orphan, &[]),
            Err(Error::MissingRelationship { relationship, .. }) if relationship == "option_type"
        ));

        let unnamed = resource(json!({
            "type": "option_value",
            "id": "12",
            "relationships": {
                "option_type": { "data": { "type": "option_type", "id": "1" } }
            }
        }));
        assert!(matches!(
            expand_options(&included[..], &unnamed, &[]),
            Err(Error::MissingAttribute { attribute, .. }) if attribute == "presentation"
        ));
    }

    #[test]
    fn serializes_with_storefront_field_names() {
        let options = vec![
            NormalizedOption {
                id: "2".into(),
                display_name: "Color".into(),
                values: vec![NormalizedOptionValue {
                    label: "Red".into(),
                    hex_colors: Some(vec!["#FF0000".into()]),
                }],
            },
            NormalizedOption {
                id: "1".into(),
                display_name: "Size".into(),
                values: vec![plain("Large")],
            },
        ];

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!([
                { "id": "2", "displayName": "Color", "values": [{ "label": "Red", "hexColors": ["#FF0000"] }] },
                { "id": "1", "displayName": "Size", "values": [{ "label": "Large" }] }
            ])
        );
    }
}
