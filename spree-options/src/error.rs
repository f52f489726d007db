use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A relationship points at a resource that is not in `included`.
    #[error("Option type with id {id} not found.")]
    ReferentialIntegrity { id: String },

    #[error("{resource_type} {id} has no `{relationship}` relationship")]
    MissingRelationship {
        resource_type: String,
        id: String,
        relationship: String,
    },

    #[error("{resource_type} {id} has no string attribute `{attribute}`")]
    MissingAttribute {
        resource_type: String,
        id: String,
        attribute: String,
    },
}
