use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A path id made only of digits that does not fit [`DbId`].
    #[error("Entity not found: {entity} with id {raw}")]
    IdOutOfRange { entity: &'static str, raw: String },

    #[error("Division by zero")]
    DivisionByZero,
}
