//! Comparison classes for PostgreSQL types.

use postgres_types::Type;

/// How values of a column type are brought into a comparable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// Points in time: DATE, TIMESTAMP, TIMESTAMPTZ
    Temporal,
    /// JSON and JSONB documents
    Json,
    /// UUID
    Uuid,
    /// Everything else, compared by its textual rendering
    Scalar,
}

impl TypeClass {
    /// Classify a column type.
    pub fn of(pg_type: &Type) -> Self {
        match *pg_type {
            Type::DATE | Type::TIMESTAMP | Type::TIMESTAMPTZ => TypeClass::Temporal,
            Type::JSON | Type::JSONB => TypeClass::Json,
            Type::UUID => TypeClass::Uuid,
            _ => TypeClass::Scalar,
        }
    }
}
