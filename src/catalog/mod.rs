//! Catalog access
//!
//! Raw row types describing tables, columns, relationships and views as read
//! from the data source, plus the `Introspector` trait implemented per
//! database. The catalog is a one-shot bulk read: an introspector fetches
//! everything up front and the connection is not touched again during
//! derivation or emission.

use crate::error::ForgeError;

/// One catalog column as read from the data source
#[derive(Debug, Clone, Default)]
pub struct ColumnRow {
    pub name: String,
    /// Base type name with parameters stripped (e.g. "character varying")
    pub base_type: String,
    /// Full type text as reported by the catalog (e.g. "character varying(255)")
    pub full_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    /// Ordered labels when the base type is an enum
    pub enum_labels: Vec<String>,
    pub is_array: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub max_length: Option<u32>,
    pub references: Option<ColumnReference>,
    pub position: i32,
}

/// Foreign-key reference carried on a column row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
    pub table: String,
    pub column: String,
}

/// One catalog table with its ordered columns
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub name: String,
    pub columns: Vec<ColumnRow>,
}

/// One flat foreign-key row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRow {
    pub table: String,
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
    pub constraint: String,
}

/// One catalog view; column metadata only, no relationship graph
#[derive(Debug, Clone, Default)]
pub struct ViewRow {
    pub name: String,
    pub columns: Vec<String>,
}

/// A custom enum type defined in the catalog
#[derive(Debug, Clone)]
pub struct EnumRow {
    pub name: String,
    pub labels: Vec<String>,
}

/// Everything read from one catalog namespace in one pass
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub namespace: String,
    pub tables: Vec<TableRow>,
    pub relationships: Vec<RelationshipRow>,
    pub views: Vec<ViewRow>,
    pub enums: Vec<EnumRow>,
}

/// Filters to apply during introspection
#[derive(Debug, Default, Clone)]
pub struct TableFilter {
    /// Only include these tables (if Some)
    pub include: Option<Vec<String>>,
    /// Exclude these tables
    pub exclude: Option<Vec<String>>,
}

impl TableFilter {
    /// Check if a table should be included
    pub fn should_include(&self, table_name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.iter().any(|t| t == table_name) {
                return false;
            }
        }

        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|t| t == table_name) {
                return false;
            }
        }

        true
    }
}

/// Trait for catalog introspection implementations
pub trait Introspector {
    /// Read one namespace's catalog in bulk
    fn introspect(
        &mut self,
        namespace: &str,
        filter: &TableFilter,
    ) -> Result<CatalogSnapshot, ForgeError>;
}

// Feature-gated database implementations
#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresIntrospector;
