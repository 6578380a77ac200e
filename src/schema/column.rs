use std::cell::OnceCell;

use crate::catalog::{ColumnReference, ColumnRow};
use crate::naming::NameVariants;
use crate::typemap::{map_type, parse_data_type, DataType, TypeBundle, TypeInput};

/// Everything computed from a column on first use
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub names: NameVariants,
    pub bundle: TypeBundle,
}

/// One table column plus all derived per-target representations.
///
/// Identity is (table, name). Derived state is computed lazily on the first
/// `initialize_code_generation` call and cached, so repeated calls are
/// idempotent.
#[derive(Debug, Clone)]
pub struct Column {
    pub table: String,
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub is_array: bool,
    /// Ordered labels when the base type is an enum, possibly empty
    pub enum_labels: Vec<String>,
    /// Raw default expression text as read from the catalog
    pub default: Option<String>,
    pub primary_key: bool,
    pub unique: bool,
    pub max_length: Option<u32>,
    pub references: Option<ColumnReference>,
    pub position: i32,
    /// Set by `Table::identify_display_column`; at most one per table
    pub display_field: bool,
    derived: OnceCell<Derived>,
}

impl Column {
    pub fn from_row(table: &str, row: ColumnRow) -> Self {
        let data_type = parse_data_type(&row.full_type);
        let is_array = row.is_array || data_type.is_array();
        Self {
            table: table.to_string(),
            name: row.name,
            data_type,
            nullable: row.nullable,
            is_array,
            enum_labels: row.enum_labels,
            default: row.default,
            primary_key: row.primary_key,
            unique: row.unique,
            max_length: row.max_length,
            references: row.references,
            position: row.position,
            display_field: false,
            derived: OnceCell::new(),
        }
    }

    /// Compute naming variants and per-target type bundle.
    ///
    /// Idempotent: the first call computes, later calls return the cache.
    pub fn initialize_code_generation(&self) -> &Derived {
        self.derived.get_or_init(|| {
            let input = TypeInput {
                table: &self.table,
                column: &self.name,
                data_type: &self.data_type,
                nullable: self.nullable,
                enum_labels: &self.enum_labels,
                max_length: self.max_length,
                default: self.default.as_deref(),
            };
            Derived {
                names: NameVariants::derive(&self.name),
                bundle: map_type(&input),
            }
        })
    }

    pub fn names(&self) -> &NameVariants {
        &self.initialize_code_generation().names
    }

    pub fn bundle(&self) -> &TypeBundle {
        &self.initialize_code_generation().bundle
    }

    /// A column is required iff it is not nullable
    pub fn required(&self) -> bool {
        !self.nullable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid_row() -> ColumnRow {
        ColumnRow {
            name: "id".to_string(),
            base_type: "uuid".to_string(),
            full_type: "uuid".to_string(),
            nullable: false,
            default: Some("gen_random_uuid()".to_string()),
            primary_key: true,
            position: 1,
            ..ColumnRow::default()
        }
    }

    #[test]
    fn test_from_row_parses_type() {
        let col = Column::from_row("users", uuid_row());
        assert_eq!(col.data_type, DataType::Uuid);
        assert!(col.primary_key);
        assert!(col.required());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let col = Column::from_row("users", uuid_row());
        let first = col.initialize_code_generation().clone();
        let second = col.initialize_code_generation().clone();
        assert_eq!(first, second);
        assert_eq!(col.names().pascal, "Id");
        assert_eq!(col.bundle().python.literal, "UUID");
    }

    #[test]
    fn test_array_flag_from_type() {
        let row = ColumnRow {
            name: "tags".to_string(),
            base_type: "text".to_string(),
            full_type: "text[]".to_string(),
            nullable: true,
            position: 2,
            ..ColumnRow::default()
        };
        let col = Column::from_row("posts", row);
        assert!(col.is_array);
        assert_eq!(
            col.data_type,
            DataType::Array(Box::new(DataType::Text))
        );
    }
}
