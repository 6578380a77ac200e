use crate::catalog::RelationshipRow;

/// Target side of a relationship edge.
///
/// A self-referencing foreign key carries `SelfReference` instead of a named
/// table so it can never be confused with an edge to a different table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    Named(String),
    SelfReference,
}

/// One directed foreign-key edge.
///
/// Identity is the constraint name. The same `Rc<Relationship>` appears in
/// the source table's outbound map and the target table's inbound map, so
/// both sides observe identical edge data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub constraint: String,
    /// Table holding the referencing column
    pub source_table: String,
    /// Referencing column on the source table
    pub column: String,
    pub target: TableRef,
    /// Referenced column on the target table
    pub foreign_column: String,
}

impl Relationship {
    pub fn from_row(row: &RelationshipRow) -> Self {
        let target = if row.foreign_table == row.table {
            TableRef::SelfReference
        } else {
            TableRef::Named(row.foreign_table.clone())
        };
        Self {
            constraint: row.constraint.clone(),
            source_table: row.table.clone(),
            column: row.column.clone(),
            target,
            foreign_column: row.foreign_column.clone(),
        }
    }

    pub fn is_self_reference(&self) -> bool {
        matches!(self.target, TableRef::SelfReference)
    }

    /// Name of the table on the target side
    pub fn target_name(&self) -> &str {
        match &self.target {
            TableRef::Named(name) => name,
            TableRef::SelfReference => &self.source_table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(table: &str, foreign_table: &str) -> RelationshipRow {
        RelationshipRow {
            table: table.to_string(),
            column: "other_id".to_string(),
            foreign_table: foreign_table.to_string(),
            foreign_column: "id".to_string(),
            constraint: format!("{}_other_id_fkey", table),
        }
    }

    #[test]
    fn test_from_row_named_target() {
        let rel = Relationship::from_row(&row("posts", "users"));
        assert_eq!(rel.target, TableRef::Named("users".to_string()));
        assert!(!rel.is_self_reference());
        assert_eq!(rel.target_name(), "users");
    }

    #[test]
    fn test_from_row_self_reference_uses_sentinel() {
        let rel = Relationship::from_row(&row("categories", "categories"));
        assert_eq!(rel.target, TableRef::SelfReference);
        assert!(rel.is_self_reference());
        assert_eq!(rel.target_name(), "categories");
    }
}
