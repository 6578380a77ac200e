use std::collections::HashSet;

use postgres::Client;
use tracing::{debug, error, info, trace};

use super::{
    CatalogSnapshot, ColumnReference, ColumnRow, EnumRow, Introspector, RelationshipRow,
    TableFilter, TableRow, ViewRow,
};
use crate::error::ForgeError;

/// PostgreSQL catalog introspector
pub struct PostgresIntrospector<'a> {
    client: &'a mut Client,
}

impl<'a> PostgresIntrospector<'a> {
    pub fn new(client: &'a mut Client) -> Self {
        Self { client }
    }
}

impl Introspector for PostgresIntrospector<'_> {
    fn introspect(
        &mut self,
        namespace: &str,
        filter: &TableFilter,
    ) -> Result<CatalogSnapshot, ForgeError> {
        info!(namespace = ?namespace, "Starting catalog introspection");

        let enums = query_enums(self.client, namespace)?;
        debug!(count = ?enums.len(), "Found enum types");

        let all_table_names = query_tables(self.client, namespace)?;
        debug!(count = ?all_table_names.len(), "Found all tables");

        let table_names: Vec<String> = all_table_names
            .into_iter()
            .filter(|name| filter.should_include(name))
            .collect();
        debug!(count = ?table_names.len(), "Tables after filtering");

        let mut tables = Vec::with_capacity(table_names.len());
        for table_name in table_names {
            debug!(table = ?table_name, "Introspecting table");

            let mut columns = query_columns(self.client, namespace, &table_name, &enums)?;
            trace!(table = ?table_name, columns = ?columns.len(), "Found columns");

            let primary_key = query_primary_key(self.client, namespace, &table_name)?;
            trace!(table = ?table_name, primary_key = ?primary_key, "Found primary key");

            let unique = query_unique_columns(self.client, namespace, &table_name)?;
            trace!(table = ?table_name, unique = ?unique, "Found unique columns");

            for col in &mut columns {
                col.primary_key = primary_key.contains(&col.name);
                col.unique = unique.contains(&col.name);
            }

            tables.push(TableRow {
                name: table_name,
                columns,
            });
        }

        let relationships = query_relationships(self.client, namespace)?;
        debug!(count = ?relationships.len(), "Found foreign keys");

        // Annotate the referencing columns so each column row carries its own
        // foreign-key reference alongside the flat relationship list.
        for rel in &relationships {
            if let Some(table) = tables.iter_mut().find(|t| t.name == rel.table) {
                if let Some(col) = table.columns.iter_mut().find(|c| c.name == rel.column) {
                    col.references = Some(ColumnReference {
                        table: rel.foreign_table.clone(),
                        column: rel.foreign_column.clone(),
                    });
                }
            }
        }

        let views = query_views(self.client, namespace)?;
        debug!(count = ?views.len(), "Found views");

        info!(
            namespace = ?namespace,
            tables = ?tables.len(),
            relationships = ?relationships.len(),
            views = ?views.len(),
            enums = ?enums.len(),
            "Catalog introspection complete"
        );

        Ok(CatalogSnapshot {
            namespace: namespace.to_string(),
            tables,
            relationships,
            views,
            enums,
        })
    }
}

fn catalog_error(namespace: &str, message: String) -> ForgeError {
    ForgeError::Catalog {
        namespace: namespace.to_string(),
        message,
    }
}

/// Query all table names in a namespace
fn query_tables(client: &mut Client, namespace: &str) -> Result<Vec<String>, ForgeError> {
    trace!(namespace = ?namespace, "Querying tables");

    let sql = r#"
        SELECT c.relname AS table_name
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE c.relkind = 'r'
            AND n.nspname = $1
        ORDER BY c.relname
    "#;

    let rows = client
        .query(sql, &[&namespace])
        .map_err(|e| catalog_error(namespace, format!("Failed to query tables: {}", e)))?;

    let tables = rows.iter().map(|row| row.get("table_name")).collect();
    trace!(tables = ?tables, "Tables found");
    Ok(tables)
}

/// Query all columns for a table
fn query_columns(
    client: &mut Client,
    namespace: &str,
    table_name: &str,
    enums: &[EnumRow],
) -> Result<Vec<ColumnRow>, ForgeError> {
    trace!(namespace = ?namespace, table = ?table_name, "Querying columns");

    let sql = r#"
        SELECT
            a.attname AS column_name,
            format_type(a.atttypid, a.atttypmod) AS data_type,
            NOT a.attnotnull AS is_nullable,
            pg_get_expr(d.adbin, d.adrelid) AS default_value,
            a.attnum AS ordinal_position
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        LEFT JOIN pg_attrdef d ON d.adrelid = c.oid AND d.adnum = a.attnum
        WHERE c.relname = $1
            AND n.nspname = $2
            AND a.attnum > 0
            AND NOT a.attisdropped
        ORDER BY a.attnum
    "#;

    let rows = client.query(sql, &[&table_name, &namespace]).map_err(|e| {
        error!(
            namespace = ?namespace,
            table = ?table_name,
            error = ?e,
            "Failed to query columns"
        );
        catalog_error(
            namespace,
            format!("Failed to query columns for table '{}': {}", table_name, e),
        )
    })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let column_name: String = row.get("column_name");
        let full_type: String = row.get("data_type");
        let nullable: bool = row.get("is_nullable");
        let default: Option<String> = row.get("default_value");
        let position: i32 = i32::from(row.get::<_, i16>("ordinal_position"));

        let is_array = full_type.trim_end().ends_with("[]");
        let base_type = base_type_of(&full_type);
        let max_length = length_of(&full_type);
        let enum_labels = enums
            .iter()
            .find(|e| e.name == base_type)
            .map(|e| e.labels.clone())
            .unwrap_or_default();

        trace!(
            column = ?column_name,
            data_type = ?full_type,
            base_type = ?base_type,
            is_nullable = ?nullable,
            has_default = ?default.is_some(),
            "Parsed column"
        );

        columns.push(ColumnRow {
            name: column_name,
            base_type,
            full_type,
            nullable,
            default,
            enum_labels,
            is_array,
            primary_key: false,
            unique: false,
            max_length,
            references: None,
            position,
        });
    }

    Ok(columns)
}

/// Query primary key columns for a table
fn query_primary_key(
    client: &mut Client,
    namespace: &str,
    table_name: &str,
) -> Result<HashSet<String>, ForgeError> {
    trace!(namespace = ?namespace, table = ?table_name, "Querying primary key");

    let sql = r#"
        SELECT a.attname AS column_name
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = ANY(con.conkey)
        WHERE con.contype = 'p'
            AND c.relname = $1
            AND n.nspname = $2
        ORDER BY array_position(con.conkey, a.attnum)
    "#;

    let rows = client.query(sql, &[&table_name, &namespace]).map_err(|e| {
        catalog_error(
            namespace,
            format!(
                "Failed to query primary key for table '{}': {}",
                table_name, e
            ),
        )
    })?;

    Ok(rows.iter().map(|row| row.get("column_name")).collect())
}

/// Query single-column unique constraints for a table
fn query_unique_columns(
    client: &mut Client,
    namespace: &str,
    table_name: &str,
) -> Result<HashSet<String>, ForgeError> {
    trace!(namespace = ?namespace, table = ?table_name, "Querying unique constraints");

    let sql = r#"
        SELECT a.attname AS column_name
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = con.conkey[1]
        WHERE con.contype = 'u'
            AND array_length(con.conkey, 1) = 1
            AND c.relname = $1
            AND n.nspname = $2
    "#;

    let rows = client.query(sql, &[&table_name, &namespace]).map_err(|e| {
        catalog_error(
            namespace,
            format!(
                "Failed to query unique constraints for table '{}': {}",
                table_name, e
            ),
        )
    })?;

    Ok(rows.iter().map(|row| row.get("column_name")).collect())
}

/// Query all single-column foreign keys in a namespace as flat rows
fn query_relationships(
    client: &mut Client,
    namespace: &str,
) -> Result<Vec<RelationshipRow>, ForgeError> {
    trace!(namespace = ?namespace, "Querying foreign keys");

    let sql = r#"
        SELECT
            c.relname AS table_name,
            a.attname AS column_name,
            cf.relname AS foreign_table,
            af.attname AS foreign_column,
            con.conname AS constraint_name
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_class cf ON cf.oid = con.confrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = con.conkey[1]
        JOIN pg_attribute af ON af.attrelid = cf.oid AND af.attnum = con.confkey[1]
        WHERE con.contype = 'f'
            AND n.nspname = $1
        ORDER BY con.conname
    "#;

    let rows = client.query(sql, &[&namespace]).map_err(|e| {
        error!(namespace = ?namespace, error = ?e, "Failed to query foreign keys");
        catalog_error(namespace, format!("Failed to query foreign keys: {}", e))
    })?;

    let relationships = rows
        .iter()
        .map(|row| RelationshipRow {
            table: row.get("table_name"),
            column: row.get("column_name"),
            foreign_table: row.get("foreign_table"),
            foreign_column: row.get("foreign_column"),
            constraint: row.get("constraint_name"),
        })
        .collect();

    Ok(relationships)
}

/// Query all views in a namespace with their column names
fn query_views(client: &mut Client, namespace: &str) -> Result<Vec<ViewRow>, ForgeError> {
    trace!(namespace = ?namespace, "Querying views");

    let sql = r#"
        SELECT c.relname AS view_name, a.attname AS column_name
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_attribute a ON a.attrelid = c.oid
        WHERE c.relkind = 'v'
            AND n.nspname = $1
            AND a.attnum > 0
            AND NOT a.attisdropped
        ORDER BY c.relname, a.attnum
    "#;

    let rows = client.query(sql, &[&namespace]).map_err(|e| {
        catalog_error(namespace, format!("Failed to query views: {}", e))
    })?;

    let mut views: Vec<ViewRow> = Vec::new();
    for row in rows {
        let view_name: String = row.get("view_name");
        let column_name: String = row.get("column_name");

        if let Some(existing) = views.iter_mut().find(|v| v.name == view_name) {
            existing.columns.push(column_name);
        } else {
            trace!(view = ?view_name, "Found view");
            views.push(ViewRow {
                name: view_name,
                columns: vec![column_name],
            });
        }
    }

    Ok(views)
}

/// Query all enum types in a namespace
fn query_enums(client: &mut Client, namespace: &str) -> Result<Vec<EnumRow>, ForgeError> {
    trace!(namespace = ?namespace, "Querying enum types");

    let sql = r#"
        SELECT
            t.typname AS enum_name,
            e.enumlabel AS enum_value
        FROM pg_type t
        JOIN pg_enum e ON e.enumtypid = t.oid
        JOIN pg_namespace n ON n.oid = t.typnamespace
        WHERE n.nspname = $1
        ORDER BY t.typname, e.enumsortorder
    "#;

    let rows = client.query(sql, &[&namespace]).map_err(|e| {
        error!(namespace = ?namespace, error = ?e, "Failed to query enum types");
        catalog_error(namespace, format!("Failed to query enums: {}", e))
    })?;

    let mut enums: Vec<EnumRow> = Vec::new();
    for row in rows {
        let enum_name: String = row.get("enum_name");
        let enum_value: String = row.get("enum_value");

        if let Some(existing) = enums.iter_mut().find(|e| e.name == enum_name) {
            existing.labels.push(enum_value);
        } else {
            trace!(enum_name = ?enum_name, "Found new enum type");
            enums.push(EnumRow {
                name: enum_name,
                labels: vec![enum_value],
            });
        }
    }

    Ok(enums)
}

/// Base type name with parameters and array suffix stripped
fn base_type_of(full_type: &str) -> String {
    let mut s = full_type.trim();
    if let Some(stripped) = s.strip_suffix("[]") {
        s = stripped.trim_end();
    }
    if let Some(idx) = s.find('(') {
        s = s[..idx].trim_end();
    }
    s.to_string()
}

/// Length parameter from a type like "character varying(255)"
fn length_of(full_type: &str) -> Option<u32> {
    let start = full_type.find('(')?;
    let end = full_type.find(')')?;
    let len_str = &full_type[start + 1..end];
    let first_num = len_str.split(',').next().unwrap_or(len_str);
    first_num.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_type_of() {
        assert_eq!(base_type_of("character varying(255)"), "character varying");
        assert_eq!(base_type_of("integer[]"), "integer");
        assert_eq!(base_type_of("numeric(10,2)"), "numeric");
        assert_eq!(base_type_of("uuid"), "uuid");
    }

    #[test]
    fn test_length_of() {
        assert_eq!(length_of("character varying(255)"), Some(255));
        assert_eq!(length_of("numeric(10,2)"), Some(10));
        assert_eq!(length_of("text"), None);
    }
}
