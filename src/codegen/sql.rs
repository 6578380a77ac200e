//! SQL procedure emitter
//!
//! Renders one DROP FUNCTION, one CREATE OR REPLACE FUNCTION and one literal
//! test statement per procedure kind per table. Tables lacking a primary key
//! lose only the artifacts that structurally need one; the rest of the run
//! continues.

use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::codegen::{Bundle, Emitter, GeneratedFile, Target};
use crate::error::ForgeError;
use crate::ir::{FieldIr, ProcedureIr, ProcedureKind, SchemaIr, TableIr};
use crate::sample::sql_sample;

/// SQL emitter; table order follows the plan (name order), which is fine for
/// a flat procedure list.
#[derive(Debug, Default)]
pub struct SqlEmitter;

impl SqlEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for SqlEmitter {
    fn target(&self) -> Target {
        Target::Sql
    }

    fn emit(&self, plan: &SchemaIr) -> Result<Bundle, ForgeError> {
        info!(namespace = ?plan.namespace, tables = ?plan.tables.len(), "Generating SQL procedures");

        let mut out = String::new();
        out.push_str(&format!(
            "-- Generated procedures for namespace \"{}\". Do not edit.\n\n",
            plan.namespace
        ));

        for table in &plan.tables {
            if table.fields.is_empty() {
                warn!(table = ?table.table, "Table has no columns, skipping procedures");
                continue;
            }
            for proc in &table.procedures {
                match render_procedure(table, proc) {
                    Ok(text) => {
                        out.push_str(&text);
                        out.push('\n');
                    }
                    Err(e @ ForgeError::MissingPrimaryKey { .. }) => {
                        warn!(
                            table = ?table.table,
                            procedure = ?proc.name,
                            error = %e,
                            "Skipping artifact that requires a primary key"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(Bundle {
            target: Target::Sql,
            files: vec![GeneratedFile {
                name: "procedures.sql".to_string(),
                content: out,
            }],
        })
    }
}

fn qident(name: &str) -> String {
    format!("\"{}\"", name)
}

fn select_list(fields: &[FieldIr]) -> String {
    fields
        .iter()
        .map(|f| format!("t.{}", qident(&f.name)))
        .join(", ")
}

fn returns_table(fields: &[FieldIr]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", qident(&f.name), f.sql.literal))
        .join(", ")
}

fn param_list(fields: &[FieldIr]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.names.param, f.sql.literal))
        .join(", ")
}

fn arg_types(fields: &[FieldIr]) -> String {
    fields.iter().map(|f| f.sql.literal.as_str()).join(", ")
}

fn sample_args(table: &TableIr, fields: &[FieldIr]) -> String {
    fields
        .iter()
        .map(|f| {
            sql_sample(
                &table.table,
                &f.name,
                &f.data_type,
                &f.enum_labels,
                f.max_length,
            )
        })
        .join(", ")
}

fn primary_key<'a>(table: &'a TableIr, proc: &ProcedureIr) -> Result<&'a FieldIr, ForgeError> {
    table
        .primary_key_field()
        .ok_or_else(|| ForgeError::MissingPrimaryKey {
            table: table.table.clone(),
            operation: proc.name.clone(),
        })
}

fn render_procedure(table: &TableIr, proc: &ProcedureIr) -> Result<String, ForgeError> {
    if proc.kind.requires_primary_key() && table.primary_key_field().is_none() {
        return Err(ForgeError::MissingPrimaryKey {
            table: table.table.clone(),
            operation: proc.name.clone(),
        });
    }
    match proc.kind {
        ProcedureKind::FetchAll => Ok(render_fetch_all(table, proc)),
        ProcedureKind::FetchById => render_fetch_by_id(table, proc),
        ProcedureKind::Insert => Ok(render_insert(table, proc)),
        ProcedureKind::Upsert => render_upsert(table, proc),
        ProcedureKind::Delete => render_delete(table, proc),
        ProcedureKind::Update => render_update(table, proc),
        ProcedureKind::FetchPaginated => Ok(render_fetch_paginated(table, proc)),
        ProcedureKind::FetchFiltered => Ok(render_fetch_filtered(table, proc)),
        ProcedureKind::FetchWithChildren => render_fetch_with_children(table, proc),
        ProcedureKind::FetchWithParent => render_fetch_with_parent(table, proc),
    }
}

fn render_fetch_all(table: &TableIr, proc: &ProcedureIr) -> String {
    format!(
        "DROP FUNCTION IF EXISTS {name}();\n\
         CREATE OR REPLACE FUNCTION {name}()\n\
         RETURNS TABLE({returns}) AS $$\n\
         BEGIN\n\
         \x20   RETURN QUERY\n\
         \x20   SELECT {select}\n\
         \x20   FROM {table} t;\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT * FROM {name}();\n",
        name = proc.name,
        returns = returns_table(&table.fields),
        select = select_list(&table.fields),
        table = qident(&table.table),
    )
}

fn render_fetch_by_id(table: &TableIr, proc: &ProcedureIr) -> Result<String, ForgeError> {
    let pk = primary_key(table, proc)?;
    Ok(format!(
        "DROP FUNCTION IF EXISTS {name}({pk_type});\n\
         CREATE OR REPLACE FUNCTION {name}({pk_param} {pk_type})\n\
         RETURNS TABLE({returns}) AS $$\n\
         BEGIN\n\
         \x20   RETURN QUERY\n\
         \x20   SELECT {select}\n\
         \x20   FROM {table} t\n\
         \x20   WHERE t.{pk_col} = {pk_param};\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT * FROM {name}({sample});\n",
        name = proc.name,
        pk_type = pk.sql.literal,
        pk_param = pk.names.param,
        returns = returns_table(&table.fields),
        select = select_list(&table.fields),
        table = qident(&table.table),
        pk_col = qident(&pk.name),
        sample = sql_sample(
            &table.table,
            &pk.name,
            &pk.data_type,
            &pk.enum_labels,
            pk.max_length
        ),
    ))
}

fn render_insert(table: &TableIr, proc: &ProcedureIr) -> String {
    let fields = &table.fields;
    format!(
        "DROP FUNCTION IF EXISTS {name}({types});\n\
         CREATE OR REPLACE FUNCTION {name}({params})\n\
         RETURNS void AS $$\n\
         BEGIN\n\
         \x20   INSERT INTO {table} ({cols})\n\
         \x20   VALUES ({values});\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT {name}({samples});\n",
        name = proc.name,
        types = arg_types(fields),
        params = param_list(fields),
        table = qident(&table.table),
        cols = fields.iter().map(|f| qident(&f.name)).join(", "),
        values = fields.iter().map(|f| f.names.param.as_str()).join(", "),
        samples = sample_args(table, fields),
    )
}

fn render_upsert(table: &TableIr, proc: &ProcedureIr) -> Result<String, ForgeError> {
    let pk = primary_key(table, proc)?;
    let fields = &table.fields;
    let non_pk: Vec<&FieldIr> = fields.iter().filter(|f| !f.primary_key).collect();
    let conflict_action = if non_pk.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!(
            "DO UPDATE SET {}",
            non_pk
                .iter()
                .map(|f| format!("{col} = EXCLUDED.{col}", col = qident(&f.name)))
                .join(", ")
        )
    };
    Ok(format!(
        "DROP FUNCTION IF EXISTS {name}({types});\n\
         CREATE OR REPLACE FUNCTION {name}({params})\n\
         RETURNS void AS $$\n\
         BEGIN\n\
         \x20   INSERT INTO {table} ({cols})\n\
         \x20   VALUES ({values})\n\
         \x20   ON CONFLICT ({pk_col}) {action};\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT {name}({samples});\n",
        name = proc.name,
        types = arg_types(fields),
        params = param_list(fields),
        table = qident(&table.table),
        cols = fields.iter().map(|f| qident(&f.name)).join(", "),
        values = fields.iter().map(|f| f.names.param.as_str()).join(", "),
        pk_col = qident(&pk.name),
        action = conflict_action,
        samples = sample_args(table, fields),
    ))
}

fn render_delete(table: &TableIr, proc: &ProcedureIr) -> Result<String, ForgeError> {
    let pk = primary_key(table, proc)?;
    Ok(format!(
        "DROP FUNCTION IF EXISTS {name}({pk_type});\n\
         CREATE OR REPLACE FUNCTION {name}({pk_param} {pk_type})\n\
         RETURNS void AS $$\n\
         BEGIN\n\
         \x20   DELETE FROM {table}\n\
         \x20   WHERE {pk_col} = {pk_param};\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT {name}({sample});\n",
        name = proc.name,
        pk_type = pk.sql.literal,
        pk_param = pk.names.param,
        table = qident(&table.table),
        pk_col = qident(&pk.name),
        sample = sql_sample(
            &table.table,
            &pk.name,
            &pk.data_type,
            &pk.enum_labels,
            pk.max_length
        ),
    ))
}

fn render_update(table: &TableIr, proc: &ProcedureIr) -> Result<String, ForgeError> {
    let pk = primary_key(table, proc)?;
    let non_pk: Vec<&FieldIr> = table.fields.iter().filter(|f| !f.primary_key).collect();
    if non_pk.is_empty() {
        debug!(table = ?table.table, "No non-key columns, emitting update placeholder");
        return Ok(format!(
            "-- {name}: every column participates in the primary key; nothing to update.\n",
            name = proc.name,
        ));
    }
    let mut params = vec![format!("{} {}", pk.names.param, pk.sql.literal)];
    params.extend(
        non_pk
            .iter()
            .map(|f| format!("{} {}", f.names.param, f.sql.literal)),
    );
    let mut types = vec![pk.sql.literal.clone()];
    types.extend(non_pk.iter().map(|f| f.sql.literal.clone()));
    let mut samples = vec![sql_sample(
        &table.table,
        &pk.name,
        &pk.data_type,
        &pk.enum_labels,
        pk.max_length,
    )];
    samples.extend(non_pk.iter().map(|f| {
        sql_sample(
            &table.table,
            &f.name,
            &f.data_type,
            &f.enum_labels,
            f.max_length,
        )
    }));
    Ok(format!(
        "DROP FUNCTION IF EXISTS {name}({types});\n\
         CREATE OR REPLACE FUNCTION {name}({params})\n\
         RETURNS void AS $$\n\
         BEGIN\n\
         \x20   UPDATE {table} SET\n\
         \x20       {sets}\n\
         \x20   WHERE {pk_col} = {pk_param};\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT {name}({samples});\n",
        name = proc.name,
        types = types.join(", "),
        params = params.join(", "),
        table = qident(&table.table),
        sets = non_pk
            .iter()
            .map(|f| format!("{} = {}", qident(&f.name), f.names.param))
            .join(",\n        "),
        pk_col = qident(&pk.name),
        pk_param = pk.names.param,
        samples = samples.join(", "),
    ))
}

fn order_field<'a>(table: &'a TableIr) -> &'a FieldIr {
    table.primary_key_field().unwrap_or(&table.fields[0])
}

fn render_fetch_paginated(table: &TableIr, proc: &ProcedureIr) -> String {
    let order_col = order_field(table);
    format!(
        "DROP FUNCTION IF EXISTS {name}(integer, integer);\n\
         CREATE OR REPLACE FUNCTION {name}(p_limit integer, p_offset integer)\n\
         RETURNS TABLE({returns}) AS $$\n\
         BEGIN\n\
         \x20   RETURN QUERY\n\
         \x20   SELECT {select}\n\
         \x20   FROM {table} t\n\
         \x20   ORDER BY t.{order_col}\n\
         \x20   LIMIT p_limit OFFSET p_offset;\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT * FROM {name}(10, 0);\n",
        name = proc.name,
        returns = returns_table(&table.fields),
        select = select_list(&table.fields),
        table = qident(&table.table),
        order_col = qident(&order_col.name),
    )
}

fn render_fetch_filtered(table: &TableIr, proc: &ProcedureIr) -> String {
    // Filter on the display field when one exists, else the primary key,
    // else the first column.
    let filter_col = table
        .display_field
        .as_deref()
        .and_then(|name| table.fields.iter().find(|f| f.name == name))
        .unwrap_or_else(|| order_field(table));
    format!(
        "DROP FUNCTION IF EXISTS {name}(text);\n\
         CREATE OR REPLACE FUNCTION {name}(p_filter text)\n\
         RETURNS TABLE({returns}) AS $$\n\
         BEGIN\n\
         \x20   RETURN QUERY\n\
         \x20   SELECT {select}\n\
         \x20   FROM {table} t\n\
         \x20   WHERE t.{filter_col}::text ILIKE '%' || p_filter || '%';\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT * FROM {name}('sample');\n",
        name = proc.name,
        returns = returns_table(&table.fields),
        select = select_list(&table.fields),
        table = qident(&table.table),
        filter_col = qident(&filter_col.name),
    )
}

fn render_fetch_with_children(table: &TableIr, proc: &ProcedureIr) -> Result<String, ForgeError> {
    let pk = primary_key(table, proc)?;
    let children: Vec<_> = table.children().collect();
    let body = if children.is_empty() {
        "SELECT to_jsonb(t)".to_string()
    } else {
        let joins = children
            .iter()
            .map(|c| {
                format!(
                    "'{field}', (SELECT COALESCE(jsonb_agg(to_jsonb(c)), '[]'::jsonb) FROM {child} c WHERE c.{fk} = t.{refcol})",
                    field = c.field_name,
                    child = qident(&c.table),
                    fk = qident(&c.column),
                    refcol = qident(&c.references),
                )
            })
            .join(",\n            ");
        format!(
            "SELECT to_jsonb(t)\n\
             \x20       || jsonb_build_object(\n\
             \x20           {joins}\n\
             \x20       )",
            joins = joins
        )
    };
    Ok(format!(
        "DROP FUNCTION IF EXISTS {name}({pk_type});\n\
         CREATE OR REPLACE FUNCTION {name}({pk_param} {pk_type})\n\
         RETURNS jsonb AS $$\n\
         BEGIN\n\
         \x20   RETURN (\n\
         \x20   {body}\n\
         \x20   FROM {table} t\n\
         \x20   WHERE t.{pk_col} = {pk_param}\n\
         \x20   );\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT {name}({sample});\n",
        name = proc.name,
        pk_type = pk.sql.literal,
        pk_param = pk.names.param,
        body = body,
        table = qident(&table.table),
        pk_col = qident(&pk.name),
        sample = sql_sample(
            &table.table,
            &pk.name,
            &pk.data_type,
            &pk.enum_labels,
            pk.max_length
        ),
    ))
}

fn render_fetch_with_parent(table: &TableIr, proc: &ProcedureIr) -> Result<String, ForgeError> {
    let pk = primary_key(table, proc)?;
    let parents: Vec<_> = table.parents().collect();
    if parents.is_empty() {
        warn!(
            table = ?table.table,
            procedure = ?proc.name,
            "Table has no outbound relationship, emitting parent-fetch placeholder"
        );
        return Ok(format!(
            "-- {name}: {table} has no parent relationship; the row is returned alone.\n\
             DROP FUNCTION IF EXISTS {name}({pk_type});\n\
             CREATE OR REPLACE FUNCTION {name}({pk_param} {pk_type})\n\
             RETURNS jsonb AS $$\n\
             BEGIN\n\
             \x20   RETURN (SELECT to_jsonb(t) FROM {table_q} t WHERE t.{pk_col} = {pk_param});\n\
             END;\n\
             $$ LANGUAGE plpgsql;\n\
             SELECT {name}({sample});\n",
            name = proc.name,
            table = table.table,
            table_q = qident(&table.table),
            pk_type = pk.sql.literal,
            pk_param = pk.names.param,
            pk_col = qident(&pk.name),
            sample = sql_sample(
                &table.table,
                &pk.name,
                &pk.data_type,
                &pk.enum_labels,
                pk.max_length
            ),
        ));
    }
    let joins = parents
        .iter()
        .map(|p| {
            format!(
                "'{field}', (SELECT to_jsonb(p) FROM {parent} p WHERE p.{refcol} = t.{fk})",
                field = p.field_name,
                parent = qident(&p.table),
                refcol = qident(&p.references),
                fk = qident(&p.column),
            )
        })
        .join(",\n            ");
    Ok(format!(
        "DROP FUNCTION IF EXISTS {name}({pk_type});\n\
         CREATE OR REPLACE FUNCTION {name}({pk_param} {pk_type})\n\
         RETURNS jsonb AS $$\n\
         BEGIN\n\
         \x20   RETURN (\n\
         \x20   SELECT to_jsonb(t)\n\
         \x20       || jsonb_build_object(\n\
         \x20           {joins}\n\
         \x20       )\n\
         \x20   FROM {table} t\n\
         \x20   WHERE t.{pk_col} = {pk_param}\n\
         \x20   );\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         SELECT {name}({sample});\n",
        name = proc.name,
        pk_type = pk.sql.literal,
        pk_param = pk.names.param,
        joins = joins,
        table = qident(&table.table),
        pk_col = qident(&pk.name),
        sample = sql_sample(
            &table.table,
            &pk.name,
            &pk.data_type,
            &pk.enum_labels,
            pk.max_length
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColumnRow, RelationshipRow, TableRow};
    use crate::ir::plan_table;
    use crate::schema::{Relationship, Table};
    use std::rc::Rc;

    fn col(name: &str, full_type: &str, position: i32, pk: bool) -> ColumnRow {
        ColumnRow {
            name: name.to_string(),
            base_type: full_type.to_string(),
            full_type: full_type.to_string(),
            nullable: false,
            primary_key: pk,
            position,
            ..ColumnRow::default()
        }
    }

    fn users() -> Table {
        let mut t = Table::from_row(TableRow {
            name: "users".to_string(),
            columns: vec![col("id", "uuid", 1, true), col("email", "text", 2, false)],
        });
        t.identify_display_column();
        t
    }

    fn proc(table: &TableIr, kind: ProcedureKind) -> ProcedureIr {
        table
            .procedures
            .iter()
            .find(|p| p.kind == kind)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_fetch_all_lists_columns_in_declared_order() {
        let ir = plan_table(&users());
        let text = render_fetch_all(&ir, &proc(&ir, ProcedureKind::FetchAll));
        assert!(text.contains("RETURNS TABLE(\"id\" uuid, \"email\" text)"));
        assert!(text.contains("SELECT t.\"id\", t.\"email\""));
        assert!(text.contains("DROP FUNCTION IF EXISTS fetch_all_users();"));
        assert!(text.contains("SELECT * FROM fetch_all_users();"));
    }

    #[test]
    fn test_fetch_by_id_requires_primary_key() {
        let t = Table::from_row(TableRow {
            name: "logs".to_string(),
            columns: vec![col("message", "text", 1, false)],
        });
        let ir = plan_table(&t);
        let err = render_procedure(&ir, &proc(&ir, ProcedureKind::FetchById)).unwrap_err();
        match err {
            ForgeError::MissingPrimaryKey { table, operation } => {
                assert_eq!(table, "logs");
                assert_eq!(operation, "fetch_by_id_logs");
            }
            other => panic!("expected MissingPrimaryKey, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_by_id_with_primary_key() {
        let ir = plan_table(&users());
        let text = render_procedure(&ir, &proc(&ir, ProcedureKind::FetchById)).unwrap();
        assert!(text.contains("fetch_by_id_users(p_id uuid)"));
        assert!(text.contains("WHERE t.\"id\" = p_id;"));
    }

    #[test]
    fn test_insert_uses_param_variants() {
        let ir = plan_table(&users());
        let text = render_insert(&ir, &proc(&ir, ProcedureKind::Insert));
        assert!(text.contains("insert_users(p_id uuid, p_email text)"));
        assert!(text.contains("INSERT INTO \"users\" (\"id\", \"email\")"));
        assert!(text.contains("VALUES (p_id, p_email);"));
    }

    #[test]
    fn test_upsert_excludes_key_from_set_list() {
        let ir = plan_table(&users());
        let text = render_upsert(&ir, &proc(&ir, ProcedureKind::Upsert)).unwrap();
        assert!(text.contains("ON CONFLICT (\"id\") DO UPDATE SET \"email\" = EXCLUDED.\"email\";"));
    }

    #[test]
    fn test_update_placeholder_when_only_key_columns() {
        let t = Table::from_row(TableRow {
            name: "tokens".to_string(),
            columns: vec![col("id", "uuid", 1, true)],
        });
        let ir = plan_table(&t);
        let text = render_update(&ir, &proc(&ir, ProcedureKind::Update)).unwrap();
        assert!(text.starts_with("-- update_tokens:"));
        assert!(!text.contains("CREATE OR REPLACE"));
    }

    #[test]
    fn test_fetch_with_parent_placeholder_without_outbound() {
        let ir = plan_table(&users());
        let text = render_fetch_with_parent(&ir, &proc(&ir, ProcedureKind::FetchWithParent))
            .unwrap();
        assert!(text.starts_with("-- fetch_with_parent_users:"));
        assert!(text.contains("RETURN (SELECT to_jsonb(t)"));
    }

    #[test]
    fn test_fetch_with_children_aggregates_child_rows() {
        let mut u = users();
        u.add_inbound(Rc::new(Relationship::from_row(&RelationshipRow {
            table: "posts".to_string(),
            column: "author_id".to_string(),
            foreign_table: "users".to_string(),
            foreign_column: "id".to_string(),
            constraint: "posts_author_id_fkey".to_string(),
        })));
        let ir = plan_table(&u);
        let text =
            render_fetch_with_children(&ir, &proc(&ir, ProcedureKind::FetchWithChildren)).unwrap();
        assert!(text.contains("'posts', (SELECT COALESCE(jsonb_agg(to_jsonb(c)), '[]'::jsonb)"));
        assert!(text.contains("FROM \"posts\" c WHERE c.\"author_id\" = t.\"id\")"));
    }

    #[test]
    fn test_emit_is_deterministic() {
        let ir = plan_table(&users());
        let plan = SchemaIr {
            namespace: "public".to_string(),
            tables: vec![ir],
            views: vec![],
            enums: vec![],
        };
        let first = SqlEmitter::new().emit(&plan).unwrap();
        let second = SqlEmitter::new().emit(&plan).unwrap();
        assert_eq!(first.files, second.files);
    }

    #[test]
    fn test_emit_skips_missing_pk_artifacts_but_continues() {
        let t = Table::from_row(TableRow {
            name: "logs".to_string(),
            columns: vec![col("message", "text", 1, false)],
        });
        let plan = SchemaIr {
            namespace: "public".to_string(),
            tables: vec![plan_table(&t)],
            views: vec![],
            enums: vec![],
        };
        let bundle = SqlEmitter::new().emit(&plan).unwrap();
        let content = &bundle.files[0].content;
        // Key-free artifacts survive
        assert!(content.contains("fetch_all_logs"));
        assert!(content.contains("insert_logs"));
        // Key-dependent artifacts are absent
        assert!(!content.contains("fetch_by_id_logs"));
        assert!(!content.contains("delete_logs"));
    }
}
