//! Python model-class emitter
//!
//! One class per table with a typed field declaration per column and a
//! relationship-registry entry per inverse-FK, followed by one global
//! registration call. Declaration order uses the heuristic strategy:
//! forward references are legal in this target, so ordering only affects
//! readability.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use tracing::info;

use crate::codegen::{Bundle, Emitter, GeneratedFile, Target};
use crate::error::ForgeError;
use crate::ir::{EnumIr, SchemaIr, TableIr};
use crate::naming::{singularize, NameVariants};
use crate::order::EmissionOrder;
use crate::typemap::DataType;

#[derive(Debug)]
pub struct PythonEmitter {
    order: EmissionOrder,
}

impl Default for PythonEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonEmitter {
    pub fn new() -> Self {
        Self {
            order: EmissionOrder::heuristic(),
        }
    }

    /// Manual rank overrides for specific tables
    pub fn with_boosts(boosts: BTreeMap<String, i64>) -> Self {
        let mut order = EmissionOrder::heuristic();
        order.boosts = boosts;
        Self { order }
    }
}

impl Emitter for PythonEmitter {
    fn target(&self) -> Target {
        Target::Python
    }

    fn emit(&self, plan: &SchemaIr) -> Result<Bundle, ForgeError> {
        info!(
            namespace = ?plan.namespace,
            tables = ?plan.tables.len(),
            "Generating Python model classes"
        );

        let ordered = self.order.order(&plan.tables)?;

        let mut out = String::new();
        out.push_str(&format!(
            "\"\"\"Generated model classes for namespace \"{}\". Do not edit.\"\"\"\n\n",
            plan.namespace
        ));
        out.push_str("from __future__ import annotations\n\n");
        for import in collect_imports(plan) {
            out.push_str(&import);
            out.push('\n');
        }
        out.push_str("\nfrom .orm import Model, ModelRelationship, register_models\n\n");

        for e in &plan.enums {
            out.push('\n');
            out.push_str(&render_enum(e));
        }

        for table in &ordered {
            out.push('\n');
            out.push_str(&render_class(table));
        }

        out.push('\n');
        out.push_str(&render_registration(&ordered));

        Ok(Bundle {
            target: Target::Python,
            files: vec![GeneratedFile {
                name: "models.py".to_string(),
                content: out,
            }],
        })
    }
}

/// Collect import lines needed by the field types in use
fn collect_imports(plan: &SchemaIr) -> Vec<String> {
    let mut datetime_symbols: BTreeSet<&str> = BTreeSet::new();
    let mut needs_decimal = false;
    let mut needs_any = false;
    let mut needs_uuid = false;

    fn visit(
        ty: &DataType,
        datetime_symbols: &mut BTreeSet<&str>,
        needs_decimal: &mut bool,
        needs_any: &mut bool,
        needs_uuid: &mut bool,
    ) {
        match ty {
            DataType::Numeric => *needs_decimal = true,
            DataType::Timestamp | DataType::TimestampTz => {
                datetime_symbols.insert("datetime");
            }
            DataType::Date => {
                datetime_symbols.insert("date");
            }
            DataType::Time | DataType::TimeTz => {
                datetime_symbols.insert("time");
            }
            DataType::Uuid => *needs_uuid = true,
            DataType::Json | DataType::JsonBinary => *needs_any = true,
            DataType::Array(inner) => {
                visit(inner, datetime_symbols, needs_decimal, needs_any, needs_uuid)
            }
            _ => {}
        }
    }

    for table in &plan.tables {
        for field in &table.fields {
            visit(
                &field.data_type,
                &mut datetime_symbols,
                &mut needs_decimal,
                &mut needs_any,
                &mut needs_uuid,
            );
        }
    }

    let mut imports = vec!["from dataclasses import dataclass".to_string()];
    if !datetime_symbols.is_empty() {
        imports.push(format!(
            "from datetime import {}",
            datetime_symbols.iter().join(", ")
        ));
    }
    if needs_decimal {
        imports.push("from decimal import Decimal".to_string());
    }
    if !plan.enums.is_empty() {
        imports.push("from enum import Enum".to_string());
    }
    if needs_any {
        imports.push("from typing import Any".to_string());
    }
    if needs_uuid {
        imports.push("from uuid import UUID".to_string());
    }
    imports
}

fn enum_member_name(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn render_enum(e: &EnumIr) -> String {
    let members = e
        .labels
        .iter()
        .map(|l| format!("    {} = \"{}\"", enum_member_name(l), l))
        .join("\n");
    format!("class {}(str, Enum):\n{}\n\n", e.names.pascal, members)
}

fn py_str_or_none(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("\"{}\"", v),
        None => "None".to_string(),
    }
}

fn render_class(table: &TableIr) -> String {
    let mut body = Vec::new();

    for field in &table.fields {
        body.push(format!("    {}: {}", field.name, field.python.literal));
    }
    if table.fields.is_empty() {
        body.push("    pass".to_string());
    }

    body.push(String::new());
    body.push(format!("    __table__ = \"{}\"", table.table));
    body.push(format!(
        "    __primary_key__ = {}",
        py_str_or_none(table.primary_key.as_deref())
    ));
    body.push(format!(
        "    __display_field__ = {}",
        py_str_or_none(table.display_field.as_deref())
    ));
    body.push(format!(
        "    __fetch_strategy__ = \"{}\"",
        table.fetch_strategy.as_str()
    ));

    let registry: Vec<String> = table
        .children()
        .map(|rel| {
            format!(
                "        ModelRelationship(\n\
                 \x20           source_model=\"{source_model}\",\n\
                 \x20           source_field=\"{source_field}\",\n\
                 \x20           referenced_field=\"{referenced_field}\",\n\
                 \x20           relation_name=\"{relation_name}\",\n\
                 \x20       ),",
                source_model = NameVariants::derive(&singularize(&rel.table)).pascal,
                source_field = rel.column,
                referenced_field = rel.references,
                relation_name = rel.field_name,
            )
        })
        .collect();
    if registry.is_empty() {
        body.push("    __relationships__: list[ModelRelationship] = []".to_string());
    } else {
        body.push(format!(
            "    __relationships__ = [\n{}\n    ]",
            registry.join("\n")
        ));
    }

    format!(
        "@dataclass\nclass {}(Model):\n{}\n\n",
        table.class_name,
        body.join("\n")
    )
}

fn render_registration(ordered: &[&TableIr]) -> String {
    let classes = ordered
        .iter()
        .map(|t| format!("    {},", t.class_name))
        .join("\n");
    format!("register_models([\n{}\n])\n", classes)
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

    fn blog_plan() -> SchemaIr {
        let mut users = Table::from_row(TableRow {
            name: "users".to_string(),
            columns: vec![col("id", "uuid", 1, true), col("email", "text", 2, false)],
        });
        let mut posts = Table::from_row(TableRow {
            name: "posts".to_string(),
            columns: vec![
                col("id", "uuid", 1, true),
                col("author_id", "uuid", 2, false),
                col("created_at", "timestamptz", 3, false),
            ],
        });
        let edge = Rc::new(Relationship::from_row(&RelationshipRow {
            table: "posts".to_string(),
            column: "author_id".to_string(),
            foreign_table: "users".to_string(),
            foreign_column: "id".to_string(),
            constraint: "posts_author_id_fkey".to_string(),
        }));
        posts.add_outbound(Rc::clone(&edge));
        users.add_inbound(edge);
        users.identify_display_column();
        posts.identify_display_column();
        SchemaIr {
            namespace: "public".to_string(),
            tables: vec![plan_table(&posts), plan_table(&users)],
            views: vec![],
            enums: vec![],
        }
    }

    #[test]
    fn test_referenced_tables_emitted_first() {
        let bundle = PythonEmitter::new().emit(&blog_plan()).unwrap();
        let code = &bundle.files[0].content;
        // users has one inbound edge, posts has none
        let users_pos = code.find("class User(Model):").unwrap();
        let posts_pos = code.find("class Post(Model):").unwrap();
        assert!(users_pos < posts_pos);
    }

    #[test]
    fn test_registry_entry_per_inverse_fk() {
        let bundle = PythonEmitter::new().emit(&blog_plan()).unwrap();
        let code = &bundle.files[0].content;
        assert!(code.contains("source_model=\"Post\","));
        assert!(code.contains("source_field=\"author_id\","));
        assert!(code.contains("referenced_field=\"id\","));
        assert!(code.contains("relation_name=\"posts\","));
    }

    #[test]
    fn test_registration_call_lists_all_classes() {
        let bundle = PythonEmitter::new().emit(&blog_plan()).unwrap();
        let code = &bundle.files[0].content;
        let registration = &code[code.find("register_models").unwrap()..];
        assert!(registration.contains("    User,"));
        assert!(registration.contains("    Post,"));
    }

    #[test]
    fn test_imports_follow_field_types() {
        let bundle = PythonEmitter::new().emit(&blog_plan()).unwrap();
        let code = &bundle.files[0].content;
        assert!(code.contains("from uuid import UUID"));
        assert!(code.contains("from datetime import datetime"));
        assert!(!code.contains("from decimal import Decimal"));
    }

    #[test]
    fn test_enum_classes_rendered() {
        let mut orders = Table::from_row(TableRow {
            name: "orders".to_string(),
            columns: vec![
                col("id", "uuid", 1, true),
                ColumnRow {
                    enum_labels: vec!["pending".to_string(), "in progress".to_string()],
                    ..col("status", "order_status", 2, false)
                },
            ],
        });
        orders.identify_display_column();
        let plan = crate::ir::plan_schema(&{
            let mut s = crate::schema::Schema::new("public");
            s.tables.insert("orders".to_string(), orders);
            s
        });
        let bundle = PythonEmitter::new().emit(&plan).unwrap();
        let code = &bundle.files[0].content;
        assert!(code.contains("class OrderStatus(str, Enum):"));
        assert!(code.contains("    PENDING = \"pending\""));
        assert!(code.contains("    IN_PROGRESS = \"in progress\""));
        assert!(code.contains("status: OrderStatus"));
    }

    #[test]
    fn test_boost_reorders_classes() {
        let mut boosts = BTreeMap::new();
        boosts.insert("posts".to_string(), 100);
        let bundle = PythonEmitter::with_boosts(boosts)
            .emit(&blog_plan())
            .unwrap();
        let code = &bundle.files[0].content;
        let users_pos = code.find("class User(Model):").unwrap();
        let posts_pos = code.find("class Post(Model):").unwrap();
        assert!(posts_pos < users_pos);
    }

    #[test]
    fn test_mutual_reference_is_tolerated() {
        // The same input is fatal for the strict-ordered target; here
        // forward references are legal and emission must succeed.
        let mut a = Table::from_row(TableRow {
            name: "a".to_string(),
            columns: vec![col("id", "uuid", 1, true), col("b_id", "uuid", 2, false)],
        });
        let mut b = Table::from_row(TableRow {
            name: "b".to_string(),
            columns: vec![col("id", "uuid", 1, true), col("a_id", "uuid", 2, false)],
        });
        let ab = Rc::new(Relationship::from_row(&RelationshipRow {
            table: "a".to_string(),
            column: "b_id".to_string(),
            foreign_table: "b".to_string(),
            foreign_column: "id".to_string(),
            constraint: "a_b_id_fkey".to_string(),
        }));
        let ba = Rc::new(Relationship::from_row(&RelationshipRow {
            table: "b".to_string(),
            column: "a_id".to_string(),
            foreign_table: "a".to_string(),
            foreign_column: "id".to_string(),
            constraint: "b_a_id_fkey".to_string(),
        }));
        a.add_outbound(Rc::clone(&ab));
        b.add_inbound(ab);
        b.add_outbound(Rc::clone(&ba));
        a.add_inbound(ba);
        let plan = SchemaIr {
            namespace: "public".to_string(),
            tables: vec![plan_table(&a), plan_table(&b)],
            views: vec![],
            enums: vec![],
        };
        assert!(PythonEmitter::new().emit(&plan).is_ok());
    }

    #[test]
    fn test_emit_is_deterministic() {
        let a = PythonEmitter::new().emit(&blog_plan()).unwrap();
        let b = PythonEmitter::new().emit(&blog_plan()).unwrap();
        assert_eq!(a.files, b.files);
    }
}
