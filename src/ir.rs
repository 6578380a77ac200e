//! Typed intermediate representation
//!
//! The schema graph is lowered into plain data nodes before any text is
//! rendered. Emitters consume these nodes, so "what to generate" stays
//! separate from "how to print it" and every target can be tested against
//! the same IR fixtures.

use std::collections::BTreeMap;

use crate::naming::{singularize, NameVariants};
use crate::schema::table::FetchStrategy;
use crate::schema::{Schema, Table};
use crate::typemap::{DataType, TargetType, UiHint};

/// One column, fully derived for every target
#[derive(Debug, Clone)]
pub struct FieldIr {
    pub name: String,
    pub names: NameVariants,
    pub data_type: DataType,
    pub enum_labels: Vec<String>,
    pub nullable: bool,
    pub required: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub is_array: bool,
    pub max_length: Option<u32>,
    pub raw_default: Option<String>,
    pub sql: TargetType,
    pub typescript: TargetType,
    pub python: TargetType,
    pub json: TargetType,
    pub ui_hint: UiHint,
}

/// Which side of an edge a synthetic relationship field represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Outbound FK: this table references another
    Parent,
    /// Inbound inverse-FK: another table references this one
    Child,
    ManyToMany,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Parent => "parent",
            RelationKind::Child => "child",
            RelationKind::ManyToMany => "many-to-many",
        }
    }
}

/// One synthetic relationship field
#[derive(Debug, Clone)]
pub struct RelationIr {
    pub kind: RelationKind,
    /// The table on the other side (the related table for many-to-many)
    pub table: String,
    /// Referencing column; empty for many-to-many
    pub column: String,
    /// Referenced column; empty for many-to-many
    pub references: String,
    pub constraint: String,
    /// camelCase name of the synthetic field
    pub field_name: String,
    pub junction: Option<String>,
    pub self_reference: bool,
}

/// SQL procedure kinds generated per table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    FetchAll,
    FetchById,
    Insert,
    Upsert,
    Delete,
    Update,
    FetchPaginated,
    FetchFiltered,
    FetchWithChildren,
    FetchWithParent,
}

impl ProcedureKind {
    pub const ALL: [ProcedureKind; 10] = [
        ProcedureKind::FetchAll,
        ProcedureKind::FetchById,
        ProcedureKind::Insert,
        ProcedureKind::Upsert,
        ProcedureKind::Delete,
        ProcedureKind::Update,
        ProcedureKind::FetchPaginated,
        ProcedureKind::FetchFiltered,
        ProcedureKind::FetchWithChildren,
        ProcedureKind::FetchWithParent,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            ProcedureKind::FetchAll => "fetch_all",
            ProcedureKind::FetchById => "fetch_by_id",
            ProcedureKind::Insert => "insert",
            ProcedureKind::Upsert => "upsert",
            ProcedureKind::Delete => "delete",
            ProcedureKind::Update => "update",
            ProcedureKind::FetchPaginated => "fetch_paginated",
            ProcedureKind::FetchFiltered => "fetch_filtered",
            ProcedureKind::FetchWithChildren => "fetch_with_children",
            ProcedureKind::FetchWithParent => "fetch_with_parent",
        }
    }

    /// Kinds that structurally require a primary key
    pub fn requires_primary_key(&self) -> bool {
        matches!(
            self,
            ProcedureKind::FetchById
                | ProcedureKind::Upsert
                | ProcedureKind::Delete
                | ProcedureKind::Update
                | ProcedureKind::FetchWithChildren
                | ProcedureKind::FetchWithParent
        )
    }
}

/// One named procedure to generate for a table
#[derive(Debug, Clone)]
pub struct ProcedureIr {
    pub kind: ProcedureKind,
    pub name: String,
}

/// One table lowered for emission
#[derive(Debug, Clone)]
pub struct TableIr {
    pub table: String,
    pub names: NameVariants,
    pub class_name: String,
    pub fetch_strategy: FetchStrategy,
    pub display_field: Option<String>,
    pub primary_key: Option<String>,
    pub fields: Vec<FieldIr>,
    pub relationships: Vec<RelationIr>,
    pub procedures: Vec<ProcedureIr>,
}

impl TableIr {
    pub fn primary_key_field(&self) -> Option<&FieldIr> {
        let pk = self.primary_key.as_deref()?;
        self.fields.iter().find(|f| f.name == pk)
    }

    pub fn parents(&self) -> impl Iterator<Item = &RelationIr> {
        self.relationships
            .iter()
            .filter(|r| r.kind == RelationKind::Parent)
    }

    pub fn children(&self) -> impl Iterator<Item = &RelationIr> {
        self.relationships
            .iter()
            .filter(|r| r.kind == RelationKind::Child)
    }

    /// Number of inbound inverse-FK edges, the heuristic ordering rank input
    pub fn inbound_count(&self) -> usize {
        self.children().count()
    }
}

/// One view lowered for emission
#[derive(Debug, Clone)]
pub struct ViewIr {
    pub view: String,
    pub names: NameVariants,
    pub columns: Vec<String>,
}

/// One enum type used by the schema's columns
#[derive(Debug, Clone)]
pub struct EnumIr {
    pub name: String,
    pub names: NameVariants,
    pub labels: Vec<String>,
}

/// Whole-namespace emission plan
#[derive(Debug, Clone)]
pub struct SchemaIr {
    pub namespace: String,
    /// Name-ordered; emitters apply their own cross-table ordering
    pub tables: Vec<TableIr>,
    pub views: Vec<ViewIr>,
    pub enums: Vec<EnumIr>,
}

/// Lower one table into its IR node
pub fn plan_table(table: &Table) -> TableIr {
    table.initialize_code_generation();

    let fields = table
        .columns
        .iter()
        .map(|c| {
            let derived = c.initialize_code_generation();
            FieldIr {
                name: c.name.clone(),
                names: derived.names.clone(),
                data_type: c.data_type.clone(),
                enum_labels: c.enum_labels.clone(),
                nullable: c.nullable,
                required: c.required(),
                primary_key: c.primary_key,
                unique: c.unique,
                is_array: c.is_array,
                max_length: c.max_length,
                raw_default: c.default.clone(),
                sql: derived.bundle.sql.clone(),
                typescript: derived.bundle.typescript.clone(),
                python: derived.bundle.python.clone(),
                json: derived.bundle.json.clone(),
                ui_hint: derived.bundle.ui_hint,
            }
        })
        .collect();

    let mut relationships = Vec::new();
    for rel in table.outbound.values() {
        relationships.push(RelationIr {
            kind: RelationKind::Parent,
            table: rel.target_name().to_string(),
            column: rel.column.clone(),
            references: rel.foreign_column.clone(),
            constraint: rel.constraint.clone(),
            field_name: NameVariants::derive(&singularize(rel.target_name())).camel,
            junction: None,
            self_reference: rel.is_self_reference(),
        });
    }
    for rel in table.inbound.values() {
        relationships.push(RelationIr {
            kind: RelationKind::Child,
            table: rel.source_table.clone(),
            column: rel.column.clone(),
            references: rel.foreign_column.clone(),
            constraint: rel.constraint.clone(),
            field_name: NameVariants::derive(&rel.source_table).camel,
            junction: None,
            self_reference: false,
        });
    }
    for link in &table.many_to_many {
        relationships.push(RelationIr {
            kind: RelationKind::ManyToMany,
            table: link.related.clone(),
            column: String::new(),
            references: String::new(),
            constraint: String::new(),
            field_name: NameVariants::derive(&link.related).camel,
            junction: Some(link.junction.clone()),
            self_reference: false,
        });
    }

    let procedures = ProcedureKind::ALL
        .iter()
        .map(|kind| ProcedureIr {
            kind: *kind,
            name: format!("{}_{}", kind.prefix(), table.name),
        })
        .collect();

    TableIr {
        table: table.name.clone(),
        names: table.names().clone(),
        class_name: table.class_name(),
        fetch_strategy: table.fetch_strategy,
        display_field: table.display_column().map(|c| c.name.clone()),
        primary_key: table.primary_key_column().map(|c| c.name.clone()),
        fields,
        relationships,
        procedures,
    }
}

/// Lower a whole schema, tables in name order
pub fn plan_schema(schema: &Schema) -> SchemaIr {
    let tables: Vec<TableIr> = schema.tables.values().map(plan_table).collect();

    let views = schema
        .views
        .values()
        .map(|v| ViewIr {
            view: v.name.clone(),
            names: v.names().clone(),
            columns: v.columns.clone(),
        })
        .collect();

    // Distinct enum types actually used by columns, in name order
    let mut enums: BTreeMap<String, EnumIr> = BTreeMap::new();
    for table in schema.tables.values() {
        for col in &table.columns {
            if let DataType::Enum(name) = &col.data_type {
                if !col.enum_labels.is_empty() && !enums.contains_key(name) {
                    enums.insert(
                        name.clone(),
                        EnumIr {
                            name: name.clone(),
                            names: NameVariants::derive(name),
                            labels: col.enum_labels.clone(),
                        },
                    );
                }
            }
        }
    }

    SchemaIr {
        namespace: schema.namespace.clone(),
        tables,
        views,
        enums: enums.into_values().collect(),
    }
}
