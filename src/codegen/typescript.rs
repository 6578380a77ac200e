//! TypeScript schema-definition emitter
//!
//! Emits one exported object literal per table plus a lookup file mapping
//! every naming-variant string back to its canonical key. Parent
//! relationship entries reference the related constant by identifier, so
//! this target forbids forward references and uses the strict topological
//! ordering; a reference cycle is fatal here.

use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::info;

use crate::codegen::{Bundle, Emitter, GeneratedFile, Target};
use crate::error::ForgeError;
use crate::ir::{FieldIr, RelationIr, RelationKind, SchemaIr, TableIr};
use crate::naming::{reverse_lookup, NameVariants};
use crate::order::EmissionOrder;

#[derive(Debug)]
pub struct TypeScriptEmitter {
    order: EmissionOrder,
}

impl TypeScriptEmitter {
    pub fn new() -> Self {
        Self {
            order: EmissionOrder::strict(),
        }
    }
}

impl Default for TypeScriptEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for TypeScriptEmitter {
    fn target(&self) -> Target {
        Target::TypeScript
    }

    fn emit(&self, plan: &SchemaIr) -> Result<Bundle, ForgeError> {
        info!(
            namespace = ?plan.namespace,
            tables = ?plan.tables.len(),
            "Generating TypeScript schema definitions"
        );

        let ordered = self.order.order(&plan.tables)?;

        let mut out = String::new();
        out.push_str(&format!(
            "// Generated schema definitions for namespace \"{}\". Do not edit.\n\n",
            plan.namespace
        ));
        for table in &ordered {
            out.push_str(&render_table(table));
            out.push('\n');
        }
        if !plan.views.is_empty() {
            out.push_str(&render_views(plan));
            out.push('\n');
        }

        Ok(Bundle {
            target: Target::TypeScript,
            files: vec![
                GeneratedFile {
                    name: "schema.ts".to_string(),
                    content: out,
                },
                GeneratedFile {
                    name: "lookup.ts".to_string(),
                    content: render_lookup(plan),
                },
            ],
        })
    }
}

fn quoted(value: &str) -> String {
    format!("'{}'", value)
}

fn opt_quoted(value: Option<&str>) -> String {
    match value {
        Some(v) => quoted(v),
        None => "null".to_string(),
    }
}

fn render_names(names: &NameVariants) -> String {
    format!(
        "{{ original: '{}', camel: '{}', pascal: '{}', kebab: '{}', title: '{}', param: '{}' }}",
        names.original, names.camel, names.pascal, names.kebab, names.title, names.param
    )
}

fn render_field(field: &FieldIr) -> String {
    let mut lines = Vec::new();
    lines.push(format!("      column: '{}',", field.name));
    lines.push(format!("      type: '{}',", field.typescript.literal));
    lines.push(format!("      sqlType: '{}',", field.sql.literal));
    lines.push(format!("      nullable: {},", field.nullable));
    lines.push(format!("      required: {},", field.required));
    lines.push(format!("      primaryKey: {},", field.primary_key));
    lines.push(format!("      unique: {},", field.unique));
    lines.push(format!(
        "      default: {},",
        field.typescript.default.as_deref().unwrap_or("null")
    ));
    lines.push(format!(
        "      generator: {},",
        opt_quoted(field.typescript.generator.as_deref())
    ));
    lines.push(format!("      blank: {},", field.typescript.blank));
    lines.push(format!("      component: '{}',", field.ui_hint.as_str()));
    lines.push(format!("      names: {},", render_names(&field.names)));
    format!(
        "    {}: {{\n{}\n    }},",
        field.names.camel,
        lines.join("\n")
    )
}

fn render_relationship(rel: &RelationIr) -> String {
    match rel.kind {
        RelationKind::Parent => {
            // Parent entries reference the related constant by identifier.
            // A self-reference cannot name its own constant mid-definition,
            // so it degrades to a string name.
            let table_ref = if rel.self_reference {
                quoted(&rel.table)
            } else {
                NameVariants::derive(&rel.table).camel
            };
            format!(
                "    {{ kind: 'parent', field: '{}', table: {}, column: '{}', references: '{}' }},",
                rel.field_name, table_ref, rel.column, rel.references
            )
        }
        RelationKind::Child => format!(
            "    {{ kind: 'child', field: '{}', table: '{}', column: '{}', references: '{}' }},",
            rel.field_name, rel.table, rel.column, rel.references
        ),
        RelationKind::ManyToMany => format!(
            "    {{ kind: 'many-to-many', field: '{}', table: '{}', junction: '{}' }},",
            rel.field_name,
            rel.table,
            rel.junction.as_deref().unwrap_or_default()
        ),
    }
}

fn render_table(table: &TableIr) -> String {
    let fields = table.fields.iter().map(render_field).join("\n");
    let relationships = table
        .relationships
        .iter()
        .map(render_relationship)
        .join("\n");
    let relationships_block = if relationships.is_empty() {
        "  relationships: [],".to_string()
    } else {
        format!("  relationships: [\n{}\n  ],", relationships)
    };
    format!(
        "export const {camel} = {{\n\
         \x20 name: '{name}',\n\
         \x20 names: {names},\n\
         \x20 primaryKey: {pk},\n\
         \x20 displayField: {display},\n\
         \x20 fetchStrategy: '{fetch}',\n\
         \x20 fields: {{\n{fields}\n  }},\n\
         {relationships}\n\
         }} as const;\n",
        camel = table.names.camel,
        name = table.table,
        names = render_names(&table.names),
        pk = opt_quoted(table.primary_key.as_deref()),
        display = opt_quoted(table.display_field.as_deref()),
        fetch = table.fetch_strategy.as_str(),
        fields = fields,
        relationships = relationships_block,
    )
}

fn render_views(plan: &SchemaIr) -> String {
    let entries = plan
        .views
        .iter()
        .map(|v| {
            format!(
                "  {}: {{ name: '{}', names: {}, columns: [{}] }},",
                v.names.camel,
                v.view,
                render_names(&v.names),
                v.columns.iter().map(|c| quoted(c)).join(", ")
            )
        })
        .join("\n");
    format!("export const views = {{\n{}\n}} as const;\n", entries)
}

fn render_lookup(plan: &SchemaIr) -> String {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for table in &plan.tables {
        names.insert(table.table.as_str());
        for field in &table.fields {
            names.insert(field.name.as_str());
        }
    }
    for view in &plan.views {
        names.insert(view.view.as_str());
        for column in &view.columns {
            names.insert(column.as_str());
        }
    }

    let lookup = reverse_lookup(names.iter().copied());
    let entries = lookup
        .iter()
        .map(|(variant, key)| format!("  {}: '{}',", serde_json::Value::String(variant.clone()), key))
        .join("\n");

    format!(
        "// Generated naming-variant lookup for namespace \"{}\". Do not edit.\n\n\
         export const nameLookup: Record<string, string> = {{\n{}\n}};\n",
        plan.namespace, entries
    )
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

    fn rel(table: &str, column: &str, foreign_table: &str) -> Rc<Relationship> {
        Rc::new(Relationship::from_row(&RelationshipRow {
            table: table.to_string(),
            column: column.to_string(),
            foreign_table: foreign_table.to_string(),
            foreign_column: "id".to_string(),
            constraint: format!("{}_{}_fkey", table, column),
        }))
    }

    fn two_table_plan() -> SchemaIr {
        let mut users = Table::from_row(TableRow {
            name: "users".to_string(),
            columns: vec![col("id", "uuid", 1, true), col("email", "text", 2, false)],
        });
        let mut posts = Table::from_row(TableRow {
            name: "posts".to_string(),
            columns: vec![
                col("id", "uuid", 1, true),
                col("author_id", "uuid", 2, false),
            ],
        });
        let edge = rel("posts", "author_id", "users");
        posts.add_outbound(Rc::clone(&edge));
        users.add_inbound(edge);
        SchemaIr {
            namespace: "public".to_string(),
            tables: vec![plan_table(&posts), plan_table(&users)],
            views: vec![],
            enums: vec![],
        }
    }

    #[test]
    fn test_parent_constant_declared_before_dependent() {
        let plan = two_table_plan();
        let bundle = TypeScriptEmitter::new().emit(&plan).unwrap();
        let schema = &bundle.files[0].content;
        let users_pos = schema.find("export const users").unwrap();
        let posts_pos = schema.find("export const posts").unwrap();
        assert!(users_pos < posts_pos);
        // Parent entry references the constant, not a string
        assert!(schema.contains("kind: 'parent', field: 'user', table: users"));
    }

    #[test]
    fn test_cycle_is_fatal_for_this_target() {
        let mut a = Table::from_row(TableRow {
            name: "a".to_string(),
            columns: vec![col("id", "uuid", 1, true), col("b_id", "uuid", 2, false)],
        });
        let mut b = Table::from_row(TableRow {
            name: "b".to_string(),
            columns: vec![col("id", "uuid", 1, true), col("a_id", "uuid", 2, false)],
        });
        let ab = rel("a", "b_id", "b");
        let ba = rel("b", "a_id", "a");
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
        let err = TypeScriptEmitter::new().emit(&plan).unwrap_err();
        assert!(matches!(err, ForgeError::DependencyCycle { .. }));
    }

    #[test]
    fn test_field_metadata_rendered() {
        let plan = two_table_plan();
        let bundle = TypeScriptEmitter::new().emit(&plan).unwrap();
        let schema = &bundle.files[0].content;
        assert!(schema.contains("type: 'string',"));
        assert!(schema.contains("sqlType: 'uuid',"));
        assert!(schema.contains("primaryKey: true,"));
        assert!(schema.contains("component: 'uuid-badge',"));
    }

    #[test]
    fn test_lookup_maps_variants_to_camel() {
        let plan = two_table_plan();
        let bundle = TypeScriptEmitter::new().emit(&plan).unwrap();
        let lookup = &bundle.files[1].content;
        assert!(lookup.contains("\"author_id\": 'authorId',"));
        assert!(lookup.contains("\"AuthorId\": 'authorId',"));
        assert!(lookup.contains("\"p_users\": 'users',"));
    }
}
