use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::catalog::{CatalogSnapshot, ColumnReference, Introspector};
use crate::codegen::{Emitter, PythonEmitter, SqlEmitter, TypeScriptEmitter};
use crate::config::GenerationConfig;
use crate::error::ForgeError;

use super::relationship::Relationship;
use super::schema::{GenerationOutcome, Schema};
use super::table::{ManyToManyLink, Table};
use super::view::View;

/// Orchestration façade for one generation run.
///
/// All state is scoped to this object: it is constructed once per
/// invocation and passed by reference, never reached through globals.
pub struct SchemaManager {
    config: GenerationConfig,
}

impl SchemaManager {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Build the object graph for one namespace from raw catalog rows:
    /// construct tables and views, wire relationships, detect many-to-many
    /// pairings, then pick display fields.
    pub fn build(&self, snapshot: CatalogSnapshot) -> Schema {
        let mut schema = Schema::new(&snapshot.namespace);

        for row in snapshot.tables {
            schema.tables.insert(row.name.clone(), Table::from_row(row));
        }
        for row in snapshot.views {
            schema.views.insert(row.name.clone(), View::from_row(row));
        }

        self.wire_relationships(&mut schema, &snapshot.relationships);
        self.detect_many_to_many(&mut schema);

        for table in schema.tables.values_mut() {
            table.identify_display_column();
        }

        info!(
            namespace = ?schema.namespace,
            tables = ?schema.tables.len(),
            views = ?schema.views.len(),
            "Schema graph ready"
        );
        schema
    }

    /// Attach one shared edge per flat FK row: the source table's outbound
    /// map and the target table's inbound map hold the same `Rc`.
    fn wire_relationships(
        &self,
        schema: &mut Schema,
        rows: &[crate::catalog::RelationshipRow],
    ) {
        for row in rows {
            let Some(source) = schema.tables.get(&row.table) else {
                warn!(
                    constraint = ?row.constraint,
                    table = ?row.table,
                    "Relationship names a table that is not in this namespace, skipping"
                );
                continue;
            };
            if source.column(&row.column).is_none() {
                warn!(
                    constraint = ?row.constraint,
                    table = ?row.table,
                    column = ?row.column,
                    "Relationship names a column that does not exist, skipping"
                );
                continue;
            }
            if let Some(target) = schema.tables.get(&row.foreign_table) {
                if target.column(&row.foreign_column).is_none() {
                    warn!(
                        constraint = ?row.constraint,
                        table = ?row.foreign_table,
                        column = ?row.foreign_column,
                        "Relationship references a column that does not exist, skipping"
                    );
                    continue;
                }
            }

            let rel = Rc::new(Relationship::from_row(row));
            let self_reference = rel.is_self_reference();

            if let Some(source) = schema.tables.get_mut(&row.table) {
                if let Some(col) = source.columns.iter_mut().find(|c| c.name == row.column) {
                    if col.references.is_none() {
                        col.references = Some(ColumnReference {
                            table: row.foreign_table.clone(),
                            column: row.foreign_column.clone(),
                        });
                    }
                }
                source.add_outbound(Rc::clone(&rel));
            }
            // A self-reference is recorded once, on the outbound side; it
            // must never masquerade as an ordinary inbound edge.
            if !self_reference {
                if let Some(target) = schema.tables.get_mut(&row.foreign_table) {
                    target.add_inbound(rel);
                } else {
                    debug!(
                        constraint = ?row.constraint,
                        foreign_table = ?row.foreign_table,
                        "Relationship target is outside this namespace, inbound side not wired"
                    );
                }
            }
        }
    }

    /// A table with exactly two outbound relationships and zero inbound
    /// relationships is a pure junction: both referenced tables get a
    /// symmetric many-to-many link naming it.
    fn detect_many_to_many(&self, schema: &mut Schema) {
        let pairings: Vec<(String, String, String)> = schema
            .tables
            .values()
            .filter(|t| t.is_junction())
            .filter_map(|t| {
                let edges: Vec<&Rc<Relationship>> = t.outbound.values().collect();
                if edges.iter().any(|r| r.is_self_reference()) {
                    debug!(table = ?t.name, "Junction candidate has a self-reference, skipping");
                    return None;
                }
                Some((
                    t.name.clone(),
                    edges[0].target_name().to_string(),
                    edges[1].target_name().to_string(),
                ))
            })
            .collect();

        for (junction, a, b) in pairings {
            debug!(junction = ?junction, left = ?a, right = ?b, "Many-to-many pairing detected");
            if let Some(table) = schema.tables.get_mut(&a) {
                table.add_many_to_many(ManyToManyLink {
                    junction: junction.clone(),
                    related: b.clone(),
                });
            }
            if let Some(table) = schema.tables.get_mut(&b) {
                table.add_many_to_many(ManyToManyLink {
                    junction,
                    related: a,
                });
            }
        }
    }

    /// The generated-artifact map: one emitter per target
    pub fn emitters(&self) -> Vec<Box<dyn Emitter>> {
        vec![
            Box::new(SqlEmitter::new()),
            Box::new(TypeScriptEmitter::new()),
            Box::new(PythonEmitter::with_boosts(self.config.boosts.clone())),
        ]
    }

    pub fn generate(&self, schema: &Schema) -> GenerationOutcome {
        schema.assemble(&self.emitters())
    }

    /// Full pass over the configured namespaces. A catalog read failure is
    /// fatal and unretried; per-target failures are collected in each
    /// namespace's outcome.
    pub fn run(
        &self,
        introspector: &mut dyn Introspector,
    ) -> Result<Vec<GenerationOutcome>, ForgeError> {
        info!(
            project = ?self.config.project,
            namespace = ?self.config.namespace,
            aux = ?self.config.aux_namespaces,
            "Starting generation run"
        );

        let mut namespaces = vec![self.config.namespace.clone()];
        namespaces.extend(self.config.aux_namespaces.iter().cloned());

        let mut outcomes = Vec::with_capacity(namespaces.len());
        for namespace in namespaces {
            let snapshot = introspector.introspect(&namespace, &self.config.filter)?;
            let schema = self.build(snapshot);
            outcomes.push(self.generate(&schema));
        }
        Ok(outcomes)
    }

    /// Write one outcome's bundles under `<output>/<namespace>/`
    pub fn write(&self, outcome: &GenerationOutcome) -> Result<Vec<PathBuf>, ForgeError> {
        let dir = self.config.output_path.join(&outcome.namespace);
        fs::create_dir_all(&dir)?;

        let mut written = Vec::new();
        for bundle in &outcome.bundles {
            for file in &bundle.files {
                let path = dir.join(&file.name);
                fs::write(&path, &file.content)?;
                debug!(target = ?bundle.target.as_str(), path = ?path, "Wrote bundle file");
                written.push(path);
            }
        }
        info!(
            namespace = ?outcome.namespace,
            files = ?written.len(),
            complete = ?outcome.is_complete(),
            "Bundle files written"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColumnRow, RelationshipRow, TableRow};

    fn manager() -> SchemaManager {
        SchemaManager::new(GenerationConfig::default())
    }

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

    fn table_row(name: &str, columns: Vec<ColumnRow>) -> TableRow {
        TableRow {
            name: name.to_string(),
            columns,
        }
    }

    fn fk(table: &str, column: &str, foreign_table: &str) -> RelationshipRow {
        RelationshipRow {
            table: table.to_string(),
            column: column.to_string(),
            foreign_table: foreign_table.to_string(),
            foreign_column: "id".to_string(),
            constraint: format!("{}_{}_fkey", table, column),
        }
    }

    fn blog_snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            namespace: "public".to_string(),
            tables: vec![
                table_row(
                    "users",
                    vec![col("id", "uuid", 1, true), col("email", "text", 2, false)],
                ),
                table_row(
                    "posts",
                    vec![
                        col("id", "uuid", 1, true),
                        col("author_id", "uuid", 2, false),
                    ],
                ),
                table_row(
                    "tags",
                    vec![col("id", "uuid", 1, true), col("name", "text", 2, false)],
                ),
                table_row(
                    "post_tags",
                    vec![
                        col("post_id", "uuid", 1, false),
                        col("tag_id", "uuid", 2, false),
                    ],
                ),
            ],
            relationships: vec![
                fk("posts", "author_id", "users"),
                fk("post_tags", "post_id", "posts"),
                fk("post_tags", "tag_id", "tags"),
            ],
            views: vec![],
            enums: vec![],
        }
    }

    #[test]
    fn test_relationship_edge_is_shared_by_reference() {
        let schema = manager().build(blog_snapshot());
        let outbound = &schema.tables["posts"].outbound["users"];
        let inbound = &schema.tables["users"].inbound["posts"];
        assert!(Rc::ptr_eq(outbound, inbound));
    }

    #[test]
    fn test_junction_creates_symmetric_links() {
        let schema = manager().build(blog_snapshot());
        assert_eq!(
            schema.tables["posts"].many_to_many,
            vec![ManyToManyLink {
                junction: "post_tags".to_string(),
                related: "tags".to_string(),
            }]
        );
        assert_eq!(
            schema.tables["tags"].many_to_many,
            vec![ManyToManyLink {
                junction: "post_tags".to_string(),
                related: "posts".to_string(),
            }]
        );
        assert!(schema.tables["post_tags"].many_to_many.is_empty());
    }

    #[test]
    fn test_single_fk_is_not_a_junction() {
        let schema = manager().build(blog_snapshot());
        // posts has one outbound edge only and must never be classified as
        // a junction; users gains no links beyond the post_tags pairing
        // above.
        assert!(!schema.tables["posts"].is_junction());
        assert!(schema.tables["users"].many_to_many.is_empty());
    }

    #[test]
    fn test_inbound_edge_disqualifies_junction() {
        let mut snapshot = blog_snapshot();
        // Give post_tags an inbound edge: now it merely looks like a junction
        snapshot.tables.push(table_row(
            "audits",
            vec![
                col("id", "uuid", 1, true),
                col("post_tag_id", "uuid", 2, false),
            ],
        ));
        snapshot.tables[3]
            .columns
            .insert(0, col("id", "uuid", 0, true));
        snapshot
            .relationships
            .push(fk("audits", "post_tag_id", "post_tags"));
        let schema = manager().build(snapshot);
        assert!(!schema.tables["post_tags"].is_junction());
        assert!(schema.tables["posts"].many_to_many.is_empty());
        assert!(schema.tables["tags"].many_to_many.is_empty());
    }

    #[test]
    fn test_self_reference_not_wired_inbound() {
        let snapshot = CatalogSnapshot {
            namespace: "public".to_string(),
            tables: vec![table_row(
                "categories",
                vec![
                    col("id", "uuid", 1, true),
                    col("parent_id", "uuid", 2, false),
                ],
            )],
            relationships: vec![fk("categories", "parent_id", "categories")],
            views: vec![],
            enums: vec![],
        };
        let schema = manager().build(snapshot);
        let categories = &schema.tables["categories"];
        assert_eq!(categories.outbound.len(), 1);
        assert!(categories.outbound["categories"].is_self_reference());
        assert!(categories.inbound.is_empty());
    }

    #[test]
    fn test_unknown_relationship_rows_skipped() {
        let mut snapshot = blog_snapshot();
        snapshot.relationships.push(fk("ghosts", "user_id", "users"));
        snapshot.relationships.push(fk("posts", "missing", "users"));
        let schema = manager().build(snapshot);
        // Only the valid edge from the base snapshot remains on users
        assert_eq!(schema.tables["users"].inbound.len(), 1);
    }

    #[test]
    fn test_fk_reference_annotated_on_column() {
        let schema = manager().build(blog_snapshot());
        let author_id = schema.tables["posts"].column("author_id").unwrap();
        assert_eq!(
            author_id.references,
            Some(ColumnReference {
                table: "users".to_string(),
                column: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let m = manager();
        let first = m.generate(&m.build(blog_snapshot()));
        let second = m.generate(&m.build(blog_snapshot()));
        assert!(first.is_complete());
        assert_eq!(first.bundles.len(), second.bundles.len());
        for (a, b) in first.bundles.iter().zip(second.bundles.iter()) {
            assert_eq!(a.files, b.files);
        }
    }

    #[test]
    fn test_generation_produces_all_three_targets() {
        let m = manager();
        let outcome = m.generate(&m.build(blog_snapshot()));
        assert!(outcome.is_complete());
        let targets: Vec<&str> = outcome
            .bundles
            .iter()
            .map(|b| b.target.as_str())
            .collect();
        assert_eq!(targets, ["sql", "typescript", "python"]);
    }
}
