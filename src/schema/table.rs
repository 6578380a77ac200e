use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::catalog::TableRow;
use crate::naming::{singular_class_name, NameVariants};

use super::column::Column;
use super::relationship::Relationship;

/// How a table's rows are best fetched, derived purely from which
/// relationship kinds it participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// No relationships at all
    #[default]
    Flat,
    /// Outbound foreign keys only
    WithParents,
    /// Inbound inverse foreign keys only
    WithChildren,
    /// Both outbound and inbound
    WithRelatives,
    /// Any many-to-many link present
    WithLinks,
}

impl FetchStrategy {
    pub fn compute(has_fk: bool, has_inverse_fk: bool, has_many_to_many: bool) -> Self {
        if has_many_to_many {
            return FetchStrategy::WithLinks;
        }
        match (has_fk, has_inverse_fk) {
            (false, false) => FetchStrategy::Flat,
            (true, false) => FetchStrategy::WithParents,
            (false, true) => FetchStrategy::WithChildren,
            (true, true) => FetchStrategy::WithRelatives,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStrategy::Flat => "flat",
            FetchStrategy::WithParents => "with-parents",
            FetchStrategy::WithChildren => "with-children",
            FetchStrategy::WithRelatives => "with-relatives",
            FetchStrategy::WithLinks => "with-links",
        }
    }
}

/// One side of a many-to-many pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManyToManyLink {
    /// The junction table implementing the pairing
    pub junction: String,
    /// The table on the far side
    pub related: String,
}

/// Display-field waterfall, evaluated in order; first hit wins.
const DISPLAY_PRIMARY: [&str; 3] = ["name", "title", "label"];
const DISPLAY_EXTENDED: [&str; 5] = [
    "description",
    "full_name",
    "username",
    "display_name",
    "subject",
];
const DISPLAY_LAST_RESORT: [&str; 4] = ["email", "slug", "code", "key"];

/// One catalog table: position-ordered columns, relationship maps and
/// many-to-many links.
///
/// Outbound edges are keyed by target table name, inbound edges by source
/// table name. Both maps hold `Rc` clones of edges shared with the table on
/// the other side.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub outbound: BTreeMap<String, Rc<Relationship>>,
    pub inbound: BTreeMap<String, Rc<Relationship>>,
    pub many_to_many: Vec<ManyToManyLink>,
    pub fetch_strategy: FetchStrategy,
    names: OnceCell<NameVariants>,
}

impl Table {
    pub fn from_row(row: TableRow) -> Self {
        let mut columns: Vec<Column> = row
            .columns
            .into_iter()
            .map(|c| Column::from_row(&row.name, c))
            .collect();
        columns.sort_by_key(|c| c.position);
        Self {
            name: row.name,
            columns,
            ..Self::default()
        }
    }

    pub fn names(&self) -> &NameVariants {
        self.names.get_or_init(|| NameVariants::derive(&self.name))
    }

    /// Singular PascalCase class name for the model target
    pub fn class_name(&self) -> String {
        singular_class_name(&self.name)
    }

    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.primary_key)
    }

    /// First primary-key column in position order
    pub fn primary_key_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }

    pub fn display_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.display_field)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Attach an outbound (FK) edge, keyed by target table name.
    ///
    /// Two foreign keys to the same target collide on the key; the later one
    /// wins, matching the original model's mapping shape.
    pub fn add_outbound(&mut self, rel: Rc<Relationship>) {
        let key = rel.target_name().to_string();
        if let Some(prev) = self.outbound.insert(key, rel) {
            debug!(
                table = ?self.name,
                constraint = ?prev.constraint,
                "Outbound relationship overwritten by a later foreign key to the same target"
            );
        }
        self.recompute_fetch_strategy();
    }

    /// Attach an inbound (inverse-FK) edge, keyed by source table name.
    pub fn add_inbound(&mut self, rel: Rc<Relationship>) {
        self.inbound.insert(rel.source_table.clone(), rel);
        self.recompute_fetch_strategy();
    }

    pub fn add_many_to_many(&mut self, link: ManyToManyLink) {
        self.many_to_many.push(link);
        self.recompute_fetch_strategy();
    }

    fn recompute_fetch_strategy(&mut self) {
        self.fetch_strategy = FetchStrategy::compute(
            !self.outbound.is_empty(),
            !self.inbound.is_empty(),
            !self.many_to_many.is_empty(),
        );
    }

    /// A pure junction table has exactly two outbound relationships and
    /// zero inbound relationships. Any inbound edge disqualifies it, even
    /// when it superficially looks like a junction.
    pub fn is_junction(&self) -> bool {
        self.outbound.len() == 2 && self.inbound.is_empty()
    }

    /// Pick the display field using the fixed waterfall.
    ///
    /// Every flag is cleared first, so the "at most one display field"
    /// invariant holds under repeated invocation.
    pub fn identify_display_column(&mut self) {
        for c in &mut self.columns {
            c.display_field = false;
        }
        if let Some(i) = self.find_display_index() {
            self.columns[i].display_field = true;
        }
    }

    fn find_display_index(&self) -> Option<usize> {
        // 1. Exact match against the primary keywords
        if let Some(i) = self.columns.iter().position(|c| {
            let n = c.name.to_lowercase();
            DISPLAY_PRIMARY.contains(&n.as_str())
        }) {
            return Some(i);
        }
        // 2. Substring containment of the same keywords
        if let Some(i) = self.columns.iter().position(|c| {
            let n = c.name.to_lowercase();
            DISPLAY_PRIMARY.iter().any(|k| n.contains(k))
        }) {
            return Some(i);
        }
        // 3. Extended candidates
        if let Some(i) = self.columns.iter().position(|c| {
            let n = c.name.to_lowercase();
            DISPLAY_EXTENDED.contains(&n.as_str())
        }) {
            return Some(i);
        }
        // 4. Last-resort candidates
        if let Some(i) = self.columns.iter().position(|c| {
            let n = c.name.to_lowercase();
            DISPLAY_LAST_RESORT.contains(&n.as_str())
        }) {
            return Some(i);
        }
        // 5. Fall back to the primary key
        self.columns.iter().position(|c| c.primary_key)
    }

    /// Derive naming variants and type bundles for the table and every
    /// column. Idempotent.
    pub fn initialize_code_generation(&self) {
        self.names();
        for c in &self.columns {
            c.initialize_code_generation();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColumnRow, RelationshipRow};

    fn col(name: &str, full_type: &str, position: i32) -> ColumnRow {
        ColumnRow {
            name: name.to_string(),
            base_type: full_type.to_string(),
            full_type: full_type.to_string(),
            nullable: false,
            position,
            ..ColumnRow::default()
        }
    }

    fn pk_col(name: &str, full_type: &str, position: i32) -> ColumnRow {
        ColumnRow {
            primary_key: true,
            ..col(name, full_type, position)
        }
    }

    fn table(name: &str, columns: Vec<ColumnRow>) -> Table {
        Table::from_row(TableRow {
            name: name.to_string(),
            columns,
        })
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

    #[test]
    fn test_columns_ordered_by_position() {
        let t = table(
            "users",
            vec![col("email", "text", 2), pk_col("id", "uuid", 1)],
        );
        let names: Vec<&str> = t.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "email"]);
    }

    #[test]
    fn test_has_primary_key() {
        let with_pk = table("users", vec![pk_col("id", "uuid", 1)]);
        assert!(with_pk.has_primary_key());
        let without = table("logs", vec![col("message", "text", 1)]);
        assert!(!without.has_primary_key());
    }

    #[test]
    fn test_fetch_strategy_recomputed_on_wiring() {
        let mut t = table("posts", vec![pk_col("id", "uuid", 1)]);
        assert_eq!(t.fetch_strategy, FetchStrategy::Flat);

        t.add_outbound(rel("posts", "author_id", "users"));
        assert_eq!(t.fetch_strategy, FetchStrategy::WithParents);

        t.add_inbound(rel("comments", "post_id", "posts"));
        assert_eq!(t.fetch_strategy, FetchStrategy::WithRelatives);

        t.add_many_to_many(ManyToManyLink {
            junction: "post_tags".to_string(),
            related: "tags".to_string(),
        });
        assert_eq!(t.fetch_strategy, FetchStrategy::WithLinks);
    }

    #[test]
    fn test_junction_requires_zero_inbound() {
        let mut t = table("post_tags", vec![]);
        t.add_outbound(rel("post_tags", "post_id", "posts"));
        t.add_outbound(rel("post_tags", "tag_id", "tags"));
        assert!(t.is_junction());

        // One inbound edge disqualifies it
        t.add_inbound(rel("audit_rows", "post_tag_id", "post_tags"));
        assert!(!t.is_junction());
    }

    #[test]
    fn test_display_exact_beats_substring() {
        let mut t = table(
            "products",
            vec![col("nickname", "text", 1), col("title", "text", 2)],
        );
        t.identify_display_column();
        // "nickname" contains "name" but "title" is an exact match
        assert_eq!(t.display_column().map(|c| c.name.as_str()), Some("title"));
    }

    #[test]
    fn test_display_substring_layer() {
        let mut t = table(
            "products",
            vec![pk_col("id", "uuid", 1), col("product_name", "text", 2)],
        );
        t.identify_display_column();
        assert_eq!(
            t.display_column().map(|c| c.name.as_str()),
            Some("product_name")
        );
    }

    #[test]
    fn test_display_falls_back_to_primary_key() {
        let mut t = table(
            "measurements",
            vec![pk_col("id", "uuid", 1), col("value", "integer", 2)],
        );
        t.identify_display_column();
        assert_eq!(t.display_column().map(|c| c.name.as_str()), Some("id"));
    }

    #[test]
    fn test_display_none_without_match_or_pk() {
        let mut t = table("measurements", vec![col("value", "integer", 1)]);
        t.identify_display_column();
        assert!(t.display_column().is_none());
    }

    #[test]
    fn test_display_idempotent_single_flag() {
        let mut t = table(
            "users",
            vec![col("username", "text", 1), col("email", "text", 2)],
        );
        for _ in 0..3 {
            t.identify_display_column();
            let flagged = t.columns.iter().filter(|c| c.display_field).count();
            assert_eq!(flagged, 1);
        }
        assert_eq!(
            t.display_column().map(|c| c.name.as_str()),
            Some("username")
        );
    }

    #[test]
    fn test_class_name_singular() {
        let t = table("categories", vec![]);
        assert_eq!(t.class_name(), "Category");
    }
}
