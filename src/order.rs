//! Cross-table emission ordering
//!
//! Two strategies behind one abstraction, selected by
//! `allow_forward_references`:
//!
//! - heuristic: tables sorted by descending inbound-relationship count with
//!   a manual boost table. Ties and cycles are fine because declaration
//!   order only affects readability for targets where forward references
//!   are legal.
//! - strict: Kahn's algorithm over outbound-FK dependency edges. A residual
//!   node set after the queue drains is a reference cycle and a fatal error
//!   for the requesting target.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::ForgeError;
use crate::ir::TableIr;

#[derive(Debug, Clone, Default)]
pub struct EmissionOrder {
    pub allow_forward_references: bool,
    /// Manual rank overrides for the heuristic strategy
    pub boosts: BTreeMap<String, i64>,
}

impl EmissionOrder {
    /// Reference-count ordering for targets where forward references are legal
    pub fn heuristic() -> Self {
        Self {
            allow_forward_references: true,
            boosts: BTreeMap::new(),
        }
    }

    /// True topological ordering for targets that forbid forward references
    pub fn strict() -> Self {
        Self {
            allow_forward_references: false,
            boosts: BTreeMap::new(),
        }
    }

    pub fn with_boost(mut self, table: &str, weight: i64) -> Self {
        self.boosts.insert(table.to_string(), weight);
        self
    }

    pub fn order<'a>(&self, tables: &'a [TableIr]) -> Result<Vec<&'a TableIr>, ForgeError> {
        if self.allow_forward_references {
            Ok(self.heuristic_order(tables))
        } else {
            self.strict_order(tables)
        }
    }

    fn heuristic_order<'a>(&self, tables: &'a [TableIr]) -> Vec<&'a TableIr> {
        let mut ranked: Vec<&TableIr> = tables.iter().collect();
        ranked.sort_by(|a, b| {
            let rank = |t: &TableIr| {
                t.inbound_count() as i64 + self.boosts.get(&t.table).copied().unwrap_or(0)
            };
            rank(b).cmp(&rank(a)).then_with(|| a.table.cmp(&b.table))
        });
        ranked
    }

    fn strict_order<'a>(&self, tables: &'a [TableIr]) -> Result<Vec<&'a TableIr>, ForgeError> {
        let by_name: BTreeMap<&str, &TableIr> =
            tables.iter().map(|t| (t.table.as_str(), t)).collect();

        // X depends on every table its definition structurally references:
        // the targets of its outbound FKs. Self-references are legal within
        // one definition and edges out of the namespace cannot constrain
        // ordering, so both are skipped.
        let mut deps: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for t in tables {
            let entry = deps.entry(t.table.as_str()).or_default();
            for rel in t.parents() {
                if rel.self_reference {
                    continue;
                }
                if let Some((dep, _)) = by_name.get_key_value(rel.table.as_str()) {
                    entry.insert(*dep);
                }
            }
        }

        let mut in_degree: BTreeMap<&str, usize> =
            deps.iter().map(|(name, d)| (*name, d.len())).collect();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, d) in &deps {
            for dep in d.iter().copied() {
                dependents.entry(dep).or_default().push(*name);
            }
        }

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut emitted: Vec<&TableIr> = Vec::with_capacity(tables.len());
        while let Some(name) = queue.pop_front() {
            if let Some(t) = by_name.get(name) {
                emitted.push(*t);
            }
            if let Some(next) = dependents.get(name) {
                for dependent in next.clone() {
                    if let Some(deg) = in_degree.get_mut(dependent) {
                        *deg -= 1;
                        if *deg == 0 {
                            queue.push_back(dependent);
                        }
                    }
                }
            }
        }

        if emitted.len() != tables.len() {
            let emitted_names: BTreeSet<&str> =
                emitted.iter().map(|t| t.table.as_str()).collect();
            let remaining: Vec<String> = tables
                .iter()
                .map(|t| t.table.as_str())
                .filter(|name| !emitted_names.contains(name))
                .map(|name| name.to_string())
                .collect();
            return Err(ForgeError::DependencyCycle { remaining });
        }

        Ok(emitted)
    }
}
