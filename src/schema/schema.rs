use std::collections::BTreeMap;

use tracing::error;

use crate::codegen::{Bundle, Emitter};
use crate::error::ForgeError;
use crate::ir::{plan_schema, SchemaIr};

use super::table::Table;
use super::view::View;

/// Aggregate of one catalog namespace: the unit of cross-table ordering and
/// final bundle assembly.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub namespace: String,
    pub tables: BTreeMap<String, Table>,
    pub views: BTreeMap<String, View>,
}

/// Result of one namespace's generation pass.
///
/// Target-isolable failures (a reference cycle in one target) land in
/// `failures` while the other targets' bundles are still produced. A run
/// with any failure must exit non-zero and its partial output must not be
/// treated as valid.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub namespace: String,
    pub bundles: Vec<Bundle>,
    pub failures: Vec<ForgeError>,
}

impl GenerationOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Schema {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            tables: BTreeMap::new(),
            views: BTreeMap::new(),
        }
    }

    /// Lower the whole namespace into its emission plan
    pub fn plan(&self) -> SchemaIr {
        plan_schema(self)
    }

    /// Run every emitter over one shared plan and collect the bundles
    pub fn assemble(&self, emitters: &[Box<dyn Emitter>]) -> GenerationOutcome {
        let plan = self.plan();
        let mut bundles = Vec::with_capacity(emitters.len());
        let mut failures = Vec::new();
        for emitter in emitters {
            match emitter.emit(&plan) {
                Ok(bundle) => bundles.push(bundle),
                Err(e) => {
                    error!(
                        namespace = ?self.namespace,
                        target = ?emitter.target().as_str(),
                        error = %e,
                        "Target emission failed"
                    );
                    failures.push(e);
                }
            }
        }
        GenerationOutcome {
            namespace: self.namespace.clone(),
            bundles,
            failures,
        }
    }
}
