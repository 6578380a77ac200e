//! # schemaforge
//!
//! Generate SQL procedures, typed frontend schema definitions and backend
//! model classes from one introspected database catalog.
//!
//! This crate provides a CLI tool and library: a catalog introspector feeds
//! a canonical in-memory schema graph, the graph is lowered into a typed
//! intermediate representation, and one emitter per target renders the
//! final bundles so the three outputs always stay mutually consistent.

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod error;
pub mod ir;
pub mod naming;
pub mod order;
pub mod sample;
pub mod schema;
pub mod typemap;

pub mod prelude {
    pub use crate::catalog::{CatalogSnapshot, Introspector, TableFilter};
    pub use crate::codegen::{Bundle, Emitter, GeneratedFile, Target};
    pub use crate::config::{DbConfig, GenerationConfig};
    pub use crate::error::ForgeError;
    pub use crate::naming::NameVariants;
    pub use crate::order::EmissionOrder;
    pub use crate::schema::{
        Column, FetchStrategy, GenerationOutcome, Relationship, Schema, SchemaManager, Table, View,
    };
    pub use crate::typemap::{DataType, TypeBundle};
}

#[cfg(feature = "postgres")]
pub use catalog::PostgresIntrospector;
