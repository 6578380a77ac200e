use thiserror::Error;

/// schemaforge errors
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Failed to read catalog for namespace '{namespace}': {message}")]
    Catalog { namespace: String, message: String },

    #[error("Table '{table}' has no primary key, required by {operation}")]
    MissingPrimaryKey { table: String, operation: String },

    #[error("Reference cycle prevents ordered emission, remaining tables: {remaining:?}")]
    DependencyCycle { remaining: Vec<String> },

    #[error("Code generation failed for table '{table}': {message}")]
    CodeGen { table: String, message: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
