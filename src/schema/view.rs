use std::cell::OnceCell;

use crate::catalog::ViewRow;
use crate::naming::NameVariants;

/// Read-only counterpart of a table: name, columns and naming variants only.
#[derive(Debug, Clone)]
pub struct View {
    pub name: String,
    pub columns: Vec<String>,
    names: OnceCell<NameVariants>,
}

impl View {
    pub fn from_row(row: ViewRow) -> Self {
        Self {
            name: row.name,
            columns: row.columns,
            names: OnceCell::new(),
        }
    }

    pub fn names(&self) -> &NameVariants {
        self.names.get_or_init(|| NameVariants::derive(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_names() {
        let view = View::from_row(ViewRow {
            name: "active_users".to_string(),
            columns: vec!["id".to_string(), "email".to_string()],
        });
        assert_eq!(view.names().camel, "activeUsers");
        assert_eq!(view.names().pascal, "ActiveUsers");
    }
}
