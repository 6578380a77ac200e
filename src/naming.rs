//! Identifier naming variants
//!
//! Every table, view and column name in the catalog is canonical snake_case.
//! Generated artifacts need the same identifier in several conventions, plus
//! a reverse lookup so any variant string can be resolved back to its
//! canonical key.

use std::collections::BTreeMap;

/// All derived casings of one canonical snake_case identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameVariants {
    /// The canonical snake_case name as read from the catalog
    pub original: String,
    /// camelCase, also the canonical reverse-lookup key
    pub camel: String,
    /// PascalCase
    pub pascal: String,
    /// kebab-case
    pub kebab: String,
    /// Title Case (space separated)
    pub title: String,
    /// Parameter-prefixed form used by SQL procedure arguments (`p_<name>`)
    pub param: String,
}

impl NameVariants {
    /// Derive every variant from a canonical snake_case identifier.
    ///
    /// Empty input yields empty output for every variant.
    pub fn derive(name: &str) -> Self {
        if name.is_empty() {
            return Self::default();
        }

        let words: Vec<&str> = name.split('_').filter(|w| !w.is_empty()).collect();

        let pascal: String = words.iter().map(|w| capitalize(w)).collect();
        let camel = {
            let mut out = String::new();
            for (i, w) in words.iter().enumerate() {
                if i == 0 {
                    out.push_str(&w.to_lowercase());
                } else {
                    out.push_str(&capitalize(w));
                }
            }
            out
        };
        let kebab = words.join("-");
        let title = words
            .iter()
            .map(|w| capitalize(w))
            .collect::<Vec<_>>()
            .join(" ");
        let param = format!("p_{}", name);

        Self {
            original: name.to_string(),
            camel,
            pascal,
            kebab,
            title,
            param,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().to_string() + chars.as_str(),
    }
}

/// Returns singular form of a snake_case name (basic heuristic)
pub fn singularize(name: &str) -> String {
    if name.ends_with("ies") {
        format!("{}y", &name[..name.len() - 3])
    } else if name.ends_with('s') && !name.ends_with("ss") {
        name[..name.len() - 1].to_string()
    } else {
        name.to_string()
    }
}

/// Singular PascalCase class name for a snake_case table name
pub fn singular_class_name(table_name: &str) -> String {
    NameVariants::derive(&singularize(table_name)).pascal
}

/// Build a reverse lookup over a set of canonical identifiers.
///
/// Every computed variant of every name (plus the original, plus a
/// double-quoted form for variants that contain spaces or hyphens) maps back
/// to the canonical camelCase key. The camelCase variant maps to itself.
pub fn reverse_lookup<'a, I>(names: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lookup = BTreeMap::new();
    for name in names {
        let variants = NameVariants::derive(name);
        if variants.camel.is_empty() {
            continue;
        }
        let key = variants.camel.clone();
        for variant in [
            &variants.original,
            &variants.camel,
            &variants.pascal,
            &variants.kebab,
            &variants.title,
            &variants.param,
        ] {
            lookup.insert(variant.clone(), key.clone());
            if variant.contains(' ') || variant.contains('-') {
                lookup.insert(format!("\"{}\"", variant), key.clone());
            }
        }
    }
    lookup
}
