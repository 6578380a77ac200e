//! Type mapping
//!
//! Maps one catalog column description (base type, nullability, enum labels,
//! array flag, raw default expression) to a per-target bundle: the rendered
//! literal type, a blank value, the rendered default, and a generator
//! expression for each output target, plus a UI-hint classification.

use tracing::{debug, warn};

/// Database column type
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    SmallInt,
    Integer,
    BigInt,
    Boolean,
    Text,
    Varchar(Option<u32>),
    Char(Option<u32>),
    Real,
    DoublePrecision,
    Numeric,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    TimeTz,
    Uuid,
    Json,
    JsonBinary,
    Binary,
    Array(Box<DataType>),
    /// Custom enum type, stores the enum name
    Enum(String),
}

impl DataType {
    pub fn is_array(&self) -> bool {
        matches!(self, DataType::Array(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::SmallInt
                | DataType::Integer
                | DataType::BigInt
                | DataType::Real
                | DataType::DoublePrecision
                | DataType::Numeric
        )
    }
}

/// Parse a PostgreSQL type string into a DataType
pub fn parse_data_type(type_str: &str) -> DataType {
    let lower = type_str.to_lowercase();
    let trimmed = lower.trim();

    // Handle arrays first (e.g., "integer[]", "character varying(255)[]")
    if trimmed.ends_with("[]") {
        let inner_type = &trimmed[..trimmed.len() - 2];
        let inner = parse_data_type(inner_type);
        return DataType::Array(Box::new(inner));
    }

    // Handle types with parameters
    if trimmed.starts_with("character varying") || trimmed.starts_with("varchar") {
        let len = extract_length(trimmed);
        return DataType::Varchar(len);
    }
    if trimmed.starts_with("character(") || trimmed.starts_with("char(") {
        let len = extract_length(trimmed);
        return DataType::Char(len);
    }
    if trimmed.starts_with("numeric") || trimmed.starts_with("decimal") {
        return DataType::Numeric;
    }

    // Handle timestamp variations
    if trimmed.starts_with("timestamp") {
        if trimmed.contains("with time zone") || trimmed.contains("timestamptz") {
            return DataType::TimestampTz;
        }
        return DataType::Timestamp;
    }

    // Handle time variations
    if trimmed.starts_with("time ") || trimmed == "time" {
        if trimmed.contains("with time zone") {
            return DataType::TimeTz;
        }
        return DataType::Time;
    }

    // Simple type matching
    match trimmed {
        "smallint" | "int2" => DataType::SmallInt,
        "integer" | "int" | "int4" => DataType::Integer,
        "bigint" | "int8" => DataType::BigInt,
        "boolean" | "bool" => DataType::Boolean,
        "text" => DataType::Text,
        "real" | "float4" => DataType::Real,
        "double precision" | "float8" => DataType::DoublePrecision,
        "date" => DataType::Date,
        "uuid" => DataType::Uuid,
        "json" => DataType::Json,
        "jsonb" => DataType::JsonBinary,
        "bytea" => DataType::Binary,
        "timetz" => DataType::TimeTz,
        "timestamptz" => DataType::TimestampTz,
        _ => {
            // Assume it's a custom enum type
            DataType::Enum(type_str.to_string())
        }
    }
}

/// Extract length parameter from type like "varchar(255)" or "character varying(100)"
fn extract_length(type_str: &str) -> Option<u32> {
    if let Some(start) = type_str.find('(') {
        if let Some(end) = type_str.find(')') {
            let len_str = &type_str[start + 1..end];
            // numeric(10,2) - just take first number
            let first_num = len_str.split(',').next().unwrap_or(len_str);
            return first_num.trim().parse().ok();
        }
    }
    None
}

/// UI component classification for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiHint {
    TextInput,
    TextArea,
    NumberInput,
    Checkbox,
    DateTimePicker,
    DatePicker,
    TimePicker,
    Select,
    JsonEditor,
    UuidBadge,
    ListEditor,
}

impl UiHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiHint::TextInput => "text-input",
            UiHint::TextArea => "text-area",
            UiHint::NumberInput => "number-input",
            UiHint::Checkbox => "checkbox",
            UiHint::DateTimePicker => "datetime-picker",
            UiHint::DatePicker => "date-picker",
            UiHint::TimePicker => "time-picker",
            UiHint::Select => "select",
            UiHint::JsonEditor => "json-editor",
            UiHint::UuidBadge => "uuid-badge",
            UiHint::ListEditor => "list-editor",
        }
    }
}

/// Zero-argument calls recognized as default expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownFn {
    GenRandomUuid,
    UuidGenerateV4,
    Now,
    CurrentTimestamp,
}

/// Bare keyword / JSON-literal defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordDefault {
    Null,
    True,
    False,
    EmptyArray,
    EmptyObject,
}

/// Classification of a raw default expression
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultClass {
    /// Column has enum labels; `label` is the literal when it is a known label
    EnumLiteral { label: Option<String> },
    WellKnownFunction(WellKnownFn),
    CastLiteral { inner: String },
    Keyword(KeywordDefault),
    /// Nothing matched; carries the raw text unchanged
    Unclassified { raw: String },
}

/// Type-cast suffixes recognized by the CastLiteral rule.
///
/// Longer suffixes listed before their prefixes so suffix matching picks the
/// most specific form.
const CAST_SUFFIXES: &[&str] = &[
    "::timestamp with time zone",
    "::timestamp without time zone",
    "::character varying",
    "::double precision",
    "::timestamptz",
    "::smallint",
    "::integer",
    "::boolean",
    "::numeric",
    "::bigint",
    "::jsonb",
    "::real",
    "::text",
    "::date",
    "::uuid",
];

/// Placeholder rendered when an enum default is not one of the known labels
pub const SELECT_PLACEHOLDER: &str = "select a value";

/// Classify one raw default expression.
///
/// Precedence is load-bearing: several raw expressions match more than one
/// rule, and the first hit wins.
pub fn classify_default(
    table: &str,
    column: &str,
    raw: &str,
    enum_labels: &[String],
) -> DefaultClass {
    // 1. Enum columns classify as EnumLiteral no matter what the raw
    //    expression looks like. The cast on an enum default names the enum
    //    type itself, so any trailing cast is stripped here, not just the
    //    recognized ones.
    if !enum_labels.is_empty() {
        let inner = strip_quotes(strip_any_cast(raw));
        let label = enum_labels.iter().find(|l| l.as_str() == inner).cloned();
        if label.is_none() {
            debug!(
                table = ?table,
                column = ?column,
                raw = ?raw,
                "Enum default is not a known label, rendering placeholder"
            );
        }
        return DefaultClass::EnumLiteral { label };
    }

    // 2. Known zero-argument calls
    match raw {
        "gen_random_uuid()" => {
            return DefaultClass::WellKnownFunction(WellKnownFn::GenRandomUuid);
        }
        "uuid_generate_v4()" => {
            return DefaultClass::WellKnownFunction(WellKnownFn::UuidGenerateV4);
        }
        "now()" => return DefaultClass::WellKnownFunction(WellKnownFn::Now),
        "CURRENT_TIMESTAMP" => {
            return DefaultClass::WellKnownFunction(WellKnownFn::CurrentTimestamp);
        }
        _ => {}
    }

    // 3. Cast-suffixed literals
    if CAST_SUFFIXES.iter().any(|s| raw.ends_with(s)) {
        let inner = strip_quotes(strip_cast(raw)).to_string();
        return DefaultClass::CastLiteral { inner };
    }

    // 4. Bare keyword / JSON literals
    match raw {
        "null" | "NULL" => return DefaultClass::Keyword(KeywordDefault::Null),
        "true" => return DefaultClass::Keyword(KeywordDefault::True),
        "false" => return DefaultClass::Keyword(KeywordDefault::False),
        "'[]'" | "[]" => return DefaultClass::Keyword(KeywordDefault::EmptyArray),
        "'{}'" | "{}" => return DefaultClass::Keyword(KeywordDefault::EmptyObject),
        _ => {}
    }

    // 5. Give up loudly, but never abort the run over one column's default.
    warn!(
        table = ?table,
        column = ?column,
        raw = ?raw,
        "Unclassified default expression, passing raw text through"
    );
    DefaultClass::Unclassified {
        raw: raw.to_string(),
    }
}

fn strip_cast(raw: &str) -> &str {
    for suffix in CAST_SUFFIXES {
        if let Some(stripped) = raw.strip_suffix(suffix) {
            return stripped;
        }
    }
    raw
}

/// Strip a trailing `::type` cast whatever the type name is
fn strip_any_cast(raw: &str) -> &str {
    if let Some(idx) = raw.rfind("::") {
        let suffix = &raw[idx + 2..];
        let looks_like_type = !suffix.is_empty()
            && suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ');
        if looks_like_type {
            return &raw[..idx];
        }
    }
    raw
}

fn strip_quotes(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// One target's representation of a column type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetType {
    /// Rendered literal type name
    pub literal: String,
    /// Blank value used when a fresh empty record is constructed
    pub blank: String,
    /// Rendered default, when the column carries one
    pub default: Option<String>,
    /// Expression producing a fresh non-literal value (uuid generator,
    /// current-timestamp call)
    pub generator: Option<String>,
}

/// Per-target type bundle for one column
#[derive(Debug, Clone, PartialEq)]
pub struct TypeBundle {
    pub sql: TargetType,
    pub typescript: TargetType,
    pub python: TargetType,
    pub json: TargetType,
    pub ui_hint: UiHint,
    pub default_class: Option<DefaultClass>,
    /// A column is required iff it is not nullable. Independent of whether a
    /// default is present.
    pub required: bool,
}

/// Input to the type mapper, one catalog column's worth of facts
#[derive(Debug)]
pub struct TypeInput<'a> {
    pub table: &'a str,
    pub column: &'a str,
    pub data_type: &'a DataType,
    pub nullable: bool,
    pub enum_labels: &'a [String],
    pub max_length: Option<u32>,
    pub default: Option<&'a str>,
}

/// Map one column to its per-target bundle.
pub fn map_type(input: &TypeInput) -> TypeBundle {
    let default_class = input
        .default
        .map(|raw| classify_default(input.table, input.column, raw, input.enum_labels));

    let sql = sql_target(input, default_class.as_ref());
    let typescript = ts_target(input, default_class.as_ref());
    let python = py_target(input, default_class.as_ref());
    let json = json_target(input, default_class.as_ref());

    TypeBundle {
        sql,
        typescript,
        python,
        json,
        ui_hint: ui_hint(input),
        default_class,
        required: !input.nullable,
    }
}

/// Render the SQL literal type name for a DataType
pub fn sql_literal_type(ty: &DataType) -> String {
    match ty {
        DataType::SmallInt => "smallint".to_string(),
        DataType::Integer => "integer".to_string(),
        DataType::BigInt => "bigint".to_string(),
        DataType::Boolean => "boolean".to_string(),
        DataType::Text => "text".to_string(),
        DataType::Varchar(Some(n)) => format!("character varying({})", n),
        DataType::Varchar(None) => "character varying".to_string(),
        DataType::Char(Some(n)) => format!("character({})", n),
        DataType::Char(None) => "character".to_string(),
        DataType::Real => "real".to_string(),
        DataType::DoublePrecision => "double precision".to_string(),
        DataType::Numeric => "numeric".to_string(),
        DataType::Timestamp => "timestamp".to_string(),
        DataType::TimestampTz => "timestamptz".to_string(),
        DataType::Date => "date".to_string(),
        DataType::Time => "time".to_string(),
        DataType::TimeTz => "timetz".to_string(),
        DataType::Uuid => "uuid".to_string(),
        DataType::Json => "json".to_string(),
        DataType::JsonBinary => "jsonb".to_string(),
        DataType::Binary => "bytea".to_string(),
        DataType::Array(inner) => format!("{}[]", sql_literal_type(inner)),
        DataType::Enum(name) => name.clone(),
    }
}

fn ts_base_type(input: &TypeInput, ty: &DataType) -> String {
    match ty {
        DataType::SmallInt
        | DataType::Integer
        | DataType::BigInt
        | DataType::Real
        | DataType::DoublePrecision
        | DataType::Numeric => "number".to_string(),
        DataType::Boolean => "boolean".to_string(),
        DataType::Text
        | DataType::Varchar(_)
        | DataType::Char(_)
        | DataType::Timestamp
        | DataType::TimestampTz
        | DataType::Date
        | DataType::Time
        | DataType::TimeTz
        | DataType::Uuid => "string".to_string(),
        DataType::Json | DataType::JsonBinary => "Record<string, unknown>".to_string(),
        DataType::Binary => "Uint8Array".to_string(),
        DataType::Array(inner) => format!("{}[]", ts_base_type(input, inner)),
        DataType::Enum(_) => {
            if input.enum_labels.is_empty() {
                warn_unrecognized(input, ty);
                "string".to_string()
            } else {
                input
                    .enum_labels
                    .iter()
                    .map(|l| format!("'{}'", l))
                    .collect::<Vec<_>>()
                    .join(" | ")
            }
        }
    }
}

fn py_base_type(input: &TypeInput, ty: &DataType) -> String {
    match ty {
        DataType::SmallInt | DataType::Integer | DataType::BigInt => "int".to_string(),
        DataType::Boolean => "bool".to_string(),
        DataType::Text | DataType::Varchar(_) | DataType::Char(_) => "str".to_string(),
        DataType::Real | DataType::DoublePrecision => "float".to_string(),
        DataType::Numeric => "Decimal".to_string(),
        DataType::Timestamp | DataType::TimestampTz => "datetime".to_string(),
        DataType::Date => "date".to_string(),
        DataType::Time | DataType::TimeTz => "time".to_string(),
        DataType::Uuid => "UUID".to_string(),
        DataType::Json | DataType::JsonBinary => "dict[str, Any]".to_string(),
        DataType::Binary => "bytes".to_string(),
        DataType::Array(inner) => format!("list[{}]", py_base_type(input, inner)),
        DataType::Enum(name) => {
            if input.enum_labels.is_empty() {
                warn_unrecognized(input, ty);
                "str".to_string()
            } else {
                crate::naming::NameVariants::derive(name).pascal
            }
        }
    }
}

fn json_base_type(ty: &DataType) -> String {
    match ty {
        DataType::SmallInt | DataType::Integer | DataType::BigInt => "integer".to_string(),
        DataType::Real | DataType::DoublePrecision | DataType::Numeric => "number".to_string(),
        DataType::Boolean => "boolean".to_string(),
        DataType::Json | DataType::JsonBinary => "object".to_string(),
        DataType::Array(_) => "array".to_string(),
        _ => "string".to_string(),
    }
}

fn warn_unrecognized(input: &TypeInput, ty: &DataType) {
    warn!(
        table = ?input.table,
        column = ?input.column,
        data_type = ?ty,
        "No type mapping rule for base type, using generic fallback"
    );
}

fn sql_target(input: &TypeInput, class: Option<&DefaultClass>) -> TargetType {
    let literal = sql_literal_type(input.data_type);
    let blank = if input.nullable {
        "NULL".to_string()
    } else {
        match input.data_type {
            t if t.is_numeric() => "0".to_string(),
            DataType::Boolean => "false".to_string(),
            DataType::Text | DataType::Varchar(_) | DataType::Char(_) => "''".to_string(),
            _ => "NULL".to_string(),
        }
    };
    // The SQL rendering of a default is the raw catalog expression itself.
    let default = match class {
        Some(DefaultClass::EnumLiteral { label: Some(l) }) => Some(format!("'{}'", l)),
        Some(DefaultClass::EnumLiteral { label: None }) => {
            Some(format!("'{}'", SELECT_PLACEHOLDER))
        }
        Some(_) => input.default.map(|d| d.to_string()),
        None => None,
    };
    let generator = sql_generator(input.data_type, class);
    TargetType {
        literal,
        blank,
        default,
        generator,
    }
}

fn sql_generator(ty: &DataType, class: Option<&DefaultClass>) -> Option<String> {
    match class {
        Some(DefaultClass::WellKnownFunction(f)) => Some(
            match f {
                WellKnownFn::GenRandomUuid => "gen_random_uuid()",
                WellKnownFn::UuidGenerateV4 => "uuid_generate_v4()",
                WellKnownFn::Now => "now()",
                WellKnownFn::CurrentTimestamp => "CURRENT_TIMESTAMP",
            }
            .to_string(),
        ),
        _ => match ty {
            DataType::Uuid => Some("gen_random_uuid()".to_string()),
            DataType::Timestamp | DataType::TimestampTz => Some("now()".to_string()),
            DataType::Date => Some("CURRENT_DATE".to_string()),
            _ => None,
        },
    }
}

fn ts_target(input: &TypeInput, class: Option<&DefaultClass>) -> TargetType {
    let base = ts_base_type(input, input.data_type);
    let literal = if input.nullable {
        format!("{} | null", base)
    } else {
        base
    };
    let blank = if input.nullable {
        "null".to_string()
    } else {
        match input.data_type {
            t if t.is_numeric() => "0".to_string(),
            DataType::Boolean => "false".to_string(),
            DataType::Json | DataType::JsonBinary => "{}".to_string(),
            DataType::Array(_) => "[]".to_string(),
            _ => "''".to_string(),
        }
    };
    let default = class.map(|c| match c {
        DefaultClass::EnumLiteral { label: Some(l) } => format!("'{}'", l),
        DefaultClass::EnumLiteral { label: None } => format!("'{}'", SELECT_PLACEHOLDER),
        DefaultClass::WellKnownFunction(f) => match f {
            WellKnownFn::GenRandomUuid | WellKnownFn::UuidGenerateV4 => {
                "crypto.randomUUID()".to_string()
            }
            WellKnownFn::Now | WellKnownFn::CurrentTimestamp => {
                "new Date().toISOString()".to_string()
            }
        },
        DefaultClass::CastLiteral { inner } => render_ts_literal(input.data_type, inner),
        DefaultClass::Keyword(k) => match k {
            KeywordDefault::Null => "null".to_string(),
            KeywordDefault::True => "true".to_string(),
            KeywordDefault::False => "false".to_string(),
            KeywordDefault::EmptyArray => "[]".to_string(),
            KeywordDefault::EmptyObject => "{}".to_string(),
        },
        DefaultClass::Unclassified { raw } => raw.clone(),
    });
    let generator = match input.data_type {
        DataType::Uuid => Some("crypto.randomUUID()".to_string()),
        DataType::Timestamp | DataType::TimestampTz => Some("new Date().toISOString()".to_string()),
        DataType::Date => Some("new Date().toISOString().slice(0, 10)".to_string()),
        _ => None,
    };
    TargetType {
        literal,
        blank,
        default,
        generator,
    }
}

fn render_ts_literal(ty: &DataType, inner: &str) -> String {
    if ty.is_numeric() || matches!(ty, DataType::Boolean) {
        inner.to_string()
    } else if matches!(ty, DataType::Json | DataType::JsonBinary) {
        // Inner text of a jsonb cast is already a JSON document
        inner.to_string()
    } else {
        format!("'{}'", inner)
    }
}

fn py_target(input: &TypeInput, class: Option<&DefaultClass>) -> TargetType {
    let base = py_base_type(input, input.data_type);
    let literal = if input.nullable {
        format!("{} | None", base)
    } else {
        base
    };
    let blank = if input.nullable {
        "None".to_string()
    } else {
        match input.data_type {
            DataType::Numeric => "Decimal(0)".to_string(),
            t if t.is_numeric() => "0".to_string(),
            DataType::Boolean => "False".to_string(),
            DataType::Text | DataType::Varchar(_) | DataType::Char(_) => "\"\"".to_string(),
            DataType::Json | DataType::JsonBinary => "{}".to_string(),
            DataType::Array(_) => "[]".to_string(),
            _ => "None".to_string(),
        }
    };
    let default = class.map(|c| match c {
        DefaultClass::EnumLiteral { label: Some(l) } => format!("\"{}\"", l),
        DefaultClass::EnumLiteral { label: None } => format!("\"{}\"", SELECT_PLACEHOLDER),
        DefaultClass::WellKnownFunction(f) => match f {
            WellKnownFn::GenRandomUuid | WellKnownFn::UuidGenerateV4 => "uuid4()".to_string(),
            WellKnownFn::Now | WellKnownFn::CurrentTimestamp => "datetime.utcnow()".to_string(),
        },
        DefaultClass::CastLiteral { inner } => render_py_literal(input.data_type, inner),
        DefaultClass::Keyword(k) => match k {
            KeywordDefault::Null => "None".to_string(),
            KeywordDefault::True => "True".to_string(),
            KeywordDefault::False => "False".to_string(),
            KeywordDefault::EmptyArray => "[]".to_string(),
            KeywordDefault::EmptyObject => "{}".to_string(),
        },
        DefaultClass::Unclassified { raw } => raw.clone(),
    });
    let generator = match input.data_type {
        DataType::Uuid => Some("uuid4()".to_string()),
        DataType::Timestamp | DataType::TimestampTz => Some("datetime.utcnow()".to_string()),
        DataType::Date => Some("date.today()".to_string()),
        _ => None,
    };
    TargetType {
        literal,
        blank,
        default,
        generator,
    }
}

fn render_py_literal(ty: &DataType, inner: &str) -> String {
    if ty.is_numeric() {
        inner.to_string()
    } else if matches!(ty, DataType::Boolean) {
        if inner == "true" {
            "True".to_string()
        } else {
            "False".to_string()
        }
    } else {
        format!("\"{}\"", inner)
    }
}

fn json_target(input: &TypeInput, class: Option<&DefaultClass>) -> TargetType {
    let literal = json_base_type(input.data_type);
    let blank = if input.nullable {
        "null".to_string()
    } else {
        match input.data_type {
            t if t.is_numeric() => "0".to_string(),
            DataType::Boolean => "false".to_string(),
            DataType::Json | DataType::JsonBinary => "{}".to_string(),
            DataType::Array(_) => "[]".to_string(),
            _ => "\"\"".to_string(),
        }
    };
    let default = class.map(|c| match c {
        DefaultClass::EnumLiteral { label: Some(l) } => {
            serde_json::Value::String(l.clone()).to_string()
        }
        DefaultClass::EnumLiteral { label: None } => {
            serde_json::Value::String(SELECT_PLACEHOLDER.to_string()).to_string()
        }
        DefaultClass::WellKnownFunction(_) => "null".to_string(),
        DefaultClass::CastLiteral { inner } => {
            if input.data_type.is_numeric() || matches!(input.data_type, DataType::Boolean) {
                inner.clone()
            } else if matches!(input.data_type, DataType::Json | DataType::JsonBinary) {
                inner.clone()
            } else {
                serde_json::Value::String(inner.clone()).to_string()
            }
        }
        DefaultClass::Keyword(k) => match k {
            KeywordDefault::Null => "null".to_string(),
            KeywordDefault::True => "true".to_string(),
            KeywordDefault::False => "false".to_string(),
            KeywordDefault::EmptyArray => "[]".to_string(),
            KeywordDefault::EmptyObject => "{}".to_string(),
        },
        DefaultClass::Unclassified { raw } => serde_json::Value::String(raw.clone()).to_string(),
    });
    TargetType {
        literal,
        blank,
        default,
        generator: None,
    }
}

fn ui_hint(input: &TypeInput) -> UiHint {
    if !input.enum_labels.is_empty() {
        return UiHint::Select;
    }
    match input.data_type {
        DataType::Array(_) => UiHint::ListEditor,
        DataType::Json | DataType::JsonBinary => UiHint::JsonEditor,
        DataType::Uuid => UiHint::UuidBadge,
        DataType::Boolean => UiHint::Checkbox,
        t if t.is_numeric() => UiHint::NumberInput,
        DataType::Timestamp | DataType::TimestampTz => UiHint::DateTimePicker,
        DataType::Date => UiHint::DatePicker,
        DataType::Time | DataType::TimeTz => UiHint::TimePicker,
        DataType::Text => UiHint::TextArea,
        DataType::Varchar(_) | DataType::Char(_) => UiHint::TextInput,
        _ => UiHint::TextInput,
    }
}
