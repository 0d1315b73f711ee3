use std::{collections::BTreeMap, fmt, str::FromStr};

use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;
use tracing::warn;

/// The operations a CRUD blueprint can expose.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CrudMethod {
    Index,
    Get,
    Post,
    Patch,
    Delete,
}

impl CrudMethod {
    pub fn http_method(self) -> Method {
        match self {
            Self::Index | Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }

    /// Whether the operation addresses a single record by identifier.
    pub fn is_item(self) -> bool {
        matches!(self, Self::Get | Self::Patch | Self::Delete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{field} must be {expected}, got {found}")]
    InvalidShape {
        field: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("setting for {method} must be a dict, True, or False, got {found}")]
    InvalidValue { method: CrudMethod, found: String },
    #[error("unknown CRUD method: {0}")]
    UnknownMethod(String),
    #[error("invalid overrides for {method}: {reason}")]
    InvalidOverrides { method: CrudMethod, reason: String },
    #[error("{0} is configured more than once")]
    DuplicateMethod(CrudMethod),
    #[error("invalid blueprint {field}: {value:?}")]
    InvalidBlueprint { field: &'static str, value: String },
}

/// Per-operation overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MethodOverrides {
    /// View used to render the response.
    pub schema: Option<String>,
    /// Name of the payload view, recorded for documentation.
    pub arg_schema: Option<String>,
    /// Field used to look records up, instead of the blueprint's.
    pub res_id: Option<String>,
    pub description: Option<String>,
    /// Reachable without authentication.
    pub public: bool,
    /// Only reachable by administrators.
    pub admin_only: bool,
}

/// Value attached to an operation in dict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSetting {
    Enabled(bool),
    Configured(MethodOverrides),
}

impl From<bool> for MethodSetting {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

impl From<MethodOverrides> for MethodSetting {
    fn from(overrides: MethodOverrides) -> Self {
        Self::Configured(overrides)
    }
}

/// Which operations to expose, as written by the user.
///
/// In list mode only the listed operations are enabled. In map mode every
/// operation is enabled unless mapped to `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodsSpec {
    List(Vec<CrudMethod>),
    Map(BTreeMap<CrudMethod, MethodSetting>),
}

impl Default for MethodsSpec {
    fn default() -> Self {
        Self::List(CrudMethod::iter().collect())
    }
}

impl From<Vec<CrudMethod>> for MethodsSpec {
    fn from(methods: Vec<CrudMethod>) -> Self {
        Self::List(methods)
    }
}

impl<const N: usize> From<[CrudMethod; N]> for MethodsSpec {
    fn from(methods: [CrudMethod; N]) -> Self {
        Self::List(methods.to_vec())
    }
}

impl From<BTreeMap<CrudMethod, MethodSetting>> for MethodsSpec {
    fn from(settings: BTreeMap<CrudMethod, MethodSetting>) -> Self {
        Self::Map(settings)
    }
}

impl TryFrom<&Value> for MethodsSpec {
    type Error = ConfigurationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(parse_method)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Object(entries) => {
                let mut settings = BTreeMap::new();
                for (name, setting) in entries {
                    let method = parse_method_name(name)?;
                    let setting = parse_setting(method, setting)?;
                    // Names are case-insensitive, so two keys can name one method.
                    if settings.insert(method, setting).is_some() {
                        return Err(ConfigurationError::DuplicateMethod(method));
                    }
                }
                Ok(Self::Map(settings))
            }
            other => Err(ConfigurationError::InvalidShape {
                field: "methods",
                expected: "a list or a dict",
                found: describe_value(other),
            }),
        }
    }
}

/// Parse a dynamic skip list.
pub fn parse_skip_methods(value: &Value) -> Result<Vec<CrudMethod>, ConfigurationError> {
    match value {
        Value::Array(items) => items.iter().map(parse_method).collect(),
        other => Err(ConfigurationError::InvalidShape {
            field: "skip_methods",
            expected: "a list",
            found: describe_value(other),
        }),
    }
}

fn parse_method(value: &Value) -> Result<CrudMethod, ConfigurationError> {
    match value {
        Value::String(name) => parse_method_name(name),
        other => Err(ConfigurationError::UnknownMethod(other.to_string())),
    }
}

fn parse_method_name(name: &str) -> Result<CrudMethod, ConfigurationError> {
    CrudMethod::from_str(name).map_err(|_| ConfigurationError::UnknownMethod(name.to_string()))
}

fn parse_setting(method: CrudMethod, value: &Value) -> Result<MethodSetting, ConfigurationError> {
    match value {
        Value::Bool(enabled) => Ok(MethodSetting::Enabled(*enabled)),
        Value::Object(_) => serde_json::from_value(value.clone())
            .map(MethodSetting::Configured)
            .map_err(|e| ConfigurationError::InvalidOverrides {
                method,
                reason: e.to_string(),
            }),
        other => Err(ConfigurationError::InvalidValue {
            method,
            found: describe_value(other),
        }),
    }
}

fn describe_value(value: &Value) -> String {
    let kind = match value {
        Value::Null => return "null".to_string(),
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    };
    format!("{kind} {value}")
}

/// Canonical, immutable mapping from enabled operation to its overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodTable(BTreeMap<CrudMethod, MethodOverrides>);

impl MethodTable {
    pub fn contains(&self, method: CrudMethod) -> bool {
        self.0.contains_key(&method)
    }

    pub fn get(&self, method: CrudMethod) -> Option<&MethodOverrides> {
        self.0.get(&method)
    }

    pub fn methods(&self) -> impl Iterator<Item = CrudMethod> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CrudMethod, &MethodOverrides)> {
        self.0.iter().map(|(method, overrides)| (*method, overrides))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodWarning {
    /// A skipped operation was not enabled in the first place.
    RedundantSkip(CrudMethod),
    /// An operation appears more than once in a whitelist.
    DuplicateListing(CrudMethod),
}

impl fmt::Display for MethodWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedundantSkip(method) => {
                write!(f, "skipping {method} is redundant, it is not enabled")
            }
            Self::DuplicateListing(method) => write!(f, "{method} is listed more than once"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMethods {
    pub table: MethodTable,
    pub warnings: Vec<MethodWarning>,
}

/// Normalize a methods specification and a skip list into a [`MethodTable`].
pub fn resolve_methods(spec: &MethodsSpec, skip: &[CrudMethod]) -> ResolvedMethods {
    let mut table = BTreeMap::new();
    let mut warnings = Vec::new();

    match spec {
        MethodsSpec::List(methods) => {
            for method in methods {
                if table.insert(*method, MethodOverrides::default()).is_some() {
                    let warning = MethodWarning::DuplicateListing(*method);
                    warn!(%method, "{warning}");
                    warnings.push(warning);
                }
            }
        }
        MethodsSpec::Map(settings) => {
            for method in CrudMethod::iter() {
                match settings.get(&method) {
                    None | Some(MethodSetting::Enabled(true)) => {
                        table.insert(method, MethodOverrides::default());
                    }
                    Some(MethodSetting::Enabled(false)) => {}
                    Some(MethodSetting::Configured(overrides)) => {
                        table.insert(method, overrides.clone());
                    }
                }
            }
        }
    }

    for method in skip {
        if table.remove(method).is_none() {
            let warning = MethodWarning::RedundantSkip(*method);
            warn!(%method, "{warning}");
            warnings.push(warning);
        }
    }

    ResolvedMethods {
        table: MethodTable(table),
        warnings,
    }
}

/// Resolve methods given as dynamic values, e.g. read from configuration.
///
/// Missing values fall back to "all operations" and "skip nothing".
pub fn resolve_methods_value(
    methods: Option<&Value>,
    skip: Option<&Value>,
) -> Result<ResolvedMethods, ConfigurationError> {
    let spec = methods
        .map(MethodsSpec::try_from)
        .transpose()?
        .unwrap_or_default();
    let skip = skip.map(parse_skip_methods).transpose()?.unwrap_or_default();

    Ok(resolve_methods(&spec, &skip))
}
