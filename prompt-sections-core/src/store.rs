use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::Category;

/// Environment override for the directory holding persisted rules.
pub const DATA_DIR_ENV: &str = "PROMPT_SECTIONS_DATA_DIR";
/// Environment override for the rule-file path itself.
pub const RULES_PATH_ENV: &str = "PROMPT_SECTIONS_RULES_PATH";

/// Bundled default rule file, used when no persisted rules exist yet.
const BUNDLED_RULES: &str = include_str!("../config/default_rules.json");

/// Directory for persisted rules: `PROMPT_SECTIONS_DATA_DIR`, defaulting to
/// the platform temporary-files area.
pub fn data_dir() -> PathBuf {
    env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("prompt_sections"))
}

/// Rule-file path: `PROMPT_SECTIONS_RULES_PATH`, defaulting to
/// `custom_rules.json` inside [`data_dir`].
pub fn default_rules_path() -> PathBuf {
    env::var_os(RULES_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir().join("custom_rules.json"))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("rules import must be a JSON object of tag/category pairs")]
    NotAnObject,
    #[error("no valid rules found in import")]
    NoValidEntries,
}

/// The custom tag→category overrides, kept as two consistent views: the raw
/// table (original-case keys, sorted, what gets displayed and persisted) and
/// the lookup table (lower-cased keys, what the classifier matches against).
/// Keys and values are never empty after trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    raw: BTreeMap<String, String>,
    lookup: HashMap<String, String>,
}

impl RuleTable {
    /// Build a table from untrusted JSON. Non-object input yields an empty
    /// table; entries with non-string values or empty trimmed keys/values
    /// are dropped.
    pub fn from_value(value: &Value) -> Self {
        let mut table = Self::default();
        let Some(object) = value.as_object() else {
            return table;
        };

        for (key, value) in object {
            let Some(category) = value.as_str() else {
                continue;
            };
            let key = key.trim();
            let category = category.trim();
            if key.is_empty() || category.is_empty() {
                continue;
            }
            table.raw.insert(key.to_string(), category.to_string());
        }
        table.rebuild_lookup();
        table
    }

    /// Insert or overwrite one rule. Empty trimmed tags are ignored; an empty
    /// trimmed category defaults to the remainder label. Returns whether the
    /// table changed.
    pub fn insert(&mut self, tag: &str, category: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        let category = match category.trim() {
            "" => Category::Remainder.rule_label(),
            trimmed => trimmed,
        };

        self.raw.insert(tag.to_string(), category.to_string());
        self.rebuild_lookup();
        true
    }

    /// Remove one rule by its raw (original-case) tag. Returns whether the
    /// rule existed.
    pub fn remove(&mut self, tag: &str) -> bool {
        if self.raw.remove(tag.trim()).is_none() {
            return false;
        }
        self.rebuild_lookup();
        true
    }

    /// Merge another table into this one, overwriting on key collisions.
    pub fn merge(&mut self, other: RuleTable) {
        self.raw.extend(other.raw);
        self.rebuild_lookup();
    }

    /// The category string mapped to a lower-cased tag, if any.
    pub fn category_for(&self, tag_lower: &str) -> Option<&str> {
        self.lookup.get(tag_lower).map(String::as_str)
    }

    /// Sorted raw view for display and persistence.
    pub fn raw(&self) -> &BTreeMap<String, String> {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    // The lookup view is always rebuilt wholesale from raw; the invariant is
    // that every raw key appears lower-cased in lookup with the same value.
    fn rebuild_lookup(&mut self) {
        self.lookup = self
            .raw
            .iter()
            .map(|(key, value)| (key.to_lowercase(), value.clone()))
            .collect();
    }
}

/// Read a rule table from a JSON file. Missing files, unreadable content,
/// parse failures and non-object content all degrade to an empty table;
/// "no custom rules" is never an error for the caller.
pub fn load_rules(path: impl AsRef<Path>) -> RuleTable {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return RuleTable::default(),
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(value) => RuleTable::from_value(&value),
        Err(e) => {
            eprintln!(
                "⚠️  Ignoring malformed rule file {}: {e}",
                path.display()
            );
            RuleTable::default()
        }
    }
}

/// Persist the raw table as pretty-printed JSON (2-space indent, sorted
/// keys), creating parent directories as needed. Returns false on any I/O
/// failure instead of raising; the caller then keeps the table in memory.
pub fn save_rules(path: impl AsRef<Path>, table: &RuleTable) -> bool {
    let path = path.as_ref();
    let serialized = match serde_json::to_string_pretty(table.raw()) {
        Ok(serialized) => serialized,
        Err(_) => return false,
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    fs::write(path, serialized).is_ok()
}

/// Owned store for the custom rules: the table plus its persistence path.
/// Every mutation re-persists the full table; when persistence fails the
/// mutation still applies in memory and the store marks itself non-durable
/// so callers can tell the user the change won't survive the process.
#[derive(Debug, Clone)]
pub struct RuleStore {
    table: RuleTable,
    path: PathBuf,
    durable: bool,
}

impl RuleStore {
    /// Open the store at the environment-resolved default path. When no
    /// persisted file exists yet, the bundled default rules are loaded
    /// instead (and will be written on the first mutation).
    pub fn open_default() -> Self {
        Self::open(default_rules_path())
    }

    pub fn open(path: PathBuf) -> Self {
        let table = if path.exists() {
            load_rules(&path)
        } else {
            let bundled: Value =
                serde_json::from_str(BUNDLED_RULES).expect("bundled default_rules.json is valid");
            RuleTable::from_value(&bundled)
        };
        Self {
            table,
            path,
            durable: true,
        }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Sorted raw rules for display/export (the listRules contract).
    pub fn rules(&self) -> &BTreeMap<String, String> {
        self.table.raw()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// False once any mutation failed to persist; the table then lives only
    /// in memory for the rest of the process.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Add or update one rule and re-persist. Empty trimmed tags are a
    /// no-op; an empty trimmed category becomes Remainder.
    pub fn set_rule(&mut self, tag: &str, category: &str) {
        if self.table.insert(tag, category) {
            self.persist();
        }
    }

    /// Remove one rule and re-persist. Unknown tags are a no-op.
    pub fn delete_rule(&mut self, tag: &str) {
        if self.table.remove(tag) {
            self.persist();
        }
    }

    /// Validate and merge a JSON object of rules. Rejects non-object input
    /// and imports that yield no valid entries, leaving the table untouched.
    /// Returns the number of entries merged.
    pub fn import_rules(&mut self, value: &Value) -> Result<usize, ImportError> {
        if !value.is_object() {
            return Err(ImportError::NotAnObject);
        }
        let imported = RuleTable::from_value(value);
        if imported.is_empty() {
            return Err(ImportError::NoValidEntries);
        }

        let count = imported.len();
        self.table.merge(imported);
        self.persist();
        Ok(count)
    }

    fn persist(&mut self) {
        self.durable = save_rules(&self.path, &self.table);
    }
}
