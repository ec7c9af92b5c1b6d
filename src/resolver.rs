//! Identifier resolution against the set of templates currently on disk.
//!
//! An identifier may be a full content hash, a short-hash prefix, or a human
//! alias. Aliases live in one JSON document (`aliases.json`) mapping
//! `id -> [alias, ...]`; the reverse index is rebuilt at load time. The
//! resolver is an explicit object constructed with its alias-file path —
//! never process-wide state — so several stores can coexist in one process.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::context::ServiceContext;
use crate::error::{Result, StoreError};
use crate::hash;
use crate::template::Template;

/// Outcome of binding an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetAliasOutcome {
    /// The alias now points at the requested id.
    Bound,
    /// The alias already points at a different id; nothing changed.
    /// Rebinding requires an explicit `remove_alias` first.
    AlreadyBound {
        /// The id the alias is currently bound to.
        existing_id: String,
    },
}

/// Alias map plus the derived reverse index.
#[derive(Debug, Default)]
struct AliasMap {
    forward: BTreeMap<String, Vec<String>>,
    reverse: HashMap<String, String>,
}

impl AliasMap {
    fn from_forward(forward: BTreeMap<String, Vec<String>>) -> Self {
        let mut reverse = HashMap::new();
        for (id, aliases) in &forward {
            for alias in aliases {
                reverse.insert(alias.clone(), id.clone());
            }
        }
        Self { forward, reverse }
    }
}

/// Resolves user-supplied identifiers to canonical content hashes.
pub struct IdentifierResolver {
    alias_path: PathBuf,
}

impl IdentifierResolver {
    /// Creates a resolver persisting its alias map at `alias_path`.
    #[must_use]
    pub fn new(alias_path: impl Into<PathBuf>) -> Self {
        Self { alias_path: alias_path.into() }
    }

    /// Resolves `identifier` to an id present in `available_ids`.
    ///
    /// Resolution order: exact alias, full id, then unique short-hash
    /// prefix. An alias bound to an id that is no longer on disk is invisible
    /// here (tombstone semantics), so resolution falls through to the other
    /// strategies.
    ///
    /// # Errors
    ///
    /// [`StoreError::Ambiguous`] when a prefix matches more than one id;
    /// [`StoreError::NotFound`] when nothing matches; I/O errors from
    /// reading the alias map.
    pub fn resolve(
        &self,
        ctx: &ServiceContext,
        identifier: &str,
        available_ids: &[String],
    ) -> Result<String> {
        if identifier.is_empty() {
            return Err(StoreError::NotFound(identifier.to_string()));
        }

        let map = self.load(ctx)?;
        if let Some(id) = map.reverse.get(identifier) {
            if available_ids.iter().any(|a| a == id) {
                return Ok(id.clone());
            }
        }

        if available_ids.iter().any(|a| a == identifier) {
            return Ok(identifier.to_string());
        }

        let matches: Vec<String> = available_ids
            .iter()
            .filter(|id| id.starts_with(identifier))
            .cloned()
            .collect();
        match matches.as_slice() {
            [] => Err(StoreError::NotFound(identifier.to_string())),
            [only] => Ok(only.clone()),
            _ => Err(StoreError::Ambiguous { identifier: identifier.to_string(), matches }),
        }
    }

    /// Returns the aliases bound to `id`, or empty when the id is not
    /// currently present (tombstone behavior, not an error).
    ///
    /// # Errors
    ///
    /// Returns an error if the alias map cannot be read.
    pub fn aliases_of(
        &self,
        ctx: &ServiceContext,
        id: &str,
        available_ids: &[String],
    ) -> Result<Vec<String>> {
        if !available_ids.iter().any(|a| a == id) {
            return Ok(Vec::new());
        }
        let map = self.load(ctx)?;
        Ok(map.forward.get(id).cloned().unwrap_or_default())
    }

    /// Binds `alias` to `id`. Binding an alias to the id it already names is
    /// an idempotent `Bound`; an alias naming a different id is left alone
    /// and reported as `AlreadyBound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias map cannot be read or written.
    pub fn set_alias(
        &self,
        ctx: &ServiceContext,
        alias: &str,
        id: &str,
    ) -> Result<SetAliasOutcome> {
        let mut map = self.load(ctx)?;
        if let Some(existing) = map.reverse.get(alias) {
            if existing == id {
                return Ok(SetAliasOutcome::Bound);
            }
            return Ok(SetAliasOutcome::AlreadyBound { existing_id: existing.clone() });
        }
        map.forward.entry(id.to_string()).or_default().push(alias.to_string());
        map.reverse.insert(alias.to_string(), id.to_string());
        self.save(ctx, &map)?;
        Ok(SetAliasOutcome::Bound)
    }

    /// Removes `alias` from both indexes. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias map cannot be read or written.
    pub fn remove_alias(&self, ctx: &ServiceContext, alias: &str) -> Result<bool> {
        let mut map = self.load(ctx)?;
        let Some(id) = map.reverse.remove(alias) else {
            return Ok(false);
        };
        if let Some(aliases) = map.forward.get_mut(&id) {
            aliases.retain(|a| a != alias);
            if aliases.is_empty() {
                map.forward.remove(&id);
            }
        }
        self.save(ctx, &map)?;
        Ok(true)
    }

    /// Erases every alias bound to an id absent from `available_ids` and
    /// returns how many aliases were dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias map cannot be read or written.
    pub fn prune(&self, ctx: &ServiceContext, available_ids: &[String]) -> Result<usize> {
        let mut map = self.load(ctx)?;
        let stale: Vec<String> =
            map.forward.keys().filter(|id| !available_ids.contains(*id)).cloned().collect();
        let mut removed = 0;
        for id in stale {
            if let Some(aliases) = map.forward.remove(&id) {
                removed += aliases.len();
                for alias in aliases {
                    map.reverse.remove(&alias);
                }
            }
        }
        if removed > 0 {
            self.save(ctx, &map)?;
        }
        Ok(removed)
    }

    /// Rebinds every alias pointing at `old_id` to `new_id`. Used by the
    /// migration engine after a directory move.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias map cannot be read or written.
    pub fn rebind(&self, ctx: &ServiceContext, old_id: &str, new_id: &str) -> Result<()> {
        let mut map = self.load(ctx)?;
        let Some(aliases) = map.forward.remove(old_id) else {
            return Ok(());
        };
        for alias in &aliases {
            map.reverse.insert(alias.clone(), new_id.to_string());
        }
        map.forward.entry(new_id.to_string()).or_default().extend(aliases);
        self.save(ctx, &map)?;
        Ok(())
    }

    fn load(&self, ctx: &ServiceContext) -> Result<AliasMap> {
        if !ctx.fs.exists(&self.alias_path) {
            return Ok(AliasMap::default());
        }
        let content = ctx.fs.read_to_string(&self.alias_path).map_err(|e| {
            StoreError::io(format!("read alias map {}", self.alias_path.display()), e)
        })?;
        let forward: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
                path: self.alias_path.display().to_string(),
                detail: e.to_string(),
            })?;
        Ok(AliasMap::from_forward(forward))
    }

    fn save(&self, ctx: &ServiceContext, map: &AliasMap) -> Result<()> {
        let json = serde_json::to_string_pretty(&map.forward)
            .map_err(|e| StoreError::io("serialize alias map", e.into()))?;
        ctx.fs.write(&self.alias_path, &json).map_err(|e| {
            StoreError::io(format!("write alias map {}", self.alias_path.display()), e)
        })
    }
}

/// Returns a copy of `template` whose id is recomputed from content.
///
/// Pure: the on-disk move belongs to the migration engine.
///
/// # Errors
///
/// Returns an error if canonical serialization fails.
pub fn migrate_to_hash(ctx: &ServiceContext, template: &Template) -> Result<Template> {
    let mut migrated = template.clone();
    migrated.id = hash::compute_hash(ctx, template)?;
    Ok(migrated)
}
