//! Transitive dependency closure over stored templates.

use std::collections::{HashSet, VecDeque};

use crate::error::{Result, StoreError};
use crate::store::TemplateStore;
use crate::template::Template;

/// Computes the full transitive dependency closure of a template, in
/// discovery order. The starting template itself is not part of the result.
///
/// Traversal keeps a visited-set keyed by id, so a cycle is truncated
/// silently: an already-visited id is never re-descended into and appears at
/// most once.
///
/// # Errors
///
/// [`StoreError::NotFound`] if the starting identifier does not resolve;
/// [`StoreError::MissingDependency`] naming the first dependency id that
/// cannot be resolved.
pub fn closure(store: &TemplateStore<'_>, identifier: &str) -> Result<Vec<Template>> {
    let root = store.get(identifier)?;

    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(root.id.clone());

    let mut queue: VecDeque<String> = root.dependencies.into_iter().collect();
    let mut result = Vec::new();

    while let Some(dependency) = queue.pop_front() {
        if visited.contains(&dependency) {
            continue;
        }
        let template = match store.get(&dependency) {
            Ok(t) => t,
            Err(StoreError::NotFound(_)) => {
                return Err(StoreError::MissingDependency(dependency));
            }
            Err(e) => return Err(e),
        };
        if !visited.insert(template.id.clone()) {
            continue;
        }
        queue.extend(template.dependencies.iter().cloned());
        result.push(template);
    }

    Ok(result)
}
