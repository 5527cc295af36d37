//! store.rs
//! The override-aware map from (file, data set) to the relations that apply
//! to it.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::EngineError;
use crate::relations::types::{Relation, RelationKind};

/// Associates relations to data files, with file-level defaults overridable
/// per data set.
///
/// At any one scope, at most one relation of a non-duplicate-allowing kind
/// may be registered; a rejected add leaves the store in its prior state.
#[derive(Debug, Clone, Default)]
pub struct RelationsStore {
    file_relations: HashMap<PathBuf, Vec<Relation>>,
    data_set_relations: HashMap<(PathBuf, u32), Vec<Relation>>,
}

impl RelationsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file-level default relation.
    pub fn add_file_relation(
        &mut self,
        location: &Path,
        relation: Relation,
    ) -> Result<(), EngineError> {
        let existing = self.file_relations.get(location).map(Vec::as_slice).unwrap_or(&[]);
        check_duplicate(existing, &relation, || location.display().to_string())?;
        debug!("file relation {} at '{}'", relation.kind(), location.display());
        self.file_relations
            .entry(location.to_path_buf())
            .or_default()
            .push(relation);
        Ok(())
    }

    /// Registers a relation scoped to one data set inside `location`.
    pub fn add_data_set_relation(
        &mut self,
        location: &Path,
        data_set: u32,
        relation: Relation,
    ) -> Result<(), EngineError> {
        let key = (location.to_path_buf(), data_set);
        let existing = self.data_set_relations.get(&key).map(Vec::as_slice).unwrap_or(&[]);
        check_duplicate(existing, &relation, || {
            format!("{}#{data_set}", location.display())
        })?;
        debug!(
            "data-set relation {} at '{}' #{data_set}",
            relation.kind(),
            location.display()
        );
        self.data_set_relations.entry(key).or_default().push(relation);
        Ok(())
    }

    /// The relations applying to one data set.
    ///
    /// With no data-set-scoped entry the file-level set is returned
    /// verbatim. Otherwise the data-set set wins outright per kind:
    /// file-level relations whose kind already appears in the data-set set
    /// are dropped entirely, even when that kind normally allows duplicates
    /// at the file level. A data-set set that merely lacks a kind (rather
    /// than overriding it) lets the file-level relations of that kind
    /// through.
    pub fn relations_for(&self, location: &Path, data_set: u32) -> Vec<Relation> {
        let file_level = self
            .file_relations
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        match self.data_set_relations.get(&(location.to_path_buf(), data_set)) {
            None => file_level.to_vec(),
            Some(specific) => {
                let overridden: HashSet<RelationKind> =
                    specific.iter().map(Relation::kind).collect();
                let mut merged = specific.clone();
                merged.extend(
                    file_level
                        .iter()
                        .filter(|r| !overridden.contains(&r.kind()))
                        .cloned(),
                );
                merged
            }
        }
    }
}

fn check_duplicate(
    existing: &[Relation],
    candidate: &Relation,
    scope: impl Fn() -> String,
) -> Result<(), EngineError> {
    if candidate.allows_duplicates() {
        return Ok(());
    }
    let kind = candidate.kind();
    if existing.iter().any(|r| r.kind() == kind) {
        return Err(EngineError::DuplicateRelation {
            kind: kind.to_string(),
            scope: scope(),
        });
    }
    Ok(())
}
