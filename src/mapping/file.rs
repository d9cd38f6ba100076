//! Load mapping files and the end-to-end generation pipeline

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{MappingError, MappingResult};
use crate::sql::schema::SchemaView;

use super::classify::classify_and_filter_lookups;
use super::declaration::Declaration;
use super::dependencies::{discover_dependencies, OrderedEdgeSet};
use super::step::{build_mapping_steps, LoadStep, MappingLookup};

/// A user hint for the orderer, e.g. "load Contact after Account"
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadingRule {
    pub sf_object: String,
    #[serde(default)]
    pub load_after: Vec<String>,
}

/// Decides load order and which lookups are deferred to an update pass.
///
/// Receives the identity-mapped steps and the dependency edges and must
/// return the steps in load order, each with its lookups attached and
/// resolved to a single target table.
pub trait DependencyOrderer {
    fn order(
        &self,
        steps: Vec<LoadStep>,
        dependencies: &OrderedEdgeSet,
        rules: &[LoadingRule],
    ) -> MappingResult<Vec<LoadStep>>;
}

/// Orderer that keeps declaration order.
///
/// Each lookup is resolved against its first target. A lookup into an
/// object that is not loaded by an earlier step, including the step's own
/// object, is deferred. Loading rules are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationOrderer;

impl DependencyOrderer for DeclarationOrderer {
    fn order(
        &self,
        mut steps: Vec<LoadStep>,
        dependencies: &OrderedEdgeSet,
        _rules: &[LoadingRule],
    ) -> MappingResult<Vec<LoadStep>> {
        let mut loaded: HashSet<String> = HashSet::new();

        for step in &mut steps {
            let object = step.sf_object.clone();
            for edge in dependencies.edges_from(&object) {
                let Some(target) = edge.target_tables.first() else {
                    continue;
                };
                if edge.is_polymorphic() {
                    warn!("{} is polymorphic, resolving it against {}", edge, target);
                }

                let mut lookup = MappingLookup::new(target);
                if !loaded.contains(target) {
                    lookup = lookup.deferred();
                }
                step.lookups.insert(edge.field_name.clone(), lookup);
            }
            loaded.insert(object);
        }

        Ok(steps)
    }
}

/// Ordered object name -> load step; serialized as the YAML mapping file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingFile {
    steps: IndexMap<String, LoadStep>,
}

impl MappingFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key steps by object name, keeping their order
    pub fn from_steps(steps: impl IntoIterator<Item = LoadStep>) -> MappingResult<Self> {
        let mut file = Self::new();
        for step in steps {
            file.push(step)?;
        }
        Ok(file)
    }

    /// Append a step. Fails if the object already has one.
    pub fn push(&mut self, step: LoadStep) -> MappingResult<()> {
        if self.steps.contains_key(&step.sf_object) {
            return Err(MappingError::DuplicateStep(step.sf_object));
        }
        self.steps.insert(step.sf_object.clone(), step);
        Ok(())
    }

    pub fn get(&self, sf_object: &str) -> Option<&LoadStep> {
        self.steps.get(sf_object)
    }

    pub fn steps(&self) -> impl Iterator<Item = &LoadStep> {
        self.steps.values()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn to_yaml(&self) -> MappingResult<String> {
        serde_yaml::to_string(self).map_err(|e| MappingError::MappingFile(e.to_string()))
    }

    pub fn from_yaml(yaml: &str) -> MappingResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| MappingError::MappingFile(e.to_string()))
    }
}

/// Create a load mapping file from extract declarations.
///
/// Classification, dependency discovery and ordering all complete before a
/// mapping is returned; any failure yields no mapping at all.
pub fn create_load_mapping<S, O>(
    decls: &[Declaration],
    schema: &S,
    orderer: &O,
    rules: &[LoadingRule],
) -> MappingResult<MappingFile>
where
    S: SchemaView + ?Sized,
    O: DependencyOrderer + ?Sized,
{
    let classified = classify_and_filter_lookups(decls, schema)?;
    let dependencies = discover_dependencies(&classified);
    let steps = build_mapping_steps(&classified);
    let ordered = orderer.order(steps, &dependencies, rules)?;

    let mapping = MappingFile::from_steps(ordered)?;
    info!(
        "generated load mapping: {} steps, {} dependencies",
        mapping.len(),
        dependencies.len()
    );
    Ok(mapping)
}
