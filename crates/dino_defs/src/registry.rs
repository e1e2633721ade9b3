//! Definition registry: loading, validation and lookup

use crate::boss::BossDefinition;
use crate::error::{DefinitionError, Result};
use crate::species::SpeciesDefinition;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const BUILTIN_SPECIES: &str = include_str!("../data/species.json");
const BUILTIN_BOSSES: &str = include_str!("../data/bosses.json");

#[derive(Deserialize)]
struct SpeciesFile {
    species: Vec<SpeciesDefinition>,
}

#[derive(Deserialize)]
struct BossFile {
    #[serde(default)]
    bosses: Vec<BossDefinition>,
}

/// Read-only catalog of species and bosses
///
/// Species keep their load order, which is the order used by weighted
/// selection.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    species: Vec<Arc<SpeciesDefinition>>,
    species_index: HashMap<String, usize>,
    bosses: HashMap<String, Arc<BossDefinition>>,
}

impl DefinitionRegistry {
    /// Load the roster shipped with the crate
    pub fn load_builtin() -> Result<Self> {
        Self::load_from_str(BUILTIN_SPECIES, BUILTIN_BOSSES)
    }

    /// Load from JSON documents (`{"species": [...]}` and `{"bosses": [...]}`)
    pub fn load_from_str(species_json: &str, bosses_json: &str) -> Result<Self> {
        let species: SpeciesFile =
            serde_json::from_str(species_json).map_err(|error| DefinitionError::Parse {
                source_name: "species".into(),
                error,
            })?;
        let bosses: BossFile =
            serde_json::from_str(bosses_json).map_err(|error| DefinitionError::Parse {
                source_name: "bosses".into(),
                error,
            })?;
        Self::from_definitions(species.species, bosses.bosses)
    }

    /// Load `species.json` and `bosses.json` from a directory
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|error| DefinitionError::Io { path, error })
        };
        let species = read("species.json")?;
        let bosses = read("bosses.json")?;
        let registry = Self::load_from_str(&species, &bosses)?;
        log::info!(
            "Loaded {} species and {} bosses from {}",
            registry.species.len(),
            registry.bosses.len(),
            dir.display()
        );
        Ok(registry)
    }

    /// Build from already-parsed definitions, validating everything
    pub fn from_definitions(
        species: Vec<SpeciesDefinition>,
        bosses: Vec<BossDefinition>,
    ) -> Result<Self> {
        let mut registry = Self::default();

        if species.is_empty() {
            return Err(DefinitionError::malformed("<species>", "no species defined"));
        }

        for def in species {
            def.validate()
                .map_err(|reason| DefinitionError::malformed(&def.id, reason))?;
            if registry.species_index.contains_key(&def.id) {
                return Err(DefinitionError::malformed(&def.id, "duplicate species id"));
            }
            registry
                .species_index
                .insert(def.id.clone(), registry.species.len());
            registry.species.push(Arc::new(def));
        }

        for def in bosses {
            def.validate()
                .map_err(|reason| DefinitionError::malformed(&def.id, reason))?;
            let base = registry.species(&def.base_species).ok_or_else(|| {
                DefinitionError::malformed(
                    &def.id,
                    format!("unknown base species '{}'", def.base_species),
                )
            })?;
            if let Some(escort) = &def.escort {
                if registry.species(&escort.species).is_none() {
                    return Err(DefinitionError::malformed(
                        &def.id,
                        format!("unknown escort species '{}'", escort.species),
                    ));
                }
            }
            for phase in &def.phases {
                for name in &phase.attack_pattern {
                    if base.ability(name).is_none() && def.ability(name).is_none() {
                        return Err(DefinitionError::malformed(
                            &def.id,
                            format!("attack pattern names unknown ability '{}'", name),
                        ));
                    }
                }
            }
            if registry.bosses.contains_key(&def.id) {
                return Err(DefinitionError::malformed(&def.id, "duplicate boss id"));
            }
            registry.bosses.insert(def.id.clone(), Arc::new(def));
        }

        Ok(registry)
    }

    /// Get a species by id
    pub fn species(&self, id: &str) -> Option<&Arc<SpeciesDefinition>> {
        self.species_index.get(id).map(|&i| &self.species[i])
    }

    /// Get a boss by id
    pub fn boss(&self, id: &str) -> Option<&Arc<BossDefinition>> {
        self.bosses.get(id)
    }

    /// Get a species or fail with `NotFound`
    pub fn require_species(&self, id: &str) -> Result<&Arc<SpeciesDefinition>> {
        self.species(id)
            .ok_or_else(|| DefinitionError::NotFound(id.to_string()))
    }

    /// Get a boss or fail with `NotFound`
    pub fn require_boss(&self, id: &str) -> Result<&Arc<BossDefinition>> {
        self.boss(id)
            .ok_or_else(|| DefinitionError::NotFound(id.to_string()))
    }

    /// Species in load order
    pub fn all_species(&self) -> impl Iterator<Item = &Arc<SpeciesDefinition>> {
        self.species.iter()
    }

    /// Boss ids (unordered)
    pub fn boss_ids(&self) -> impl Iterator<Item = &str> {
        self.bosses.keys().map(String::as_str)
    }

    /// Sum of every species' spawn weight
    pub fn total_spawn_weight(&self) -> f32 {
        self.species.iter().map(|s| s.spawn_weight).sum()
    }

    /// Pick the species whose cumulative weight bucket contains `roll`
    ///
    /// `roll` is expected in `[0, total_spawn_weight)`.
    pub fn species_for_roll(&self, roll: f32) -> Option<&Arc<SpeciesDefinition>> {
        let mut cumulative = 0.0;
        let mut last_weighted = None;
        for species in &self.species {
            if species.spawn_weight <= 0.0 {
                continue;
            }
            cumulative += species.spawn_weight;
            last_weighted = Some(species);
            if roll < cumulative {
                return Some(species);
            }
        }
        last_weighted
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn boss_count(&self) -> usize {
        self.bosses.len()
    }
}
