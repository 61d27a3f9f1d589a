//! Exercise load-progression store.
//!
//! Keeps the list of tracked exercises and their weight histories:
//! - Adding exercises and logging new weights
//! - Editing names and sections
//! - Pruning records whose history has emptied out
//! - Section grouping and autocomplete suggestions
//!
//! Rejected input (blank names, unparseable weights, unknown ids) leaves the
//! book untouched; nothing in here returns an error.

use crate::types::{Exercise, WeightEntry};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// All tracked exercises, in insertion order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExerciseBook {
    pub exercises: Vec<Exercise>,
}

impl ExerciseBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Exercise> {
        self.exercises.iter().find(|exercise| exercise.id == id)
    }

    /// Look an exercise up by case-insensitive name, falling back to an id
    /// prefix match
    pub fn find(&self, needle: &str) -> Option<&Exercise> {
        let lowered = needle.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        self.exercises
            .iter()
            .find(|exercise| exercise.name.to_lowercase() == lowered)
            .or_else(|| {
                self.exercises
                    .iter()
                    .find(|exercise| exercise.id.to_string().starts_with(&lowered))
            })
    }

    /// Add a new exercise with its first weight entry
    ///
    /// Name and section must be non-blank and the weight must parse to a
    /// finite number; otherwise nothing is added and None is returned.
    pub fn add_exercise(&mut self, name: &str, section: &str, weight: f64) -> Option<Uuid> {
        let name = name.trim();
        let section = section.trim();
        if name.is_empty() || section.is_empty() || !weight.is_finite() {
            tracing::debug!("rejected exercise: blank field or bad weight");
            return None;
        }

        let id = Uuid::new_v4();
        self.exercises.push(Exercise {
            id,
            name: name.to_string(),
            section: Some(section.to_string()),
            history: vec![WeightEntry {
                date: Utc::now(),
                weight,
            }],
        });
        tracing::info!("added exercise '{}' in section '{}'", name, section);
        Some(id)
    }

    /// Append a weight entry to an exercise's history
    pub fn log_weight(&mut self, id: Uuid, weight: f64) -> bool {
        if !weight.is_finite() {
            tracing::debug!("rejected weight entry: not a finite number");
            return false;
        }
        for exercise in &mut self.exercises {
            if exercise.id == id {
                exercise.history.push(WeightEntry {
                    date: Utc::now(),
                    weight,
                });
                return true;
            }
        }
        false
    }

    /// Remove one history entry by position
    ///
    /// A record emptied this way stays listed (showing weight 0) until a
    /// later update prunes it.
    pub fn remove_history_entry(&mut self, id: Uuid, index: usize) -> bool {
        for exercise in &mut self.exercises {
            if exercise.id == id {
                if index >= exercise.history.len() {
                    return false;
                }
                exercise.history.remove(index);
                return true;
            }
        }
        false
    }

    /// Update an exercise's name and/or section
    ///
    /// Blank replacement values keep the previous ones. A successful update
    /// also prunes every record whose history is empty.
    pub fn update_details(&mut self, id: Uuid, name: Option<&str>, section: Option<&str>) -> bool {
        let mut found = false;
        for exercise in &mut self.exercises {
            if exercise.id != id {
                continue;
            }
            found = true;
            if let Some(name) = name {
                let trimmed = name.trim();
                if !trimmed.is_empty() {
                    exercise.name = trimmed.to_string();
                }
            }
            if let Some(section) = section {
                let trimmed = section.trim();
                if !trimmed.is_empty() {
                    exercise.section = Some(trimmed.to_string());
                }
            }
            break;
        }
        if found {
            let pruned = self.prune_empty();
            if pruned > 0 {
                tracing::debug!("pruned {} exercise(s) with empty history", pruned);
            }
        }
        found
    }

    /// Delete an exercise and its entire history
    pub fn remove_exercise(&mut self, id: Uuid) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|exercise| exercise.id != id);
        let removed = self.exercises.len() < before;
        if removed {
            tracing::info!("removed exercise {}", id);
        }
        removed
    }

    /// Drop every record whose history is empty; returns how many went
    pub fn prune_empty(&mut self) -> usize {
        let before = self.exercises.len();
        self.exercises.retain(|exercise| !exercise.history.is_empty());
        before - self.exercises.len()
    }

    /// Exercises grouped by section label, sections sorted alphabetically
    pub fn by_section(&self) -> BTreeMap<String, Vec<&Exercise>> {
        let mut groups: BTreeMap<String, Vec<&Exercise>> = BTreeMap::new();
        for exercise in &self.exercises {
            groups
                .entry(exercise.section_label().to_string())
                .or_default()
                .push(exercise);
        }
        groups
    }

    /// Distinct section labels, sorted alphabetically
    pub fn section_names(&self) -> Vec<String> {
        let unique: BTreeSet<String> = self
            .exercises
            .iter()
            .map(|exercise| exercise.section_label().to_string())
            .collect();
        unique.into_iter().collect()
    }

    /// Section labels matching a partial input, for autocomplete
    ///
    /// Case-insensitive substring match; an exact match is excluded since it
    /// needs no suggesting. Blank input returns every section.
    pub fn section_suggestions(&self, input: &str) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        self.section_names()
            .into_iter()
            .filter(|section| {
                if needle.is_empty() {
                    return true;
                }
                let lowered = section.to_lowercase();
                lowered != needle && lowered.contains(&needle)
            })
            .collect()
    }
}

/// History entries paired with the weight change from the previous entry
///
/// The first entry has no previous weight to compare against.
pub fn history_deltas(exercise: &Exercise) -> Vec<(&WeightEntry, Option<f64>)> {
    let mut rows = Vec::with_capacity(exercise.history.len());
    let mut previous: Option<f64> = None;
    for entry in &exercise.history {
        rows.push((entry, previous.map(|weight| entry.weight - weight)));
        previous = Some(entry.weight);
    }
    rows
}
