//! Dependency ordering and validation over foreign keys
//!
//! This module provides functionality to:
//! - Build dependency graphs from a table set
//! - Topologically sort tables by their foreign keys
//! - Compute layering depth for layout
//! - Validate that all foreign key references exist

use super::table::Table;
use crate::error::SchemaError;
use std::collections::{HashMap, HashSet};

/// Table metadata for dependency ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    /// Tables this table depends on
    pub dependencies: Vec<String>,
}

impl TableInfo {
    /// Dependency info for every table; references to tables outside the set
    /// are left out so they cannot masquerade as cycles
    pub fn from_tables(tables: &[Table]) -> Vec<TableInfo> {
        let known: HashSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        tables
            .iter()
            .map(|t| TableInfo {
                name: t.name.clone(),
                dependencies: t
                    .dependencies()
                    .into_iter()
                    .filter(|d| known.contains(d.as_str()))
                    .collect(),
            })
            .collect()
    }
}

/// Topologically sort tables by their dependencies.
///
/// Returns tables in order: dependencies first, dependents last. Among
/// tables that become ready together, declaration order is kept.
pub fn topological_sort(tables: &[TableInfo]) -> Result<Vec<String>, SchemaError> {
    // Reverse graph: if A depends on B, then B has A as a dependent
    let mut reverse_graph: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();

    for table in tables {
        in_degree.insert(&table.name, table.dependencies.len());
        reverse_graph.insert(&table.name, Vec::new());
    }
    for table in tables {
        for dep in &table.dependencies {
            if let Some(dependents) = reverse_graph.get_mut(dep.as_str()) {
                dependents.push(&table.name);
            }
        }
    }

    let mut ready: Vec<&str> = tables
        .iter()
        .filter(|t| t.dependencies.is_empty())
        .map(|t| t.name.as_str())
        .collect();
    let mut result = Vec::with_capacity(tables.len());
    let mut cursor = 0;

    while cursor < ready.len() {
        let current = ready[cursor];
        cursor += 1;
        result.push(current.to_string());

        if let Some(dependents) = reverse_graph.get(current) {
            for &dependent in dependents {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(dependent);
                    }
                }
            }
        }
    }

    if result.len() != tables.len() {
        let stuck = tables
            .iter()
            .filter(|t| !result.contains(&t.name))
            .map(|t| t.name.clone())
            .collect();
        return Err(SchemaError::CircularDependency { tables: stuck });
    }

    Ok(result)
}

/// Layer index per table: 0 for tables without dependencies, otherwise one
/// more than the deepest table it references.
///
/// Falls back to declaration order (every table on its own layer index
/// equal to its position) when the graph has a cycle.
pub fn dependency_depths(tables: &[TableInfo]) -> HashMap<String, usize> {
    match topological_sort(tables) {
        Ok(order) => {
            let by_name: HashMap<&str, &TableInfo> =
                tables.iter().map(|t| (t.name.as_str(), t)).collect();
            let mut depths: HashMap<String, usize> = HashMap::new();
            for name in &order {
                let depth = by_name
                    .get(name.as_str())
                    .map(|info| {
                        info.dependencies
                            .iter()
                            .filter_map(|d| depths.get(d))
                            .map(|d| d + 1)
                            .max()
                            .unwrap_or(0)
                    })
                    .unwrap_or(0);
                depths.insert(name.clone(), depth);
            }
            depths
        }
        Err(err) => {
            log::debug!("layout falls back to declaration order: {}", err);
            tables
                .iter()
                .enumerate()
                .map(|(i, t)| (t.name.clone(), i))
                .collect()
        }
    }
}

/// Validate that all foreign key references point to tables that exist
pub fn validate_foreign_key_references(tables: &[Table]) -> Result<(), Vec<SchemaError>> {
    let table_names: HashSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    let mut errors = Vec::new();

    for table in tables {
        for column in table.foreign_keys() {
            if let Some(referenced) = column.referenced_table() {
                if !table_names.contains(referenced) {
                    errors.push(SchemaError::DanglingReference {
                        table: table.name.clone(),
                        column: column.name.clone(),
                        referenced: referenced.to_string(),
                    });
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(())
}
