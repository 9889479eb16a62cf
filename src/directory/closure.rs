//! Rubric closure: every company tagged with a rubric or any of its descendants.
//!
//! The hierarchy lives in the store as a parent pointer per rubric. Expansion
//! walks it level by level through `select_child_rubric_ids`, fetching the
//! directly tagged rows of each rubric on the way.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{DirectoryError, Result};
use crate::models::FlatCompanyRow;
use crate::store::DirectoryStore;

/// Default number of levels below the requested rubric that may be expanded.
pub const DEFAULT_MAX_RUBRIC_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureLimits {
    /// Levels below the starting rubric. Level 1 holds its direct children.
    pub max_depth: usize,
}

impl Default for ClosureLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_RUBRIC_DEPTH,
        }
    }
}

/// Collect the flat rows of `rubric_id` and of every rubric below it.
///
/// Each rubric id is expanded at most once, so a cyclic parent relation
/// terminates. Rows are returned unsorted and are not de-duplicated. Any store
/// failure aborts the walk and nothing gathered so far is returned.
pub async fn resolve_rubric_closure(
    store: &dyn DirectoryStore,
    rubric_id: i64,
    limits: ClosureLimits,
) -> Result<Vec<FlatCompanyRow>> {
    let mut visited: HashSet<i64> = HashSet::from([rubric_id]);
    let mut rows = store.select_rows_by_rubric(rubric_id).await?;
    let mut frontier = unvisited(store.select_child_rubric_ids(rubric_id).await?, &mut visited);
    let mut depth = 0usize;

    while !frontier.is_empty() {
        depth += 1;
        if depth > limits.max_depth {
            return Err(DirectoryError::HierarchyTooDeep {
                rubric_id,
                max_depth: limits.max_depth,
            });
        }

        debug!(rubric_id, depth, width = frontier.len(), "expanding rubric level");

        let mut next = Vec::new();
        for id in frontier {
            rows.extend(store.select_rows_by_rubric(id).await?);
            next.extend(unvisited(store.select_child_rubric_ids(id).await?, &mut visited));
        }
        frontier = next;
    }

    debug!(rubric_id, rubrics = visited.len(), rows = rows.len(), "rubric closure resolved");
    Ok(rows)
}

fn unvisited(children: Vec<i64>, visited: &mut HashSet<i64>) -> Vec<i64> {
    children
        .into_iter()
        .filter(|id| {
            let fresh = visited.insert(*id);
            if !fresh {
                debug!(rubric_id = *id, "rubric already expanded, skipping");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::group_companies;
    use crate::models::{Building, CompanyInput, InsertedBuilding};
    use crate::store::MemoryDirectoryStore;
    use async_trait::async_trait;

    fn company(name: &str, rubrics: &[i64]) -> CompanyInput {
        CompanyInput {
            name: name.into(),
            phones: format!("{name}-phone"),
            rubrics: rubrics.to_vec(),
        }
    }

    async fn store_with(companies: Vec<CompanyInput>) -> MemoryDirectoryStore {
        let store = MemoryDirectoryStore::new();
        store
            .insert_building(&Building {
                address: "Lenina 1".into(),
                coordinates: "0,0".into(),
                companies,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn finds_companies_on_grandchild_rubric() {
        // R1 -> {R2, R3}, R2 -> {R4}
        let store = store_with(vec![company("Deep", &[4])]).await;
        store.add_rubric(1, None).await;
        store.add_rubric(2, Some(1)).await;
        store.add_rubric(3, Some(1)).await;
        store.add_rubric(4, Some(2)).await;

        let rows = resolve_rubric_closure(&store, 1, ClosureLimits::default())
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Deep");
        assert_eq!(rows[0].rubric_id, 4);
    }

    #[tokio::test]
    async fn leaf_rubric_equals_direct_lookup() {
        let store = store_with(vec![company("A", &[7]), company("B", &[7, 8])]).await;
        store.add_rubric(7, None).await;

        let closure = resolve_rubric_closure(&store, 7, ClosureLimits::default())
            .await
            .unwrap();
        let direct = store.select_rows_by_rubric(7).await.unwrap();

        assert_eq!(group_companies(closure), group_companies(direct));
    }

    #[tokio::test]
    async fn closure_contains_direct_rows() {
        let store = store_with(vec![company("Top", &[1]), company("Leaf", &[2])]).await;
        store.add_rubric(1, None).await;
        store.add_rubric(2, Some(1)).await;

        let closure = resolve_rubric_closure(&store, 1, ClosureLimits::default())
            .await
            .unwrap();
        let direct = store.select_rows_by_rubric(1).await.unwrap();

        assert!(direct.iter().all(|row| closure.contains(row)));
        assert_eq!(closure.len(), 2);
    }

    #[tokio::test]
    async fn cyclic_hierarchy_terminates() {
        let store = store_with(vec![company("Loop", &[1, 2])]).await;
        store.add_rubric(1, Some(2)).await;
        store.add_rubric(2, Some(1)).await;

        let rows = resolve_rubric_closure(&store, 1, ClosureLimits::default())
            .await
            .unwrap();

        let mut rubrics: Vec<i64> = rows.iter().map(|r| r.rubric_id).collect();
        rubrics.sort_unstable();
        assert_eq!(rubrics, vec![1, 2]);
    }

    #[tokio::test]
    async fn depth_bound_reports_too_deep() {
        let store = MemoryDirectoryStore::new();
        store.add_rubric(1, None).await;
        store.add_rubric(2, Some(1)).await;
        store.add_rubric(3, Some(2)).await;
        store.add_rubric(4, Some(3)).await;

        let err = resolve_rubric_closure(&store, 1, ClosureLimits { max_depth: 2 })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::HierarchyTooDeep {
                rubric_id: 1,
                max_depth: 2
            }
        ));

        let ok = resolve_rubric_closure(&store, 1, ClosureLimits { max_depth: 3 }).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn unknown_rubric_yields_nothing() {
        let store = MemoryDirectoryStore::new();
        let rows = resolve_rubric_closure(&store, 99, ClosureLimits::default())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    /// Store whose row lookup fails for one rubric id.
    struct FailingStore {
        inner: MemoryDirectoryStore,
        fail_on: i64,
    }

    #[async_trait]
    impl DirectoryStore for FailingStore {
        async fn insert_building(&self, building: &Building) -> Result<InsertedBuilding> {
            self.inner.insert_building(building).await
        }
        async fn lookup_building_id_by_address(&self, address: &str) -> Result<i64> {
            self.inner.lookup_building_id_by_address(address).await
        }
        async fn lookup_company_id_by_name(&self, name: &str) -> Result<i64> {
            self.inner.lookup_company_id_by_name(name).await
        }
        async fn select_rows_by_company(&self, company_id: i64) -> Result<Vec<FlatCompanyRow>> {
            self.inner.select_rows_by_company(company_id).await
        }
        async fn select_rows_by_building(&self, building_id: i64) -> Result<Vec<FlatCompanyRow>> {
            self.inner.select_rows_by_building(building_id).await
        }
        async fn select_rows_by_rubric(&self, rubric_id: i64) -> Result<Vec<FlatCompanyRow>> {
            if rubric_id == self.fail_on {
                return Err(DirectoryError::Storage(anyhow::anyhow!(
                    "connection lost"
                )));
            }
            self.inner.select_rows_by_rubric(rubric_id).await
        }
        async fn select_child_rubric_ids(&self, rubric_id: i64) -> Result<Vec<i64>> {
            self.inner.select_child_rubric_ids(rubric_id).await
        }
        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn storage_failure_aborts_expansion() {
        let inner = store_with(vec![company("A", &[1]), company("B", &[3])]).await;
        inner.add_rubric(1, None).await;
        inner.add_rubric(2, Some(1)).await;
        inner.add_rubric(3, Some(2)).await;
        let store = FailingStore { inner, fail_on: 2 };

        let err = resolve_rubric_closure(&store, 1, ClosureLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Storage(_)));
        assert_eq!(err.to_string(), "storage: connection lost");
    }
}
