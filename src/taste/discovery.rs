//! Derived discovery operations, all built purely from [`TasteClient::search`].
//!
//! Fan-out compositions degrade per-query: a failed variant is logged and
//! contributes nothing, so one bad query cannot sink a merged call. The
//! base `search` itself stays a hard `Result` so callers that want the
//! distinction keep it.

use std::collections::BTreeMap;

use crate::models::{Category, Entity};
use crate::taste::client::TasteClient;
use crate::taste::fanout::{
    category_queries, cross_domain_queries, merge_dedup_truncate, per_query_limit,
    similar_patterns, trending_queries,
};

impl TasteClient {
    /// Search with a degrade-to-empty policy: failures are logged at warn
    /// and yield no entities. Used by every fan-out composition below and
    /// by route handlers that backfill rather than fail.
    pub(crate) async fn search_or_empty(&self, query: &str, limit: usize) -> Vec<Entity> {
        match self.search(query, limit, 0).await {
            Ok(entities) => entities,
            Err(e) => {
                tracing::warn!("search for {query:?} failed: {e}");
                Vec::new()
            }
        }
    }

    /// Discover entities in a category via up to two canned synonym
    /// queries, merged and deduplicated.
    pub async fn discover_by_category(&self, category: &str, limit: usize) -> Vec<Entity> {
        let queries = category_queries(category);
        let sub_limit = per_query_limit(limit, 2);

        let mut batches = Vec::new();
        let mut accumulated = 0;
        for query in queries.iter().take(2) {
            let batch = self.search_or_empty(query, sub_limit).await;
            accumulated += batch.len();
            batches.push(batch);
            if accumulated >= limit {
                break;
            }
        }

        merge_dedup_truncate(batches, limit)
    }

    /// Simulate similarity search by fanning out name-based phrasings.
    /// Exact (case-insensitive) matches of the seed name are dropped.
    pub async fn find_similar(&self, name: &str, limit: usize) -> Vec<Entity> {
        let seed = name.to_lowercase();
        let sub_limit = per_query_limit(limit, 2);

        let mut batches = Vec::new();
        let mut accumulated = 0;
        for pattern in similar_patterns(name) {
            let batch: Vec<Entity> = self
                .search_or_empty(&pattern, sub_limit)
                .await
                .into_iter()
                .filter(|e| e.name.to_lowercase() != seed)
                .collect();
            accumulated += batch.len();
            batches.push(batch);
            if accumulated >= limit {
                break;
            }
        }

        merge_dedup_truncate(batches, limit)
    }

    /// Trend queries in priority order: the first that returns any hits
    /// wins entirely, no merging across queries.
    pub async fn get_trending(&self, category: Option<&str>, limit: usize) -> Vec<Entity> {
        for query in trending_queries(category) {
            let entities = self.search_or_empty(&query, limit).await;
            if !entities.is_empty() {
                return entities;
            }
        }
        Vec::new()
    }

    /// Independent searches, one per query; no merging. A failed query
    /// maps to an empty list.
    pub async fn multi_search(
        &self,
        queries: &[String],
        limit_per_query: usize,
    ) -> BTreeMap<String, Vec<Entity>> {
        let mut results = BTreeMap::new();
        for query in queries {
            let entities = self.search_or_empty(query, limit_per_query).await;
            results.insert(query.clone(), entities);
        }
        results
    }

    /// Search each interest and group the hits by inferred category.
    /// Interests with zero hits are omitted.
    pub async fn build_taste_profile(
        &self,
        interests: &[String],
    ) -> BTreeMap<String, BTreeMap<Category, Vec<Entity>>> {
        let mut profile = BTreeMap::new();

        for interest in interests {
            let entities = self.search_or_empty(interest, 10).await;
            if entities.is_empty() {
                continue;
            }

            let mut categorized: BTreeMap<Category, Vec<Entity>> = BTreeMap::new();
            for entity in entities {
                categorized.entry(entity.category()).or_default().push(entity);
            }
            profile.insert(interest.clone(), categorized);
        }

        profile
    }

    /// Discover entities in other domains connected to a seed entity,
    /// three templated phrasings per domain.
    pub async fn cross_domain_discovery(
        &self,
        seed: &str,
        domains: &[String],
        limit: usize,
    ) -> BTreeMap<String, Vec<Entity>> {
        let mut results = BTreeMap::new();

        for domain in domains {
            let queries = cross_domain_queries(seed, domain);
            let sub_limit = limit / queries.len() + 1;

            let mut batches = Vec::new();
            let mut accumulated = 0;
            for query in &queries {
                let batch = self.search_or_empty(query, sub_limit).await;
                accumulated += batch.len();
                batches.push(batch);
                if accumulated >= limit {
                    break;
                }
            }

            results.insert(domain.clone(), merge_dedup_truncate(batches, limit));
        }

        results
    }
}
