use super::*;
use crate::catalog::{CatalogItem, InMemoryCatalogLoader};
use crate::embedding::{Embedder, EmbeddingError, EmbeddingVector, HashingEmbedder};
use crate::ranking::{RankedResult, Ranker, RankingError};
use crate::cache::CatalogSnapshot;
use std::sync::Arc;
use std::time::Duration;

fn films() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(1u64, "ALIEN CENTER", "a space adventure with aliens", "NC-17"),
        CatalogItem::new(2u64, "LOVE SUICIDES", "a romantic story of two people", "R"),
        CatalogItem::new(3u64, "DEEP CRUSADE", "a documentary about deep sea creatures", "PG"),
        CatalogItem::new(4u64, "HEIST GAMES", "a heist thriller in a casino", "PG-13"),
        CatalogItem::new(5u64, "STAR TREK", "a starship crew explores space", "PG"),
    ]
}

fn recommender(
    items: Vec<CatalogItem>,
) -> Recommender<Arc<HashingEmbedder>, Arc<InMemoryCatalogLoader>> {
    Recommender::new(
        Arc::new(HashingEmbedder::new()),
        Arc::new(InMemoryCatalogLoader::new(items)),
    )
}

#[test]
fn test_example_scenario_returns_space_film() {
    let service = recommender(vec![
        CatalogItem::new("a", "A", "a space adventure with aliens", "PG"),
        CatalogItem::new("b", "B", "a romantic story of two people", "PG"),
    ]);

    let results = service.recommend("aliens in space", 1).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title(), "A");
}

#[test]
fn test_recommend_length_is_min_of_top_n_and_catalog() {
    let service = recommender(films());
    for top_n in 1..=8 {
        let results = service.recommend("space", top_n).unwrap();
        assert_eq!(results.len(), top_n.min(5));
    }
}

#[test]
fn test_recommend_default_uses_three() {
    let service = recommender(films());
    assert_eq!(service.default_top_n(), 3);
    assert_eq!(service.recommend_default("space aliens").unwrap().len(), 3);

    let service = recommender(films()).with_default_top_n(2);
    assert_eq!(service.recommend_default("space aliens").unwrap().len(), 2);
}

#[test]
fn test_recommend_is_deterministic() {
    let service = recommender(films());
    let first = service.recommend("a crew of aliens in space", 4).unwrap();
    let second = service.recommend("a crew of aliens in space", 4).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_recommend_trims_query() {
    let service = recommender(films());
    let padded = service.recommend("   heist casino \n", 2).unwrap();
    let plain = service.recommend("heist casino", 2).unwrap();
    assert_eq!(padded, plain);
    assert_eq!(padded[0].title(), "HEIST GAMES");
}

#[test]
fn test_self_similarity_is_top_one() {
    let service = recommender(films());
    for film in films() {
        let results = service.recommend(&film.description, 1).unwrap();
        assert_eq!(results[0].item.id, film.id);
        assert!((results[0].score - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_scores_within_cosine_bounds() {
    let service = recommender(films());
    for query in ["space", "romance in a casino", "sea", "zzz unknown words"] {
        for r in service.recommend(query, 5).unwrap() {
            assert!(r.score >= -1.0 - 1e-6 && r.score <= 1.0 + 1e-6);
        }
    }
}

#[test]
fn test_blank_query_is_rejected_without_model_call() {
    let embedder = Arc::new(HashingEmbedder::new());
    let loader = Arc::new(InMemoryCatalogLoader::new(films()));
    let service = Recommender::new(Arc::clone(&embedder), Arc::clone(&loader));

    for query in ["", "   ", "\t\n "] {
        assert!(matches!(
            service.recommend(query, 3),
            Err(RecommendError::InvalidQuery)
        ));
    }

    assert_eq!(embedder.batch_calls(), 0);
    assert_eq!(loader.load_count(), 0);
}

#[test]
fn test_zero_top_n_is_rejected() {
    let service = recommender(films());
    let err = service.recommend("space", 0).unwrap_err();
    assert!(matches!(err, RecommendError::InvalidTopN));
    assert_eq!(err.kind(), "invalid_query");
}

#[test]
fn test_empty_catalog_is_catalog_unavailable() {
    let service = recommender(vec![]);
    let err = service.recommend("anything", 3).unwrap_err();
    assert!(matches!(err, RecommendError::CatalogUnavailable { .. }));
    assert_eq!(err.kind(), "catalog_unavailable");
    assert!(err.is_retryable());
}

#[test]
fn test_catalog_recovers_after_source_failure() {
    let loader = Arc::new(InMemoryCatalogLoader::new(films()));
    let service = Recommender::new(Arc::new(HashingEmbedder::new()), Arc::clone(&loader));

    loader.set_failing(true);
    assert!(matches!(
        service.recommend("space", 1),
        Err(RecommendError::CatalogUnavailable { .. })
    ));

    loader.set_failing(false);
    assert_eq!(service.recommend("space", 1).unwrap().len(), 1);
}

#[test]
fn test_model_failure_is_model_unavailable() {
    let embedder = Arc::new(HashingEmbedder::new());
    embedder.set_failing(true);
    let service = Recommender::new(embedder, Arc::new(InMemoryCatalogLoader::new(films())));

    let err = service.recommend("space", 1).unwrap_err();
    assert!(matches!(err, RecommendError::ModelUnavailable(_)));
    assert_eq!(err.kind(), "model_unavailable");
    assert!(!err.is_retryable());
    assert!(!service.is_warm());
}

#[test]
fn test_inference_failure_is_not_model_unavailable() {
    let err: RecommendError = EmbeddingError::TokenizationFailed {
        reason: "bad utf-8".to_string(),
    }
    .into();
    assert!(matches!(err, RecommendError::Embedding(_)));
    assert_eq!(err.kind(), "internal");
}

#[test]
fn test_catalog_is_embedded_once_across_queries() {
    let embedder = Arc::new(HashingEmbedder::new());
    let loader = Arc::new(InMemoryCatalogLoader::new(films()));
    let service = Recommender::new(Arc::clone(&embedder), Arc::clone(&loader));

    for query in ["space", "romance", "heist", "sea"] {
        service.recommend(query, 2).unwrap();
    }

    assert_eq!(loader.load_count(), 1);
    // One catalog batch plus one call per query.
    assert_eq!(embedder.batch_calls(), 5);
    assert_eq!(embedder.texts_embedded(), films().len() + 4);
}

#[test]
fn test_catalog_change_is_picked_up() {
    let loader = Arc::new(InMemoryCatalogLoader::new(films()));
    let service = Recommender::new(Arc::new(HashingEmbedder::new()), Arc::clone(&loader));

    assert_ne!(service.recommend("zombies", 1).unwrap()[0].item.id.as_str(), "9");

    let mut updated = films();
    updated.push(CatalogItem::new(9u64, "ZOMBIE NIGHT", "zombies overrun a town", "R"));
    loader.replace(updated);

    assert_eq!(service.recommend("zombies", 1).unwrap()[0].title(), "ZOMBIE NIGHT");
}

#[test]
fn test_warm_up_and_invalidate() {
    let embedder = Arc::new(HashingEmbedder::new());
    let service = Recommender::new(
        Arc::clone(&embedder),
        Arc::new(InMemoryCatalogLoader::new(films())),
    );

    assert!(!service.is_warm());
    let stats = service.warm_up().unwrap();
    assert!(service.is_warm());
    assert_eq!(stats.total_items, 5);
    assert_eq!(stats.distinct_categories, 4);
    assert_eq!(embedder.batch_calls(), 1);

    service.invalidate_catalog();
    assert!(!service.is_warm());
    service.recommend("space", 1).unwrap();
    assert_eq!(embedder.batch_calls(), 3);
}

#[test]
fn test_warm_up_on_empty_catalog() {
    let service = recommender(vec![]);
    assert!(matches!(
        service.warm_up(),
        Err(RecommendError::CatalogUnavailable { .. })
    ));
}

#[test]
fn test_catalog_stats_and_preview_do_not_embed() {
    let embedder = Arc::new(HashingEmbedder::new());
    let service = Recommender::new(
        Arc::clone(&embedder),
        Arc::new(InMemoryCatalogLoader::new(films())),
    );

    let stats = service.catalog_stats().unwrap();
    assert_eq!(stats.total_items, 5);

    let preview = service.catalog_preview(2).unwrap();
    let titles: Vec<&str> = preview.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["ALIEN CENTER", "LOVE SUICIDES"]);

    assert_eq!(service.catalog_preview(100).unwrap().len(), 5);
    assert_eq!(embedder.batch_calls(), 0);
}

#[test]
fn test_catalog_stats_and_preview_follow_source_changes() {
    let embedder = Arc::new(HashingEmbedder::new());
    let loader = Arc::new(InMemoryCatalogLoader::new(vec![CatalogItem::new(
        1u64,
        "ALIEN CENTER",
        "a space adventure with aliens",
        "NC-17",
    )]));
    let service = Recommender::new(Arc::clone(&embedder), Arc::clone(&loader));
    service.warm_up().unwrap();

    loader.replace(vec![
        CatalogItem::new(1u64, "ALIEN CENTER", "a space adventure with aliens", "NC-17"),
        CatalogItem::new(2u64, "LOVE SUICIDES", "a romantic story of two people", "R"),
    ]);

    let stats = service.catalog_stats().unwrap();
    assert_eq!(stats.total_items, 2);
    assert_eq!(stats.distinct_categories, 2);
    assert_eq!(service.catalog_preview(10).unwrap().len(), 2);

    // Only the warm-up embedded anything.
    assert_eq!(embedder.batch_calls(), 1);
}

#[test]
fn test_catalog_stats_on_empty_catalog() {
    let service = recommender(vec![]);
    assert!(matches!(
        service.catalog_stats(),
        Err(RecommendError::CatalogUnavailable { .. })
    ));
}

/// Always returns nothing.
struct EmptyRanker;

impl Ranker for EmptyRanker {
    fn rank(
        &self,
        _query: &EmbeddingVector,
        _snapshot: &CatalogSnapshot,
        _top_n: usize,
    ) -> Result<Vec<RankedResult>, RankingError> {
        Ok(vec![])
    }
}

#[test]
fn test_empty_ranking_is_no_matches() {
    let service = recommender(films()).with_ranker(EmptyRanker);
    let err = service.recommend("space", 3).unwrap_err();
    assert!(matches!(err, RecommendError::NoMatches));
    assert_eq!(err.kind(), "no_matches");
}

/// Embeds catalogs at one dimension and queries at another.
struct DriftingEmbedder {
    inner: HashingEmbedder,
}

impl Embedder for DriftingEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        self.inner.embed_batch(texts)
    }

    fn embed(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Ok(EmbeddingVector::normalized(vec![1.0; 3]))
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

#[test]
fn test_query_dimension_drift_is_invariant_violation() {
    let service = Recommender::new(
        DriftingEmbedder {
            inner: HashingEmbedder::new(),
        },
        InMemoryCatalogLoader::new(films()),
    );

    let err = service.recommend("space", 1).unwrap_err();
    assert!(matches!(err, RecommendError::InvariantViolation { .. }));
    assert_eq!(err.kind(), "internal");
}

#[test]
fn test_concurrent_first_queries_build_once() {
    let embedder = Arc::new(HashingEmbedder::new().with_delay(Duration::from_millis(20)));
    let loader = Arc::new(
        InMemoryCatalogLoader::new(films()).with_load_delay(Duration::from_millis(20)),
    );
    let service = Arc::new(Recommender::new(Arc::clone(&embedder), Arc::clone(&loader)));

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                let query = if i % 2 == 0 { "space aliens" } else { "romance" };
                service.recommend(query, 2).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().len(), 2);
    }

    assert_eq!(loader.load_count(), 1);
    // One catalog batch plus twelve query embeddings.
    assert_eq!(embedder.batch_calls(), 13);
    assert_eq!(embedder.texts_embedded(), films().len() + 12);
}
