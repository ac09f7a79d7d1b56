use serde_json::{Value, json};

use falcata::autocomplete::{AutocompleteEngine, SharedAutocomplete};
use falcata::error::Result;
use falcata::recommend::{CollaborativeFilter, RatingMatrix, find_neighbors};
use falcata::search::{
    FacetDefinition, FacetedSearch, FilterSet, Record, apply_filters, build_facets,
};
use falcata::spelling::{SpellingDictionary, SpellingSuggester, edit_distance, fuzzy_match};
use falcata::vector::{Document, cosine_similarity, semantic_search};

const WORDS: &[&str] = &[
    "", "a", "ab", "kitten", "sitting", "saturday", "sunday", "flaw", "lawn", "rosettacode",
    "raisethysword", "café", "cafe", "über", "uber",
];

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn catalogue() -> Vec<Record> {
    (0..10)
        .map(|i| {
            let category = if i % 3 == 0 { "books" } else { "music" };
            let region = if i % 2 == 0 { "eu" } else { "us" };
            record(json!({
                "id": i,
                "category": category,
                "region": region,
                "score": i,
            }))
        })
        .collect()
}

#[test]
fn autocomplete_returns_completions_in_lexicographic_order() -> Result<()> {
    let mut engine = AutocompleteEngine::new();
    engine.insert("cat", 5);
    engine.insert("car", 3);
    engine.insert("cart", 1);

    let result = engine.suggest("ca", 10)?;
    assert_eq!(result.suggestions, vec!["car", "cart", "cat"]);
    assert_eq!(result.frequencies, vec![3, 1, 5]);

    // identical output on an unmodified trie
    assert_eq!(engine.suggest("ca", 10)?, result);
    assert!(engine.suggest("ca", 0).unwrap_err().is_invalid_argument());
    assert!(engine.suggest("zz", 10)?.is_empty());
    Ok(())
}

#[test]
fn autocomplete_accumulates_repeated_insertions() -> Result<()> {
    let shared = SharedAutocomplete::new(AutocompleteEngine::new());
    shared.insert("search", 2);
    shared.insert("Search", 3);

    let result = shared.suggest("sea", 5)?;
    assert_eq!(result.suggestions, vec!["search"]);
    assert_eq!(result.frequencies, vec![5]);
    Ok(())
}

#[test]
fn edit_distance_is_a_metric() {
    assert_eq!(edit_distance("kitten", "sitting"), 3);

    for a in WORDS {
        assert_eq!(edit_distance(a, a), 0);
        for b in WORDS {
            assert_eq!(edit_distance(a, b), edit_distance(b, a), "{a} / {b}");
            for c in WORDS {
                assert!(
                    edit_distance(a, c) <= edit_distance(a, b) + edit_distance(b, c),
                    "{a} / {b} / {c}"
                );
            }
        }
    }
}

#[test]
fn fuzzy_match_keeps_candidates_strictly_under_threshold() {
    let result = fuzzy_match("aple", &["apple", "apply", "ample"], 2);

    let texts: Vec<&str> = result.matches.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["apple", "ample"]);
    assert!(result.matches.iter().all(|m| m.distance == 1));
    assert!(
        result
            .matches
            .windows(2)
            .all(|pair| pair[0].distance <= pair[1].distance)
    );
}

#[test]
fn spelling_suggester_prefers_close_frequent_words() {
    let mut dictionary = SpellingDictionary::new();
    dictionary.add_word("apple", 50);
    dictionary.add_word("ample", 5);
    dictionary.add_word("maple", 10);
    let suggester = SpellingSuggester::new(dictionary);

    assert!(suggester.is_correct("apple"));
    assert_eq!(suggester.did_you_mean("aple").as_deref(), Some("apple"));
    assert_eq!(suggester.did_you_mean("apple"), None);
}

#[test]
fn cosine_similarity_guards_orthogonal_and_zero_vectors() {
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);

    let vectors: [&[f32]; 4] = [
        &[1.0, 2.0, 3.0],
        &[-4.0, 0.5, 2.0],
        &[0.001, 1000.0, -7.0],
        &[3.0, 3.0, 3.0],
    ];
    for u in vectors {
        assert!((cosine_similarity(u, u) - 1.0).abs() < 1e-6);
        for v in vectors {
            let similarity = cosine_similarity(u, v);
            assert!((-1.0..=1.0).contains(&similarity));
        }
    }
}

#[test]
fn semantic_search_over_empty_corpus_is_empty() -> Result<()> {
    let result = semantic_search(&[1.0, 0.0], &[], 5)?;
    assert!(result.results.is_empty());
    assert_eq!(result.avg_similarity, 0.0);
    assert_eq!(result.total_searched, 0);
    Ok(())
}

#[test]
fn semantic_search_ranks_by_descending_similarity() -> Result<()> {
    let corpus = vec![
        Document::new("west", vec![-1.0, 0.0]),
        Document::new("north", vec![0.0, 1.0]),
        Document::new("east", vec![1.0, 0.0]),
        Document::new("north-east", vec![1.0, 1.0]),
    ];

    let result = semantic_search(&[1.0, 0.2], &corpus, 3)?;
    let ids: Vec<&str> = result.results.iter().map(|h| h.document_id.as_str()).collect();
    assert_eq!(ids, vec!["east", "north-east", "north"]);
    assert_eq!(result.total_searched, 4);
    assert!(
        result
            .results
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity)
    );

    let err = semantic_search(&[1.0, 0.0, 0.0], &corpus, 3).unwrap_err();
    assert!(err.is_invalid_argument());
    Ok(())
}

#[test]
fn neighbors_are_ordered_and_exclude_the_target() -> Result<()> {
    let matrix = vec![
        vec![5.0, 3.0, 0.0, 1.0],
        vec![4.0, 0.0, 0.0, 1.0],
        vec![1.0, 1.0, 0.0, 5.0],
        vec![1.0, 0.0, 0.0, 4.0],
        vec![0.0, 1.0, 5.0, 4.0],
    ];

    let result = find_neighbors(0, &matrix, 3)?;
    assert!(result.neighbors.len() <= 3);
    assert!(result.neighbors.iter().all(|n| n.user_index != 0));
    assert!(
        result
            .neighbors
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity)
    );

    assert!(find_neighbors(9, &matrix, 3).unwrap_err().is_invalid_argument());

    let filter = CollaborativeFilter::new(RatingMatrix::from(matrix));
    assert_eq!(filter.find_neighbors(0)?, find_neighbors(0, filter.matrix().rows(), 5)?);
    Ok(())
}

#[test]
fn facets_over_filtered_items_sum_to_the_filtered_count() {
    let items = catalogue();
    let mut filters = FilterSet::new();
    filters.insert("category".into(), json!("books"));

    let filtered = apply_filters(&items, &filters);
    assert_eq!(filtered.len(), 4);

    let definitions = vec![
        FacetDefinition::for_field("region"),
        FacetDefinition::new("kind", "category"),
    ];
    let facets = build_facets(filtered.iter().copied(), &definitions);
    assert_eq!(facets.total("region"), 4);
    assert_eq!(facets.total("kind"), 4);
    assert_eq!(facets.get("kind").and_then(|c| c.get("books")), Some(&4));
}

#[test]
fn faceted_search_reports_biased_average_score() {
    let items = catalogue();
    let mut filters = FilterSet::new();
    filters.insert("category".into(), json!("books"));

    let response = FacetedSearch::new(vec![FacetDefinition::for_field("region")]).search(
        "novels",
        &filters,
        &items,
    );

    assert_eq!(response.query, "novels");
    assert_eq!(response.total, 4);
    assert_eq!(response.results.len(), 4);
    // scores 0, 3, 6, 9 over a divisor of 4 + 1
    assert!((response.avg_score - 18.0 / 5.0).abs() < 1e-9);
}
