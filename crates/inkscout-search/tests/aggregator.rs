//! Integration tests for `CategorySearchAggregator` using wiremock HTTP mocks.

use std::sync::Arc;

use inkscout_core::geo::LngLat;
use inkscout_mapbox::MapboxClient;
use inkscout_search::CategorySearchAggregator;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Downtown Austin; the fixtures below sit ~1 and ~2 miles north of it.
const ORIGIN: LngLat = LngLat {
    lng: -97.7431,
    lat: 30.2672,
};

fn aggregator(base_url: &str) -> CategorySearchAggregator {
    let client = MapboxClient::with_base_url("pk.test-token", 30, "inkscout-test/0.1", base_url)
        .expect("client construction should not fail");
    CategorySearchAggregator::new(Arc::new(client), 15)
}

fn suggestion(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "mapbox_id": id,
        "name": name,
        "place_formatted": "Austin, Texas, United States",
        "feature_type": "poi"
    })
}

fn retrieve_body(id: &str, name: &str, lng: f64, lat: f64) -> serde_json::Value {
    serde_json::json!({
        "features": [
            {
                "geometry": { "coordinates": [lng, lat] },
                "properties": {
                    "mapbox_id": id,
                    "name": name,
                    "address": "123 Test St",
                    "place_formatted": "Austin, Texas",
                    "poi_category": ["tattoo parlour"]
                }
            }
        ]
    })
}

async fn mount_suggest(server: &MockServer, suggestions: &[serde_json::Value]) {
    Mock::given(method("GET"))
        .and(path("/search/searchbox/v1/suggest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "suggestions": suggestions })),
        )
        .mount(server)
        .await;
}

async fn mount_retrieve(server: &MockServer, id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/search/searchbox/v1/retrieve/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn results_are_sorted_ascending_by_distance() {
    let server = MockServer::start().await;

    // Suggestion order is farthest-first; the output must be nearest-first.
    mount_suggest(
        &server,
        &[
            suggestion("sugg.far", "Far Side Tattoo"),
            suggestion("sugg.near", "Near Side Tattoo"),
        ],
    )
    .await;
    mount_retrieve(
        &server,
        "sugg.far",
        retrieve_body("sugg.far", "Far Side Tattoo", -97.7431, 30.2962),
    )
    .await;
    mount_retrieve(
        &server,
        "sugg.near",
        retrieve_body("sugg.near", "Near Side Tattoo", -97.7431, 30.2817),
    )
    .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "tattoo")
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Near Side Tattoo");
    assert_eq!(results[0].distance_miles, Some(1.0));
    assert_eq!(results[1].name, "Far Side Tattoo");
    assert_eq!(results[1].distance_miles, Some(2.0));
}

#[tokio::test]
async fn fallback_without_category_filter_is_used_when_primary_is_empty() {
    let server = MockServer::start().await;

    // The categorized call comes back empty; the broadened call (no
    // poi_category param) carries the real candidates.
    Mock::given(method("GET"))
        .and(path("/search/searchbox/v1/suggest"))
        .and(query_param("poi_category", "tattoo_parlour"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "suggestions": [] })),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    mount_suggest(
        &server,
        &[
            suggestion("sugg.1", "Black Lotus Tattoo"),
            suggestion("sugg.2", "Iron Quill Tattoo"),
        ],
    )
    .await;
    mount_retrieve(
        &server,
        "sugg.1",
        retrieve_body("sugg.1", "Black Lotus Tattoo", -97.7431, 30.2817),
    )
    .await;
    mount_retrieve(
        &server,
        "sugg.2",
        retrieve_body("sugg.2", "Iron Quill Tattoo", -97.7431, 30.2962),
    )
    .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "tattoo")
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 2, "fallback candidates should be resolved");
}

#[tokio::test]
async fn failed_retrieve_drops_only_that_candidate() {
    let server = MockServer::start().await;

    mount_suggest(
        &server,
        &[
            suggestion("sugg.far", "Far Side Tattoo"),
            suggestion("sugg.broken", "Broken Needle Tattoo"),
            suggestion("sugg.near", "Near Side Tattoo"),
        ],
    )
    .await;
    mount_retrieve(
        &server,
        "sugg.far",
        retrieve_body("sugg.far", "Far Side Tattoo", -97.7431, 30.2962),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search/searchbox/v1/retrieve/sugg.broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_retrieve(
        &server,
        "sugg.near",
        retrieve_body("sugg.near", "Near Side Tattoo", -97.7431, 30.2817),
    )
    .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "tattoo")
        .await
        .expect("one broken candidate must not fail the search");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Near Side Tattoo");
    assert_eq!(results[1].name, "Far Side Tattoo");
}

#[tokio::test]
async fn irrelevant_candidates_are_never_resolved() {
    let server = MockServer::start().await;

    mount_suggest(
        &server,
        &[
            suggestion("sugg.coffee", "Joe's Coffee"),
            suggestion("sugg.ink", "Lone Star Tattoo"),
        ],
    )
    .await;
    mount_retrieve(
        &server,
        "sugg.ink",
        retrieve_body("sugg.ink", "Lone Star Tattoo", -97.7431, 30.2817),
    )
    .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "tattoo")
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Lone Star Tattoo");

    let retrieved_coffee = server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .any(|r| r.url.path().contains("sugg.coffee"));
    assert!(
        !retrieved_coffee,
        "an irrelevant candidate must be filtered before resolution"
    );
}

#[tokio::test]
async fn resolved_record_failing_relevance_is_discarded() {
    let server = MockServer::start().await;

    // The suggestion looks relevant (address mentions a tattoo district),
    // but the resolved record reveals an unrelated business.
    mount_suggest(
        &server,
        &[serde_json::json!({
            "mapbox_id": "sugg.bakery",
            "name": "Corner Bakery",
            "place_formatted": "Tattoo District, Austin, Texas",
            "feature_type": "poi"
        })],
    )
    .await;
    mount_retrieve(
        &server,
        "sugg.bakery",
        serde_json::json!({
            "features": [
                {
                    "geometry": { "coordinates": [-97.7431, 30.2817] },
                    "properties": {
                        "mapbox_id": "sugg.bakery",
                        "name": "Corner Bakery",
                        "poi_category": ["bakery"]
                    }
                }
            ]
        }),
    )
    .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "tattoo")
        .await
        .expect("search should succeed");

    assert!(
        results.is_empty(),
        "re-validation on the detail record must reject the bakery"
    );
}

#[tokio::test]
async fn duplicate_candidate_ids_yield_one_result() {
    let server = MockServer::start().await;

    mount_suggest(
        &server,
        &[
            suggestion("sugg.dup", "Twice Listed Tattoo"),
            suggestion("sugg.dup", "Twice Listed Tattoo"),
        ],
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/search/searchbox/v1/retrieve/sugg.dup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(retrieve_body(
            "sugg.dup",
            "Twice Listed Tattoo",
            -97.7431,
            30.2817,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "tattoo")
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 1, "dedup happens before resolution");
}

#[tokio::test]
async fn untagged_results_get_the_sentinel_category() {
    let server = MockServer::start().await;

    mount_suggest(&server, &[suggestion("sugg.plain", "Plain Ink")]).await;
    mount_retrieve(
        &server,
        "sugg.plain",
        serde_json::json!({
            "features": [
                {
                    "geometry": { "coordinates": [-97.7431, 30.2817] },
                    "properties": {
                        "mapbox_id": "sugg.plain",
                        "name": "Plain Ink"
                    }
                }
            ]
        }),
    )
    .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "tattoo")
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].categories, vec!["Tattoo Studio"]);
}

#[tokio::test]
async fn composed_query_does_not_duplicate_the_domain_keyword() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/searchbox/v1/suggest"))
        .and(query_param("q", "downtown tattoo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "suggestions": [] })),
        )
        .expect(2) // primary + fallback, both with the verbatim term
        .mount(&server)
        .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "downtown tattoo")
        .await
        .expect("search should succeed");
    assert!(results.is_empty());
}

#[tokio::test]
async fn unrelated_query_is_suffixed_with_the_domain_keyword() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/searchbox/v1/suggest"))
        .and(query_param("q", "south congress tattoo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "suggestions": [] })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "south congress")
        .await
        .expect("search should succeed");
    assert!(results.is_empty());
}

#[tokio::test]
async fn totally_empty_provider_result_is_an_empty_set_not_an_error() {
    let server = MockServer::start().await;
    mount_suggest(&server, &[]).await;

    let results = aggregator(&server.uri())
        .search(ORIGIN, "tattoo")
        .await
        .expect("no candidates is not an error");
    assert!(results.is_empty());
}

#[tokio::test]
async fn text_search_normalizes_geocode_features() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "features": [
            {
                "id": "poi.456",
                "text": "Golden Needle",
                "place_name": "Golden Needle, 12 Main St, Portland, Oregon, United States",
                "geometry": { "coordinates": [-122.675, 45.505] },
                "context": [
                    { "id": "place.1", "text": "Portland" },
                    { "id": "region.2", "text": "Oregon" },
                    { "id": "country.3", "text": "United States" }
                ],
                "properties": { "category": "tattoo parlour" }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path_regex(r"^/geocoding/v5/mapbox\.places/.+\.json$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let results = aggregator(&server.uri())
        .text_search("golden needle", Some(ORIGIN), 15)
        .await
        .expect("text search should succeed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].place_formatted, "Portland, Oregon, United States");
    assert!(results[0].distance_miles.is_none());
}
