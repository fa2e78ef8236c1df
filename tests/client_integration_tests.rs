use atlas::api::{ApiError, CountrySource, RestCountriesClient};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// A minimal provider-shaped country body. Optional fields are left out on
/// purpose: the client must default them.
fn country_body(common: &str, official: &str, cca2: &str, cca3: &str, region: &str) -> serde_json::Value {
    json!({
        "name": { "common": common, "official": official },
        "cca2": cca2,
        "cca3": cca3,
        "region": region
    })
}

fn finland_body() -> serde_json::Value {
    let mut body = country_body("Finland", "Republic of Finland", "FI", "FIN", "Europe");
    body["capital"] = json!(["Helsinki"]);
    body["population"] = json!(5530719);
    body["languages"] = json!({ "fin": "Finnish", "swe": "Swedish" });
    body
}

fn japan_body() -> serde_json::Value {
    let mut body = country_body("Japan", "Japan", "JP", "JPN", "Asia");
    body["languages"] = json!({ "jpn": "Japanese" });
    body
}

fn client_for(server: &MockServer) -> RestCountriesClient {
    RestCountriesClient::new(Some(server.uri()))
}

// ============================================================================
// list_all
// ============================================================================

#[tokio::test]
async fn test_list_all_decodes_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([finland_body(), japan_body()])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let countries = client.list_all().await.unwrap();

    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0].name.common, "Finland");
    assert_eq!(countries[0].display_capital(), "Helsinki");
    assert_eq!(countries[1].cca3, "JPN");
    // Fields the provider omitted are defaulted, not errors.
    assert!(countries[1].capital.is_empty());
    assert_eq!(countries[1].population, 0);
}

#[tokio::test]
async fn test_list_all_server_error_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.list_all().await;

    assert!(matches!(result, Err(ApiError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_list_all_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.list_all().await;

    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn test_list_all_transport_failure_is_network_error() {
    // Nothing listens here; the request fails before any HTTP status.
    let client = RestCountriesClient::new(Some("http://127.0.0.1:1".to_string()));
    let result = client.list_all().await;

    assert!(matches!(result, Err(ApiError::Network(_))));
}

// ============================================================================
// search_by_name / list_by_region
// ============================================================================

#[tokio::test]
async fn test_search_by_name_hits_name_route() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/fin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([finland_body()])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let countries = client.search_by_name("fin").await.unwrap();

    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].cca3, "FIN");
}

/// The provider answers an empty match with 404; callers expect a NotFound
/// they can treat as an empty result.
#[tokio::test]
async fn test_search_by_name_empty_match_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/atlantis"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "message": "Not Found"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.search_by_name("atlantis").await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_list_by_region_hits_region_route() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/region/europe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([finland_body()])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let countries = client.list_by_region("europe").await.unwrap();

    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].region, "Europe");
}

// ============================================================================
// get_by_code
// ============================================================================

#[tokio::test]
async fn test_get_by_code_unwraps_single_element_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alpha/FIN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([finland_body()])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let country = client.get_by_code("FIN").await.unwrap();

    assert_eq!(country.name.common, "Finland");
}

#[tokio::test]
async fn test_get_by_code_unknown_code_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alpha/ZZZ"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "message": "Not Found"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_by_code("ZZZ").await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_get_by_code_empty_array_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alpha/XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_by_code("XYZ").await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

// ============================================================================
// list_by_language
// ============================================================================

#[tokio::test]
async fn test_list_by_language_narrows_full_set() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([finland_body(), japan_body()])))
        .expect(2) // one fetch per call below
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let finnish = client.list_by_language("Finnish").await.unwrap();
    assert_eq!(finnish.len(), 1);
    assert_eq!(finnish[0].cca3, "FIN");

    // Substring match, case-insensitive.
    let fragment = client.list_by_language("japan").await.unwrap();
    assert_eq!(fragment.len(), 1);
    assert_eq!(fragment[0].cca3, "JPN");
}
