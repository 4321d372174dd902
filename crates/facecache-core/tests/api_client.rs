use std::sync::Arc;

use facecache_core::{
    ApiClient, ApiError, CacheStore, LoadStatus, MemoryStorage, PersonDetailController, PersonsController,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn persons_body() -> serde_json::Value {
    serde_json::json!({
        "persons": [
            {
                "personId": "p-1",
                "photoCount": 4,
                "repThumbKey": "thumbs/p-1.jpg",
                "repThumbURL": "https://bucket.example.com/thumbs/p-1.jpg?X-Amz-Expires=3600"
            },
            {
                "personId": "p-2",
                "photoCount": 1,
                "repThumbKey": null,
                "repThumbURL": null
            }
        ]
    })
}

fn photos_body(person_id: &str) -> serde_json::Value {
    serde_json::json!({
        "personId": person_id,
        "photos": [
            {
                "photoId": "ph-1",
                "photoBucket": "bucket",
                "photoKey": "photos/ph-1.jpg",
                "thumbKey": "thumbs/ph-1.jpg",
                "thumbURL": "https://bucket.example.com/thumbs/ph-1.jpg",
                "photoURL": "https://bucket.example.com/photos/ph-1.jpg"
            }
        ]
    })
}

#[tokio::test]
async fn test_get_persons_under_path_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/prod/persons"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(persons_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&format!("{}/prod/", mock_server.uri())).unwrap();
    let response = client.get_persons().await.unwrap();

    assert_eq!(response.persons.len(), 2);
    assert_eq!(response.persons[0].person_id, "p-1");
    assert_eq!(response.persons[0].photo_count, 4);
    // Nulls decode as empty strings
    assert_eq!(response.persons[1].rep_thumb_url, "");
}

#[tokio::test]
async fn test_get_person_photos_encodes_person_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/persons/a%2Fb%20c/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(photos_body("a/b c")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri()).unwrap();
    let response = client.get_person_photos("a/b c").await.unwrap();

    assert_eq!(response.person_id, "a/b c");
    assert_eq!(response.photos.len(), 1);
    assert_eq!(response.photos[0].photo_url, "https://bucket.example.com/photos/ph-1.jpg");
}

#[tokio::test]
async fn test_not_found_maps_to_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/persons/ghost/photos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri()).unwrap();
    let err = client.get_person_photos("ghost").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Failed to fetch photos: 404 Not Found");
}

#[tokio::test]
async fn test_server_error_maps_to_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/persons"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri()).unwrap();
    let err = client.get_persons().await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch persons: 500 Internal Server Error");
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/persons"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri()).unwrap();
    let err = client.get_persons().await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = ApiClient::new("http://127.0.0.1:1").unwrap();
    let err = client.get_persons().await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_controllers_fetch_once_then_serve_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/persons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(persons_body()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/persons/p-1/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(photos_body("p-1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(&mock_server.uri()).unwrap();
    let store = CacheStore::new(Arc::new(MemoryStorage::new()));

    let mut persons = PersonsController::new(store.clone());
    persons.load(&client, false).await;
    persons.load(&client, false).await;
    assert_eq!(persons.status(), LoadStatus::Loaded);
    assert_eq!(persons.persons().len(), 2);

    let mut detail = PersonDetailController::activate(store.clone(), "p-1");
    detail.load(&client, false).await;
    assert_eq!(detail.status(), LoadStatus::Loaded);

    let revisit = PersonDetailController::activate(store, "p-1");
    assert_eq!(revisit.photos().len(), 1);
    assert!(revisit.is_seen("ph-1"));
}
