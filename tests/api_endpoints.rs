use axum::Router;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use flicks_rs::api::{AppState, router};
use flicks_rs::config::UpstreamConfig;
use flicks_rs::models::{ErrorBody, MovieListResponse, VideoListResponse};
use flicks_rs::tmdb::TmdbClient;
use serde_json::{Value, from_slice, json};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

const API_KEY: &str = "test-key";

fn app_with_base(base: &str) -> TestResult<Router> {
    let config = UpstreamConfig {
        api_key: API_KEY.to_string(),
        base_url: Url::parse(base)?,
        proxy_url: None,
    };
    Ok(router(AppState::new(TmdbClient::new(&config)?)))
}

fn app_for(server: &MockServer) -> TestResult<Router> {
    app_with_base(&format!("{}/3/", server.uri()))
}

async fn get(app: &Router, uri: &str) -> TestResult<(StatusCode, Vec<u8>)> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, bytes.to_vec()))
}

fn batman_page() -> Value {
    json!({
        "page": 1,
        "results": [{
            "id": 268,
            "title": "Batman",
            "poster_path": "/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg",
            "vote_average": 7.2,
            "release_date": "1989-06-21",
            "original_language": "en"
        }],
        "total_pages": 1,
        "total_results": 1
    })
}

#[tokio::test]
async fn search_relays_upstream_json_verbatim() -> TestResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "batman"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(batman_page()))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server)?;
    let (status, bytes) = get(&app, "/api/movies?query=batman").await?;

    assert_eq!(status, StatusCode::OK);
    let relayed: Value = from_slice(&bytes)?;
    assert_eq!(relayed, batman_page());
    let parsed: MovieListResponse = from_slice(&bytes)?;
    assert_eq!(parsed.results[0].title, "Batman");
    Ok(())
}

#[tokio::test]
async fn missing_or_empty_query_lists_popular_movies() -> TestResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .and(query_param("sort_by", "popularity.desc"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(batman_page()))
        .expect(2)
        .mount(&server)
        .await;

    let app = app_for(&server)?;
    for uri in ["/api/movies", "/api/movies?query="] {
        let (status, _) = get(&app, uri).await?;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn unmatched_search_is_an_empty_success() -> TestResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "zzzzznomatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [],
            "total_pages": 0,
            "total_results": 0
        })))
        .mount(&server)
        .await;

    let app = app_for(&server)?;
    let (status, bytes) = get(&app, "/api/movies?query=zzzzznomatch").await?;

    assert_eq!(status, StatusCode::OK);
    let parsed: MovieListResponse = from_slice(&bytes)?;
    assert!(parsed.results.is_empty());
    Ok(())
}

#[tokio::test]
async fn recommendations_search_on_the_first_token() -> TestResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "dark"))
        .respond_with(ResponseTemplate::new(200).set_body_json(batman_page()))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server)?;
    let (status, _) = get(
        &app,
        "/api/movies/recommendations?query=dark%20knight%20rises",
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = get(&app, "/api/movies/recommendations").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: ErrorBody = from_slice(&bytes)?;
    assert_eq!(body.error, "query parameter is required");
    Ok(())
}

#[tokio::test]
async fn videos_are_fetched_by_movie_id() -> TestResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/268/videos"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 268,
            "results": [
                {"type": "Teaser", "site": "Other", "key": "zzz"},
                {"type": "Trailer", "site": "YouTube", "key": "abc"}
            ]
        })))
        .mount(&server)
        .await;

    let app = app_for(&server)?;
    let (status, bytes) = get(&app, "/api/movies/268/videos").await?;

    assert_eq!(status, StatusCode::OK);
    let parsed: VideoListResponse = from_slice(&bytes)?;
    assert_eq!(parsed.results.len(), 2);
    assert_eq!(parsed.results[1].key, "abc");

    Ok(())
}

#[tokio::test]
async fn non_numeric_movie_id_is_a_json_bad_request() -> TestResult<()> {
    let app = app_with_base("http://127.0.0.1:9/3/")?;

    for uri in ["/api/movies/not-a-number/videos", "/api/movies/-4/videos"] {
        let (status, bytes) = get(&app, uri).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        let body: ErrorBody = from_slice(&bytes)?;
        assert_eq!(body.error, "invalid movie id", "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn rejected_credential_maps_to_fixed_error_bodies() -> TestResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key.",
            "success": false
        })))
        .mount(&server)
        .await;

    let app = app_for(&server)?;
    let cases = [
        ("/api/movies?query=batman", "Failed to fetch data from TMDB"),
        ("/api/movies", "Failed to fetch data from TMDB"),
        (
            "/api/movies/recommendations?query=batman",
            "Failed to fetch recommendation data",
        ),
        ("/api/movies/268/videos", "Failed to fetch trailer data"),
    ];

    for (uri, expected) in cases {
        let (status, bytes) = get(&app, uri).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let body: Value = from_slice(&bytes)?;
        assert_eq!(body, json!({ "error": expected }), "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_maps_to_fixed_error_bodies() -> TestResult<()> {
    // Nothing listens on the discard port.
    let app = app_with_base("http://127.0.0.1:9/3/")?;

    for uri in [
        "/api/movies?query=batman",
        "/api/movies/recommendations?query=batman",
        "/api/movies/268/videos",
    ] {
        let (status, bytes) = get(&app, uri).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains(API_KEY), "{uri} leaked the credential");
        let body: ErrorBody = from_slice(&bytes)?;
        assert!(body.error.starts_with("Failed to fetch"));
    }
    Ok(())
}

#[tokio::test]
async fn malformed_upstream_body_is_an_upstream_failure() -> TestResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let app = app_for(&server)?;
    let (status, bytes) = get(&app, "/api/movies").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = from_slice(&bytes)?;
    assert_eq!(body.error, "Failed to fetch data from TMDB");
    Ok(())
}

#[tokio::test]
async fn healthz_and_cors_headers() -> TestResult<()> {
    let app = app_with_base("http://127.0.0.1:9/3/")?;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"ok");
    Ok(())
}
