use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, faulty_app, Fault, AFFILIATE_ID, API_ID};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(path: &str, query: &str) -> Request<String> {
    let sep = if query.is_empty() { "" } else { "&" };
    Request::builder()
        .uri(format!("{path}?api_id={API_ID}&affiliate_id={AFFILIATE_ID}{sep}{query}"))
        .body(String::new())
        .unwrap()
}

// --- credentials ---

#[tokio::test]
async fn bad_credentials_answer_inside_result() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/FloorList?api_id=wrong&affiliate_id=mock-990")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["result"]["status"], 400);
    assert!(body["result"]["errors"].get("api_id").is_some());
    assert_eq!(body["request"]["parameters"]["api_id"], "wrong");
}

// --- items ---

#[tokio::test]
async fn item_list_filters_by_floor_and_keyword() {
    let resp = app()
        .oneshot(get("/ItemList", "site=FANZA&floor=dvd&keyword=ABP-477"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["result"]["result_count"], 1);
    assert_eq!(body["result"]["items"][0]["content_id"], "mird00127");
    assert_eq!(body["request"]["parameters"]["keyword"], "ABP-477");
}

#[tokio::test]
async fn item_list_pages() {
    let resp = app().oneshot(get("/ItemList", "site=FANZA&hits=1&offset=2")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["result"]["result_count"], 1);
    assert_eq!(body["result"]["total_count"], "3");
    assert_eq!(body["result"]["first_position"], 2);
    assert_eq!(body["result"]["items"][0]["content_id"], "118abp00477");
}

// --- floors and floor-scoped searches ---

#[tokio::test]
async fn floor_list_returns_fixture_tree() {
    let resp = app().oneshot(get("/FloorList", "")).await.unwrap();
    let body = body_json(resp).await;
    let sites = body["result"]["site"].as_array().unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0]["code"], "DMM.com");
}

#[tokio::test]
async fn genre_search_carries_floor_context() {
    let resp = app().oneshot(get("/GenreSearch", "floor_id=43&hits=2")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["result"]["floor_code"], "videoa");
    assert_eq!(body["result"]["genre"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_endpoint_returns_404() {
    let resp = app().oneshot(get("/DoesNotExist", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- faults ---

#[tokio::test]
async fn missing_result_fault_echoes_request_only() {
    let resp = faulty_app(Fault::MissingResult)
        .oneshot(get("/ItemList", "site=FANZA"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body.get("result").is_none());
    assert_eq!(body["request"]["parameters"]["site"], "FANZA");
}

#[tokio::test]
async fn unavailable_fault_returns_503() {
    let resp = faulty_app(Fault::Unavailable)
        .oneshot(get("/FloorList", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
