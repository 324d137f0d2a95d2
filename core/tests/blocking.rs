//! Drives `BlockingClient` against the mock Provider over real HTTP.

mod common;

use dmm_core::{ActressSearch, ApiError, BlockingClient, Error, FloorSearch, ItemSearch, SessionState};
use mock_server::Fault;
use serde_json::json;

#[test]
fn product_search_exposes_content_id_on_item_and_raw_copy() {
    let addr = common::spawn_server(None);
    let client = BlockingClient::new(common::config(addr));

    let search = ItemSearch::new("FANZA").floor("dvd").keyword("ABP-477");
    let response = client.search_items(&search).unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.result_count(), 1);
    assert_eq!(response.total_count(), 1);
    assert_eq!(response.result.items.len(), 1);

    let item = &response.result.items[0];
    assert_eq!(item.content_id, "mird00127");
    assert_eq!(item.raw["content_id"], json!(item.content_id));
    assert_eq!(response.raw["result"]["items"][0]["content_id"], "mird00127");
    assert_eq!(item.price(), Some(3980));
    assert_eq!(item.actress_names(), ["河北彩花", "石川澪"]);

    assert_eq!(response.request.api_id, mock_server::API_ID);
    assert_eq!(response.request.get("keyword"), Some(&json!("ABP-477")));
    assert!(response.request.get("api_id").is_none());
}

#[test]
fn floor_tree_keeps_source_order() {
    let addr = common::spawn_server(None);
    let client = BlockingClient::new(common::config(addr));

    let tree = client.list_floors().unwrap().result;
    let sites: Vec<&str> = tree.sites.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(sites, ["DMM.com", "FANZA"]);

    let dmm = &tree.sites[0];
    let services: Vec<&str> = dmm.services.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(services, ["lod", "mono"]);
    let floors: Vec<&str> = dmm.services[0].floors.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(floors, ["akb48", "ske48"]);
    assert_eq!(dmm.services[1].floors.len(), 1);

    let fanza = &tree.sites[1];
    assert_eq!(fanza.services[0].floors[0].id, 43);
    assert_eq!(fanza.services[0].floors[1].code, "videoc");
}

#[test]
fn actress_search_decodes_sparse_records() {
    let addr = common::spawn_server(None);
    let client = BlockingClient::new(common::config(addr));

    let search = ActressSearch {
        sort: Some("-birthday".to_string()),
        hits: Some(10),
        ..Default::default()
    };
    let response = client.search_actresses(&search).unwrap();
    let actresses = &response.result.items;
    assert_eq!(actresses.len(), 2);
    assert_eq!(actresses[0].bust, Some(85));
    assert!(actresses[0].image_url.is_some());
    assert_eq!(actresses[1].id, 1044099);
    assert_eq!(actresses[1].bust, None);
    assert_eq!(actresses[1].cup, None);
    assert!(actresses[1].image_url.is_none());
    assert!(actresses[1].list_url.is_none());
}

#[test]
fn floor_scoped_searches() {
    let addr = common::spawn_server(None);
    let client = BlockingClient::new(common::config(addr));

    let genres = client.search_genres(&FloorSearch::new(43)).unwrap();
    assert_eq!(genres.result.items[0].genre_id, 4025);
    assert_eq!(genres.result.floor.as_ref().unwrap().floor_code, "videoa");

    let authors = client.search_authors(&FloorSearch::new(74).initial("さ")).unwrap();
    assert_eq!(authors.result.items.len(), 2);
    assert_eq!(authors.result.items[0].another_name, None);
    assert_eq!(authors.result.items[1].another_name.as_deref(), Some("別名C"));

    let makers = client.search_makers(&FloorSearch::new(43).hits(1)).unwrap();
    assert_eq!(makers.result_count(), 1);
    assert_eq!(makers.total_count(), 2);

    let series = client.search_series(&FloorSearch::new(43)).unwrap();
    assert_eq!(series.result.items[0].series_id, 77600);
}

#[test]
fn lookups_by_content_id_and_maker_product_id() {
    let addr = common::spawn_server(None);
    let client = BlockingClient::new(common::config(addr));

    let item = client
        .get_item_by_content_id("FANZA", "b104atint00001")
        .unwrap()
        .unwrap();
    assert_eq!(item.isbn.as_deref(), Some("9784000000001"));
    assert_eq!(item.price(), None);
    assert!(item.date.is_none());
    assert!(item.review.is_none());
    assert!(item.cd_info.is_none());
    assert!(item.tachiyomi.is_some());

    let item = client
        .get_item_by_maker_product_id("FANZA", "abp-477")
        .unwrap()
        .unwrap();
    assert_eq!(item.content_id, "118abp00477");
    assert!(item.sample_movie_url.as_ref().unwrap().pc_flag);

    assert!(client
        .get_item_by_content_id("FANZA", "ssis00001")
        .unwrap()
        .is_none());
}

#[test]
fn connection_is_reused_until_closed() {
    let addr = common::spawn_server(None);
    let client = BlockingClient::new(common::config(addr));
    assert_eq!(client.state(), SessionState::Uninitialized);

    client.list_floors().unwrap();
    assert_eq!(client.state(), SessionState::Open);
    client.search_genres(&FloorSearch::new(43)).unwrap();
    assert_eq!(client.state(), SessionState::Open);

    client.close();
    let err = client.list_floors().unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::ClientClosed)));
}

#[test]
fn scoped_usage_closes_on_exit() {
    let addr = common::spawn_server(None);
    let count = BlockingClient::scoped(common::config(addr), |client| {
        let floors = client.list_floors()?;
        Ok(floors.result.floors().count())
    })
    .unwrap();
    assert_eq!(count, 6);
}

#[test]
fn rejected_credentials_are_authentication_errors() {
    let addr = common::spawn_server(None);
    let client = BlockingClient::new(common::bad_config(addr));
    let err = client.list_floors().unwrap_err();
    assert!(err.is_authentication(), "unexpected error: {err}");
}

#[test]
fn missing_result_names_the_field() {
    let addr = common::spawn_server(Some(Fault::MissingResult));
    let client = BlockingClient::new(common::config(addr));
    let err = client.search_items(&ItemSearch::new("FANZA")).unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::MissingField("result"))));
    assert!(err.to_string().contains("`result`"));
}

#[test]
fn server_errors_and_garbage_bodies() {
    let addr = common::spawn_server(Some(Fault::Unavailable));
    let client = BlockingClient::new(common::config(addr));
    let err = client.list_floors().unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::Http { status: 503, .. })));

    let addr = common::spawn_server(Some(Fault::NotJson));
    let client = BlockingClient::new(common::config(addr));
    let err = client.list_floors().unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::InvalidJson(_))));
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = BlockingClient::new(common::config(addr));
    let err = client.list_floors().unwrap_err();
    assert!(matches!(err, Error::Api(ApiError::Transport(_))));
}
