//! Sheets backend tests against a mock HTTP server.
//!
//! The crate's client is blocking, so each test holds a tokio runtime
//! just to host wiremock and drives the client from the test thread.

use pretty_assertions::assert_eq;
use serde_json::json;
use tabsync_core::{TabDocument, TabError, Value};
use tabsync_gsheet::{SheetDocument, SheetsClient, TokenProvider};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SPREADSHEET_ID: &str = "sheet-1";

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn meta_response(titles: &[&str]) -> ResponseTemplate {
    let sheets: Vec<_> = titles
        .iter()
        .map(|t| json!({ "properties": { "title": t } }))
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({ "sheets": sheets }))
}

fn client_for(server: &MockServer) -> SheetsClient {
    SheetsClient::with_base_url(TokenProvider::static_token("test-token"), server.uri())
}

#[test]
fn oauth_provider_refreshes_and_caches() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-1",
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let provider = TokenProvider::oauth("client-id", "client-secret", "refresh-1")
        .with_token_url(format!("{}/token", server.uri()));

    assert_eq!(provider.token().unwrap(), "tok-1");
    // Second call must come from the cache; the mock allows one request.
    assert_eq!(provider.token().unwrap(), "tok-1");

    rt.block_on(server.verify());
}

#[test]
fn oauth_refresh_failure_is_an_auth_error() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;
        server
    });

    let provider = TokenProvider::oauth("client-id", "client-secret", "stale")
        .with_token_url(format!("{}/token", server.uri()));

    let err = provider.token().unwrap_err();
    assert!(matches!(err, TabError::Auth(_)), "unexpected error: {err}");
}

#[test]
fn read_tab_consumes_first_row_as_header() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v4/spreadsheets/{SPREADSHEET_ID}")))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(meta_response(&["houses"]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!(
                "/v4/spreadsheets/{SPREADSHEET_ID}/values/'houses'"
            )))
            .and(query_param("valueRenderOption", "UNFORMATTED_VALUE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [
                    ["id", "house_name", "founder_year"],
                    [2300, "Griffincrest", 2011],
                    [2301, "Serpenthelm"],
                ]
            })))
            .mount(&server)
            .await;
        server
    });

    let document = SheetDocument::open(client_for(&server), SPREADSHEET_ID).unwrap();
    let table = document.read_tab("houses").unwrap();

    assert_eq!(table.column_names(), vec!["id", "house_name", "founder_year"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column("id").unwrap().values[0], Value::Int(2300));
    // Ragged row padded back to header width.
    assert_eq!(table.column("founder_year").unwrap().values[1], Value::Null);
}

#[test]
fn read_missing_tab_is_not_found() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v4/spreadsheets/{SPREADSHEET_ID}")))
            .respond_with(meta_response(&["houses"]))
            .mount(&server)
            .await;
        server
    });

    let document = SheetDocument::open(client_for(&server), SPREADSHEET_ID).unwrap();
    let err = document.read_tab("races").unwrap_err();
    assert!(
        matches!(err, TabError::NotFound { ref name, backend: "gsheet" } if name == "races"),
        "unexpected error: {err}"
    );
}

#[test]
fn write_to_existing_tab_clears_then_updates() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v4/spreadsheets/{SPREADSHEET_ID}")))
            .respond_with(meta_response(&["houses"]))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/v4/spreadsheets/{SPREADSHEET_ID}/values/'houses':clear"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!(
                "/v4/spreadsheets/{SPREADSHEET_ID}/values/'houses'!A1"
            )))
            .and(query_param("valueInputOption", "RAW"))
            .and(body_partial_json(json!({
                "values": [["id", "house_name"], [2300, "Griffincrest"]]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let document = SheetDocument::open(client_for(&server), SPREADSHEET_ID).unwrap();
    let table = tabsync_core::Table::from_rows(
        vec!["id", "house_name"],
        vec![vec![Value::Int(2300), "Griffincrest".into()]],
    )
    .unwrap();
    document.write_tab("houses", &table).unwrap();

    rt.block_on(server.verify());
}

#[test]
fn write_to_new_tab_creates_with_capacity_floor() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v4/spreadsheets/{SPREADSHEET_ID}")))
            .respond_with(meta_response(&["houses"]))
            .mount(&server)
            .await;
        // Two columns and three rows still get a 4 x 5 grid.
        Mock::given(method("POST"))
            .and(path(format!(
                "/v4/spreadsheets/{SPREADSHEET_ID}:batchUpdate"
            )))
            .and(body_partial_json(json!({
                "requests": [{
                    "addSheet": {
                        "properties": {
                            "title": "races",
                            "gridProperties": { "rowCount": 4, "columnCount": 5 }
                        }
                    }
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!(
                "/v4/spreadsheets/{SPREADSHEET_ID}/values/'races'!A1"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let document = SheetDocument::open(client_for(&server), SPREADSHEET_ID).unwrap();
    let table = tabsync_core::Table::from_rows(
        vec!["id", "name"],
        vec![
            vec![Value::Int(1), "Lightning Dash".into()],
            vec![Value::Int(2), "Golden Cup".into()],
            vec![Value::Int(3), "Rapid Sprint".into()],
        ],
    )
    .unwrap();
    document.write_tab("races", &table).unwrap();

    rt.block_on(server.verify());
}

#[test]
fn unreachable_service_fails_open_eagerly() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v4/spreadsheets/{SPREADSHEET_ID}")))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .mount(&server)
            .await;
        server
    });

    let err = SheetDocument::open(client_for(&server), SPREADSHEET_ID).unwrap_err();
    assert!(matches!(err, TabError::Auth(_)), "unexpected error: {err}");
}
