//! The HTTP client against a local stub backend.

mod support;

use propreg::{Client, ClientError, Field, RecordForm, RecordId, RecordStore, RecordTable};
use serde_json::json;
use support::{StubServer, record};

fn list_body() -> String {
    json!([
        {
            "id": 1,
            "propertyType": "House",
            "extentInSqYds": 240,
            "address": "12 Park Lane",
            "boundary": "North",
            "currentOwnerName": "Asha Rao",
            "documentType": "Gift Deed",
            "saleDeedType": "",
            "documentNumber": "GD-1",
            "yearOfPurchase": 2019,
            "sellerName": "Ravi Kumar",
            "registrationDate": "2019-04-02",
            "registrarOffice": "Hyderabad"
        },
        {
            "id": "2",
            "propertyType": "Land",
            "extentInSqYds": "1,000",
            "propertyAddress": "Green Valley",
            "boundary": "East",
            "currentRegisteredOwnerName": "Vikram Shah",
            "documentType": "Sale Deed",
            "saleDeedType": "Absolute",
            "documentNumber": "SD-2",
            "yearOfPurchase": "2010",
            "sellerName": "Nisha",
            "registrationDate": "2010-09-09T00:00:00",
            "registerOffice": "Medak"
        }
    ])
    .to_string()
}

#[tokio::test]
async fn list_decodes_both_key_spellings() {
    let server = StubServer::start(|_| (200, list_body())).await;
    let client = Client::new(&server.base_url).unwrap();

    let records = client.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Some(RecordId::from(1)));
    assert_eq!(records[0].extent_in_sq_yds, "240");
    assert_eq!(records[0].sale_deed_type, None);
    assert_eq!(records[1].address, "Green Valley");
    assert_eq!(records[1].registrar_office, "Medak");
    assert_eq!(records[1].registration_date.to_string(), "2010-09-09");

    let captured = server.captured();
    assert_eq!(captured[0].method, "GET");
    assert_eq!(captured[0].path, "/api/properties/getAll");
}

#[tokio::test]
async fn list_keeps_sparse_records_and_skips_broken_ones() {
    let body = json!([
        {
            "id": 5,
            "propertyType": "flat",
            "extentInSqYds": "60",
            "address": null,
            "boundary": "south",
            "currentOwnerName": "Lakshmi",
            "documentType": "Gift Deed",
            "documentNumber": "GD-5",
            "yearOfPurchase": "2016",
            "registrationDate": "2016-02-02",
            "registrarOffice": "Karimnagar"
        },
        {
            "id": 6,
            "propertyType": "Castle",
            "registrationDate": "2016-02-02"
        }
    ])
    .to_string();
    let server = StubServer::start(move |_| (200, body.clone())).await;
    let client = Client::new(&server.base_url).unwrap();

    let records = client.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, Some(RecordId::from(5)));
    assert_eq!(records[0].address, "");
    assert_eq!(records[0].seller_name, "");

    let mut table = RecordTable::default();
    table.load(records);
    table.set_query("lakshmi");
    assert_eq!(table.filtered().len(), 1);
}

#[tokio::test]
async fn table_refresh_and_search_over_http() {
    let server = StubServer::start(|_| (200, list_body())).await;
    let client = Client::new(&server.base_url).unwrap();

    let mut table = RecordTable::default();
    table.refresh(&client).await.unwrap();
    table.set_query("valley");
    assert_eq!(table.filtered().len(), 1);
    assert_eq!(table.autocomplete(), vec!["valley"]);
}

#[tokio::test]
async fn get_finds_by_id_or_reports_not_found() {
    let server = StubServer::start(|_| (200, list_body())).await;
    let client = Client::new(&server.base_url).unwrap();

    let found = client.get(&RecordId::new("2")).await.unwrap();
    assert_eq!(found.current_owner_name, "Vikram Shah");
    assert!(matches!(
        client.get(&RecordId::new("99")).await,
        Err(ClientError::NotFound { .. })
    ));
}

#[tokio::test]
async fn create_posts_create_keys() {
    let server = StubServer::start(|request| {
        let mut body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        body["id"] = json!(41);
        (200, body.to_string())
    })
    .await;
    let client = Client::new(&server.base_url).unwrap();

    let mut submitted = record(0, "Hill Road", "Asha Rao");
    submitted.id = None;
    let created = client.create(&submitted).await.unwrap();
    assert_eq!(created.id, Some(RecordId::from(41)));
    assert_eq!(created.address, "Hill Road");

    let request = &server.captured()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/save");
    let body = request.json();
    assert_eq!(body["propertyAddress"], "Hill Road");
    assert_eq!(body["currentRegisteredOwnerName"], "Asha Rao");
    assert_eq!(body["registerOffice"], "Secunderabad");
    assert!(body.get("address").is_none());
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn update_puts_edit_keys_to_the_id_path() {
    let server = StubServer::start(|_| (200, String::new())).await;
    let client = Client::new(&server.base_url).unwrap();

    let mut changed = record(7, "Canal Road", "Meena Iyer");
    changed.seller_name = "New Seller".into();
    let updated = client.update(&RecordId::from(7), &changed).await.unwrap();
    assert_eq!(updated.id, Some(RecordId::from(7)));
    assert_eq!(updated.seller_name, "New Seller");

    let request = &server.captured()[0];
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/update/7");
    let body = request.json();
    assert_eq!(body["address"], "Canal Road");
    assert_eq!(body["currentOwnerName"], "Meena Iyer");
    assert_eq!(body["saleDeedType"], "Absolute");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = StubServer::start(|_| (500, r#"{"error":"boom"}"#.to_string())).await;
    let client = Client::new(&server.base_url).unwrap();

    match client.list().await {
        Err(ClientError::Status { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_list_is_a_decode_error() {
    let server = StubServer::start(|_| (200, "<html>".to_string())).await;
    let client = Client::new(&server.base_url).unwrap();
    assert!(matches!(client.list().await, Err(ClientError::Decode { operation: "list", .. })));
}

#[tokio::test]
async fn unreachable_backend_fails_the_form_submit() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = Client::new(&format!("http://{addr}")).unwrap();

    let mut form = RecordForm::edit(&record(3, "Temple Street", "Arjun Das")).unwrap();
    let err = form.submit(&client).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(form.value(Field::Address), "Temple Street");
    assert_eq!(form.notification(), Some("Failed to update user. Please try again later."));
}
