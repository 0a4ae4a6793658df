//! Document CRUD and database management against the in-memory mock.

use serde::{Deserialize, Serialize};
use serde_json::json;

use oortdb_rs::oortdb_core::api::base_path;
use oortdb_rs::{
    Connection, ConnectionRegistry, Database, Document, Error, FailurePolicy, Method, Request,
    StatusMap,
};

fn database(policy: FailurePolicy) -> Database {
    let endpoint = oortdb_mock::spawn().expect("mock server failed to start");

    let mut registry = ConnectionRegistry::new();
    registry
        .register(
            Connection::new("mock", &endpoint)
                .unwrap()
                .with_failure_policy(policy),
        )
        .unwrap();

    Database::new(&registry, "mock").unwrap()
}

#[tokio::test]
async fn test_document_lifecycle() {
    let database = database(FailurePolicy::Embed);
    let mut documents = database.documents();

    let mut article = Document::new();
    article.set_key("first").unwrap();
    article.insert("title".to_string(), json!("Oort cloud"));

    // create, synced so the server answers 201
    documents = documents.wait_for_sync(true).return_new(true);
    let created = documents.create("articles", &article).await.unwrap();
    assert!(created.is_success());
    assert_eq!(created.status(), 201);
    let meta = created.into_value().unwrap();
    assert_eq!(meta.id().unwrap(), Some("articles/first"));
    assert_eq!(meta.key().unwrap(), Some("first"));
    let rev = meta.rev().unwrap().unwrap().to_string();
    assert_eq!(meta.get("new").unwrap()["title"], "Oort cloud");

    // read it back
    let fetched = documents.get("articles/first").await.unwrap();
    assert!(fetched.is_success());
    let fetched = fetched.into_value().unwrap();
    assert_eq!(fetched.get("title"), Some(&json!("Oort cloud")));
    assert_eq!(fetched.rev().unwrap(), Some(rev.as_str()));

    // the revision also comes back through HEAD, via the etag header
    let checked = documents.check("articles/first").await.unwrap();
    assert!(checked.is_success());
    assert_eq!(checked.into_value().as_deref(), Some(rev.as_str()));

    // delete answers with the meta document
    let deleted = documents.delete("articles/first").await.unwrap();
    assert!(deleted.is_success());
    assert_eq!(
        deleted.into_value().unwrap().id().unwrap(),
        Some("articles/first")
    );
}

#[tokio::test]
async fn test_missing_document_is_an_expected_absence_on_reads() {
    let database = database(FailurePolicy::Embed);
    let mut documents = database.documents();

    let fetched = documents.get("articles/ghost").await.unwrap();
    assert!(fetched.is_success());
    assert_eq!(fetched.status(), 404);
    assert!(!fetched.has_value());
    assert!(fetched.error().is_none());

    let checked = documents.check("articles/ghost").await.unwrap();
    assert!(checked.is_success());
    assert!(!checked.has_value());
}

#[tokio::test]
async fn test_missing_document_is_a_failure_on_delete() {
    let database = database(FailurePolicy::Embed);
    let mut documents = database.documents();

    let deleted = documents.delete("articles/ghost").await.unwrap();

    assert!(!deleted.is_success());
    assert_eq!(deleted.status(), 404);
    assert_eq!(deleted.error().unwrap().error_num, 1202);
}

#[tokio::test]
async fn test_duplicate_keys_violate_the_unique_constraint() {
    let database = database(FailurePolicy::Embed);
    let mut documents = database.documents();

    let mut article = Document::new();
    article.set_key("only").unwrap();

    documents.create("articles", &article).await.unwrap();
    let second = documents.create("articles", &article).await.unwrap();

    assert!(!second.is_success());
    assert_eq!(second.status(), 409);
    assert_eq!(second.error().unwrap().error_num, 1210);
}

#[tokio::test]
async fn test_database_management() {
    let database = database(FailurePolicy::Embed);

    let created = database.create_database("inventory").await.unwrap();
    assert!(created.is_success());
    assert_eq!(created.status(), 201);

    let duplicate = database.create_database("inventory").await.unwrap();
    assert!(!duplicate.is_success());
    assert_eq!(duplicate.status(), 409);
    assert_eq!(duplicate.error().unwrap().error_num, 1207);

    let dropped = database.drop_database("inventory").await.unwrap();
    assert!(dropped.is_success());

    let missing = database.drop_database("inventory").await.unwrap();
    assert!(!missing.is_success());
    assert_eq!(missing.error().unwrap().error_num, 1228);
}

#[tokio::test]
async fn test_invalid_database_name_raises_under_the_raise_policy() {
    let database = database(FailurePolicy::Raise);

    let raised = database.create_database("3 bad names").await;

    match raised {
        Err(Error::Api(error)) => {
            assert_eq!(error.status, 400);
            assert_eq!(error.error_num, 1229);
            assert!(!error.message.is_empty());
        }
        other => panic!("expected an api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_echo_round_trips_a_serialized_value() {
    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Probe {
        label: String,
        distance_au: u32,
        tags: Vec<String>,
    }

    let database = database(FailurePolicy::Embed);
    let connection = database.connection();

    let probe = Probe {
        label: "Voyager 1".to_string(),
        distance_au: 165,
        tags: vec!["interstellar".to_string(), "active".to_string()],
    };

    let mut request = Request::new(Method::Post, base_path::ECHO, "");
    request.set_body(connection.to_json(&probe).unwrap());

    let map = StatusMap::new().ok(200);
    let result = connection
        .execute(request, &map, |response| Ok(Some(response.parse_body()?)))
        .await
        .unwrap();

    assert!(result.is_success());
    let echoed: Probe = result.into_value().unwrap();
    assert_eq!(echoed, probe);
}
