//! Document CRUD Example
//!
//! Stores a document, reads it back, checks its revision and deletes it,
//! inspecting the typed result of every call. Expects an OortDB endpoint
//! (or the oortdb-mock binary) on localhost:8529.
//!
//! Run with: cargo run --example document_crud

use serde_json::json;

use oortdb_rs::{Connection, ConnectionRegistry, Database, Document};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("OortDB Document CRUD Example\n");

    let mut registry = ConnectionRegistry::new();
    registry.register(Connection::new("main", "http://localhost:8529")?)?;

    let database = Database::new(&registry, "main")?;
    let mut documents = database.documents();

    // Store a document with a caller-chosen key
    let mut article = Document::new();
    article.set_key("oort-cloud")?;
    article.insert("title".to_string(), json!("Oort cloud"));
    article.insert("distance_au".to_string(), json!(2000));

    documents = documents.wait_for_sync(true);
    let created = documents.create("articles", &article).await?;
    let meta = created.into_value().unwrap_or_default();
    println!("📝 Stored {}", meta.id()?.unwrap_or("?"));

    // Read it back
    let fetched = documents.get("articles/oort-cloud").await?;
    if let Some(doc) = fetched.value() {
        println!("   Title: {}", doc.get("title").unwrap_or(&json!(null)));
    }

    // A HEAD call answers with the revision only
    let checked = documents.check("articles/oort-cloud").await?;
    println!("   Revision: {}", checked.value().cloned().unwrap_or_default());

    // Delete, then observe the expected absence on a second read
    documents.delete("articles/oort-cloud").await?;
    let gone = documents.get("articles/oort-cloud").await?;
    println!(
        "\n🗑️  Deleted; second read: success={}, has_value={}",
        gone.is_success(),
        gone.has_value()
    );

    registry.deregister("main");
    Ok(())
}
