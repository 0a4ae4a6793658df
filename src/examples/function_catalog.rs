//! Function Catalog Example
//!
//! Registers a user-defined function, lists the namespace and removes it
//! again. Expects an OortDB endpoint (or the oortdb-mock binary) on
//! localhost:8529.
//!
//! Run with: cargo run --example function_catalog

use oortdb_rs::{Connection, ConnectionRegistry, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("OortDB Function Catalog Example\n");

    let mut registry = ConnectionRegistry::new();
    registry.register(Connection::new("main", "http://localhost:8529")?)?;

    let database = Database::new(&registry, "main")?;
    let mut functions = database.functions();

    // Register a deterministic function
    functions.is_deterministic(true);
    let registered = functions
        .register("example::double", "function (x) { return x * 2; }")
        .await?;
    println!(
        "📝 Registered example::double (status {})",
        registered.status()
    );

    // List everything in the namespace
    functions = functions.namespace("example");
    let listed = functions.list().await?;
    println!("🔍 Functions in 'example':");
    for record in listed.into_value().unwrap_or_default() {
        println!(
            "   {} -> {}",
            record.get("name").and_then(|v| v.as_str()).unwrap_or("?"),
            record.get("code").and_then(|v| v.as_str()).unwrap_or("?")
        );
    }

    // Clean up
    let removed = functions.unregister("example::double").await?;
    if removed.is_success() {
        println!("\n🗑️  Function removed");
    } else if let Some(error) = removed.error() {
        println!("\n⚠️  Removal failed: {error}");
    }

    registry.deregister("main");
    Ok(())
}
