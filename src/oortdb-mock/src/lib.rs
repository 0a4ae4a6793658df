//! In-memory stub OortDB server.
//!
//! Implements the slice of the OortDB REST surface the driver exercises:
//! databases, user-defined functions, document CRUD and an echo endpoint
//! that reflects request bodies verbatim. State lives in memory and dies
//! with the process; the point is wire fidelity, not persistence.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tokio::sync::Mutex;

pub mod api;

use api::AppState;

/// Builds the server on an already bound listener. The caller drives the
/// returned future on whatever runtime it owns.
pub fn server(listener: TcpListener) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState {
        databases: Arc::new(Mutex::new(HashSet::new())),
        functions: Arc::new(Mutex::new(BTreeMap::new())),
        documents: Arc::new(Mutex::new(HashMap::new())),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/_api/database", web::post().to(api::create_database))
            .route("/_api/database/{name}", web::delete().to(api::drop_database))
            .route("/_api/function", web::post().to(api::register_function))
            .route("/_api/function", web::get().to(api::list_functions))
            .route("/_api/function/{name}", web::delete().to(api::unregister_function))
            .route("/_api/document/{collection}", web::post().to(api::create_document))
            .route("/_api/document/{collection}/{key}", web::get().to(api::get_document))
            .route("/_api/document/{collection}/{key}", web::head().to(api::check_document))
            .route("/_api/document/{collection}/{key}", web::delete().to(api::delete_document))
            .route("/_admin/echo", web::post().to(api::echo))
    })
    .workers(1)
    .listen(listener)?
    .run();

    Ok(server)
}

/// Binds an OS-assigned port, runs the server on a background thread and
/// returns the base URL. Used by the driver's integration tests.
pub fn spawn() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    let server = server(listener)?;

    std::thread::spawn(move || {
        actix_web::rt::System::new().block_on(server)
    });

    Ok(format!("http://127.0.0.1:{port}"))
}
