use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result as ActixResult};
use chrono::Utc;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Shared application state
pub struct AppState {
    pub databases: Arc<Mutex<HashSet<String>>>,
    /// function name -> stored record
    pub functions: Arc<Mutex<BTreeMap<String, Value>>>,
    /// `collection/key` -> stored document
    pub documents: Arc<Mutex<HashMap<String, Value>>>,
}

// Wire error numbers of the database.
const ERR_INVALID_JSON: i64 = 600;
const ERR_DOCUMENT_NOT_FOUND: i64 = 1202;
const ERR_FUNCTION_NOT_FOUND: i64 = 1203;
const ERR_DUPLICATE_DATABASE: i64 = 1207;
const ERR_UNIQUE_CONSTRAINT: i64 = 1210;
const ERR_ILLEGAL_KEY: i64 = 1221;
const ERR_DATABASE_NOT_FOUND: i64 = 1228;
const ERR_INVALID_DATABASE_NAME: i64 = 1229;
const ERR_INVALID_FUNCTION_NAME: i64 = 1580;

/// The error document every failing endpoint answers with.
fn error_response(status: StatusCode, error_num: i64, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "error": true,
        "code": status.as_u16(),
        "errorNum": error_num,
        "errorMessage": message,
    }))
}

fn parse_object(body: &web::Bytes) -> Result<Map<String, Value>, HttpResponse> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(error_response(
            StatusCode::BAD_REQUEST,
            ERR_INVALID_JSON,
            "request body must be a JSON object",
        )),
        Err(_) => Err(error_response(
            StatusCode::BAD_REQUEST,
            ERR_INVALID_JSON,
            "request body is not valid JSON",
        )),
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '-' | ':' | '.' | '@' | '(' | ')' | '+' | ',' | '=' | ';' | '$' | '!' | '*'
                | '\'' | '%'
        )
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

fn is_valid_database_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Function names are `namespace::name`, possibly nested deeper.
fn is_valid_function_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split("::").collect();
    parts.len() >= 2
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}

/// Create a database
/// POST /_api/database
pub async fn create_database(
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let fields = match parse_object(&body) {
        Ok(fields) => fields,
        Err(response) => return Ok(response),
    };

    let name = match fields.get("name").and_then(Value::as_str) {
        Some(name) if is_valid_database_name(name) => name.to_string(),
        _ => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ERR_INVALID_DATABASE_NAME,
                "database name invalid",
            ))
        }
    };

    let mut databases = state.databases.lock().await;
    if !databases.insert(name.clone()) {
        return Ok(error_response(
            StatusCode::CONFLICT,
            ERR_DUPLICATE_DATABASE,
            "duplicate database name",
        ));
    }

    tracing::debug!(database = %name, "database created");
    Ok(HttpResponse::Created().json(json!({
        "error": false,
        "code": 201,
        "result": true,
    })))
}

/// Drop a database
/// DELETE /_api/database/{name}
pub async fn drop_database(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let name = path.into_inner();

    let mut databases = state.databases.lock().await;
    if !databases.remove(&name) {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ERR_DATABASE_NOT_FOUND,
            "database not found",
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "code": 200,
        "result": true,
    })))
}

/// Register or replace a function
/// POST /_api/function
pub async fn register_function(
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let fields = match parse_object(&body) {
        Ok(fields) => fields,
        Err(response) => return Ok(response),
    };

    let name = match fields.get("name").and_then(Value::as_str) {
        Some(name) if is_valid_function_name(name) => name.to_string(),
        _ => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ERR_INVALID_FUNCTION_NAME,
                "invalid function name",
            ))
        }
    };
    let code = match fields.get("code").and_then(Value::as_str) {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ERR_INVALID_JSON,
                "function code is required",
            ))
        }
    };

    let record = json!({
        "name": name,
        "code": code,
        "isDeterministic": fields.get("isDeterministic").and_then(Value::as_bool).unwrap_or(false),
    });

    let mut functions = state.functions.lock().await;
    let replaced = functions.insert(name.clone(), record).is_some();

    tracing::debug!(function = %name, replaced, "function registered");
    if replaced {
        Ok(HttpResponse::Ok().json(json!({ "error": false, "code": 200 })))
    } else {
        Ok(HttpResponse::Created().json(json!({ "error": false, "code": 201 })))
    }
}

/// List functions, optionally one namespace only
/// GET /_api/function?namespace=...
pub async fn list_functions(
    query: web::Query<HashMap<String, String>>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let namespace = query.get("namespace").map(|ns| format!("{ns}::"));

    let functions = state.functions.lock().await;
    let listed: Vec<&Value> = functions
        .iter()
        .filter(|(name, _)| match &namespace {
            Some(prefix) => name.starts_with(prefix),
            None => true,
        })
        .map(|(_, record)| record)
        .collect();

    Ok(HttpResponse::Ok().json(listed))
}

/// Unregister a function, or a whole namespace with ?group=true
/// DELETE /_api/function/{name}
pub async fn unregister_function(
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let name = path.into_inner();
    let group = query.get("group").map(String::as_str) == Some("true");

    let mut functions = state.functions.lock().await;
    let removed = if group {
        let prefix = format!("{name}::");
        let doomed: Vec<String> = functions
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        for key in &doomed {
            functions.remove(key);
        }
        !doomed.is_empty()
    } else {
        functions.remove(&name).is_some()
    };

    if !removed {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ERR_FUNCTION_NOT_FOUND,
            "function not found",
        ));
    }

    Ok(HttpResponse::Ok().json(json!({ "error": false, "code": 200 })))
}

/// Store a document
/// POST /_api/document/{collection}
pub async fn create_document(
    path: web::Path<String>,
    body: web::Bytes,
    query: web::Query<HashMap<String, String>>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let collection = path.into_inner();
    let mut fields = match parse_object(&body) {
        Ok(fields) => fields,
        Err(response) => return Ok(response),
    };

    let key = match fields.get("_key") {
        None => Uuid::new_v4().simple().to_string(),
        Some(Value::String(key)) if is_valid_key(key) => key.clone(),
        Some(_) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ERR_ILLEGAL_KEY,
                "illegal document key",
            ))
        }
    };
    let id = format!("{collection}/{key}");
    let rev = Uuid::new_v4().simple().to_string();

    let mut documents = state.documents.lock().await;
    if documents.contains_key(&id) {
        return Ok(error_response(
            StatusCode::CONFLICT,
            ERR_UNIQUE_CONSTRAINT,
            "unique constraint violated",
        ));
    }

    fields.insert("_id".to_string(), json!(id));
    fields.insert("_key".to_string(), json!(key));
    fields.insert("_rev".to_string(), json!(rev));
    fields.insert("createdAt".to_string(), json!(Utc::now().to_rfc3339()));
    documents.insert(id.clone(), Value::Object(fields.clone()));

    let mut meta = json!({ "_id": id, "_key": key, "_rev": rev });
    if query.get("returnNew").map(String::as_str) == Some("true") {
        meta["new"] = Value::Object(fields);
    }

    tracing::debug!(id = %id, "document stored");
    let synced = query.get("waitForSync").map(String::as_str) == Some("true");
    if synced {
        Ok(HttpResponse::Created().json(meta))
    } else {
        Ok(HttpResponse::Accepted().json(meta))
    }
}

fn document_id(path: web::Path<(String, String)>) -> String {
    let (collection, key) = path.into_inner();
    format!("{collection}/{key}")
}

/// Read a document
/// GET /_api/document/{collection}/{key}
pub async fn get_document(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let id = document_id(path);

    let documents = state.documents.lock().await;
    match documents.get(&id) {
        Some(document) => Ok(HttpResponse::Ok().json(document)),
        None => Ok(error_response(
            StatusCode::NOT_FOUND,
            ERR_DOCUMENT_NOT_FOUND,
            "document not found",
        )),
    }
}

/// Check a document, revision in the ETag header
/// HEAD /_api/document/{collection}/{key}
pub async fn check_document(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let id = document_id(path);

    let documents = state.documents.lock().await;
    match documents.get(&id).and_then(|document| document.get("_rev")) {
        Some(Value::String(rev)) => Ok(HttpResponse::Ok()
            .insert_header(("ETag", format!("\"{rev}\"")))
            .finish()),
        _ => Ok(HttpResponse::NotFound().finish()),
    }
}

/// Remove a document
/// DELETE /_api/document/{collection}/{key}
pub async fn delete_document(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let id = document_id(path);

    let mut documents = state.documents.lock().await;
    match documents.remove(&id) {
        Some(document) => Ok(HttpResponse::Ok().json(json!({
            "_id": document.get("_id"),
            "_key": document.get("_key"),
            "_rev": document.get("_rev"),
        }))),
        None => Ok(error_response(
            StatusCode::NOT_FOUND,
            ERR_DOCUMENT_NOT_FOUND,
            "document not found",
        )),
    }
}

/// Reflect the request body verbatim
/// POST /_admin/echo
pub async fn echo(body: web::Bytes) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
