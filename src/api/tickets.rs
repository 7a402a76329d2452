//! `/api/tickets` handlers.
//!
//! Each handler is one request/response transaction: parse, validate, make
//! exactly one store call, serialize. Failures are [`ApiError`]s.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::response::{IntoResponse, Json, Response};
use crate::store::{SharedStore, StoreError};
use crate::ticket::{CreateTicket, Ticket, UpdateTicket, ValidationError};
use crate::{Method, Request, Router, Status};

pub const DELETED_MESSAGE: &str = "Ticket deleted successfully";

/// Everything a ticket handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Ticket not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 400 and 500 carry `error`; 404 carries `message`.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => {
                (Status::BadRequest, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound => {
                (Status::NotFound, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Store(e) => {
                error!("ticket store failure: {e}");
                (Status::InternalServerError, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// The ticket routes, relative to their mount point.
pub fn routes(store: SharedStore) -> Router {
    let s = store.clone();
    let router = Router::new().on(Method::Post, "/", move |req: Request| create(Arc::clone(&s), req));
    let s = store.clone();
    let router = router.on(Method::Get, "/", move |req: Request| list(Arc::clone(&s), req));
    let s = store.clone();
    let router = router.on(Method::Get, "/{id}", move |req: Request| get(Arc::clone(&s), req));
    let s = store.clone();
    let router = router.on(Method::Put, "/{id}", move |req: Request| update(Arc::clone(&s), req));
    router.on(Method::Delete, "/{id}", move |req: Request| delete(Arc::clone(&store), req))
}

// POST /api/tickets
async fn create(store: SharedStore, req: Request) -> ApiResult<Response> {
    let draft = req.json::<CreateTicket>()?.validate(Utc::now())?;
    let ticket = store.insert(draft).await?;
    let location = format!("{}/{}", req.path().trim_end_matches('/'), ticket.id);
    let created = Response::builder().status(Status::Created).header("location", &location);
    Ok(Json(ticket).into_response_with(created))
}

// GET /api/tickets
async fn list(store: SharedStore, _req: Request) -> ApiResult<Json<Vec<Ticket>>> {
    Ok(Json(store.find_all().await?))
}

// GET /api/tickets/{id}
async fn get(store: SharedStore, req: Request) -> ApiResult<Json<Ticket>> {
    let id = req.param("id").unwrap_or_default();
    store.find_by_id(id).await?.map(Json).ok_or(ApiError::NotFound)
}

// PUT /api/tickets/{id}
async fn update(store: SharedStore, req: Request) -> ApiResult<Json<Ticket>> {
    let changes = req.json::<UpdateTicket>()?.validate(Utc::now())?;
    let id = req.param("id").unwrap_or_default();
    store.update_by_id(id, changes).await?.map(Json).ok_or(ApiError::NotFound)
}

// DELETE /api/tickets/{id}
async fn delete(store: SharedStore, req: Request) -> ApiResult<Json<serde_json::Value>> {
    let id = req.param("id").unwrap_or_default();
    match store.delete_by_id(id).await? {
        Some(_) => Ok(Json(json!({ "message": DELETED_MESSAGE }))),
        None => Err(ApiError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UnavailableStore};
    use crate::ticket::TicketStatus;
    use std::collections::HashMap;

    use bytes::Bytes;

    fn request(id: Option<&str>, body: &str) -> Request {
        let params: HashMap<String, String> = id
            .map(|id| HashMap::from([("id".to_owned(), id.to_owned())]))
            .unwrap_or_default();
        let path = match id {
            Some(id) => format!("/api/tickets/{id}"),
            None => "/api/tickets".to_owned(),
        };
        Request::new(path, Bytes::from(body.to_owned()), params)
    }

    fn body(res: &Response) -> serde_json::Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[tokio::test]
    async fn create_rejects_before_touching_the_store() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let res = create(store.clone(), request(None, r#"{"title":"Bug"}"#))
            .await
            .into_response();

        assert_eq!(res.status_code(), Status::BadRequest);
        assert_eq!(body(&res)["error"], "Title is required and must be at least 5 characters");
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_ignores_client_supplied_status() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let res = create(
            store,
            request(
                None,
                r#"{"title":"Login issue","description":"User cannot log in to the system.","status":"Closed"}"#,
            ),
        )
        .await
        .into_response();

        assert_eq!(res.status_code(), Status::Created);
        assert_eq!(body(&res)["status"], TicketStatus::Open.as_str());
    }

    #[tokio::test]
    async fn create_points_location_at_the_new_ticket() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut req = request(None, r#"{"title":"Login issue","description":"User cannot log in to the system."}"#);
        req.path = "/api/tickets/".to_owned();
        let res = create(store, req).await.into_response();

        let id = body(&res)["id"].as_str().unwrap().to_owned();
        let inner = res.into_inner();
        assert_eq!(inner.status(), http::StatusCode::CREATED);
        assert_eq!(inner.headers()["location"], format!("/api/tickets/{id}").as_str());
        assert_eq!(inner.headers()["content-type"], "application/json");
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let res = update(store, request(Some("x"), "{not json"))
            .await
            .into_response();

        assert_eq!(res.status_code(), Status::BadRequest);
        assert!(body(&res)["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn store_failures_become_500_with_the_message() {
        let store: SharedStore = Arc::new(UnavailableStore::new("connection refused"));
        let res = list(store, request(None, "")).await.into_response();

        assert_eq!(res.status_code(), Status::InternalServerError);
        assert_eq!(body(&res)["error"], "connection refused");
    }

    #[tokio::test]
    async fn update_validation_runs_before_the_lookup() {
        let store: SharedStore = Arc::new(UnavailableStore::new("unreachable"));
        let res = update(store, request(Some("x"), r#"{"status":"Done"}"#))
            .await
            .into_response();

        assert_eq!(res.status_code(), Status::BadRequest);
        assert_eq!(body(&res)["error"], "Invalid status. Must be Open, In Progress, or Closed");
    }
}
