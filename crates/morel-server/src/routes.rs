//! Request routing for the REST API
//!
//! Hand-rolled method/path matching; the surface is small enough that a
//! router dependency would outweigh it. Every mutation publishes the
//! committed row to the change feed after the transaction commits.

use crate::state::ServerState;
use crate::{assets, events};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response, StatusCode};
use morel_core::wire::{Credentials, ErrorRow, ItemRow, MenuRows, SessionRow};
use morel_core::{Catalog, ChangeEvent, ItemDraft, ItemId, ItemPatch, MenuView};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;

/// Body type shared by all endpoints, streaming and buffered alike.
pub type ResponseBody = BoxBody<Bytes, Infallible>;

/// Route one request.
pub async fn handle_request(
    state: Arc<ServerState>,
    req: Request<Incoming>,
) -> Result<Response<ResponseBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    tracing::debug!("{method} {path}");

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/api/items") => list_items(&state),
        (&Method::POST, "/api/items") => create_item(&state, req).await?,
        (&Method::GET, "/api/menu") => menu(&state),
        (&Method::GET, "/api/events") => events::stream(&state),
        (&Method::POST, "/api/session") => sign_in(&state, req).await?,
        (&Method::DELETE, "/api/session") => sign_out(&state, &req).await,
        (&Method::POST, "/api/assets") => assets::upload(&state, req).await?,
        (&Method::DELETE, "/api/assets") => assets::remove(&state, &req).await,
        _ => {
            if let Some(id) = path.strip_prefix("/api/items/") {
                item_request(&state, &method, id, req).await?
            } else if let Some(file) = path.strip_prefix("/assets/") {
                assets::serve(&state, &method, file).await
            } else {
                error_response(StatusCode::NOT_FOUND, "No such route")
            }
        }
    };

    Ok(response)
}

async fn item_request(
    state: &Arc<ServerState>,
    method: &Method,
    id: &str,
    req: Request<Incoming>,
) -> Result<Response<ResponseBody>, hyper::Error> {
    let id = ItemId::from(id);
    match method {
        &Method::PATCH => update_item(state, id, req).await,
        &Method::DELETE => Ok(delete_item(state, id, &req).await),
        _ => Ok(error_response(StatusCode::NOT_FOUND, "No such route")),
    }
}

fn list_items(state: &ServerState) -> Response<ResponseBody> {
    match state.db.select_all() {
        Ok(items) => {
            let rows: Vec<ItemRow> = items.iter().map(ItemRow::from_item).collect();
            json_response(StatusCode::OK, &rows)
        }
        Err(err) => internal_error(err),
    }
}

fn menu(state: &ServerState) -> Response<ResponseBody> {
    match state.db.select_all() {
        Ok(items) => {
            let mut catalog = Catalog::new();
            catalog.replace_all(items);
            let view = MenuView::project(&catalog);
            let rows = MenuRows {
                mushrooms: view.mushrooms.into_iter().map(ItemRow::from_item).collect(),
                specialties: view
                    .specialties
                    .into_iter()
                    .map(ItemRow::from_item)
                    .collect(),
            };
            json_response(StatusCode::OK, &rows)
        }
        Err(err) => internal_error(err),
    }
}

async fn create_item(
    state: &Arc<ServerState>,
    req: Request<Incoming>,
) -> Result<Response<ResponseBody>, hyper::Error> {
    if let Some(denied) = require_auth(state, &req).await {
        return Ok(denied);
    }
    let body = req.into_body().collect().await?.to_bytes();
    let draft: ItemDraft = match serde_json::from_slice(&body) {
        Ok(draft) => draft,
        Err(err) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                &format!("Malformed draft: {err}"),
            ))
        }
    };
    match state.db.insert(draft) {
        Ok(item) => {
            state.publish(ChangeEvent::Insert(item.clone()));
            Ok(json_response(
                StatusCode::CREATED,
                &ItemRow::from_item(&item),
            ))
        }
        Err(err) => Ok(internal_error(err)),
    }
}

async fn update_item(
    state: &Arc<ServerState>,
    id: ItemId,
    req: Request<Incoming>,
) -> Result<Response<ResponseBody>, hyper::Error> {
    if let Some(denied) = require_auth(state, &req).await {
        return Ok(denied);
    }
    let body = req.into_body().collect().await?.to_bytes();
    let patch: ItemPatch = match serde_json::from_slice(&body) {
        Ok(patch) => patch,
        Err(err) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                &format!("Malformed patch: {err}"),
            ))
        }
    };
    match state.db.update(&id, &patch) {
        Ok(item) => {
            state.publish(ChangeEvent::Update(item.clone()));
            Ok(json_response(StatusCode::OK, &ItemRow::from_item(&item)))
        }
        Err(morel_store::Error::NotFound(_)) => {
            Ok(error_response(StatusCode::NOT_FOUND, "Item not found"))
        }
        Err(err) => Ok(internal_error(err)),
    }
}

async fn delete_item(
    state: &Arc<ServerState>,
    id: ItemId,
    req: &Request<Incoming>,
) -> Response<ResponseBody> {
    if let Some(denied) = require_auth(state, req).await {
        return denied;
    }
    match state.db.delete(&id) {
        Ok(()) => {
            state.publish(ChangeEvent::Delete { id });
            empty_response(StatusCode::NO_CONTENT)
        }
        Err(morel_store::Error::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "Item not found")
        }
        Err(err) => internal_error(err),
    }
}

async fn sign_in(
    state: &Arc<ServerState>,
    req: Request<Incoming>,
) -> Result<Response<ResponseBody>, hyper::Error> {
    let body = req.into_body().collect().await?.to_bytes();
    let credentials: Credentials = match serde_json::from_slice(&body) {
        Ok(credentials) => credentials,
        Err(err) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                &format!("Malformed credentials: {err}"),
            ))
        }
    };
    match state
        .sign_in(&credentials.username, &credentials.password)
        .await
    {
        Some(token) => Ok(json_response(StatusCode::OK, &SessionRow { token })),
        None => Ok(error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials",
        )),
    }
}

async fn sign_out(state: &Arc<ServerState>, req: &Request<Incoming>) -> Response<ResponseBody> {
    match bearer_token(req) {
        Some(token) if state.sign_out(token).await => empty_response(StatusCode::NO_CONTENT),
        _ => error_response(StatusCode::UNAUTHORIZED, "Sign in required"),
    }
}

/// The token of the request's `Authorization: Bearer` header, if any.
fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Deny requests without a live session token. `None` means proceed.
pub(crate) async fn require_auth<B>(
    state: &ServerState,
    req: &Request<B>,
) -> Option<Response<ResponseBody>> {
    match bearer_token(req) {
        Some(token) if state.check_token(token).await => None,
        _ => Some(error_response(StatusCode::UNAUTHORIZED, "Sign in required")),
    }
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<ResponseBody> {
    let body = serde_json::to_vec(value).unwrap_or_default();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)).boxed())
        .unwrap()
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    json_response(
        status,
        &ErrorRow {
            error: message.to_string(),
        },
    )
}

pub(crate) fn empty_response(status: StatusCode) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .body(Empty::<Bytes>::new().boxed())
        .unwrap()
}

fn internal_error(err: impl std::fmt::Display) -> Response<ResponseBody> {
    tracing::error!("request failed: {err}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
}
