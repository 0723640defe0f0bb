//! Collection HTTP routes.
//!
//! Every registered kind is served under `/content-collection/{kind path}`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use collection_rw_domain::{encode_json, CollectionId};

use super::error::{ApiError, RequestContext, NO_UUID};
use crate::app::App;

/// Create the collection routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/content-collection/{kind}/__count", get(count_collections))
        .route(
            "/content-collection/{kind}/{uuid}",
            get(get_collection)
                .put(put_collection)
                .delete(delete_collection),
        )
}

async fn count_collections(
    State(app): State<Arc<App>>,
    Path(kind): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(service) = app.collection(&kind) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let ctx = RequestContext::new(&uri, &headers, NO_UUID);

    let count = service.count().await.map_err(|e| ctx.fail(e))?;
    Ok(Json(count).into_response())
}

async fn get_collection(
    State(app): State<Arc<App>>,
    Path((kind, uuid)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(service) = app.collection(&kind) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let ctx = RequestContext::new(&uri, &headers, uuid.as_str());

    let Some(collection) = service
        .read(&CollectionId::from(uuid))
        .await
        .map_err(|e| ctx.fail(e))?
    else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let body = encode_json(&collection).map_err(|e| ctx.fail(ApiError::Internal(e.to_string())))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn put_collection(
    State(app): State<Arc<App>>,
    Path((kind, uuid)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let Some(service) = app.collection(&kind) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let ctx = RequestContext::new(&uri, &headers, uuid.as_str());

    // A corrupt compressed body surfaces here, while buffering.
    let body = body.map_err(|e| ctx.fail(ApiError::BadRequest(e.body_text())))?;
    let (collection, _) = service.decode_json(&body[..]).map_err(|e| ctx.fail(e))?;

    service
        .write(&CollectionId::from(uuid), &collection)
        .await
        .map_err(|e| ctx.fail(e))?;

    tracing::debug!(kind = %kind, uuid = %collection.id, items = collection.len(), "Collection written");
    Ok(StatusCode::OK.into_response())
}

async fn delete_collection(
    State(app): State<Arc<App>>,
    Path((kind, uuid)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(service) = app.collection(&kind) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let ctx = RequestContext::new(&uri, &headers, uuid.as_str());

    let deleted = service
        .delete(&CollectionId::from(uuid))
        .await
        .map_err(|e| ctx.fail(ApiError::Unavailable(e.to_string())))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(StatusCode::NOT_FOUND.into_response())
    }
}
