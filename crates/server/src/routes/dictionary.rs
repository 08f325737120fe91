use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use tracing::info;

use service::dictionary::{Candidate, MappingStore, SubmitPayload};
use service::file::{dictionary_store::DictionaryStore, synonym_store::SynonymStore};
use service::{Dictionary, ServiceError};

use crate::errors::ApiError;

pub const ACCEPTED_MESSAGE: &str = "Dicionário recebido e salvo com sucesso!";

#[derive(Clone)]
pub struct ServerState {
    pub dictionary: Arc<DictionaryStore>,
    pub synonyms: Arc<SynonymStore>,
}

#[derive(Serialize, Debug)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub dict: Arc<Dictionary>,
}

#[derive(Serialize, Debug)]
pub struct FetchResponse {
    pub dict: Arc<Dictionary>,
}

/// Shared submit path: parse the body, check `dict`, hand it to `store`.
async fn submit(
    store: &dyn MappingStore,
    payload: Result<Json<SubmitPayload>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    // unparseable bodies are a client error like a missing field
    let Json(payload) = payload.map_err(|e| ServiceError::InvalidInput(e.body_text()))?;
    let mapping = Candidate::from(payload).into_mapping()?;
    let dict = store.replace_mapping(mapping).await?;
    info!(store = store.name(), entries = dict.len(), "mapping accepted");
    Ok(Json(SubmitResponse { message: ACCEPTED_MESSAGE, dict }))
}

#[utoipa::path(post, path = "/enviar", tag = "dictionary", request_body = crate::openapi::SubmitRequestDoc, responses((status = 200, description = "Accepted", body = crate::openapi::SubmitResponseDoc), (status = 400, description = "Bad Request", body = crate::openapi::ErrorResponseDoc), (status = 500, description = "Not persisted", body = crate::openapi::ErrorResponseDoc)))]
pub async fn submit_dictionary(
    State(state): State<ServerState>,
    payload: Result<Json<SubmitPayload>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    submit(state.dictionary.as_ref(), payload).await
}

#[utoipa::path(post, path = "/palavras", tag = "dictionary", request_body = crate::openapi::SubmitRequestDoc, responses((status = 200, description = "Accepted", body = crate::openapi::SubmitResponseDoc), (status = 400, description = "Bad Request", body = crate::openapi::ErrorResponseDoc), (status = 500, description = "Not persisted", body = crate::openapi::ErrorResponseDoc)))]
pub async fn submit_synonyms(
    State(state): State<ServerState>,
    payload: Result<Json<SubmitPayload>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    submit(state.synonyms.as_ref(), payload).await
}

#[utoipa::path(get, path = "/get", tag = "dictionary", responses((status = 200, description = "Current dictionary", body = crate::openapi::FetchResponseDoc)))]
pub async fn fetch_dictionary(State(state): State<ServerState>) -> Json<FetchResponse> {
    Json(FetchResponse { dict: state.dictionary.get() })
}
