use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::task::{Task, TaskPayload};

/// Every failure a handler can see from the backend, already carrying the
/// message the UI should show.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 on any authenticated call; the controller reacts by logging out.
    #[error("Sessão expirada. Faça login novamente.")]
    Auth,
    /// Backend rejected the input (e.g. duplicate e-mail on registration).
    #[error("{0}")]
    Validation(String),
    /// Anything else: non-2xx with a `detail` message, or the network itself.
    #[error("{0}")]
    Request(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// The backend takes login credentials form-encoded, not as JSON.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(ApiError::Request(detail_or(response, "Falha no login").await));
        }
        let body: TokenResponse = response.json().await.map_err(network_error)?;
        Ok(body.access_token)
    }

    pub async fn register(&self, email: &str, senha: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/usuarios/"))
            .json(&serde_json::json!({ "email": email, "senha": senha }))
            .send()
            .await
            .map_err(network_error)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::BAD_REQUEST => Err(ApiError::Validation(
                "Email já registado. Tente outro.".to_string(),
            )),
            _ => Err(ApiError::Request(
                detail_or(response, "Ocorreu um erro ao registar.").await,
            )),
        }
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self
            .authorized(self.client.get(self.url("/tarefas/")))
            .send()
            .await
            .map_err(network_error)?;
        let response = check(response, "Não foi possível carregar as tarefas.").await?;
        response.json().await.map_err(network_error)
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, ApiError> {
        let response = self
            .authorized(self.client.get(self.url(&format!("/tarefas/{id}"))))
            .send()
            .await
            .map_err(network_error)?;
        let response = check(response, "Não foi possível carregar a tarefa.").await?;
        response.json().await.map_err(network_error)
    }

    pub async fn create_task(&self, payload: &TaskPayload) -> Result<Task, ApiError> {
        let response = self
            .authorized(self.client.post(self.url("/tarefas/")).json(payload))
            .send()
            .await
            .map_err(network_error)?;
        let response = check(response, "Não foi possível adicionar a tarefa.").await?;
        response.json().await.map_err(network_error)
    }

    pub async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<Task, ApiError> {
        let response = self
            .authorized(
                self.client
                    .put(self.url(&format!("/tarefas/{id}")))
                    .json(payload),
            )
            .send()
            .await
            .map_err(network_error)?;
        let response = check(response, "Não foi possível atualizar a tarefa.").await?;
        response.json().await.map_err(network_error)
    }

    /// Returns 204 with no body; nothing is parsed on success.
    pub async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .authorized(self.client.delete(self.url(&format!("/tarefas/{id}"))))
            .send()
            .await
            .map_err(network_error)?;
        check(response, "Não foi possível deletar a tarefa.").await?;
        Ok(())
    }
}

/// Maps 401 to the forced-logout error and any other non-2xx to a message
/// taken from the body's `detail` field when one is there.
async fn check(response: Response, fallback: &str) -> Result<Response, ApiError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(ApiError::Auth),
        _ => Err(ApiError::Request(detail_or(response, fallback).await)),
    }
}

async fn detail_or(response: Response, fallback: &str) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.detail)
        .unwrap_or_else(|| fallback.to_string())
}

fn network_error(err: reqwest::Error) -> ApiError {
    tracing::debug!(error = %err, "request failed before an HTTP status was read");
    ApiError::Request("Não foi possível contactar o servidor.".to_string())
}
