use std::collections::HashSet;

use crate::api::{ApiClient, ApiError};
use crate::task::{Task, TaskPayload};

/// Client-side cache of the user's tasks. Every mutation is followed by a
/// full re-fetch; the cache is always a wholesale copy of what the server
/// last answered, never a locally patched one.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    in_flight: HashSet<i64>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops the cached snapshot, e.g. on logout.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.in_flight.clear();
    }

    /// Replaces the whole snapshot. On failure the previous snapshot stays.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.tasks = api.list_tasks().await?;
        Ok(())
    }

    pub async fn create(&mut self, api: &ApiClient, payload: TaskPayload) -> Result<(), ApiError> {
        api.create_task(&payload).await?;
        self.refresh(api).await
    }

    /// Returns `Ok(false)` when the task already has a request in flight and
    /// the mutation was dropped without touching the network.
    pub async fn update(
        &mut self,
        api: &ApiClient,
        id: i64,
        payload: TaskPayload,
    ) -> Result<bool, ApiError> {
        if !self.in_flight.insert(id) {
            tracing::debug!(id, "update dropped, task already has a request in flight");
            return Ok(false);
        }
        let result = async {
            api.update_task(id, &payload).await?;
            self.refresh(api).await
        }
        .await;
        self.in_flight.remove(&id);
        result.map(|_| true)
    }

    pub async fn delete(&mut self, api: &ApiClient, id: i64) -> Result<bool, ApiError> {
        if !self.in_flight.insert(id) {
            tracing::debug!(id, "delete dropped, task already has a request in flight");
            return Ok(false);
        }
        let result = async {
            api.delete_task(id).await?;
            self.refresh(api).await
        }
        .await;
        self.in_flight.remove(&id);
        result.map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn task_json(id: i64, titulo: &str) -> serde_json::Value {
        json!({
            "id": id,
            "dono_id": 1,
            "titulo": titulo,
            "descricao": "",
            "concluida": false,
            "data_vencimento": null,
            "prioridade": "verde"
        })
    }

    fn payload(titulo: &str) -> TaskPayload {
        TaskPayload {
            titulo: titulo.to_string(),
            descricao: String::new(),
            concluida: false,
            data_vencimento: None,
            prioridade: None,
        }
    }

    #[tokio::test]
    async fn refresh_replaces_the_snapshot_wholesale() {
        let server = MockServer::start().await;
        let api = ApiClient::new(server.uri());
        let mut store = TaskStore::new();

        Mock::given(method("GET"))
            .and(path("/tarefas/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([task_json(1, "antiga")])),
            )
            .mount(&server)
            .await;
        store.refresh(&api).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().titulo, "antiga");

        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/tarefas/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([task_json(2, "nova"), task_json(3, "outra")])),
            )
            .mount(&server)
            .await;
        store.refresh(&api).await.unwrap();

        // Full replacement: the old record is gone, not merged in.
        assert_eq!(store.len(), 2);
        assert!(store.get(1).is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_snapshot() {
        let server = MockServer::start().await;
        let api = ApiClient::new(server.uri());
        let mut store = TaskStore::new();

        Mock::given(method("GET"))
            .and(path("/tarefas/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([task_json(1, "tarefa")])),
            )
            .mount(&server)
            .await;
        store.refresh(&api).await.unwrap();

        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/tarefas/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        assert!(store.refresh(&api).await.is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_task_in_the_snapshot() {
        let server = MockServer::start().await;
        let api = ApiClient::new(server.uri());
        let mut store = TaskStore::new();

        Mock::given(method("GET"))
            .and(path("/tarefas/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([task_json(1, "tarefa")])),
            )
            .mount(&server)
            .await;
        store.refresh(&api).await.unwrap();

        Mock::given(method("DELETE"))
            .and(path("/tarefas/1"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"detail": "erro interno"})),
            )
            .mount(&server)
            .await;

        let err = store.delete(&api, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "erro interno");
        // No optimistic removal.
        assert!(store.get(1).is_some());
    }

    #[tokio::test]
    async fn duplicate_mutation_on_an_in_flight_task_is_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri());

        let mut store = TaskStore::new();
        store.in_flight.insert(7);
        let performed = store.update(&api, 7, payload("qualquer")).await.unwrap();
        assert!(!performed);
    }
}
