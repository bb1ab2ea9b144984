use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tarefas_tui::api::{ApiClient, ApiError};
use tarefas_tui::task::{Prioridade, TaskPayload};

#[tokio::test]
async fn login_sends_form_encoded_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=ana%40exemplo.com"))
        .and(body_string_contains("password=segredo123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let token = api.login("ana@exemplo.com", "segredo123").await.unwrap();
    assert_eq!(token, "tok-1");
}

#[tokio::test]
async fn login_failure_surfaces_the_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Email ou senha incorretos"})),
        )
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let err = api.login("ana@exemplo.com", "errada").await.unwrap_err();
    // Bad credentials on the login form are not a session expiry.
    assert!(matches!(err, ApiError::Request(_)));
    assert_eq!(err.to_string(), "Email ou senha incorretos");
}

#[tokio::test]
async fn duplicate_email_on_register_is_a_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/usuarios/"))
        .and(body_json(json!({"email": "ana@exemplo.com", "senha": "segredo123"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Email já registrado"
        })))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let err = api
        .register("ana@exemplo.com", "segredo123")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn authenticated_calls_attach_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tarefas/"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = ApiClient::new(server.uri());
    api.set_token(Some("tok-1".to_string()));
    let tasks = api.list_tasks().await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn a_401_maps_to_the_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tarefas/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let err = api.list_tasks().await.unwrap_err();
    assert!(matches!(err, ApiError::Auth));
    assert_eq!(err.to_string(), "Sessão expirada. Faça login novamente.");
}

#[tokio::test]
async fn non_2xx_without_a_json_body_falls_back_to_a_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tarefas/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let err = api.list_tasks().await.unwrap_err();
    assert_eq!(err.to_string(), "Não foi possível carregar as tarefas.");
}

#[tokio::test]
async fn create_sends_an_empty_description_as_an_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tarefas/"))
        .and(body_json(json!({
            "titulo": "comprar pão",
            "descricao": "",
            "concluida": false,
            "data_vencimento": null,
            "prioridade": "verde"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "dono_id": 1,
            "titulo": "comprar pão",
            "descricao": "",
            "concluida": false,
            "data_vencimento": null,
            "prioridade": "verde"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let payload = TaskPayload {
        titulo: "comprar pão".to_string(),
        descricao: String::new(),
        concluida: false,
        data_vencimento: None,
        prioridade: Some(Prioridade::Verde),
    };
    let created = api.create_task(&payload).await.unwrap();
    assert_eq!(created.descricao, "");
}

#[tokio::test]
async fn delete_accepts_a_204_with_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tarefas/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    api.delete_task(5).await.unwrap();
}

#[tokio::test]
async fn get_task_returns_the_full_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tarefas/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "dono_id": 1,
            "titulo": "relatório",
            "descricao": "dados do Q3",
            "concluida": true,
            "data_vencimento": "2025-10-15",
            "prioridade": "vermelha"
        })))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let task = api.get_task(9).await.unwrap();
    assert_eq!(task.titulo, "relatório");
    assert!(task.concluida);
    assert_eq!(task.prioridade, Some(Prioridade::Vermelha));
    assert_eq!(
        task.data_vencimento,
        Some("2025-10-15".parse().unwrap())
    );
}
