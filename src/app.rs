use chrono::NaiveDate;

use crate::api::{ApiClient, ApiError};
use crate::projection::{project, Filter, Sort};
use crate::session::Session;
use crate::store::TaskStore;
use crate::task::{Prioridade, Task, TaskPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Tasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Titulo,
    Descricao,
    DataVencimento,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Titulo,
    Descricao,
}

/// A row being edited in place: input buffers seeded from the cached record,
/// never from rendered text.
#[derive(Debug, Clone)]
pub struct EditState {
    pub id: i64,
    pub titulo: String,
    pub descricao: String,
    pub field: EditField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    fn info(text: impl Into<String>) -> Self {
        Feedback {
            text: text.into(),
            kind: FeedbackKind::Info,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Feedback {
            text: text.into(),
            kind: FeedbackKind::Error,
        }
    }
}

/// Which feedback line a failure belongs to.
#[derive(Debug, Clone, Copy)]
enum MessageArea {
    Auth,
    Tasks,
}

pub struct App {
    pub api: ApiClient,
    pub session: Session,
    pub store: TaskStore,
    pub screen: Screen,
    pub filter: Filter,
    pub sort: Sort,
    pub selected: usize,
    pub auth_email: String,
    pub auth_password: String,
    pub auth_field: AuthField,
    pub auth_message: Option<Feedback>,
    pub task_message: Option<Feedback>,
    pub add_titulo: String,
    pub add_descricao: String,
    pub add_data: String,
    pub add_prioridade: Option<Prioridade>,
    pub add_field: AddField,
    pub adding: bool,
    pub editing: Option<EditState>,
    pub should_quit: bool,
}

impl App {
    /// A token left over from a previous run logs the user straight in; the
    /// caller still has to run the initial refresh.
    pub fn new(mut api: ApiClient, session: Session) -> Self {
        api.set_token(session.access_token.clone());
        let screen = if session.access_token.is_some() {
            Screen::Tasks
        } else {
            Screen::Login
        };
        Self {
            api,
            session,
            store: TaskStore::new(),
            screen,
            filter: Filter::default(),
            sort: Sort::default(),
            selected: 0,
            auth_email: String::new(),
            auth_password: String::new(),
            auth_field: AuthField::Email,
            auth_message: None,
            task_message: None,
            add_titulo: String::new(),
            add_descricao: String::new(),
            add_data: String::new(),
            add_prioridade: Some(Prioridade::Verde),
            add_field: AddField::Titulo,
            adding: false,
            editing: None,
            should_quit: false,
        }
    }

    // --- projection ---

    pub fn projected(&self) -> Vec<&Task> {
        project(self.store.snapshot(), self.filter, self.sort)
    }

    pub fn selected_task_id(&self) -> Option<i64> {
        self.projected().get(self.selected).map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.projected().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let len = self.projected().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected = 0;
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.selected = 0;
    }

    pub fn toggle_theme(&mut self) {
        self.session.toggle_theme();
    }

    // --- auth ---

    pub fn show_register(&mut self) {
        self.screen = Screen::Register;
        self.auth_message = None;
    }

    pub fn show_login(&mut self) {
        self.screen = Screen::Login;
        self.auth_message = None;
    }

    pub async fn login(&mut self) {
        self.auth_message = None;
        if self.auth_email.is_empty() || self.auth_password.is_empty() {
            self.auth_message = Some(Feedback::error("Preencha email e senha."));
            return;
        }
        match self.api.login(&self.auth_email, &self.auth_password).await {
            Ok(token) => {
                self.session.set_token(token.clone());
                self.api.set_token(Some(token));
                self.auth_email.clear();
                self.auth_password.clear();
                self.screen = Screen::Tasks;
                self.refresh().await;
            }
            Err(err) => self.fail(err, MessageArea::Auth),
        }
    }

    pub async fn register(&mut self) {
        self.auth_message = None;
        if self.auth_email.is_empty() || self.auth_password.is_empty() {
            self.auth_message = Some(Feedback::error("Preencha email e senha."));
            return;
        }
        match self.api.register(&self.auth_email, &self.auth_password).await {
            Ok(()) => {
                self.auth_password.clear();
                self.screen = Screen::Login;
                self.auth_message = Some(Feedback::info(
                    "Usuário criado com sucesso! Por favor, faça o login.",
                ));
            }
            Err(err) => self.fail(err, MessageArea::Auth),
        }
    }

    /// Clears the persisted token and every piece of in-memory task state.
    pub fn logout(&mut self) {
        self.session.clear_token();
        self.api.set_token(None);
        self.store.clear();
        self.editing = None;
        self.cancel_add();
        self.task_message = None;
        self.auth_email.clear();
        self.auth_password.clear();
        self.auth_field = AuthField::Email;
        self.selected = 0;
        self.screen = Screen::Login;
    }

    // --- task actions ---

    pub async fn refresh(&mut self) {
        if let Err(err) = self.store.refresh(&self.api).await {
            self.fail(err, MessageArea::Tasks);
            return;
        }
        self.clamp_selection();
    }

    pub fn begin_add(&mut self) {
        self.task_message = None;
        self.adding = true;
        self.add_field = AddField::Titulo;
    }

    pub fn cancel_add(&mut self) {
        self.adding = false;
        self.add_titulo.clear();
        self.add_descricao.clear();
        self.add_data.clear();
        self.add_prioridade = Some(Prioridade::Verde);
        self.add_field = AddField::Titulo;
    }

    pub async fn add_task(&mut self) {
        self.task_message = None;
        if self.add_titulo.is_empty() {
            self.task_message = Some(Feedback::error("O título é obrigatório."));
            return;
        }
        let data_vencimento = match parse_due_date(&self.add_data) {
            Ok(date) => date,
            Err(message) => {
                self.task_message = Some(Feedback::error(message));
                return;
            }
        };
        let payload = TaskPayload {
            titulo: self.add_titulo.clone(),
            // An empty description stays "", never null.
            descricao: self.add_descricao.clone(),
            concluida: false,
            data_vencimento,
            prioridade: self.add_prioridade,
        };
        match self.store.create(&self.api, payload).await {
            Ok(()) => {
                self.add_titulo.clear();
                self.add_descricao.clear();
                self.add_data.clear();
                self.add_prioridade = Some(Prioridade::Verde);
                self.add_field = AddField::Titulo;
                self.adding = false;
                self.clamp_selection();
            }
            Err(err) => self.fail(err, MessageArea::Tasks),
        }
    }

    /// Flips `concluida` sending the full cached record, so the due date and
    /// priority survive the round trip.
    pub async fn toggle_complete(&mut self) {
        self.task_message = None;
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.store.get(id) else {
            return;
        };
        let mut payload = task.payload();
        payload.concluida = !payload.concluida;
        match self.store.update(&self.api, id, payload).await {
            Ok(_) => self.clamp_selection(),
            Err(err) => self.fail(err, MessageArea::Tasks),
        }
    }

    pub async fn delete_task(&mut self) {
        self.task_message = None;
        let Some(id) = self.selected_task_id() else {
            return;
        };
        match self.store.delete(&self.api, id).await {
            Ok(_) => self.clamp_selection(),
            Err(err) => self.fail(err, MessageArea::Tasks),
        }
    }

    pub fn begin_edit(&mut self) {
        self.task_message = None;
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if let Some(task) = self.store.get(id) {
            self.editing = Some(EditState {
                id,
                titulo: task.titulo.clone(),
                descricao: task.descricao.clone(),
                field: EditField::Titulo,
            });
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Fetches the current full record first and only overlays the edited
    /// fields, so completion, due date and priority are never clobbered.
    /// A failed save keeps the row in edit mode.
    pub async fn save_edit(&mut self) {
        self.task_message = None;
        let Some(edit) = self.editing.clone() else {
            return;
        };
        if edit.titulo.is_empty() {
            self.task_message = Some(Feedback::error("O título é obrigatório."));
            return;
        }
        let current = match self.api.get_task(edit.id).await {
            Ok(task) => task,
            Err(err) => {
                self.fail(err, MessageArea::Tasks);
                return;
            }
        };
        let mut payload = current.payload();
        payload.titulo = edit.titulo;
        payload.descricao = edit.descricao;
        match self.store.update(&self.api, edit.id, payload).await {
            Ok(_) => {
                self.editing = None;
                self.clamp_selection();
            }
            Err(err) => self.fail(err, MessageArea::Tasks),
        }
    }

    // --- failure handling ---

    /// Auth failures force a logout; everything else lands in the feedback
    /// line of the area the action belongs to.
    fn fail(&mut self, err: ApiError, area: MessageArea) {
        match err {
            ApiError::Auth => {
                let message = err.to_string();
                self.logout();
                self.auth_message = Some(Feedback::error(message));
            }
            other => {
                let feedback = Feedback::error(other.to_string());
                match area {
                    MessageArea::Auth => self.auth_message = Some(feedback),
                    MessageArea::Tasks => self.task_message = Some(feedback),
                }
            }
        }
    }
}

/// Empty input means no due date; anything else must be an ISO date.
fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| "Data inválida. Use AAAA-MM-DD.".to_string())
}
