use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Priority levels as the backend names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Prioridade {
    Vermelha,
    Amarela,
    Verde,
}

impl Prioridade {
    /// Sort rank: red first, unknown/missing after every known priority.
    pub fn rank(prioridade: Option<Prioridade>) -> u8 {
        match prioridade {
            Some(Prioridade::Vermelha) => 1,
            Some(Prioridade::Amarela) => 2,
            Some(Prioridade::Verde) => 3,
            None => 99,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Prioridade::Vermelha => "vermelha",
            Prioridade::Amarela => "amarela",
            Prioridade::Verde => "verde",
        }
    }

    pub fn next(current: Option<Prioridade>) -> Option<Prioridade> {
        match current {
            None => Some(Prioridade::Verde),
            Some(Prioridade::Verde) => Some(Prioridade::Amarela),
            Some(Prioridade::Amarela) => Some(Prioridade::Vermelha),
            Some(Prioridade::Vermelha) => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub id: i64,
    #[serde(default)]
    pub dono_id: i64,
    pub titulo: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub descricao: String,
    #[serde(default)]
    pub concluida: bool,
    #[serde(default)]
    pub data_vencimento: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_prioridade")]
    pub prioridade: Option<Prioridade>,
}

impl Task {
    /// Full-record outbound body built from the cached record, so a partial
    /// edit never clobbers fields the form did not show.
    pub fn payload(&self) -> TaskPayload {
        TaskPayload {
            titulo: self.titulo.clone(),
            descricao: self.descricao.clone(),
            concluida: self.concluida,
            data_vencimento: self.data_vencimento,
            prioridade: self.prioridade,
        }
    }
}

/// Body for POST/PUT on `/tarefas/`; the backend assigns `id` and `dono_id`.
#[derive(Debug, Serialize, Clone)]
pub struct TaskPayload {
    pub titulo: String,
    pub descricao: String,
    pub concluida: bool,
    pub data_vencimento: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioridade: Option<Prioridade>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_prioridade<'de, D>(deserializer: D) -> Result<Option<Prioridade>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("vermelha") => Some(Prioridade::Vermelha),
        Some("amarela") => Some(Prioridade::Amarela),
        Some("verde") => Some(Prioridade::Verde),
        // Unknown values sort with the missing ones instead of failing the
        // whole snapshot fetch.
        _ => None,
    })
}
