use crate::domain::a002_artifact_session::aggregate::UpdateSessionRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Фаза прохождения эксперимента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentPhase {
    Loading,
    Instructions,
    Running,
    Completed,
    Error,
}

/// Хронометраж одного прохождения артефакта на клиенте
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRun {
    phase: ExperimentPhase,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    duration_secs: Option<u64>,
    error: Option<String>,
}

impl Default for ExperimentRun {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentRun {
    pub fn new() -> Self {
        Self {
            phase: ExperimentPhase::Loading,
            started_at: None,
            ended_at: None,
            duration_secs: None,
            error: None,
        }
    }

    pub fn phase(&self) -> ExperimentPhase {
        self.phase
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn duration_secs(&self) -> Option<u64> {
        self.duration_secs
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Артефакт загружен, показываем инструкции
    pub fn loaded(&mut self) {
        if self.phase == ExperimentPhase::Loading {
            self.phase = ExperimentPhase::Instructions;
        }
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        self.phase = ExperimentPhase::Error;
        self.error = Some(message.into());
    }

    /// Старт прохождения. `true` означает, что нужно отправить +1 к plays:
    /// ровно один раз на запуск.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != ExperimentPhase::Instructions {
            return false;
        }
        self.phase = ExperimentPhase::Running;
        self.started_at = Some(now);
        self.ended_at = None;
        self.duration_secs = None;
        true
    }

    /// Сколько секунд идёт прохождение (для таймера)
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        match (self.phase, self.started_at) {
            (ExperimentPhase::Completed, _) => self.duration_secs.unwrap_or(0),
            (ExperimentPhase::Running, Some(started)) => {
                (now - started).num_seconds().max(0) as u64
            }
            _ => 0,
        }
    }

    /// Завершить прохождение. Длительность округляется до секунд.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Option<u64> {
        if self.phase != ExperimentPhase::Running {
            return None;
        }
        let millis = self
            .started_at
            .map(|started| (now - started).num_milliseconds().max(0))
            .unwrap_or(0);
        let secs = ((millis as f64) / 1000.0).round() as u64;
        self.phase = ExperimentPhase::Completed;
        self.ended_at = Some(now);
        self.duration_secs = Some(secs);
        Some(secs)
    }

    /// Вернуться к инструкциям для повторного прохождения
    pub fn reset(&mut self) {
        if self.phase == ExperimentPhase::Completed {
            self.phase = ExperimentPhase::Instructions;
        }
    }

    /// Патч сессии по итогам завершённого прохождения
    pub fn session_update(
        &self,
        questionnaire_responses: Option<serde_json::Value>,
    ) -> Option<UpdateSessionRequest> {
        if self.phase != ExperimentPhase::Completed {
            return None;
        }
        Some(UpdateSessionRequest {
            end_time: self.ended_at,
            duration: self.duration_secs,
            completed: Some(true),
            questionnaire_responses,
        })
    }
}
