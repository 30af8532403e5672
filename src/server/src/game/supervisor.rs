use core::transfers::processor::AiProcessingResult;
use serde::Serialize;
use std::sync::Mutex;

/// Lifecycle of the detached AI round task. Failures land here and in the
/// log; they never propagate into a request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AiTaskState {
    Idle,
    Running,
    Completed { result: AiProcessingResult },
    Failed { error: String },
}

pub struct AiTaskSupervisor {
    state: Mutex<AiTaskState>,
}

impl AiTaskSupervisor {
    pub fn new() -> Self {
        AiTaskSupervisor {
            state: Mutex::new(AiTaskState::Idle),
        }
    }

    /// Flips to `Running` unless a task is already in flight.
    pub fn try_start(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if matches!(*state, AiTaskState::Running) {
            return false;
        }
        *state = AiTaskState::Running;
        true
    }

    pub fn finish(&self, result: AiProcessingResult) {
        let mut state = self.state.lock().unwrap();
        *state = AiTaskState::Completed { result };
    }

    /// Returns to `Idle` when a round could not start at all.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        *state = AiTaskState::Idle;
    }

    pub fn fail(&self, error: String) {
        let mut state = self.state.lock().unwrap();
        *state = AiTaskState::Failed { error };
    }

    pub fn status(&self) -> AiTaskState {
        self.state.lock().unwrap().clone()
    }
}

impl Default for AiTaskSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_task_runs_at_a_time() {
        let supervisor = AiTaskSupervisor::new();

        assert!(supervisor.try_start());
        assert!(!supervisor.try_start());

        supervisor.finish(AiProcessingResult::default());
        assert!(supervisor.try_start());
    }

    #[test]
    fn failure_is_observable_and_recoverable() {
        let supervisor = AiTaskSupervisor::new();

        supervisor.try_start();
        supervisor.fail("boom".to_string());

        assert!(matches!(supervisor.status(), AiTaskState::Failed { .. }));
        assert!(supervisor.try_start());
    }
}
