#[derive(Debug, Clone)]
pub struct TaskMetrics {
    pub index: usize,
    pub name: String,
    pub duration_ms: u128,
}

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub total_duration_ms: u128,
    pub tasks: Vec<TaskMetrics>,
}

impl PipelineMetrics {
    pub fn task_duration_ms(&self, name: &str) -> Option<u128> {
        self.tasks
            .iter()
            .find(|task| task.name == name)
            .map(|task| task.duration_ms)
    }

    pub fn log_summary(&self) {
        for task in &self.tasks {
            tracing::info!(
                task = %task.name,
                index = task.index,
                duration_ms = task.duration_ms as u64,
                "Stage finished"
            );
        }
        tracing::info!(
            total_duration_ms = self.total_duration_ms as u64,
            stages = self.tasks.len(),
            "Pipeline finished"
        );
    }
}
