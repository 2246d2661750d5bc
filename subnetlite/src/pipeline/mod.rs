//! Table-driven sequential pipeline execution.
//!
//! ## Architecture
//!
//! ```text
//! ExecutionPlan → Pipeline → Tasks
//!
//! - ExecutionPlan: Ordered list of tasks chosen up front
//! - Pipeline: Consumes the plan and runs each task to completion in order
//! - Task: One workflow stage; reads and writes the shared context
//! ```
//!
//! The first failing task aborts the pipeline; later tasks never run.
//!
//! ## Example
//!
//! ```ignore
//! use pipeline::{ExecutionPlan, PipelineBuilder, PipelineExecutor};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let plan = ExecutionPlan::new(vec![Box::new(TaskA), Box::new(TaskB)]);
//! let ctx = Arc::new(Mutex::new(Context::default()));
//! let pipeline = PipelineBuilder::from_plan(plan);
//! let metrics = PipelineExecutor::execute(pipeline, ctx).await?;
//! println!("pipeline took {}ms", metrics.total_duration_ms);
//! ```

mod metrics;
#[allow(clippy::module_inception)]
mod pipeline;
mod task;

pub use metrics::{PipelineMetrics, TaskMetrics};
pub use pipeline::{ExecutionPlan, Pipeline, PipelineBuilder, PipelineExecutor};
pub use task::{BoxedTask, PipelineTask};
