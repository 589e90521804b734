pub mod grading_job;
pub mod job_state;

pub use grading_job::GradingJob;
pub use job_state::{JobPhase, JobSettings, JobSnapshot, SaveOutcome};
