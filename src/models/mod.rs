pub mod grade;
pub mod history;
pub mod loaders;
pub mod rubric;
pub mod settings;
pub mod upload;

pub use grade::{format_score, ExtractedText, GradeRequest, GradeResult, IngestResponse};
pub use history::{HistoryItem, SaveMeta, ScoreBand};
pub use loaders::{load_upload_file, load_upload_files};
pub use rubric::{default_rubric, essay_template, total_points, RubricField, RubricItem};
pub use settings::{EducationSettings, GradeScale, Persona, UserProfile};
pub use upload::UploadFile;
