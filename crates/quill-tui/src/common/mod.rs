mod field;
mod task;
pub mod text;

pub use field::TextField;
pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskStarted, TaskState, Tasks};
pub use text::{spinner_frame, truncate_with_ellipsis};
