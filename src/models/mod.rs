pub mod task;
pub mod user;

pub use task::{
    NewTask, StatusInput, Task, TaskFilter, TaskInput, TaskPatch, TaskPriority, TaskQuery,
    TaskStats, TaskStatus,
};
pub use user::{NewUser, User};
