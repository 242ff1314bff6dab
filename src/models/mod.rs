pub mod task;
pub mod user;

pub use task::{Task, TaskCreate, TaskPriority, TaskQuery, TaskStatus, TaskUpdate};
pub use user::{User, UserResponse, UserUpdate};
