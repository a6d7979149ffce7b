//! Sea-ORM entities for `tasks` and `task_items`.

pub mod task;
pub mod task_item;
