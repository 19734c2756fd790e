pub mod auth_service;
pub mod login_service;
pub mod roomie_service;
pub mod task_service;
