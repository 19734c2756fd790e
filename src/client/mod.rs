pub mod task_client;
