pub mod handlers;
pub mod login;
pub mod middleware;
pub mod roomies;
pub mod routes;
pub mod tasks;
