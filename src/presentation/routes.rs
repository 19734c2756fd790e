use crate::presentation::handlers::{AppState, health_check, json_config, path_config, query_config};
use crate::presentation::middleware::BasicAuthMiddleware;
use crate::presentation::{login, roomies, tasks};
use actix_web::web;

pub const ROUTES: &str = "GET /api/health, \
    POST /api/login/sign-up, POST /api/login/login, GET /api/login/status, \
    GET|POST /api/login, GET|PUT|DELETE /api/login/{id}, \
    GET|POST /api/task, GET|PUT|DELETE /api/task/{id}, \
    POST /api/task/addRoomiesToTask/{id}, DELETE /api/task/removeRoomieFromTask/{id}/{roomieId}, \
    GET /api/task/getRoomiesForTask/{id}, \
    GET|POST /api/roomie, GET|DELETE /api/roomie/{id}";

/// Registers the whole `/api` surface. `/api/task` and `/api/roomie`
/// require basic auth; `/api/login` and `/api/health` are anonymous.
pub fn configure_api(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let auth_service = state.auth_service.clone();

        cfg.app_data(state)
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health_check))
                    .service(
                        web::scope("/login")
                            .route("/sign-up", web::post().to(login::signup))
                            .route("/login", web::post().to(login::login))
                            .route("/status", web::get().to(login::status))
                            .route("", web::get().to(login::list_logins))
                            .route("", web::post().to(login::create_login))
                            .route("/{login_id}", web::get().to(login::get_login))
                            .route("/{login_id}", web::put().to(login::update_login))
                            .route("/{login_id}", web::delete().to(login::delete_login)),
                    )
                    .service(
                        web::scope("/task")
                            .wrap(BasicAuthMiddleware::new(auth_service.clone()))
                            .route(
                                "/getRoomiesForTask/{task_id}",
                                web::get().to(tasks::get_roomies_for_task),
                            )
                            .route(
                                "/addRoomiesToTask/{task_id}",
                                web::post().to(tasks::add_roomies_to_task),
                            )
                            .route(
                                "/removeRoomieFromTask/{task_id}/{roomie_id}",
                                web::delete().to(tasks::remove_roomie_from_task),
                            )
                            .route("", web::get().to(tasks::list_tasks))
                            .route("", web::post().to(tasks::create_task))
                            .route("/{task_id}", web::get().to(tasks::get_task))
                            .route("/{task_id}", web::put().to(tasks::update_task))
                            .route("/{task_id}", web::delete().to(tasks::delete_task)),
                    )
                    .service(
                        web::scope("/roomie")
                            .wrap(BasicAuthMiddleware::new(auth_service))
                            .route("", web::get().to(roomies::list_roomies))
                            .route("", web::post().to(roomies::create_roomie))
                            .route("/{roomie_id}", web::get().to(roomies::get_roomie))
                            .route("/{roomie_id}", web::delete().to(roomies::delete_roomie)),
                    ),
            );
    }
}
