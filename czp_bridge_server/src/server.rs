use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use czp_bridge_engine::{MemorySessionStore, SqliteUserMirror, TokenApi};
use dga_tools::DgaApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    expiry_worker::{start_session_expiry_worker, start_token_prefetch},
    integrations::DgaGateway,
    routes::{
        health,
        BatchNotificationRoute,
        GetUserDataRoute,
        LoginRoute,
        LogoutRoute,
        NotificationRoute,
        ValidateRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let api = DgaApi::new(config.dga.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = DgaGateway::new(api);
    let mirror = SqliteUserMirror::new_with_url(&config.database_url, 5)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, gateway, mirror)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    gateway: DgaGateway,
    mirror: SqliteUserMirror,
) -> Result<Server, ServerError> {
    // One token cache and one session store for the whole process. Built
    // outside the app factory: anything constructed inside it would exist
    // once per worker, and the token slot must be process-wide.
    let tokens = web::Data::new(TokenApi::new(gateway.clone(), config.token_freshness));
    let session_store = MemorySessionStore::new(config.session_ttl);
    let sessions = web::Data::new(session_store.clone());
    let gateway = web::Data::new(gateway);
    let mirror = web::Data::new(mirror);
    start_session_expiry_worker(session_store);
    if config.prefetch_token {
        start_token_prefetch(tokens.clone());
    }
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("czp::access_log"))
            .app_data(tokens.clone())
            .app_data(sessions.clone())
            .app_data(gateway.clone())
            .app_data(mirror.clone())
            .service(health)
            .service(
                web::scope("/api")
                    .service(ValidateRoute::<DgaGateway>::new())
                    .service(LoginRoute::<DgaGateway, MemorySessionStore, SqliteUserMirror>::new())
                    .service(GetUserDataRoute::<MemorySessionStore>::new())
                    .service(NotificationRoute::<DgaGateway, MemorySessionStore>::new())
                    .service(BatchNotificationRoute::<DgaGateway, MemorySessionStore>::new())
                    .service(LogoutRoute::<MemorySessionStore>::new()),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
