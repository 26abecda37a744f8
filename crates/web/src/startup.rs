use actix_cors::Cors;
use actix_web::{dev::Server, web, web::Data, App, HttpServer};
use anyhow::Context;
use auth_core::{Authority, UserDirectory, VerificationGate};
use std::{io::Error, net::TcpListener, sync::Arc};
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::Settings,
    error::ApiError,
    middleware::RequireCredential,
    routes::{admin, data, health_check, introspect, login, logout},
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {address}"))?;
        let port = listener.local_addr()?.port();

        let authority = configuration.authority.build()?;
        let directory: Arc<dyn UserDirectory> = Arc::new(configuration.directory.build());
        tracing::info!(%address, authority = %authority.kind(), "starting server");

        let server = run(listener, authority, directory).await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), Error> {
        self.server.await
    }
}

async fn run(
    listener: TcpListener,
    authority: Arc<dyn Authority>,
    directory: Arc<dyn UserDirectory>,
) -> Result<Server, anyhow::Error> {
    let gate = RequireCredential::new(VerificationGate::new(authority.clone()));
    let authority: Data<dyn Authority> = Data::from(authority);
    let directory: Data<dyn UserDirectory> = Data::from(directory);
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .max_age(3600);
        // Malformed request bodies answer 400 with the usual JSON error shape.
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());
        App::new()
            // Logger middleware
            // Sent active-web log to log subscriber
            .wrap(TracingLogger::default())
            .wrap(cors)
            .service(health_check)
            .service(login)
            .service(introspect)
            .service(
                web::resource("/data")
                    .wrap(gate.clone())
                    .route(web::get().to(data)),
            )
            .service(
                web::resource("/admin")
                    .wrap(gate.clone())
                    .route(web::get().to(admin)),
            )
            .service(
                web::resource("/logout")
                    .wrap(gate.clone())
                    .route(web::post().to(logout)),
            )
            .app_data(json_config)
            .app_data(authority.clone())
            .app_data(directory.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
