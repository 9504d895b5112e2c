use std::net::TcpListener;
use actix_web::dev::Server;
use actix_web::http::Method;
use actix_web::http::header::HeaderValue;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use crate::configuration::{CorsSettings, Settings};
use crate::contacts_client::ContactsClient;
use crate::routes::{health_check, method_not_allowed, subscribe, subscribe_body_error_handler, subscribe_preflight};


/// Headers a browser needs to accept responses from another origin.
fn cors_headers(allowed_origin: &Option<HeaderValue>) -> DefaultHeaders {
    let headers = DefaultHeaders::new();
    match allowed_origin {
        Some(origin) => headers
            .add(("Access-Control-Allow-Origin", origin.clone()))
            .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
            .add(("Access-Control-Allow-Headers", "Content-Type"))
            .add(("Access-Control-Allow-Credentials", "true")),
        None => headers,
    }
}


pub fn run(listener: TcpListener, contacts_client: ContactsClient, cors: CorsSettings) -> std::io::Result<Server> {
    let allowed_origin = cors
        .allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Invalid CORS allowed origin: {}", e)))?;
    let contacts_client = web::Data::new(contacts_client);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors_headers(&allowed_origin))
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .route("/api/health", web::get().to(health_check))
            .service(
                web::resource("/api/subscribe")
                    .app_data(web::JsonConfig::default().error_handler(subscribe_body_error_handler))
                    .route(web::post().to(subscribe))
                    .route(web::method(Method::OPTIONS).to(subscribe_preflight))
                    .default_service(web::to(method_not_allowed)),
            )
            .app_data(contacts_client.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct Application {
    port: u16,
    server: Server,
}


impl Application {
    pub async fn build(configuration: Settings) -> Result<Application, std::io::Error> {
        let timeout = configuration.provider.timeout();
        let contacts_client = ContactsClient::new(
            configuration.provider.base_url,
            configuration.provider.api_key,
            timeout,
        )
        .map_err(std::io::Error::other)?;

        if configuration.cors.allowed_origin.is_none() {
            tracing::info!("No allowed origin configured, CORS headers are disabled");
        }

        let address = format!("{}:{}", configuration.application.host, configuration.application.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, contacts_client, configuration.cors)?;
        Ok(Self {port, server})
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }

}
