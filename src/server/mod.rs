//! HTTP surface: the route table and server wiring.

pub mod handlers;

use std::io;
use std::net::SocketAddr;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::catalog::service::CatalogService;
use crate::catalog::store::ProductStore;
use crate::config::ServerConfig;
use crate::error::CatalogError;

/// Register the catalog routes on an actix app.
///
/// Body parse failures are folded into the same `{"message": ...}` shape the
/// validation errors use.
pub fn routes<S: ProductStore + 'static>(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(
      web::JsonConfig::default()
        .error_handler(|err, _req| CatalogError::Validation(err.to_string()).into()),
    )
    .route("/", web::get().to(handlers::api_root))
    .service(
      web::scope("/api/products")
        .route("", web::get().to(handlers::list_products::<S>))
        .route("", web::post().to(handlers::create_product::<S>))
        .route("/{id}", web::get().to(handlers::get_product::<S>))
        .route("/{id}", web::put().to(handlers::update_product::<S>))
        .route("/{id}", web::delete().to(handlers::delete_product::<S>)),
    );
}

/// Bind the API server and return it with its bound address. Port 0 resolves
/// to a real port, which the in-process tests rely on.
pub fn bind<S>(service: CatalogService<S>, config: &ServerConfig) -> io::Result<(Server, SocketAddr)>
where
  S: ProductStore + 'static,
{
  let data = web::Data::new(service);
  let origins = config.allowed_origins.clone();

  let server = HttpServer::new(move || {
    App::new()
      .app_data(data.clone())
      .wrap(TracingLogger::default())
      .wrap(cors_policy(&origins))
      .configure(routes::<S>)
  })
  .bind((config.host.as_str(), config.port))?;

  let addr = server
    .addrs()
    .first()
    .copied()
    .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "server bound no addresses"))?;

  Ok((server.run(), addr))
}

/// Browser clients live on other origins; allow exactly the configured ones.
/// Requests without an Origin header pass through untouched.
fn cors_policy(origins: &[String]) -> Cors {
  let mut cors = Cors::default()
    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
    .allow_any_header()
    .max_age(3600);
  for origin in origins {
    cors = cors.allowed_origin(origin);
  }
  cors
}
