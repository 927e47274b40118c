use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use backend::config::Config;
use backend::services;
use backend::state::AppState;
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::info;
use mime_guess::from_path;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let bind = (config.host.clone(), config.port);
    let media_dir = config.media_dir.clone();
    let state = AppState::initialize(config).map_err(std::io::Error::other)?;
    let state = web::Data::new(state);

    info!("Server running at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(state.clone())
            .service(services::reports::configure_routes())
            .service(services::media::configure_routes())
            .service(services::notify::configure_routes())
            .service(actix_files::Files::new("/media", media_dir.clone()))
            .default_service(web::route().to(serve_embedded))
    })
    .bind(bind)?
    .run()
    .await
}
