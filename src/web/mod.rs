pub mod api;

use actix_files::Files;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use dns_lookup::get_hostname;
use tera::{Context, Tera};
use tokio::task;

use crate::identity::interfaces::{DatalinkSource, enumerate};

pub fn start(port: u16) {
    task::spawn_blocking(move || {
        println!("Starting web server on 127.0.0.1:{}", port);
        let sys = actix_rt::System::new();
        let tera = Tera::new("templates/**/*").unwrap();
        sys.block_on(async move {
            HttpServer::new(move || {
                App::new()
                    .app_data(Data::new(tera.clone()))
                    .service(Files::new("/static", "static"))
                    .service(index)
                    .service(api::api_interfaces)
                    .service(api::api_primary_mac)
                    .service(api::api_fingerprint)
                    .service(api::api_device_uuid)
            })
            .bind(("127.0.0.1", port))
            .unwrap()
            .run()
            .await
        })
        .expect("Failed to start Web server");
    });
}

// Define a handler function for the web request
#[get("/")]
async fn index(tera: Data<Tera>) -> impl Responder {
    let hostname = get_hostname().unwrap_or_else(|_| "Unknown".to_string());
    let records = enumerate(&DatalinkSource).unwrap_or_default();

    let mut context = Context::new();
    context.insert("hostname", &hostname);
    context.insert("records", &records);

    let rendered = tera
        .render("index.html", &context)
        .expect("Failed to render template");

    HttpResponse::Ok().body(rendered)
}
