use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{
        brightdata_route, company_route, default_route, research_route, search_route,
        stats_route,
    },
    services::{BrightDataClient, Reconciler},
};

pub fn run(
    listener: TcpListener,
    reconciler: Reconciler,
    brightdata_client: Option<BrightDataClient>,
) -> Result<Server, std::io::Error> {
    let reconciler = web::Data::new(reconciler);
    let brightdata_client = brightdata_client.map(web::Data::new);

    let server = HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(
                web::scope("/api")
                    .service(company_route::high_fit)
                    .service(company_route::icp_similar)
                    .service(research_route::linkedin_search)
                    .service(research_route::google_verify)
                    .service(search_route::search)
                    .service(stats_route::stats)
                    .service(brightdata_route::status)
                    .default_service(web::to(default_route::api_not_found)),
            )
            .app_data(reconciler.clone());

        if let Some(client) = &brightdata_client {
            app = app.app_data(client.clone());
        }
        app
    })
    .listen(listener)?
    .run();

    Ok(server)
}
