use std::error::Error;
use std::sync::Arc;

use talker_manager::allocator::IdAllocator;
use talker_manager::config::{get_variable_or, DEFAULT_DATA_PATH, DEFAULT_PORT};
use talker_manager::db::{Db, JsonDb};
use talker_manager::environment::Environment;
use talker_manager::log::{info, initialize_logger};
use talker_manager::routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let port: u16 = get_variable_or("TALKER_PORT", DEFAULT_PORT)
        .parse()
        .expect("parse TALKER_PORT as u16");
    let data_path = get_variable_or("TALKER_DATA_PATH", DEFAULT_DATA_PATH);

    info!(logger, "Starting..."; "port" => port, "data_path" => %data_path);
    let logger = Arc::new(logger);

    let db = Arc::new(JsonDb::new(&data_path));
    let collection = db
        .retrieve_all()
        .await
        .expect("read initial talker collection");
    let allocator = Arc::new(IdAllocator::seeded(&collection));

    let environment = Environment::new(logger.clone(), db, allocator);

    let routes = routes::make_routes(environment, logger.clone());

    let (_, server) =
        warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async {
            tokio::signal::ctrl_c().await.expect("listen for ctrl-c");
        });
    server.await;

    info!(logger, "Exiting gracefully...");

    Ok(())
}
