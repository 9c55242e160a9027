use std::sync::Arc;

use tracing::info;

use trip_planner::api::router;
use trip_planner::config::{Config, OracleKind};
use trip_planner::directory::InMemoryLocationDirectory;
use trip_planner::haversine::HaversineOracle;
use trip_planner::planner::PlanOptions;
use trip_planner::service::TripService;
use trip_planner::store::InMemoryTripStore;
use trip_planner::traits::{CostOracle, LocationDirectory, RideRequester};
use trip_planner::uber::UberClient;

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing_subscriber::fmt().with_max_level(config.log_level).init();

    let directory: Arc<dyn LocationDirectory> = Arc::new(match &config.locations_file {
        Some(path) => InMemoryLocationDirectory::from_json_file(path)?,
        None => InMemoryLocationDirectory::default(),
    });

    // Upstream clients are built before the async runtime starts: the blocking
    // reqwest client owns its own runtime and must not be created inside ours.
    let (oracle, requester): (Arc<dyn CostOracle>, Arc<dyn RideRequester>) = match config.oracle {
        OracleKind::Uber => {
            let client = Arc::new(UberClient::new(config.uber.clone(), directory.clone())?);
            let oracle: Arc<dyn CostOracle> = client.clone();
            let requester: Arc<dyn RideRequester> = client;
            (oracle, requester)
        }
        OracleKind::Haversine => {
            let haversine = Arc::new(HaversineOracle::new(directory.clone()));
            let oracle: Arc<dyn CostOracle> = haversine.clone();
            let requester: Arc<dyn RideRequester> = haversine;
            (oracle, requester)
        }
    };

    let service = Arc::new(TripService::new(
        oracle,
        requester,
        Arc::new(InMemoryTripStore::new()),
        PlanOptions {
            parallel: config.parallel_planning,
        },
    ));

    // The last handle on the service is released outside the runtime.
    let app = router(service.clone());
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
        info!(addr = %config.bind_addr, oracle = ?config.oracle, "trip planner listening");
        axum::serve(listener, app).await?;
        Ok::<_, anyhow::Error>(())
    })?;

    Ok(())
}
