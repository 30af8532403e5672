use transfer_core::storage::InMemoryStore;
use transfer_core::utils::TimeEstimation;
use database::{GeneratorConfig, SaveGenerator};
use env_logger::Env;
use log::info;
use server::{GameAppData, TransferMarketServer};

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEFAULT_SAVE_ID: u32 = 1;

#[tokio::main]
async fn main() {
    color_eyre::install().unwrap();

    env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();

    let mut store = InMemoryStore::new();

    let (_, estimated) = TimeEstimation::estimate(|| {
        SaveGenerator::generate(&mut store, DEFAULT_SAVE_ID, &GeneratorConfig::default())
    });

    info!("save generated: {} ms", estimated);

    let data = GameAppData::new(store);

    TransferMarketServer::new(data).run().await;
}
