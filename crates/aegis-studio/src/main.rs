mod demo;

use aegis_engine::device::GpuInit;
use aegis_engine::logging::{init_logging, LoggingConfig};
use aegis_engine::window::{Runtime, RuntimeConfig};

use demo::ShieldDemo;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "aegis: shield intersection".to_string(),
        ..Default::default()
    };

    log::info!("starting {}", config.title);
    Runtime::run(config, GpuInit::default(), ShieldDemo::new())
}
