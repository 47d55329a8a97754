#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod quantity;

use clap::{Parser, crate_version};

use crate::{cli::Args, core::collector::Collector, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    args.log.init()?;
    info!(version = crate_version!(), "starting…");

    let fetcher = args.inverter.connect()?;
    let publisher = args.influx.connect()?;
    let tags = args.tags.tags();
    let interval = args.polling_interval();
    let inverter_url = args.inverter.base_url()?;
    info!(
        inverter = %inverter_url,
        influx = %args.influx.url,
        org = %args.influx.org,
        bucket = %args.influx.bucket,
        ?interval,
        "configured"
    );
    debug!(
        ?tags,
        device_id = args.inverter.device_id,
        meter_device_id = args.inverter.meter_device_id,
        "device settings"
    );

    Collector::builder()
        .fetcher(fetcher)
        .publisher(publisher)
        .tags(tags)
        .measurement(args.influx.measurement)
        .inverter_id(args.inverter.device_id)
        .interval(interval)
        .build()
        .run(shutdown_signal())
        .await;

    info!("done!");
    Ok(())
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!("failed to install the Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!("failed to install the SIGTERM handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received SIGTERM"),
    }
}
