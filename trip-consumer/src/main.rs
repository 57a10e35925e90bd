//! Consume envelope-wrapped trip events and persist their plan records.
use envconfig::Envconfig;
use tokio::signal;

use trip_common::metrics::{serve, setup_metrics_router};
use trip_consumer::config::Config;
use trip_consumer::consumer::TripConsumer;
use trip_consumer::dispatch::default_registry;
use trip_consumer::error::ConsumerError;
use trip_consumer::kafka::Subscription;
use trip_consumer::sink::{PostgresSink, PrintSink, RecordSink};

async fn shutdown() {
    let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("failed to register SIGTERM handler");

    let mut interrupt = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .expect("failed to register SIGINT handler");

    tokio::select! {
        _ = term.recv() => {},
        _ = interrupt.recv() => {},
    };

    tracing::info!("shutting down consumer");
}

#[tokio::main]
async fn main() -> Result<(), ConsumerError> {
    tracing_subscriber::fmt::init();

    let config = Config::init_from_env().expect("failed to load configuration from env");

    let sink: Box<dyn RecordSink> = if config.print_sink {
        Box::new(PrintSink {})
    } else {
        Box::new(
            PostgresSink::new(&config.database_url, config.max_pg_connections)
                .await
                .expect("failed to connect to database"),
        )
    };

    let subscription = Subscription::new(&config.kafka).expect("failed to subscribe to topic");

    let consumer = TripConsumer::new(subscription, default_registry(), sink);

    let bind = config.bind();
    tokio::task::spawn(async move {
        let router = setup_metrics_router().expect("failed to install metrics recorder");
        serve(router, &bind)
            .await
            .expect("failed to start serving metrics");
    });

    // In-flight work is not drained on shutdown; offsets were already
    // committed on delivery either way.
    tokio::select! {
        result = consumer.run() => result?,
        _ = shutdown() => {},
    }

    Ok(())
}
