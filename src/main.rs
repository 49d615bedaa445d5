use clap::Parser;
use order_monitor::config::MonitorConfig;
use order_monitor::lifecycle::{setup_tracing, MonitorSystem};
use order_monitor::model::{Line, OrderCreate, OrderUpdate, TableId};
use order_monitor::notify::LogNotifier;
use std::path::PathBuf;
use tracing::{info, Instrument};

/// Simulates a kiosk customer editing a floating order while the monitor watches.
#[derive(Debug, Parser)]
#[command(name = "order-monitor", version, about = "Floating order change monitor demo")]
struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "ORDER_MONITOR_CONFIG_FILE", value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Number of edits the simulated customer makes.
    #[arg(long, default_value_t = 3)]
    rounds: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    let args = CliArgs::parse();

    let config = MonitorConfig::load(args.config_file.as_deref())?;
    info!(?config, "Starting order monitor");

    let system = MonitorSystem::start(&config, LogNotifier);

    let order_id = system
        .store
        .insert(
            OrderCreate::floating("Kiosk 7")
                .with_line(Line::new("Burger", 1.0, 9.5))
                .with_line(Line::new("Fries", 1.0, 3.5)),
        )
        .await?;
    system.monitor.signal_changed();

    for round in 1..=args.rounds {
        let span = tracing::info_span!("customer_edit", round);
        async {
            tokio::time::sleep(config.poll_interval()).await;
            system
                .store
                .update(
                    order_id,
                    OrderUpdate::SetQuantity {
                        index: 0,
                        qty: f64::from(round + 1),
                    },
                )
                .await?;
            system
                .store
                .update(order_id, OrderUpdate::RecomputeTotal)
                .await?;
            info!(%order_id, "Customer changed the order");
            system.monitor.signal_changed();
            Ok::<_, Box<dyn std::error::Error>>(())
        }
        .instrument(span)
        .await?;
    }

    // A kiosk order seated at a table, with two dishes not yet printed.
    let table = TableId(4);
    system
        .store
        .insert(
            OrderCreate::at_table(table, "Self-Order 0002")
                .with_line(Line::new("Salad", 1.0, 8.0))
                .with_pending_kitchen_changes(2),
        )
        .await?;
    let changes = system.monitor.table_changes(table).await?;
    info!(%table, changes = changes.changes, "Table change count");

    tokio::time::sleep(config.poll_interval()).await;
    system.shutdown().await?;
    Ok(())
}
