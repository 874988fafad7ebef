use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use topic_bus::{BusConfig, EventBus};

/// Command line arguments for the topic bus demo
#[derive(Parser, Debug)]
#[command(author, version, about = "Route topics through an in-process topic bus")]
struct Args {
    /// Pattern to attach a printing handler to (repeatable)
    #[arg(short, long)]
    subscribe: Vec<String>,

    /// Topic to emit, in order (repeatable)
    #[arg(short, long)]
    emit: Vec<String>,

    /// Message delivered with every emission
    #[arg(short, long, default_value = "")]
    message: String,

    /// Pattern used to query the history afterwards
    #[arg(long, default_value = "#")]
    history: String,

    /// History capacity, overrides TOPIC_BUS_HISTORY_CAPACITY
    #[arg(short, long)]
    capacity: Option<usize>,
}

fn main() -> Result<()> {
    // Initialize tracing (for logging)
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = BusConfig::try_from_env().context("invalid bus configuration")?;
    if let Some(capacity) = args.capacity {
        config = config.with_history_capacity(capacity);
    }

    let bus: EventBus<String> = EventBus::with_config(config)?;

    for pattern in &args.subscribe {
        let name = pattern.clone();
        bus.subscribe(pattern, move |message, meta| {
            println!("[{}] {} <- {} {:?}", meta.sequence, name, meta.topic, message);
            Ok(())
        });
    }

    for topic in &args.emit {
        let delivered = bus
            .emit(topic, args.message.clone())
            .with_context(|| format!("emitting '{}'", topic))?;
        info!(%topic, delivered, "Emitted");
    }

    let history = bus.history(&args.history);
    println!("{}", serde_json::to_string_pretty(&history)?);

    Ok(())
}
