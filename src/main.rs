use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use panchanga_client::config::Config;
use panchanga_client::geo::EnvPositionSource;
use panchanga_client::models::Lang;
use panchanga_client::session::Session;
use panchanga_client::view::{Screen, VisualState};

/// Look up the panchanga for an event and render the results.
#[derive(Parser, Debug)]
#[command(name = "panchanga", version, about)]
struct Cli {
    /// Event title
    #[arg(long)]
    title: String,

    /// Calendar date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Local clock time (HH:MM); defaults to now
    #[arg(long)]
    time: Option<String>,

    /// Place name or a "lat, lon" pair
    #[arg(long)]
    location: Option<String>,

    /// Display language for the fact cards
    #[arg(long, value_enum, default_value_t = Lang::En)]
    lang: Lang,

    /// Fill the location from the platform position API
    #[arg(long)]
    use_device_location: bool,

    /// Also export the 20-year iCal download
    #[arg(long)]
    ical: bool,

    /// Submit the insights handoff after rendering
    #[arg(long)]
    insights: bool,
}

/// Main entry point for the client.
///
/// Initializes tracing and configuration, fills the form from the command
/// line, runs the submission pipeline, and presents the resulting screen.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panchanga_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut session = Session::from_config(&config).map_err(anyhow::Error::from)?;

    session.form.title = cli.title;
    if let Some(date) = cli.date {
        session.form.date = date;
    }
    if let Some(time) = cli.time {
        session.form.time = time;
    }
    if let Some(location) = cli.location {
        session.form.location = location;
    }
    session.form.lang = cli.lang;

    if cli.use_device_location {
        session.acquire_location(&EnvPositionSource);
    }

    session.submit().await;

    if cli.ical {
        if let Some(path) = session.export_ical(&config.download_dir).await {
            println!("Saved {}", path.display());
        }
    }

    present(&mut session.screen);

    if cli.insights {
        match session.handoff().await {
            Ok(_) => tracing::info!("Insights handoff submitted"),
            Err(e) => tracing::error!("Insights handoff failed: {}", e),
        }
    }

    Ok(())
}

/// Thin presentation adapter: renders the screen view-models as text.
fn present(screen: &mut Screen) {
    for alert in screen.alerts.drain(..) {
        eprintln!("! {}", alert);
    }

    if screen.result.visible {
        screen.result.focus_requested = false;
        println!();
        println!("=== {} ===", screen.result.heading);
        let fields = &screen.result.fields;
        println!("{:<15}{}", "Location", fields.location);
        println!("{:<15}{}", "Samvatsara", fields.samvatsara);
        println!("{:<15}{}", "Saka year", fields.saka_year);
        println!("{:<15}{}", "Masa", fields.masa);
        println!("{:<15}{}", "Paksha", fields.paksha);
        println!("{:<15}{}", "Tithi", fields.tithi);
        println!("{:<15}{}", "Vara", fields.vara);
        println!("{:<15}{}", "Nakshatra", fields.nakshatra);
        println!("{:<15}{}", "Yoga", fields.yoga);
        println!("{:<15}{}", "Karana", fields.karana);
        println!("{:<15}{}", "Rashi", fields.rashi);
        println!("{:<15}{}", "Lagna", fields.lagna);
        println!("{:<15}{}", "Sunrise", fields.sunrise);
        println!("{:<15}{}", "Sunset", fields.sunset);
        println!("{:<15}{}", "Next birthday", fields.next_birthday);
    }

    if screen.facts.visible {
        if let Some(cards) = &screen.facts.cards {
            println!();
            println!("--- Cosmic facts ---");
            println!("{:<15}{}", "Sun sign", cards.sun_sign);
            println!("{:<15}{}", "Moon sign", cards.moon_sign);
            println!("{:<15}{}", "Moon phase", cards.moon_phase);
            println!("{:<15}{}", "Ayanamsha", cards.ayanamsha);
        }
    }

    present_visual(&screen.skyshot.state, "Skyshot");
    present_visual(&screen.solar_system.state, "Solar system");
}

fn present_visual(state: &VisualState, label: &str) {
    match state {
        VisualState::Loaded(content) => {
            println!();
            println!("--- {}: {} ---", label, content.title);
            if let Some(caption) = &content.caption {
                println!("{}", caption);
            }
            println!("[image: {} bytes]", content.image.len());
        }
        VisualState::Hidden => {}
        VisualState::Loading => {
            // Terminal presentation happens after the pipeline settles
            tracing::debug!("{} still loading at present time", label);
        }
    }
}
