use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polysearch::config::FileConfig;
use polysearch::domain::{Coordinate, Theme};
use polysearch::query::ListingAnnotation;
use polysearch::session::{SearchSession, SessionEvent};
use polysearch::store::FeatureStore;

/// Find listings inside a polygon drawn over a map
///
/// Examples:
///   # Search a triangle over downtown Denver
///   polysearch -l denver.geojson -p "39.76,-105.00;39.73,-104.97;39.73,-105.02"
///
///   # Route from a starting point to the first match, using a saved route
///   polysearch -l denver.geojson --polygon-file area.json --start 39.75,-104.99 \
///       --select 0 --route-file route.json
///
///   # Machine-readable output
///   polysearch -l denver.geojson --polygon-file area.json --json
#[derive(Parser, Debug)]
#[command(name = "polysearch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches polysearch.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection of point listings
    #[arg(short = 'l', long)]
    listings: Option<PathBuf>,

    /// Polygon vertices as "lat,lon;lat,lon;..." (open ring, at least 3)
    #[arg(short = 'p', long, allow_hyphen_values = true, conflicts_with = "polygon_file")]
    polygon: Option<String>,

    /// JSON file holding an array of [lon, lat] polygon vertices
    #[arg(long)]
    polygon_file: Option<PathBuf>,

    /// Starting point for routing as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    start: Option<String>,

    /// Position of the matched listing to select
    #[arg(long)]
    select: Option<usize>,

    /// JSON file with the route geometry as an array of [lon, lat]
    #[arg(long, requires = "select")]
    route_file: Option<PathBuf>,

    /// Map theme to report
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    style: &'static str,
    listings: usize,
    dropped: usize,
    matches: &'a [ListingAnnotation],
    boundary: &'a [Coordinate],
    connector: [Coordinate; 2],
    starting_point: Option<Coordinate>,
    route: Option<&'a [Coordinate]>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match args.config {
        Some(ref path) => FileConfig::load_from(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        None => FileConfig::load().unwrap_or_default(),
    };

    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);

    let json = args.json || file_config.json;
    let theme = args.theme.unwrap_or(file_config.theme);
    let Some(listings_path) = args.listings.clone().or(file_config.listings.clone()) else {
        bail!("Must provide --listings/-l or set `listings` in the config file");
    };

    let points = match (&args.polygon, &args.polygon_file) {
        (Some(text), _) => parse_polygon(text)?,
        (None, Some(path)) => read_positions(path)
            .with_context(|| format!("Failed to read polygon file: {:?}", path))?,
        (None, None) => bail!("Must provide --polygon/-p or --polygon-file"),
    };

    let spinner = create_spinner(
        &format!("Loading listings from {}...", listings_path.display()),
        json,
    );
    let start = Instant::now();
    let store = FeatureStore::load_from_path(&listings_path).context("Failed to load listings")?;
    spinner.finish_with_message(format!(
        "{} [{:.2}s]",
        store.report().summary(),
        start.elapsed().as_secs_f32()
    ));
    if verbose {
        for dropped in &store.report().dropped {
            log::debug!("  feature {}: {}", dropped.index, dropped.reason);
        }
    }

    let settings = file_config.session_settings();
    let mut session = SearchSession::new(settings, theme);

    let spinner = create_spinner("Searching...", json);
    let start = Instant::now();
    session.start_search();
    let now = Instant::now();
    let matched = session
        .complete_drawing(points, &store, now)
        .context("Search polygon rejected")?
        .annotations
        .len();
    spinner.finish_with_message(format!(
        "Matched {} of {} listings [{:.3}s]",
        matched,
        store.len(),
        start.elapsed().as_secs_f32()
    ));

    if let Some(ref text) = args.start {
        session.long_press(parse_coordinate(text)?);
    }

    if let Some(position) = args.select {
        let selection = session
            .select_listing(position)
            .context("Failed to select listing")?;

        match (selection.directions, &args.route_file) {
            (Some(request), Some(path)) => {
                let route = read_positions(path)
                    .with_context(|| format!("Failed to read route file: {:?}", path))?;
                session.directions_completed(&request.ticket, Some(route));
                session.confirm_route(now);
            }
            (None, Some(_)) => log::warn!("Ignoring --route-file without --start"),
            _ => {}
        }
    }

    // Let the display delays elapse
    let events = session.tick(now + settings.dismiss_delay.max(settings.route_delay));
    log::debug!("Session events: {:?}", events);

    let Some(search) = session.search() else {
        bail!("Search produced no result");
    };

    if json {
        let report = Report {
            style: theme.style_url(),
            listings: store.len(),
            dropped: store.dropped_count(),
            matches: &search.annotations,
            boundary: &search.result.boundary,
            connector: search.result.connector,
            starting_point: session.overlay().starting_point(),
            route: session.overlay().route_line(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize results")?
        );
        return Ok(());
    }

    println!();
    for (position, annotation) in search.annotations.iter().enumerate() {
        println!(
            "  [{}] {} {} at ({:.5}, {:.5})",
            position,
            annotation.title,
            annotation.subtitle,
            annotation.coordinate.lat,
            annotation.coordinate.lon
        );
    }
    println!();
    println!("Boundary: {} points (closed)", search.result.boundary.len());

    if let Some(start) = session.overlay().starting_point() {
        println!("Starting point: ({:.5}, {:.5})", start.lat, start.lon);
    }
    if events.contains(&SessionEvent::RouteShown)
        && let Some(route) = session.overlay().route_line()
    {
        println!("Route: {} points", route.len());
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Parse "lat,lon"
fn parse_coordinate(text: &str) -> Result<Coordinate> {
    let Some((lat, lon)) = text.split_once(',') else {
        bail!("Expected \"lat,lon\", got {:?}", text);
    };
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("Invalid latitude in {:?}", text))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("Invalid longitude in {:?}", text))?;

    let coordinate = Coordinate::new(lat, lon);
    if !coordinate.is_valid() {
        bail!("Coordinate out of range: {:?}", text);
    }
    Ok(coordinate)
}

/// Parse "lat,lon;lat,lon;..."
fn parse_polygon(text: &str) -> Result<Vec<Coordinate>> {
    text.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_coordinate)
        .collect()
}

/// Read a JSON array of [lon, lat] positions
fn read_positions(path: &Path) -> Result<Vec<Coordinate>> {
    let contents = std::fs::read_to_string(path)?;
    let positions: Vec<[f64; 2]> =
        serde_json::from_str(&contents).context("Expected a JSON array of [lon, lat] pairs")?;
    positions
        .into_iter()
        .enumerate()
        .map(|(index, [lon, lat])| {
            let coordinate = Coordinate::from_lon_lat(lon, lat);
            if !coordinate.is_valid() {
                bail!("Position {} out of range: [{}, {}]", index, lon, lat);
            }
            Ok(coordinate)
        })
        .collect()
}

fn create_spinner(message: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
