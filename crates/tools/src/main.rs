use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use foundation::time::format_input_date;
use runtime::{PlayOutcome, TickOutcome};
use scene::FireWorld;
use scene::record::Containment;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::{FireMap, MapData, ViewerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "California wildfire map: dataset summary, SVG snapshots, headless playback")]
struct Args {
    /// JSON viewer config; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fire dataset path (overrides the config and FIREMAP_FIRES)
    #[arg(long)]
    fires: Option<String>,

    /// TopoJSON boundary path (overrides the config and FIREMAP_TOPOLOGY)
    #[arg(long)]
    topology: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the day range, causes and record counts
    Summary,

    /// Write a static SVG snapshot of one day, legends included
    Render {
        /// Day to show, YYYY-MM-DD (default: first day)
        #[arg(long)]
        date: Option<String>,

        /// Active cause; repeat for several (default: every cause)
        #[arg(long = "cause")]
        causes: Vec<String>,

        /// Case-insensitive fire name filter
        #[arg(long, default_value = "")]
        search: String,

        /// Output file
        #[arg(short, long, default_value = "firemap.svg")]
        out: PathBuf,
    },

    /// Run the playback animation headless, one line per tick
    Play {
        /// Start day, YYYY-MM-DD (default: first day)
        #[arg(long)]
        from: Option<String>,

        /// Wait the configured tick period between ticks
        #[arg(long)]
        realtime: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let data = load_data(&config)?;
    let mut map = FireMap::new(data, config);

    match args.command {
        Command::Summary => print!("{}", DatasetSummary::of(&map.data().world)),
        Command::Render {
            date,
            causes,
            search,
            out,
        } => render(&mut map, date.as_deref(), &causes, &search, &out)?,
        Command::Play { from, realtime } => play(&mut map, from.as_deref(), realtime)?,
    }
    Ok(())
}

/// Config file, then `FIREMAP_*` variables, then command-line flags.
fn load_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            ViewerConfig::from_json_str(&json)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => ViewerConfig::default(),
    };
    config.apply_env_overrides(|key| env::var(key).ok());
    if let Some(fires) = &args.fires {
        config.fires = fires.clone();
    }
    if let Some(topology) = &args.topology {
        config.topology = topology.clone();
    }
    Ok(config)
}

fn read_source(location: &str) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        bail!("{location} is a URL; download it and pass a local path");
    }
    fs::read_to_string(location).with_context(|| format!("read {location}"))
}

fn load_data(config: &ViewerConfig) -> Result<MapData> {
    let fires = read_source(&config.fires)?;
    let topology = read_source(&config.topology)?;
    let data = MapData::from_json(&fires, &topology, config).context("load map data")?;
    info!(
        records = data.world.len(),
        days = data.world.days().len(),
        "map data loaded"
    );
    Ok(data)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DatasetSummary {
    records: usize,
    first_day: Option<String>,
    last_day: Option<String>,
    days: usize,
    /// Records that can appear on some day.
    drawable: usize,
    unparseable_containment: usize,
    /// `(cause, record count)`, sorted by cause.
    causes: Vec<(String, usize)>,
    without_cause: usize,
}

impl DatasetSummary {
    fn of(world: &FireWorld) -> Self {
        let days = world.days();
        let mut summary = Self {
            records: world.len(),
            first_day: days.first().map(format_input_date),
            last_day: days.last().map(format_input_date),
            days: days.len(),
            causes: world.causes().iter().map(|c| (c.clone(), 0)).collect(),
            ..Self::default()
        };

        for (fire, record) in world.iter() {
            match world.cause_of(fire) {
                Some(cause) => {
                    if let Some((_, count)) = summary.causes.get_mut(cause.index() as usize) {
                        *count += 1;
                    }
                }
                None => summary.without_cause += 1,
            }
            if record.containment == Containment::Unparseable {
                summary.unparseable_containment += 1;
            }
            if record.active_span().is_some()
                && record.has_finite_measurements()
                && record.cause.is_some()
            {
                summary.drawable += 1;
            }
        }
        summary
    }
}

impl std::fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "records: {}", self.records)?;
        writeln!(f, "drawable: {}", self.drawable)?;
        if self.unparseable_containment > 0 {
            writeln!(f, "unparseable containment: {}", self.unparseable_containment)?;
        }
        if let (Some(first), Some(last)) = (&self.first_day, &self.last_day) {
            writeln!(f, "days: {} ({first} .. {last})", self.days)?;
        }
        writeln!(f, "causes:")?;
        for (cause, count) in &self.causes {
            writeln!(f, "  {cause}: {count}")?;
        }
        if self.without_cause > 0 {
            writeln!(f, "  (none): {}", self.without_cause)?;
        }
        Ok(())
    }
}

/// Applies the filters, then writes the current screen as SVG.
fn render(
    map: &mut FireMap,
    date: Option<&str>,
    causes: &[String],
    search: &str,
    out: &Path,
) -> Result<()> {
    if let Some(date) = date
        && map.pick_date(date).is_none()
    {
        bail!("{date} is outside the dataset's day range");
    }
    if !causes.is_empty() {
        let known = map.data().world.causes().to_vec();
        for name in &known {
            map.set_cause_active(name, false);
        }
        for name in causes {
            if map.set_cause_active(name, true).is_none() {
                bail!("unknown cause {name:?}; known causes: {}", known.join(", "));
            }
        }
    }
    let update = map.set_search(search);

    fs::write(out, map.render_svg()).with_context(|| format!("write {}", out.display()))?;
    println!(
        "{}: {} fires -> {}",
        update.heading,
        update.visible,
        out.display()
    );
    Ok(())
}

fn play(map: &mut FireMap, from: Option<&str>, realtime: bool) -> Result<()> {
    let start = match from {
        Some(date) => map
            .pick_date(date)
            .with_context(|| format!("{date} is outside the dataset's day range"))?,
        None => map.update(),
    };
    println!("{}: {} visible", start.heading, start.visible);

    if map.play() != PlayOutcome::Started {
        println!("already at the last day");
        return Ok(());
    }

    let period = map.tick_period();
    loop {
        if realtime {
            thread::sleep(period);
        }
        match map.tick() {
            (TickOutcome::Advanced(_), Some(update)) => println!(
                "{}: +{} -{} ({} visible)",
                update.heading,
                update.diff.added.len(),
                update.diff.removed.len(),
                update.visible
            ),
            (TickOutcome::Finished, _) => {
                info!("playback finished");
                break;
            }
            (TickOutcome::Advanced(_), None) | (TickOutcome::Idle, _) => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Args, Command, DatasetSummary, read_source};
    use clap::Parser;
    use scene::FireWorld;
    use scene::record::{Containment, FireRecord};

    fn record(name: &str, day: u32, cause: Option<&str>) -> FireRecord {
        let discovered = chrono::NaiveDate::from_ymd_opt(2020, 8, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        FireRecord {
            name: Some(name.to_string()),
            latitude: 37.0,
            longitude: -120.0,
            size_acres: 10.0,
            discovered: Some(discovered),
            containment: Containment::Uncontained,
            duration_days: 1.0,
            cause: cause.map(str::to_string),
            source_id: None,
        }
    }

    #[test]
    fn summary_counts_records() {
        let mut broken = record("Broken", 2, Some("Human"));
        broken.containment = Containment::Unparseable;
        let world = FireWorld::new(vec![
            record("A", 1, Some("Natural")),
            record("B", 3, Some("Human")),
            record("C", 3, None),
            broken,
        ]);

        let summary = DatasetSummary::of(&world);
        assert_eq!(summary.records, 4);
        assert_eq!(summary.drawable, 2);
        assert_eq!(summary.unparseable_containment, 1);
        assert_eq!(summary.without_cause, 1);
        assert_eq!(summary.days, 3);
        assert_eq!(summary.first_day.as_deref(), Some("2020-08-01"));
        assert_eq!(
            summary.causes,
            vec![("Human".to_string(), 2), ("Natural".to_string(), 1)]
        );

        let text = summary.to_string();
        assert!(text.contains("days: 3 (2020-08-01 .. 2020-08-03)"));
        assert!(text.contains("  (none): 1"));
    }

    #[test]
    fn parses_render_flags() {
        let args = Args::try_parse_from([
            "firemap", "--fires", "fires.json", "render", "--date", "2020-08-02", "--cause",
            "Human", "--cause", "Natural", "-o", "out.svg",
        ])
        .unwrap();
        assert_eq!(args.fires.as_deref(), Some("fires.json"));
        match args.command {
            Command::Render {
                date, causes, out, search,
            } => {
                assert_eq!(date.as_deref(), Some("2020-08-02"));
                assert_eq!(causes, vec!["Human", "Natural"]);
                assert_eq!(out.to_str(), Some("out.svg"));
                assert_eq!(search, "");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn urls_are_not_read_from_disk() {
        let err = read_source("https://example.com/fires.json").unwrap_err();
        assert!(err.to_string().contains("is a URL"));
    }
}
