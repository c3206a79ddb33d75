//! Fetch every requested series and write a single calendar.

use anyhow::{Context, Result};
use inspire_core::ics::{self, OutputStyle};
use inspire_core::{CalendarEvent, Scope, SeminarQuery};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::client::SeminarSource;
use crate::config::Config;
use crate::Cli;

pub const DALITZ_SERIES: &str = "Oxford Dalitz Seminar in Fundamental Physics";
pub const TPP_SERIES: &str = "Oxford Theoretical Particle Physics seminar";

pub const DEFAULT_OUTPUT: &str = "inspire.ics";

/// Where the calendar goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
}

impl Output {
    /// `-` means stdout
    pub fn from_path(path: PathBuf) -> Self {
        if path == Path::new("-") {
            Output::Stdout
        } else {
            Output::File(path)
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::File(path) => write!(f, "{}", path.display()),
            Output::Stdout => write!(f, "<stdout>"),
        }
    }
}

/// Everything a run needs, resolved once from flags and config.toml.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub series: Vec<String>,
    pub scope: Scope,
    pub output: Output,
    pub style: OutputStyle,
    pub api_url: String,
    pub quiet: bool,
}

impl ExportConfig {
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let output = cli
            .output
            .clone()
            .or_else(|| config.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let style = if cli.rfc5545 {
            OutputStyle::Rfc5545
        } else {
            OutputStyle::Plain
        };

        Ok(ExportConfig {
            series: expand_series(cli, &config.shortcuts)?,
            scope: Scope::from_all_flag(cli.all),
            output: Output::from_path(output),
            style,
            api_url: config.api_url.clone(),
            quiet: cli.quiet,
        })
    }

    /// Progress goes to stderr when the calendar itself is on stdout
    fn report(&self, line: &str) {
        if self.quiet {
            return;
        }
        match self.output {
            Output::Stdout => eprintln!("{}", line),
            Output::File(_) => println!("{}", line),
        }
    }
}

/// Positional names, then --dalitz, then --tpp, then each --series-alias.
/// Duplicates are kept.
pub fn expand_series(cli: &Cli, shortcuts: &BTreeMap<String, String>) -> Result<Vec<String>> {
    let mut series = cli.series.clone();

    if cli.dalitz {
        series.push(DALITZ_SERIES.to_string());
    }
    if cli.tpp {
        series.push(TPP_SERIES.to_string());
    }

    for alias in &cli.aliases {
        match shortcuts.get(alias) {
            Some(name) => series.push(name.clone()),
            None => {
                let available: Vec<_> = shortcuts.keys().cloned().collect();
                anyhow::bail!(
                    "Unknown series alias '{}'. Available: {}",
                    alias,
                    if available.is_empty() {
                        "(none configured)".to_string()
                    } else {
                        available.join(", ")
                    }
                );
            }
        }
    }

    Ok(series)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output: Output,
    pub events: usize,
}

/// Fetch all series in order, then write the calendar.
///
/// Nothing is written unless every fetch and every record conversion succeeds.
pub fn run(config: &ExportConfig, source: &dyn SeminarSource) -> Result<ExportSummary> {
    let queries = config
        .series
        .iter()
        .map(|name| SeminarQuery::new(name.as_str(), config.scope))
        .collect::<Result<Vec<_>, _>>()?;

    let mut hits = Vec::new();
    for query in &queries {
        let records = source.fetch(query, &|url| {
            config.report(&format!("Fetched url = {}", url));
        })?;
        hits.extend(records);
    }

    let events = hits
        .iter()
        .map(|hit| {
            CalendarEvent::from_record(hit)
                .with_context(|| format!("Failed to convert seminar {}", hit.id))
        })
        .collect::<Result<Vec<_>>>()?;

    match &config.output {
        Output::File(path) => ics::write_calendar_file(path, &events, config.style)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        Output::Stdout => {
            let stdout = std::io::stdout();
            ics::write_calendar(&mut stdout.lock(), &events, config.style)
                .context("Failed to write calendar to stdout")?;
        }
    }

    let summary = ExportSummary {
        output: config.output.clone(),
        events: events.len(),
    };
    config.report(&format!(
        "Created {} with {} seminars",
        summary.output, summary.events
    ));

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use inspire_core::SeminarRecord;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use url::Url;

    /// In-memory source keyed by series name
    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<String, Vec<SeminarRecord>>,
        fail_on: Option<String>,
        seen: RefCell<Vec<(String, Scope)>>,
    }

    impl FakeSource {
        fn with(mut self, series: &str, ids: &[&str]) -> Self {
            self.pages
                .insert(series.to_string(), ids.iter().map(|id| make_record(id)).collect());
            self
        }
    }

    impl SeminarSource for FakeSource {
        fn fetch(&self, query: &SeminarQuery, on_url: &dyn Fn(&Url)) -> Result<Vec<SeminarRecord>> {
            self.seen
                .borrow_mut()
                .push((query.series().to_string(), query.scope()));
            on_url(&query.url("https://inspirehep.net/api/seminars")?);
            if self.fail_on.as_deref() == Some(query.series()) {
                anyhow::bail!("HTTP 503 Service Unavailable");
            }
            Ok(self.pages.get(query.series()).cloned().unwrap_or_default())
        }
    }

    fn make_record(id: &str) -> SeminarRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "metadata": {
                "start_datetime": "2024-03-05T14:00:00.000000",
                "end_datetime": "2024-03-05T15:00:00.000000",
                "title": {"title": format!("Talk {}", id)},
                "speakers": [{"name": "Salam, Gavin"}],
                "inspire_categories": [{"term": "Theory-HEP"}]
            }
        }))
        .unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("inspire-seminars-to-ics").chain(args.iter().copied()))
            .unwrap()
    }

    fn export_config(series: &[&str], output: Output) -> ExportConfig {
        ExportConfig {
            series: series.iter().map(|s| s.to_string()).collect(),
            scope: Scope::Upcoming,
            output,
            style: OutputStyle::Plain,
            api_url: "https://inspirehep.net/api/seminars".to_string(),
            quiet: true,
        }
    }

    fn uids(ics: &str) -> Vec<&str> {
        ics.lines().filter_map(|l| l.strip_prefix("UID:")).collect()
    }

    #[test]
    fn test_shortcuts_append_fixed_names() {
        let cli = parse(&["Series A", "--tpp", "--dalitz", "Series B"]);
        let series = expand_series(&cli, &BTreeMap::new()).unwrap();
        assert_eq!(
            series,
            vec!["Series A", "Series B", DALITZ_SERIES, TPP_SERIES]
        );
    }

    #[test]
    fn test_shortcut_duplicates_are_kept() {
        let cli = parse(&[TPP_SERIES, "--tpp"]);
        let series = expand_series(&cli, &BTreeMap::new()).unwrap();
        assert_eq!(series, vec![TPP_SERIES, TPP_SERIES]);
    }

    #[test]
    fn test_configured_aliases() {
        let mut shortcuts = BTreeMap::new();
        shortcuts.insert("cosmo".to_string(), "Oxford Cosmology Seminar".to_string());

        let cli = parse(&["--series-alias", "cosmo", "--dalitz"]);
        let series = expand_series(&cli, &shortcuts).unwrap();
        assert_eq!(series, vec![DALITZ_SERIES, "Oxford Cosmology Seminar"]);

        let cli = parse(&["--series-alias", "astro"]);
        let err = expand_series(&cli, &shortcuts).unwrap_err();
        assert!(err.to_string().contains("Unknown series alias 'astro'"));
        assert!(err.to_string().contains("cosmo"));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = ExportConfig::resolve(&parse(&[]), &Config::default()).unwrap();

        assert!(config.series.is_empty());
        assert_eq!(config.scope, Scope::Upcoming);
        assert_eq!(config.output, Output::File(PathBuf::from("inspire.ics")));
        assert_eq!(config.style, OutputStyle::Plain);
        assert!(!config.quiet);
    }

    #[test]
    fn test_resolve_flags_override_config() {
        let file_config = Config {
            output: Some(PathBuf::from("from-config.ics")),
            ..Config::default()
        };

        let config = ExportConfig::resolve(&parse(&["--all", "-q", "--rfc5545"]), &file_config).unwrap();
        assert_eq!(config.scope, Scope::All);
        assert_eq!(config.output, Output::File(PathBuf::from("from-config.ics")));
        assert_eq!(config.style, OutputStyle::Rfc5545);
        assert!(config.quiet);

        let config = ExportConfig::resolve(&parse(&["-o", "-"]), &file_config).unwrap();
        assert_eq!(config.output, Output::Stdout);
    }

    #[test]
    fn test_run_without_series_writes_empty_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspire.ics");
        let config = export_config(&[], Output::File(path.clone()));

        let summary = run(&config, &FakeSource::default()).unwrap();

        assert_eq!(summary.events, 0);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "BEGIN:VCALENDAR\nVERSION:2.0\nCALSCALE:GREGORIAN\nPRODID:inspirehep/seminars\nEND:VCALENDAR\n"
        );
    }

    #[test]
    fn test_run_concatenates_series_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspire.ics");
        let source = FakeSource::default()
            .with("Series A", &["3", "1"])
            .with("Series B", &["1", "2"]);
        let mut config = export_config(&["Series A", "Series B"], Output::File(path.clone()));
        config.scope = Scope::All;

        let summary = run(&config, &source).unwrap();

        assert_eq!(summary.events, 4);
        assert_eq!(
            *source.seen.borrow(),
            vec![
                ("Series A".to_string(), Scope::All),
                ("Series B".to_string(), Scope::All)
            ]
        );

        let ics = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            uids(&ics),
            vec![
                "inspirehep-seminar-3",
                "inspirehep-seminar-1",
                "inspirehep-seminar-1",
                "inspirehep-seminar-2"
            ]
        );
        assert!(ics.contains("SUMMARY:Gavin Salam \u{2014} Talk 3\n"));
    }

    #[test]
    fn test_failed_fetch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspire.ics");
        let source = FakeSource {
            fail_on: Some("Series B".to_string()),
            ..FakeSource::default()
        }
        .with("Series A", &["1"]);
        let config = export_config(&["Series A", "Series B", "Series C"], Output::File(path.clone()));

        let err = run(&config, &source).unwrap_err();

        assert!(err.to_string().contains("HTTP 503"));
        assert!(!path.exists());
        assert_eq!(source.seen.borrow().len(), 2, "no fetch after the failure");
    }

    #[test]
    fn test_invalid_name_fails_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspire.ics");
        let source = FakeSource::default();
        let config = export_config(&["Series A", "Bad \"quoted\" name"], Output::File(path.clone()));

        assert!(run(&config, &source).is_err());
        assert!(source.seen.borrow().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_bad_timestamp_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspire.ics");
        let mut record = make_record("5");
        record.metadata.start_datetime = "not a date".to_string();

        let mut source = FakeSource::default();
        source.pages.insert("Series A".to_string(), vec![record]);
        let config = export_config(&["Series A"], Output::File(path.clone()));

        let err = run(&config, &source).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to convert seminar 5"));
        assert!(!path.exists());
    }
}
