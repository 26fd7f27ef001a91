//! Command-line arguments and how they combine with the config file.

use clap::{ArgAction, Args, Parser, Subcommand};
use keyrank_core::KeyrankConfig;
use keyrank_core::pipeline::{GrowthRun, KeywordRun, OutputOptions};
use keyrank_core::storage::{GROWTH_MARKER, KEYWORD_MARKER, OutputFormat};
use keyrank_engine::engine::{
    COMPETITION, DEFAULT_RECENT_COUNT, HeaderMatch, Preset, RowFilter, SEARCH_VOLUME,
};
use std::path::PathBuf;

/// Score, filter and rank keyword spreadsheets exported as CSV.
///
/// Each input file produces one new file next to it, named after the source
/// with a timestamp and a marker. Sources are never modified.
///
/// Examples:
///   keyrank score keywords.csv                 # basic preset, all rows
///   keyrank score --preset weighted --top 100 keywords.csv
///   keyrank score --min-search-volume 8000 --competition-below 3.1 *.csv
///   keyrank growth --recent 3 categories.csv
#[derive(Parser, Debug)]
#[command(name = "keyrank")]
#[command(version)]
#[command(about, long_about)]
pub struct Cli {
    /// Config file (default: keyrank.toml in the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank keywords by search volume, competition and wing ratio
    Score(ScoreArgs),
    /// Rank categories by recent growth across date columns
    Growth(GrowthArgs),
    /// List the built-in scoring presets
    Presets,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Marker appended to output file names
    #[arg(long, value_name = "TEXT")]
    pub marker: Option<String>,

    /// Output format: csv or md
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write outputs here instead of next to each source
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// CSV files to rank
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Weight preset: basic, weighted or plain
    #[arg(short, long)]
    pub preset: Option<Preset>,

    /// Keep only the N best rows (0 keeps everything)
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// Match header spellings literally instead of ignoring whitespace
    #[arg(long)]
    pub exact_headers: bool,

    /// Drop rows whose search volume is below this value
    #[arg(long, value_name = "X")]
    pub min_search_volume: Option<f64>,

    /// Drop rows whose competition is not below this value
    #[arg(long, value_name = "X")]
    pub competition_below: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct GrowthArgs {
    /// CSV files to rank
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Number of newest date columns counted as recent
    #[arg(short, long, value_name = "N")]
    pub recent: Option<usize>,

    /// Keep only the N fastest-growing rows (0 keeps everything)
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// `0` means "no limit".
fn limit(top: Option<usize>) -> Option<usize> {
    top.filter(|n| *n > 0)
}

impl OutputArgs {
    fn options(&self, config: &KeyrankConfig, marker: Option<&String>, default: &str) -> OutputOptions {
        OutputOptions {
            marker: self
                .marker
                .clone()
                .or_else(|| marker.cloned())
                .unwrap_or_else(|| default.to_string()),
            format: self.format.or(config.format).unwrap_or_default(),
            out_dir: self.out_dir.clone(),
        }
    }
}

impl ScoreArgs {
    pub fn to_run(&self, config: &KeyrankConfig) -> KeywordRun {
        let header_match = if self.exact_headers {
            HeaderMatch::Exact
        } else {
            config.header_match.unwrap_or_default()
        };

        let mut filters = config.filters.clone();
        if let Some(min) = self.min_search_volume {
            filters.push(RowFilter::at_least(SEARCH_VOLUME, min));
        }
        if let Some(max) = self.competition_below {
            filters.push(RowFilter::below(COMPETITION, max));
        }

        KeywordRun {
            scoring: config.scoring(self.preset),
            columns: config.keyword_columns(),
            header_match,
            filters,
            top_n: limit(
                self.top
                    .or(config.top_n)
                    .or_else(|| config.preset(self.preset).default_top_n()),
            ),
            output: self
                .output
                .options(config, config.marker.as_ref(), KEYWORD_MARKER),
        }
    }
}

impl GrowthArgs {
    pub fn to_run(&self, config: &KeyrankConfig) -> GrowthRun {
        GrowthRun {
            recent_count: self
                .recent
                .or(config.growth.recent_count)
                .unwrap_or(DEFAULT_RECENT_COUNT),
            top_n: limit(self.top.or(config.growth.top_n)),
            header_match: config.header_match.unwrap_or_default(),
            output: self
                .output
                .options(config, config.growth.marker.as_ref(), GROWTH_MARKER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("keyrank").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_score_flags_build_filters() {
        let cli = parse(&[
            "score",
            "--preset",
            "weighted",
            "--top",
            "50",
            "--min-search-volume",
            "8000",
            "--competition-below",
            "3.1",
            "a.csv",
            "b.csv",
        ]);
        let Command::Score(args) = cli.command else {
            panic!("expected score");
        };
        assert_eq!(args.files.len(), 2);
        let run = args.to_run(&KeyrankConfig::default());
        assert_eq!(run.scoring, Preset::Weighted.config());
        assert_eq!(run.top_n, Some(50));
        assert_eq!(
            run.filters,
            vec![
                RowFilter::at_least(SEARCH_VOLUME, 8000.0),
                RowFilter::below(COMPETITION, 3.1)
            ]
        );
        assert_eq!(run.output.marker, KEYWORD_MARKER);
    }

    #[test]
    fn test_top_zero_means_unlimited() {
        let Command::Score(args) = parse(&["score", "-n", "0", "a.csv"]).command else {
            panic!("expected score");
        };
        let config = KeyrankConfig {
            top_n: Some(10),
            ..KeyrankConfig::default()
        };
        assert_eq!(args.to_run(&config).top_n, None);
    }

    #[test]
    fn test_weighted_preset_defaults_to_top_hundred() {
        let run_for = |args: &[&str], config: &KeyrankConfig| {
            let Command::Score(args) = parse(args).command else {
                panic!("expected score");
            };
            args.to_run(config).top_n
        };
        let none = KeyrankConfig::default();
        assert_eq!(run_for(&["score", "-p", "weighted", "a.csv"], &none), Some(100));
        assert_eq!(run_for(&["score", "-p", "weighted", "-n", "0", "a.csv"], &none), None);
        assert_eq!(run_for(&["score", "-p", "weighted", "-n", "7", "a.csv"], &none), Some(7));
        assert_eq!(run_for(&["score", "a.csv"], &none), None);

        let config = KeyrankConfig {
            preset: Some(Preset::Weighted),
            ..KeyrankConfig::default()
        };
        assert_eq!(run_for(&["score", "a.csv"], &config), Some(100));
        let config = KeyrankConfig {
            top_n: Some(20),
            ..config
        };
        assert_eq!(run_for(&["score", "a.csv"], &config), Some(20));
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let Command::Score(args) = parse(&["score", "a.csv"]).command else {
            panic!("expected score");
        };
        let config = KeyrankConfig {
            top_n: Some(10),
            marker: Some("picked".to_string()),
            format: Some(OutputFormat::Markdown),
            ..KeyrankConfig::default()
        };
        let run = args.to_run(&config);
        assert_eq!(run.top_n, Some(10));
        assert_eq!(run.output.marker, "picked");
        assert_eq!(run.output.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_growth_defaults() {
        let Command::Growth(args) = parse(&["growth", "--format", "md", "c.csv"]).command else {
            panic!("expected growth");
        };
        let run = args.to_run(&KeyrankConfig::default());
        assert_eq!(run.recent_count, DEFAULT_RECENT_COUNT);
        assert_eq!(run.output.marker, GROWTH_MARKER);
        assert_eq!(run.output.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_rejects_unknown_preset() {
        assert!(Cli::try_parse_from(["keyrank", "score", "--preset", "fancy", "a.csv"]).is_err());
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["keyrank", "score"]).is_err());
    }
}
