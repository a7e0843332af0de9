//! qlens - query and lay out a Quranic morphology corpus from the command line.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use quranic_lens::engine::scope_flows_to_sura;
use quranic_lens::layout::{
    collocation_radial_layout, radial_ayah_layout, sankey_layout, seed_collocation_graph,
    CollocationLayout, ForceGraph,
};
use quranic_lens::{
    load_config, CollocationOptions, CorpusSnapshot, DistanceUnit, LensConfig, LensError,
    LensResult, PartOfSpeech, QueryEngine, TermKind, TermRef, WindowType,
};

/// Collocation, flow and layout queries over a token JSON file.
#[derive(Parser)]
#[command(name = "qlens", version)]
#[command(about = "Collocation, flow and layout queries over the Quranic Arabic corpus")]
struct Cli {
    /// Token JSON file (array of token records)
    #[arg(short, long, global = true, default_value = "tokens.json")]
    corpus: PathBuf,

    /// Config file; defaults to ./qlens.toml, then the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distinct roots in collation order
    Roots,

    /// Root → lemma flows
    Flows {
        /// Restrict to one surah
        #[arg(long)]
        sura: Option<u32>,

        /// Keep only the first N flows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Collocates of a term, ranked by PMI
    Collocations {
        #[command(flatten)]
        query: QueryArgs,

        /// Keep only the first N results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Window overlap of two terms
    Pair {
        #[arg(long, default_value = "root")]
        kind_a: TermKind,

        #[arg(long)]
        term_a: String,

        #[arg(long, default_value = "root")]
        kind_b: TermKind,

        #[arg(long)]
        term_b: String,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Geometry for the visual views
    Layout {
        #[command(subcommand)]
        view: LayoutView,
    },

    /// blake3 fingerprint of the token snapshot
    Fingerprint,
}

#[derive(Subcommand)]
enum LayoutView {
    /// One spoke per ayah of a surah, roots stacked along each spoke
    Radial {
        #[arg(long)]
        sura: u32,
    },

    /// Collocates placed around the target by PMI
    Collocation {
        #[command(flatten)]
        query: QueryArgs,

        /// Keep only the first N collocates
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Root → lemma bands
    Sankey {
        #[arg(long)]
        sura: Option<u32>,

        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Window flags shared by every windowed query. Unset flags fall back to
/// the `[collocation]` config section.
#[derive(Args)]
struct WindowArgs {
    /// ayah, surah or distance
    #[arg(long)]
    window: Option<WindowType>,

    /// Window radius for distance windows (>= 1)
    #[arg(long)]
    distance: Option<u32>,

    /// ayah or token
    #[arg(long)]
    unit: Option<DistanceUnit>,
}

#[derive(Args)]
struct QueryArgs {
    /// root or lemma
    #[arg(long, default_value = "root")]
    kind: TermKind,

    /// Target term (diacritics are ignored)
    #[arg(long)]
    term: String,

    #[command(flatten)]
    window: WindowArgs,

    #[arg(long)]
    min_frequency: Option<u32>,

    /// Identify collocates by root or lemma
    #[arg(long)]
    group_by: Option<TermKind>,

    /// Comma-separated parts of speech (e.g. Noun,Verb)
    #[arg(long, value_delimiter = ',')]
    pos: Vec<PartOfSpeech>,

    #[arg(long, requires = "pair_term")]
    pair_kind: Option<TermKind>,

    /// Only count windows that also contain this term
    #[arg(long)]
    pair_term: Option<String>,
}

impl WindowArgs {
    fn apply(&self, options: &mut CollocationOptions) {
        if let Some(window) = self.window {
            options.window_type = window;
        }
        if let Some(distance) = self.distance {
            options.distance = distance;
        }
        if let Some(unit) = self.unit {
            options.distance_unit = unit;
        }
    }
}

impl QueryArgs {
    fn target(&self) -> TermRef {
        TermRef::new(self.kind, &self.term)
    }

    fn options(&self, config: &LensConfig) -> CollocationOptions {
        let mut options = config.collocation_options();
        self.window.apply(&mut options);
        if let Some(min) = self.min_frequency {
            options.min_frequency = min;
        }
        if let Some(group_by) = self.group_by {
            options.group_by = group_by;
        }
        if !self.pos.is_empty() {
            options.pos_filter = Some(self.pos.iter().copied().collect());
        }
        if let Some(term) = &self.pair_term {
            let kind = self.pair_kind.unwrap_or(self.kind);
            options.pair_term = Some(TermRef::new(kind, term));
        }
        options
    }
}

/// Ring layout plus the force graph seeded from it.
#[derive(Serialize)]
struct CollocationView {
    layout: CollocationLayout,
    graph: ForceGraph,
}

#[derive(Serialize)]
struct FingerprintView {
    fingerprint: String,
    tokens: usize,
    suras: usize,
    ayahs: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("qlens: {e}");
            if e.is_configuration() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> LensResult<()> {
    let config = load_config(cli.config.as_deref())?;
    let snapshot = CorpusSnapshot::load_json(&cli.corpus)?;
    let engine = QueryEngine::new();

    match &cli.command {
        Commands::Roots => emit(cli, &engine.unique_roots(&snapshot)),

        Commands::Flows { sura, limit } => {
            let mut flows = engine.root_word_flows(&snapshot, *sura);
            truncate(&mut flows, *limit);
            emit(cli, &flows)
        }

        Commands::Collocations { query, limit } => {
            let options = query.options(&config);
            let mut results = engine.collocations(&snapshot, &query.target(), &options)?;
            truncate(&mut results, *limit);
            emit(cli, &results)
        }

        Commands::Pair {
            kind_a,
            term_a,
            kind_b,
            term_b,
            window,
        } => {
            let mut options = config.collocation_options();
            window.apply(&mut options);
            let pair = engine.pair_cooccurrence(
                &snapshot,
                &TermRef::new(*kind_a, term_a),
                &TermRef::new(*kind_b, term_b),
                &options,
            )?;
            emit(cli, &pair)
        }

        Commands::Layout { view } => run_layout(cli, view, &config, &snapshot, &engine),

        Commands::Fingerprint => emit(
            cli,
            &FingerprintView {
                fingerprint: snapshot.fingerprint().to_hex(),
                tokens: snapshot.len(),
                suras: snapshot.windows().sura_count(),
                ayahs: snapshot.windows().ayah_count(),
            },
        ),
    }
}

fn run_layout(
    cli: &Cli,
    view: &LayoutView,
    config: &LensConfig,
    snapshot: &CorpusSnapshot,
    engine: &QueryEngine,
) -> LensResult<()> {
    let geometry = &config.layout;
    geometry.validate()?;

    match view {
        LayoutView::Radial { sura } => {
            if !snapshot.suras().contains(sura) {
                return Err(LensError::config(format!("surah {sura} is not in the corpus")));
            }
            emit(cli, &radial_ayah_layout(snapshot.tokens(), *sura, geometry))
        }

        LayoutView::Collocation { query, limit } => {
            let target = query.target();
            let options = query.options(config);
            let mut results = engine.collocations(snapshot, &target, &options)?;
            truncate(&mut results, *limit);
            let layout = collocation_radial_layout(&target, &results, geometry);
            let graph = seed_collocation_graph(&layout);
            emit(cli, &CollocationView { layout, graph })
        }

        LayoutView::Sankey { sura, limit } => {
            let mut flows = engine.root_word_flows(snapshot, None);
            if let Some(sura) = sura {
                flows = scope_flows_to_sura(&flows, snapshot.tokens(), *sura);
            }
            truncate(&mut flows, *limit);
            emit(cli, &sankey_layout(&flows, geometry))
        }
    }
}

fn truncate<T>(items: &mut Vec<T>, limit: Option<usize>) {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
}

fn emit<T: Serialize + ?Sized>(cli: &Cli, value: &T) -> LensResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
