use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use folio::backend::{self, BackendKind};
use folio::build::BuildOptions;
use folio::corpus::find_source;
use folio::{logging, Config, Corpus, SearchEngine};

mod cli;
use cli::{display, export, Cli, Commands, ExportFormat, SearchArgs};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level, cli.log_json);
    let config = cli.config();

    let result = match cli.command {
        Commands::Build {
            force,
            corpus,
            batch_size,
        } => run_build(&config, corpus, batch_size, force),
        Commands::Search {
            query,
            options,
            export,
            output,
        } => run_search(&config, &query.join(" "), &options, export, output),
        Commands::Shell { options } => run_shell(&config, &options),
        Commands::Stats { backend } => run_stats(&config, backend),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run_build(
    config: &Config,
    corpus: Option<PathBuf>,
    batch_size: usize,
    force: bool,
) -> folio::Result<()> {
    let target = config.index_path();
    let options = BuildOptions { batch_size };

    if target.exists() && !force {
        display::print_existing_index(&target);
        return Ok(());
    }

    let source = match corpus {
        Some(path) => path,
        None => find_source(&config.corpus_candidates())?,
    };
    let corpus = Corpus::load(&source)?;
    let report = build(&target, &corpus, &options)?;
    display::print_build_report(&target, &report);
    Ok(())
}

#[cfg(feature = "parallel")]
fn build(
    target: &std::path::Path,
    corpus: &Corpus,
    options: &BuildOptions,
) -> folio::Result<folio::BuildReport> {
    use indicatif::ProgressBar;

    let progress = ProgressBar::new(corpus.len() as u64);
    progress.set_style(folio::build::progress_style());
    progress.set_prefix("Indexing");
    folio::build::build_index_with_progress(target, corpus, options, &progress)
}

#[cfg(not(feature = "parallel"))]
fn build(
    target: &std::path::Path,
    corpus: &Corpus,
    options: &BuildOptions,
) -> folio::Result<folio::BuildReport> {
    folio::build::build_index(target, corpus, options)
}

fn open_engine(config: &Config, options: &SearchArgs) -> folio::Result<SearchEngine> {
    let backend = backend::open(options.backend, config, options.scan_options())?;
    Ok(SearchEngine::new(backend))
}

fn run_search(
    config: &Config,
    query: &str,
    options: &SearchArgs,
    export: Option<ExportFormat>,
    output: Option<PathBuf>,
) -> folio::Result<()> {
    let engine = open_engine(config, options)?;

    let Some(format) = export else {
        let response = engine.search(&options.request(query))?;
        display::print_results(&response);
        return Ok(());
    };

    let response = engine.search(&options.export_request(query))?;
    match output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(&path)?);
            export::write(format, &response.results, &mut out)?;
            eprintln!(
                "Exported {} result(s) to {}",
                response.results.len(),
                path.display()
            );
        }
        None => export::write(format, &response.results, &mut io::stdout().lock())?,
    }
    Ok(())
}

fn run_shell(config: &Config, options: &SearchArgs) -> folio::Result<()> {
    let engine = open_engine(config, options)?;
    let stats = engine.stats()?;
    display::print_shell_banner(engine.backend().name(), &stats);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\nSearch> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let query = line?;
        let query = query.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        // a bad query should not end the session
        match engine.search(&options.request(query)) {
            Ok(response) => display::print_results(&response),
            Err(e) => eprintln!("❌ {}", e),
        }
    }
    Ok(())
}

fn run_stats(config: &Config, kind: BackendKind) -> folio::Result<()> {
    let backend = backend::open(kind, config, Default::default())?;
    let stats = backend.stats()?;
    display::print_stats(backend.name(), &stats);
    Ok(())
}
