use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use scriptline::reader::{ReaderConfig, ScriptReader};
use scriptline::{
    character_names, document_stats, rename_character, replace, search, shared_classifier, Block, DocumentStats,
    SearchSpec,
};

#[derive(Parser, Debug)]
#[command(name = "scriptline")]
#[command(about = "Arabic screenplay line classifier with search, replace and rename")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a script into formatted blocks (JSON)
    Classify {
        file: PathBuf,
        /// Skip the post-process corrector
        #[arg(long)]
        raw: bool,
    },
    /// Search a script line by line (JSON)
    Search {
        file: PathBuf,
        query: String,
        #[command(flatten)]
        options: SearchOptions,
    },
    /// Replace matches and print the new text
    Replace {
        file: PathBuf,
        query: String,
        replacement: String,
        /// Replace only the first match
        #[arg(long)]
        first_only: bool,
        #[command(flatten)]
        options: SearchOptions,
    },
    /// Rename a character cue and print the new text
    Rename {
        file: PathBuf,
        old_name: String,
        new_name: String,
    },
    /// Print document counters and the cast list (JSON)
    Stats { file: PathBuf },
}

#[derive(Args, Debug)]
struct SearchOptions {
    #[arg(long)]
    case_sensitive: bool,
    #[arg(long)]
    whole_word: bool,
    /// Treat the query as a regular expression
    #[arg(long)]
    regex: bool,
}

impl SearchOptions {
    fn to_spec(&self, query: String, replace_all: bool) -> SearchSpec {
        SearchSpec {
            query,
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            use_regex: self.regex,
            replace_all,
        }
    }
}

#[derive(Serialize)]
struct StatsReport {
    #[serde(flatten)]
    stats: DocumentStats,
    cast: Vec<String>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn classify(text: &str, raw: bool) -> Vec<Block> {
    match (shared_classifier(), raw) {
        (Some(classifier), true) => classifier.classify_lines(text),
        (Some(classifier), false) => classifier.classify_pasted_text(text),
        (None, _) => scriptline::classifier::fallback_blocks(text),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    let file = match &cli.command {
        Command::Classify { file, .. }
        | Command::Search { file, .. }
        | Command::Replace { file, .. }
        | Command::Rename { file, .. }
        | Command::Stats { file } => file.clone(),
    };

    let reader = ScriptReader::new(ReaderConfig::default());
    let (text, read_stats) = reader
        .read_script(&file)
        .await
        .with_context(|| format!("Failed to read script {}", file.display()))?;
    info!(lines = read_stats.lines_read, bytes = read_stats.bytes_read, "Script loaded");

    match cli.command {
        Command::Classify { raw, .. } => {
            let blocks = classify(&text, raw);
            info!(blocks = blocks.len(), raw, "Classification complete");
            print_json(&blocks)?;
        }
        Command::Search { query, options, .. } => {
            let outcome = search(&text, &options.to_spec(query, true));
            info!(total_matches = outcome.total_matches, success = outcome.success, "Search complete");
            print_json(&outcome)?;
        }
        Command::Replace {
            query,
            replacement,
            first_only,
            options,
            ..
        } => {
            let outcome = replace(&text, &options.to_spec(query, !first_only), &replacement);
            if let Some(error) = &outcome.error {
                anyhow::bail!("Replace failed: {error}");
            }
            info!(
                replacements = outcome.replacements,
                pattern = %outcome.pattern_source,
                flags = %outcome.pattern_flags,
                "Replace complete"
            );
            println!("{}", outcome.new_text);
        }
        Command::Rename { old_name, new_name, .. } => {
            let outcome = rename_character(&old_name, &new_name, &text);
            if let Some(error) = &outcome.error {
                anyhow::bail!("Rename failed: {error}");
            }
            info!(replacements = outcome.replacements, "Rename complete");
            println!("{}", outcome.new_text);
        }
        Command::Stats { .. } => {
            let blocks = classify(&text, false);
            let report = StatsReport {
                stats: document_stats(&text),
                cast: character_names(&blocks),
            };
            print_json(&report)?;
        }
    }

    Ok(())
}
