use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use keydict::{
    load_dictionary, parse, run_check, run_suggest, EngineConfig, LoadedDictionary,
    SimpleFormatter, TreeFormatter,
};
use std::path::PathBuf;
use std::process;

/// Key Dictionary - check, inspect and convert translation dictionaries
#[derive(Parser, Debug)]
#[command(name = "kd")]
#[command(author, version, about, long_about = None)]
#[command(help_template = "{name} {version}\n{about}\n\nUSAGE:\n    {usage}\n\n{all-args}")]
struct Cli {
    /// Engine settings as JSON (system namespace, punctuation, suggestion threshold)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the dictionary and list keys with problems
    Check {
        #[command(flatten)]
        input: Input,

        /// Machine-readable output: key<TAB>remark
        #[arg(long)]
        simple: bool,
    },

    /// Suggest existing translations for a key
    Suggest {
        #[command(flatten)]
        input: Input,

        /// Key whose primary text is matched against the other keys
        #[arg(short, long)]
        key: String,

        /// Culture of the offered translations (default: primary culture)
        #[arg(short, long)]
        culture: Option<String>,

        /// Machine-readable output: score<TAB>key<TAB>text
        #[arg(long)]
        simple: bool,
    },

    /// Merge v1 or v2 documents into a single v2 document
    Convert {
        #[command(flatten)]
        input: Input,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the key tree
    Tree {
        #[command(flatten)]
        input: Input,

        /// Culture of the texts shown (default: primary culture)
        #[arg(short, long)]
        culture: Option<String>,

        /// Mark keys with problems
        #[arg(long)]
        check: bool,

        /// Maximum line width for texts
        #[arg(long, default_value = "100")]
        width: usize,
    },

    /// Print key and translation counts
    Stats {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args, Debug)]
struct Input {
    /// Dictionary files or directories containing them
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to read configuration: {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Check { input, simple } => {
            let mut loaded = load(&input.paths)?;
            let report = run_check(&mut loaded.dictionary, &config)?;
            if simple {
                print!("{}", SimpleFormatter::new().format_problems(&report));
            } else {
                for problem in report.problems() {
                    println!("{} {}", problem.key.bold(), problem.remark.yellow());
                }
                let summary = format!(
                    "{} keys checked, {} with problems",
                    loaded.dictionary.len(),
                    report.problems().len()
                );
                if report.has_problems() {
                    eprintln!("{}", summary.red());
                } else {
                    eprintln!("{}", summary.green());
                }
            }
            Ok(if report.has_problems() { 1 } else { 0 })
        }

        Command::Suggest {
            input,
            key,
            culture,
            simple,
        } => {
            let loaded = load(&input.paths)?;
            let dict = &loaded.dictionary;
            let culture = culture
                .or_else(|| dict.comment_culture().map(str::to_string))
                .context("The dictionary has no cultures")?;
            let suggestions = run_suggest(dict, &config, &key, &culture)
                .with_context(|| format!("Failed to suggest for '{}'", key))?;

            if simple {
                print!("{}", SimpleFormatter::new().format_suggestions(&suggestions));
            } else if suggestions.is_empty() {
                eprintln!("{}", "No suggestions".yellow());
            } else {
                for s in &suggestions {
                    let score = if s.is_exact() {
                        "exact".green().to_string()
                    } else {
                        format!("{:.2}", s.score)
                    };
                    println!("{:>6}  {}  {}", score, s.key.bold(), s.primary_text);
                    if let Some(target) = &s.target_text {
                        println!("        {} {}", "└─>".dimmed(), target);
                    }
                }
            }
            Ok(0)
        }

        Command::Convert { input, output } => {
            let mut loaded = load(&input.paths)?;
            parse::save_v2(&mut loaded.dictionary, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            eprintln!(
                "{} {} keys in {} cultures to {}",
                "Wrote".green(),
                loaded.dictionary.len(),
                loaded.dictionary.cultures().len(),
                output.display()
            );
            Ok(0)
        }

        Command::Tree {
            input,
            culture,
            check,
            width,
        } => {
            let mut loaded = load(&input.paths)?;
            let report = if check {
                Some(run_check(&mut loaded.dictionary, &config)?)
            } else {
                None
            };
            let formatter = TreeFormatter::with_width(width);
            print!(
                "{}",
                formatter.format(&loaded.dictionary, culture.as_deref(), report.as_ref())
            );
            Ok(0)
        }

        Command::Stats { input } => {
            let mut loaded = load(&input.paths)?;
            run_check(&mut loaded.dictionary, &config)?;
            let stats = loaded.dictionary.statistics();
            println!("{:<12} {}", "keys", stats.full_keys);
            for (culture, count) in &stats.translated {
                println!("{:<12} {}", culture, count);
            }
            if let Some(problems) = stats.keys_with_problems {
                println!("{:<12} {}", "problems", problems);
            }
            Ok(0)
        }
    }
}

/// Load the dictionary and report what was left out on stderr
fn load(paths: &[PathBuf]) -> Result<LoadedDictionary> {
    let loaded = load_dictionary(paths).with_context(|| {
        format!(
            "Failed to load dictionary from {}",
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    for (path, error) in &loaded.failures {
        eprintln!("{} {}: {}", "Warning:".yellow(), path.display(), error);
    }
    for skipped in &loaded.skipped {
        eprintln!(
            "{} skipped {} [{}]: {}",
            "Warning:".yellow(),
            skipped.key.as_deref().unwrap_or("<no key>"),
            skipped.culture,
            skipped.reason
        );
    }
    Ok(loaded)
}
