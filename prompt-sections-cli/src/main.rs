use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

// Import from prompt-sections-core
use prompt_sections_core::{
    format_sections, store, Category, PromptClassifier, PromptConfig, RuleStore, RuleTable,
};

use prompt_sections::report;

#[derive(Parser)]
#[command(name = "prompt-sections")]
#[command(about = "Split image-generation prompts into semantic sections with explainable rules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a prompt and print the grouped output
    Classify {
        /// Prompt text; reads stdin when omitted and --input is not set
        prompt: Option<String>,

        /// Read the prompt from a file instead
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Path to a custom keyword config file (YAML or JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Path to the custom rules file (default: environment-resolved)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Classify with built-in heuristics only, ignoring custom rules
        #[arg(long)]
        no_custom_rules: bool,

        /// Print the per-tag decision table after the output
        #[arg(long)]
        trace: bool,

        /// Output format: text or json
        #[arg(short = 'f', long, default_value = "text")]
        format: String,
    },

    /// Manage the custom rule table
    Rules {
        /// Path to the custom rules file (default: environment-resolved)
        #[arg(long)]
        rules: Option<PathBuf>,

        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// Print the rule table
    List {
        /// Print as JSON instead of aligned text
        #[arg(long)]
        json: bool,
    },
    /// Add or update one rule
    Set { tag: String, category: String },
    /// Remove one rule
    Delete { tag: String },
    /// Merge rules from a JSON file of tag/category pairs
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Classify {
            prompt,
            input,
            config,
            rules,
            no_custom_rules,
            trace,
            format,
        } => run_classify(
            prompt,
            input,
            config,
            rules,
            no_custom_rules,
            trace,
            &format,
        ),
        Command::Rules { rules, action } => run_rules(rules, action),
    }
}

fn run_classify(
    prompt: Option<String>,
    input: Option<PathBuf>,
    config: Option<String>,
    rules: Option<PathBuf>,
    no_custom_rules: bool,
    trace: bool,
    format: &str,
) -> Result<()> {
    let prompt = read_prompt(prompt, input)?;
    if prompt.trim().is_empty() {
        bail!("empty prompt: pass text, --input, or pipe via stdin");
    }

    let config = PromptConfig::load_with_fallback(config.as_deref());
    let classifier = PromptClassifier::new(&config);

    let table = if no_custom_rules {
        RuleTable::default()
    } else {
        open_store(rules).table().clone()
    };

    let classification = classifier.classify(&prompt, &table);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&classification)?),
        "text" => {
            println!("{}", format_sections(&classification.sections));
            if trace {
                println!();
                println!("{}", report::render_trace_table(&classification.trace));
                if let Some(note) = report::render_unmatched_note(&classification) {
                    println!("{note}");
                }
            }
        }
        other => bail!("unknown output format '{other}' (expected text or json)"),
    }

    Ok(())
}

fn run_rules(rules: Option<PathBuf>, action: RulesAction) -> Result<()> {
    let mut store = open_store(rules);

    match action {
        RulesAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.rules())?);
            } else if store.rules().is_empty() {
                println!("No custom rules yet. Add one with: prompt-sections rules set <TAG> <CATEGORY>");
            } else {
                println!("📁 Rules file: {}", store.path().display());
                println!("{}", report::render_rules_list(store.rules()));
            }
        }
        RulesAction::Set { tag, category } => {
            let Some(parsed) = Category::from_rule_value(category.trim()) else {
                bail!(
                    "unknown category '{category}', expected one of: {}",
                    Category::ALL
                        .iter()
                        .map(|c| c.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            };
            store.set_rule(&tag, parsed.rule_label());
            println!("✅ Rule saved: {} → {}", tag.trim(), parsed.label());
            warn_if_not_durable(&store);
        }
        RulesAction::Delete { tag } => {
            if store.rules().contains_key(tag.trim()) {
                store.delete_rule(&tag);
                println!("✅ Rule removed: {}", tag.trim());
                warn_if_not_durable(&store);
            } else {
                println!("No rule for '{}', nothing to remove", tag.trim());
            }
        }
        RulesAction::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON in {}", file.display()))?;

            let count = store.import_rules(&value)?;
            println!("✅ Imported {count} rules ({} total)", store.rules().len());
            warn_if_not_durable(&store);
        }
    }

    Ok(())
}

fn open_store(rules: Option<PathBuf>) -> RuleStore {
    match rules {
        Some(path) => RuleStore::open(path),
        None => RuleStore::open(store::default_rules_path()),
    }
}

fn read_prompt(prompt: Option<String>, input: Option<PathBuf>) -> Result<String> {
    if let Some(prompt) = prompt {
        return Ok(prompt);
    }
    if let Some(path) = input {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read prompt file {}", path.display()));
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read prompt from stdin")?;
    Ok(buffer)
}

fn warn_if_not_durable(store: &RuleStore) {
    if !store.is_durable() {
        eprintln!(
            "⚠️  Could not write {}; the change is kept in memory for this run only",
            store.path().display()
        );
    }
}
