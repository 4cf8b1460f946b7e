use anyhow::Context;
use std::env;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kbrag_core::config::Config;
use kbrag_core::types::{CategoryFilter, Ranked};
use kbrag_hybrid::{
    format_context, is_greeting_or_vague, strip_wake_word, BusinessCategory, Coverage, RetrievalEngine,
};

const USAGE: &str = "Usage: kbrag <query|context|categories|intent|route|stats> [args...]

  query <text> [top_k] [category,...]   hybrid search, optionally filtered
  context <text> [top_k]                routed search rendered as grounding context
  categories                            distinct corpus categories
  intent <text>                         fine-grained intent and business route
  route <text> [top_k]                  business route plus scoped ranking
  stats                                 engine snapshot summary (JSON)";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn text_arg(args: &[String], cmd: &str) -> String {
    args.first().cloned().unwrap_or_else(|| {
        eprintln!("Usage: kbrag {cmd} \"<text>\"");
        process::exit(1)
    })
}

fn top_k_arg(args: &[String], idx: usize, default: usize) -> anyhow::Result<usize> {
    match args.get(idx) {
        Some(raw) => match raw.parse::<usize>() {
            Ok(0) => anyhow::bail!("top_k must be a positive integer, got '{raw}'"),
            parsed => parsed.with_context(|| format!("top_k must be a positive integer, got '{raw}'")),
        },
        None => Ok(default),
    }
}

fn print_ranking(results: &[Ranked<'_>]) {
    if results.is_empty() {
        println!("(no results)");
    }
    for (i, r) in results.iter().enumerate() {
        println!("{:>2}. score={:.4}  {}  [{}]", i + 1, r.score, r.id, r.entry.category);
        println!("    P: {}", r.entry.question);
        println!("    R: {}", r.entry.answer);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let (cmd, args) = parse_args();
    let config = Config::load().context("loading configuration")?;
    let base = env::current_dir().context("resolving working directory")?;
    let engine = RetrievalEngine::from_config(&config, &base).context("building retrieval engine")?;
    let settings = engine.settings().clone();
    info!(command = %cmd, documents = engine.corpus().len(), "engine ready");

    match cmd.as_str() {
        "query" => {
            let query = text_arg(&args, "query");
            let top_k = top_k_arg(&args, 1, settings.default_top_k)?;
            let filter = args.get(2).map(|raw| raw.split(',').map(str::trim).filter(|c| !c.is_empty()).collect::<CategoryFilter>());
            print_ranking(&engine.search(&query, top_k, filter.as_ref()));
        }
        "context" => {
            let message = strip_wake_word(&text_arg(&args, "context"));
            if message.is_empty() || is_greeting_or_vague(&message) {
                println!("(greeting or vague message: no retrieval)");
                return Ok(());
            }
            let top_k = top_k_arg(&args, 1, settings.default_top_k)?;
            let (category, results) = engine.search_routed(&message, top_k);
            let coverage = Coverage::assess(&results, settings.min_score, settings.strong_score);
            println!(
                "agent={category} coverage={} relevant={} max_score={:.2}\n",
                coverage.level, coverage.relevant, coverage.max_score
            );
            println!("{}", format_context(&results, settings.min_score));
        }
        "categories" => {
            for category in engine.get_categories() {
                println!("{category}");
            }
        }
        "intent" => {
            let message = text_arg(&args, "intent");
            let route: BusinessCategory = engine.classify_intent_rules(&message);
            println!("intent={}", engine.detect_intent(&message).unwrap_or("-"));
            println!("route={route}");
            println!("vague={}", is_greeting_or_vague(&message));
        }
        "route" => {
            let message = text_arg(&args, "route");
            let top_k = top_k_arg(&args, 1, settings.default_top_k)?;
            let (category, results) = engine.search_routed(&message, top_k);
            println!("route={category}");
            print_ranking(&results);
        }
        "stats" => {
            println!("{}", serde_json::to_string_pretty(&engine.stats())?);
        }
        _ => {
            eprintln!("Unknown command: {cmd}\n\n{USAGE}");
            process::exit(1);
        }
    }
    Ok(())
}
