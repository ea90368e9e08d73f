// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Reveal CLI
//!
//! Offline inspection of capture rules and redaction results.

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use reveal::{redact, RedactionMiss, RuleSet};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "reveal=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "rules" => {
            if args.len() < 3 {
                eprintln!("Usage: reveal rules <rules.json>");
                return ExitCode::from(1);
            }
            report(list_rules(&args[2]))
        }
        "redact" => {
            if args.len() < 7 {
                eprintln!("Usage: reveal redact <rules.json> <url> <method> <type> <body-file>");
                return ExitCode::from(1);
            }
            match redact_body(&args[2], &args[3], &args[4], &args[5], &args[6]).await {
                Ok(true) => ExitCode::SUCCESS,
                Ok(false) => ExitCode::from(2),
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    ExitCode::from(1)
                }
            }
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("reveal {}", reveal::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Reveal - Exchange Capture and Selective Disclosure

USAGE:
    reveal <COMMAND> [OPTIONS]

COMMANDS:
    rules <rules.json>
                    List capture rules and the completion filter
    redact <rules.json> <url> <method> <type> <body-file>
                    Match a rule and redact a saved response body
    help            Show this help message
    version         Show version information

EXAMPLES:
    reveal rules providers.json
    reveal redact providers.json https://api.example.com/1.1/account/settings.json GET xmlhttprequest body.json

Exit status of redact is 2 when no rule applies or nothing can be disclosed.
"#
    );
}

fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn list_rules(path: &str) -> anyhow::Result<()> {
    let rules = RuleSet::from_file(path)?;

    println!("=== Capture Rules ({}) ===", rules.len());
    for rule in rules.rules() {
        println!("  [{}] {}", rule.index, rule.label());
        println!("      {} {} {}", rule.method, rule.resource_type, rule.url_prefix);
        println!("      selector: {}", rule.response_selector);
        println!("      reveal:   {}", rule.value_transform);
    }

    let filter = rules.completion_filter();
    println!("\n=== Completion Filter ===");
    println!("{}", serde_json::to_string_pretty(&filter)?);

    Ok(())
}

async fn redact_body(
    rules_path: &str,
    url: &str,
    method: &str,
    resource_type: &str,
    body_path: &str,
) -> anyhow::Result<bool> {
    let rules = RuleSet::from_file(rules_path)?;
    let body = tokio::fs::read_to_string(body_path)
        .await
        .with_context(|| format!("reading body file {}", body_path))?;

    let Some(rule) = rules.find(url, method, resource_type) else {
        println!("No capture rule applies to {} {} ({})", method, url, resource_type);
        return Ok(false);
    };
    println!("Matched rule [{}] {}", rule.index, rule.label());

    match redact(rule, &body) {
        Ok(redaction) => {
            println!("{}", serde_json::to_string_pretty(&redaction)?);
            Ok(true)
        }
        Err(RedactionMiss::NoSelectorMatch) => {
            println!("Selector matched nothing, no disclosure");
            Ok(false)
        }
        Err(miss) => {
            println!("No disclosure: {}", miss);
            Ok(false)
        }
    }
}
