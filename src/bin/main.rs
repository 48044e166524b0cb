// src/bin/main.rs
// Interactive symptom checker. Run with: cargo run --bin triage_engine
use std::io::{stdin, stdout, Write};
use std::path::Path;

use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

use triage_core::{PredictionResult, SeverityLabel, TriageEngine};

const DATA_DIR: &str = "data";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let engine = match TriageEngine::from_dir(Path::new(DATA_DIR)) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red(), e);
            std::process::exit(1);
        }
    };

    println!("{}", "Symptom Triage (preliminary checker)".bold());
    println!("----------------------------------------------------------------");
    println!(
        "{}",
        "Not a diagnosis. Always consult a healthcare professional.".dark_yellow()
    );
    if !engine.health().fully_loaded() {
        println!(
            "{}",
            "Some reference tables are unavailable; running degraded.".dark_yellow()
        );
    }
    println!("Enter comma-separated symptoms, ':conditions', ':info <name>', or 'exit'.");

    loop {
        print!("\nsymptoms> ");
        stdout().flush().unwrap();

        let mut input = String::new();
        if stdin().read_line(&mut input).is_err() {
            break;
        }
        let line = input.trim();

        match line {
            "exit" | "quit" => break,
            "" => continue,
            ":conditions" => {
                for name in engine.condition_names() {
                    println!("  {}", name);
                }
            }
            s if s.starts_with(":info ") => match engine.condition_info(s[6..].trim()) {
                Some(info) => {
                    println!("{}", info.name.clone().bold());
                    println!("  {}", info.description);
                    println!("  Symptoms ({}): {}", info.symptom_count, info.symptoms.join(", "));
                    for p in &info.precautions {
                        println!("  - {}", p);
                    }
                }
                None => println!("No such condition."),
            },
            text => print_result(&engine.predict(text)),
        }
    }
}

fn print_result(result: &PredictionResult) {
    println!();
    println!(
        "{} {}  ({} confidence: {:.1}%)",
        "Best match:".bold(),
        result.disease.clone().cyan(),
        severity_tag(result.severity),
        result.confidence * 100.0
    );
    println!("  {}", result.description);

    if !result.matched.is_empty() {
        println!("  {} {}", "Matched:".green(), result.matched.join(", "));
    }
    if !result.missing.is_empty() {
        println!("  {} {}", "Also common:".dark_grey(), result.missing.join(", "));
    }
    if !result.unmatched_user_symptoms.is_empty() {
        println!(
            "  {} {}",
            "Not accounted for:".dark_grey(),
            result.unmatched_user_symptoms.join(", ")
        );
    }

    println!("  Precautions:");
    for p in &result.precautions {
        println!("    - {}", p);
    }
    println!(
        "  {}",
        "This is a preliminary match, not a medical diagnosis.".dark_yellow()
    );
}

fn severity_tag(severity: SeverityLabel) -> String {
    let label = severity.to_string();
    match severity {
        SeverityLabel::High => label.red().to_string(),
        SeverityLabel::Moderate => label.yellow().to_string(),
        SeverityLabel::Low => label.green().to_string(),
        SeverityLabel::Unknown => label.dark_grey().to_string(),
    }
}
