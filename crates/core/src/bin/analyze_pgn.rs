//! Annotate a PGN file from the command line

use chess_trainer_core::{AnalysisPipeline, Result, StandardOracle};

async fn run(path: &str, json: bool) -> Result<()> {
    let pgn = std::fs::read_to_string(path)?;

    let mut pipeline = AnalysisPipeline::new(StandardOracle)?;
    pipeline.submit(&pgn);
    let report = pipeline.run().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}\n", report.headers.summary());
    for line in report.lines() {
        println!("  {}", line);
    }
    if let Some(last) = report.log.last() {
        println!("\n{}", last.explanation);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| {
        eprintln!("Usage: analyze-pgn <file.pgn> [--json]");
        std::process::exit(1);
    });
    let json = args.any(|arg| arg == "--json");

    if let Err(e) = run(&path, json).await {
        eprintln!("Failed to analyze {}: {}", path, e);
        std::process::exit(1);
    }
}
