use log::error;
use std::env;
use std::process::ExitCode;

use recipe_ingest::{extract_recipe, fetch_transcript, ImportError};

const USAGE: &str = "Usage:\n  recipe-ingest <url>\n  recipe-ingest transcript <url> [api-key]";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let result = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["transcript", url] => print_transcript(url, None).await,
        ["transcript", url, api_key] => print_transcript(url, Some(*api_key)).await,
        [url] if *url != "transcript" => print_recipe(url).await,
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{}\n{}", e.user_message(), e.suggestion());
            ExitCode::FAILURE
        }
    }
}

async fn print_recipe(url: &str) -> Result<(), ImportError> {
    let recipe = extract_recipe(url).await?;
    let json = serde_json::to_string_pretty(&recipe)
        .map_err(|e| ImportError::Config(format!("Failed to encode recipe: {e}")))?;
    println!("{json}");
    Ok(())
}

async fn print_transcript(url: &str, api_key: Option<&str>) -> Result<(), ImportError> {
    let transcript = fetch_transcript(url, api_key).await?;
    println!("{transcript}");
    Ok(())
}
