use genaw_search::{SearchConfig, SearchReport, TopRecipeSearch};
use log::error;
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: genaw-search [--json] [ROOT_URL [ROOT_SECTION]]";

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = SearchConfig::load()?;
    let mut json = false;
    let mut positional = Vec::new();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(ExitCode::SUCCESS);
            }
            _ if arg.starts_with('-') => return Err(format!("Unknown option {arg}\n{USAGE}").into()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    if let Some(root_url) = positional.next() {
        config.root_url = root_url;
    }
    if let Some(root_section) = positional.next() {
        config.root_section = root_section;
    }

    let search = TopRecipeSearch::from_config(&config)?;
    let report = search.search(&config.root_url, &config.root_section).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    match report {
        SearchReport {
            top_recipe: Some(recipe),
            ..
        } => {
            if !json {
                println!(
                    "Top Protein to Net Carb, {}-star recipe:\n{}",
                    config.required_rating, recipe
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        SearchReport { top_recipe: None, .. } => {
            error!("No recipe with given criteria found");
            Ok(ExitCode::FAILURE)
        }
    }
}
