// src/cli.rs
use crate::analysis::{initialize, OfferAnalysisAdapter};
use crate::core::ConfigManager;
use crate::image_validator::ImageValidator;
use crate::types::{AnalysisInput, AnalysisResult, ImageMime, IndicatorStatus};
use crate::utils::{get_file_extension, read_file_bytes, read_file_safe, truncate_chars};
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "offerguard")]
#[command(about = "Check job offer letters for signs of fraud")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// YAML configuration file with `local` / `production` profiles
    #[arg(long, env = "OFFERGUARD_CONFIG", default_value = "config.yaml", global = true)]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyze a single offer letter and print the verdict
    Analyze {
        /// PNG/JPEG image or text file containing the offer letter
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        /// Offer letter text
        #[arg(long)]
        text: Option<String>,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run a parsed command against already-loaded configuration; no subcommand means `serve`.
pub async fn handle_command(command: Option<Command>, mut config: ConfigManager) -> Result<()> {
    match command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let adapter = initialize(config.adapter).context("Failed to initialize analysis")?;
            start_web_server(adapter, config.server).await
        }
        Command::Analyze { file, text, json } => {
            let adapter = initialize(config.adapter).context("Failed to initialize analysis")?;
            let input = match (file, text) {
                (Some(path), _) => load_input(&path, &adapter).await?,
                (None, Some(text)) => AnalysisInput::text(text),
                (None, None) => anyhow::bail!("Provide --file or --text"),
            };
            analyze_and_print(&adapter, input, json).await
        }
    }
}

/// Read an offer letter from disk: image extensions become image input, anything else text.
pub async fn load_input(path: &Path, adapter: &OfferAnalysisAdapter) -> Result<AnalysisInput> {
    let declared = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(get_file_extension)
        .and_then(|ext| ImageMime::from_extension(&ext));

    match declared {
        Some(mime) => {
            let bytes = read_file_bytes(path).await?;
            let mime_type =
                ImageValidator::validate(&bytes, Some(mime), adapter.config().max_image_bytes)
                    .map_err(|e| anyhow::anyhow!("{}. {}", e, e.suggestion))?;
            info!("Loaded {} image from {}", mime_type, path.display());
            Ok(AnalysisInput::image(bytes, mime_type))
        }
        None => {
            let text = read_file_safe(path).await?;
            info!("Loaded {} characters from {}", text.chars().count(), path.display());
            Ok(AnalysisInput::text(text))
        }
    }
}

async fn analyze_and_print(
    adapter: &OfferAnalysisAdapter,
    input: AnalysisInput,
    json: bool,
) -> Result<()> {
    match adapter.analyze(input).await {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_result(&result));
            }
            Ok(())
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            anyhow::bail!("{}", e.user_message())
        }
    }
}

pub fn render_result(result: &AnalysisResult) -> String {
    let verdict = if result.is_genuine {
        "✅ Likely genuine"
    } else {
        "❌ Likely fake"
    };

    let mut out = format!("{}\n{}\n", verdict, result.reason);

    if !result.indicators.is_empty() {
        out.push_str(&format!(
            "\nIndicators ({} pass, {} warning, {} fail):\n",
            result.count_with_status(IndicatorStatus::Pass),
            result.count_with_status(IndicatorStatus::Warning),
            result.count_with_status(IndicatorStatus::Fail),
        ));
    }

    for indicator in &result.indicators {
        let mark = match indicator.status {
            IndicatorStatus::Pass => "PASS",
            IndicatorStatus::Warning => "WARN",
            IndicatorStatus::Fail => "FAIL",
        };
        out.push_str(&format!(
            "  [{}] {}: {}\n",
            mark,
            indicator.name,
            truncate_chars(&indicator.details, 200)
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeyIndicator;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_requires_an_input() {
        assert!(Cli::try_parse_from(["offerguard", "analyze"]).is_err());
        assert!(
            Cli::try_parse_from(["offerguard", "analyze", "--file", "a.png", "--text", "x"]).is_err()
        );

        let cli = Cli::try_parse_from(["offerguard", "analyze", "--text", "hello", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Analyze { text: Some(_), json: true, .. })
        ));
    }

    #[test]
    fn test_serve_is_optional() {
        let cli = Cli::try_parse_from(["offerguard"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
    }

    #[test]
    fn test_render_result() {
        let result = AnalysisResult {
            is_genuine: false,
            reason: "Requests an upfront payment".to_string(),
            indicators: vec![
                KeyIndicator {
                    name: "Email Domain".to_string(),
                    status: IndicatorStatus::Fail,
                    details: "Sent from a gmail.com address".to_string(),
                },
                KeyIndicator {
                    name: "Grammar".to_string(),
                    status: IndicatorStatus::Pass,
                    details: "No obvious errors".to_string(),
                },
            ],
        };

        let rendered = render_result(&result);
        assert!(rendered.starts_with("❌ Likely fake"));
        assert!(rendered.contains("1 pass, 0 warning, 1 fail"));
        assert!(rendered.contains("[FAIL] Email Domain: Sent from a gmail.com address"));
    }
}
