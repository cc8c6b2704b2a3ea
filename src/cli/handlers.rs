use crate::cli::commands::*;
use crate::config::loader;
use crate::config::settings::{MinutesConfig, RequestDefaults};
use crate::error::{MinutesError, Result};
use crate::llm::{prompts, ProviderClient};
use crate::minutes::request::parse_meeting_date;
use crate::minutes::{generate_minutes, RequestConfig, StructuredResult};
use crate::notes::markdown::render_minutes;
use crate::transcription::load_transcript;
use crate::transcription::models::{ModelManager, WhisperModel};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Config is loaded per command so `config path` and `config init` keep
/// working when the file is missing or unparsable.
pub async fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Process {
            file,
            request,
            format,
            output,
        } => {
            let config = loader::load_config_with_env()?;
            handle_process(&config, &file, &request, format, output.as_deref()).await
        }
        Commands::Request { file, output } => {
            let config = loader::load_config_with_env()?;
            handle_request(&config, &file, output.as_deref()).await
        }
        Commands::Prompt { file, request } => {
            let config = loader::load_config_with_env()?;
            handle_prompt(&config, &file, &request).await
        }
        Commands::Transcribe { file, output } => {
            let config = loader::load_config_with_env()?;
            handle_transcribe(&config, &file, output.as_deref()).await
        }
        Commands::Config { action } => handle_config(action),
        Commands::Models { action } => handle_models(action).await,
    }
}

async fn handle_process(
    config: &MinutesConfig,
    file: &Path,
    args: &RequestArgs,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let transcript = load_transcript(file, &config.transcription).await?;
    let request = build_request(transcript, args, &config.defaults)?;
    let result = run_request(config, &request).await?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Markdown => render_minutes(&result),
    };
    write_output(&rendered, output)
}

async fn handle_request(config: &MinutesConfig, file: &Path, output: Option<&Path>) -> Result<()> {
    let json = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(file)?
    };

    let request = RequestConfig::from_json(&json)?;
    let result = run_request(config, &request).await?;
    write_output(&serde_json::to_string_pretty(&result)?, output)
}

async fn handle_prompt(config: &MinutesConfig, file: &Path, args: &RequestArgs) -> Result<()> {
    let transcript = load_transcript(file, &config.transcription).await?;
    let request = build_request(transcript, args, &config.defaults)?;
    request.validate()?;
    println!("{}", prompts::build_prompt(&request));
    Ok(())
}

async fn handle_transcribe(
    config: &MinutesConfig,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let transcript = load_transcript(file, &config.transcription).await?;
    write_output(&transcript, output)
}

/// Validates before the provider is built so a bad request never needs
/// working credentials.
async fn run_request(config: &MinutesConfig, request: &RequestConfig) -> Result<StructuredResult> {
    request.validate()?;
    let client = ProviderClient::from_config(&config.llm)?;
    tracing::info!("Using {:?} model {}", client.provider(), client.model());
    generate_minutes(&client, request).await
}

/// Merge command line flags over the configured defaults
pub fn build_request(
    transcript: String,
    args: &RequestArgs,
    defaults: &RequestDefaults,
) -> Result<RequestConfig> {
    let mut request = RequestConfig::new(transcript)
        .with_speakers(defaults.include_speakers && !args.no_speakers)
        .with_sentiment(defaults.include_sentiment && !args.no_sentiment)
        .with_timeline(defaults.include_timeline && !args.no_timeline)
        .with_language(
            args.language
                .clone()
                .unwrap_or_else(|| defaults.language.clone()),
        );

    if let Some(title) = &args.title {
        request = request.with_title(title.clone());
    }
    if let Some(date) = &args.date {
        request = request.with_date(parse_meeting_date(date)?);
    }
    Ok(request)
}

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn handle_config(action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let mut shown = loader::load_config_with_env()?;
            if shown.llm.api_key.is_some() {
                shown.llm.api_key = Some("********".to_string());
            }
            println!("{}", toml::to_string_pretty(&shown)?);
        }
        ConfigCommands::Path => {
            println!("{}", loader::config_path()?.display());
        }
        ConfigCommands::Init { force } => {
            let path = loader::config_path()?;
            if loader::init_config_at(&path, force)? {
                println!("Wrote default config to {}", path.display());
            } else {
                println!("Config already exists at {}", path.display());
                println!("Use --force to overwrite it.");
            }
        }
    }
    Ok(())
}

async fn handle_models(action: ModelCommands) -> Result<()> {
    let manager = ModelManager::new(loader::models_dir()?);

    match action {
        ModelCommands::List => {
            println!("{:<16} {:<10} {:>8}", "Model", "Status", "Size");
            println!("{}", "-".repeat(36));
            for (model, present, size_mb) in manager.list_all() {
                let status = if present { "installed" } else { "-" };
                println!("{:<16} {:<10} {:>6}MB", model.to_string(), status, size_mb);
            }
        }
        ModelCommands::Download { model } => {
            let model = parse_model(&model)?;
            let path = tokio::task::spawn_blocking(move || {
                manager.download_model(model, |done, total| {
                    let pct = if total > 0 { done * 100 / total } else { 0 };
                    eprint!("\rDownloading {}: {}%", model, pct);
                    let _ = std::io::stderr().flush();
                })
            })
            .await
            .map_err(|e| MinutesError::Api(format!("Download task failed: {}", e)))??;
            eprintln!();
            println!("Model ready at {}", path.display());
        }
        ModelCommands::Delete { model } => {
            let model = parse_model(&model)?;
            if manager.delete_model(model)? {
                println!("Deleted {}", model);
            } else {
                println!("{} is not installed", model);
            }
        }
    }
    Ok(())
}

fn parse_model(name: &str) -> Result<WhisperModel> {
    WhisperModel::from_name(name).ok_or_else(|| {
        let known: Vec<String> = WhisperModel::all().iter().map(|m| m.to_string()).collect();
        MinutesError::InvalidConfig(format!(
            "Unknown model '{}'. Available: {}",
            name,
            known.join(", ")
        ))
    })
}
