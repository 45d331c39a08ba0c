//! Resume analytica: resume vs job description fit scoring

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_analytica::cli::{self, AnalyzeArgs, Cli, Commands, ConfigAction, ModelAction};
use resume_analytica::config::{Config, OutputFormat};
use resume_analytica::input::{InputManager, ResumeSource};
use resume_analytica::llm::ChatCompletionSuggester;
use resume_analytica::output::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_analytica::processing::embedding_manager::EmbeddingModelManager;
use resume_analytica::processing::{AnalysisEngine, AnalysisRequest, EngineOptions};
use resume_analytica::{AnalyticaError, Result};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(if e.is_client_error() { 2 } else { 1 });
    }
}

async fn run_command(command: Commands, config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Analyze(args) => run_analysis(args, &config).await?,

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("📚 Embedding Models\n");
                    for model in manager.list_available_models() {
                        let downloaded = manager.is_model_downloaded(&model.id);
                        let status = if downloaded { "✅ Downloaded" } else { "⬇️  Available" };
                        println!("  • {} ({}) - {} MB [{}]", model.id, model.repo_id, model.size_mb, status);
                        println!("    {}", model.description);
                        if !downloaded {
                            println!("    💡 Download: resume-analytica models download {}", model.id);
                        }
                        println!();
                    }

                    if manager.list_downloaded_models().is_empty() {
                        println!("💡 No models downloaded yet. Get started with:");
                        println!("   resume-analytica models download {}", manager.auto_select_model());
                    } else {
                        println!("🎯 Auto-selected model: {}", manager.auto_select_model());
                    }
                }

                ModelAction::Download { model, force } => {
                    let model_id = manager.resolve_model_id(&model).ok_or_else(|| {
                        AnalyticaError::ModelError(format!("Unknown embedding model: {}", model))
                    })?;

                    if !force && manager.is_model_downloaded(&model_id) {
                        println!("✅ Model '{}' is already downloaded!", model_id);
                        println!("💡 Use --force to re-download");
                        return Ok(());
                    }

                    println!("⬇️  Downloading model: {}", model_id);
                    let model_path = manager.download_model(&model_id).await?;
                    println!("✅ Model '{}' downloaded successfully!", model_id);
                    println!("📁 Location: {}", model_path.display());
                }

                ModelAction::Info { model } => {
                    let model_id = manager.resolve_model_id(&model).ok_or_else(|| {
                        AnalyticaError::ModelError(format!("Unknown embedding model: {}", model))
                    })?;
                    let info = manager
                        .get_model_info(&model_id)
                        .ok_or_else(|| AnalyticaError::ModelError(format!("Unknown embedding model: {}", model)))?;

                    println!("📋 Model Information for '{}'\n", info.id);
                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Size: {} MB", info.size_mb);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Description: {}", info.description);

                    match manager.get_model_path(&model_id) {
                        Some(path) => {
                            println!("Status: ✅ Downloaded");
                            println!("Location: {}", path.display());
                        }
                        None => {
                            println!("Status: ⬇️  Available for download");
                            println!("\n💡 To download this model, run:");
                            println!("   resume-analytica models download {}", model_id);
                        }
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config).map_err(|e| {
                    AnalyticaError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("{}", rendered);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("✅ Configuration reset to defaults: {}", config_path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                let updated = config.set_value(&key, &value)?;
                updated.save_to(&config_path)?;
                println!("🔧 Set {} = {}", key, value);
            }

            Some(ConfigAction::Check) => {
                let suggester = ChatCompletionSuggester::from_config(&config.suggestions)?;
                if !suggester.is_configured() {
                    println!(
                        "⚠️  No API key found in ${}; rule-based suggestions will be used",
                        config.suggestions.api_key_env
                    );
                } else if suggester.connection_check().await {
                    println!("✅ Suggestion service reachable (model: {})", suggester.model());
                } else {
                    println!("❌ Suggestion service did not answer; rule-based suggestions will be used");
                }
            }
        },
    }

    Ok(())
}

async fn run_analysis(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let output_format = match &args.output {
        Some(format) => cli::parse_output_format(format).map_err(AnalyticaError::InvalidInput)?,
        None => config.output.format,
    };

    if let Some(resume) = &args.resume {
        cli::validate_file_extension(resume, cli::RESUME_EXTENSIONS)
            .map_err(|e| AnalyticaError::InvalidInput(format!("Resume file: {}", e)))?;
    }

    let input = InputManager::new(config.limits.max_file_bytes);
    let job_description = match (&args.job_text, &args.job) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => {
            cli::validate_file_extension(path, cli::JOB_EXTENSIONS)
                .map_err(|e| AnalyticaError::InvalidInput(format!("Job description file: {}", e)))?;
            input.read_job_description(path).await?
        }
        (None, None) => String::new(),
    };

    let request = AnalysisRequest {
        job_description,
        resume: ResumeSource {
            file: args.resume.clone(),
            text: args.resume_text.clone(),
        },
        is_latex: args.latex,
    };

    let engine = AnalysisEngine::from_config(
        config,
        EngineOptions {
            offline: args.offline,
            no_ai: args.no_ai,
        },
    )?;

    info!("Starting resume fit analysis");
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_strings(&["|", "/", "-", "\\", " "]));
    }
    spinner.set_message("Analyzing resume...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = engine.analyze(&request).await;
    spinner.finish_and_clear();
    let result = outcome?;

    let detailed = args.detailed || config.output.detailed;
    let generator = ReportGenerator::with_options(
        config.output.color_output,
        detailed,
        true,
        true,
        config.output.max_matches_shown,
    );
    println!("{}", generator.generate_report(&result, &output_format)?);

    if let Some(save_path) = &args.save {
        let target = if save_path.is_dir() {
            let resume_name = args
                .resume
                .as_deref()
                .and_then(|p| p.to_str())
                .unwrap_or("resume");
            save_path.join(suggest_filename(&output_format, resume_name, true))
        } else {
            save_path.clone()
        };

        let plain = ReportGenerator::with_options(false, detailed, true, true, config.output.max_matches_shown);
        let content = plain.generate_report(&result, &output_format)?;
        save_report_to_file(&content, &target)?;
        println!("{} {}", "💾 Report saved to".green(), target.display());

        if output_format != OutputFormat::Json {
            if let Some(latex) = &result.latex_annotated {
                let latex_path = target.with_extension("annotated.tex");
                save_report_to_file(latex, &latex_path)?;
                println!("{} {}", "📝 Annotated LaTeX saved to".green(), latex_path.display());
            }
        }
    }

    Ok(())
}
