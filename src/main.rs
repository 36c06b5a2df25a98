//! ALRAGE Eval CLI
//!
//! LLM-as-judge evaluation for Arabic retrieval-augmented question answering.

use alrage_eval::{
    config::Config,
    eval::{
        cache_path, create_sample_dataset, download_dataset, load_or_download, Dataset, Judge,
        JudgeMetricWrapper, LlmJudge, RunConfig, Runner,
    },
    llm::{GenerationOptions, LlmClient, Message},
    tasks::{task_by_name, TaskConfig, TASKS_TABLE},
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// ALRAGE Eval - LLM-as-judge evaluation for Arabic RAG question answering
#[derive(Parser)]
#[command(name = "alrage-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full evaluation over a dataset
    Run {
        /// Task to run
        #[arg(long, default_value = "alrage_qa")]
        task: String,

        /// Model under evaluation (overrides configuration)
        #[arg(long)]
        model_name: Option<String>,

        /// Judge model (overrides configuration)
        #[arg(long)]
        judge_model: Option<String>,

        /// Local dataset file, .json or .jsonl (the task's dataset is
        /// downloaded if omitted)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Use the built-in sample rows instead of a real dataset
        #[arg(long)]
        sample: bool,

        /// Maximum number of records to evaluate
        #[arg(long)]
        max_samples: Option<usize>,

        /// Generation budget (defaults to the task's generation size)
        #[arg(long)]
        max_new_tokens: Option<u32>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,

        /// Nucleus sampling cutoff
        #[arg(long)]
        top_p: Option<f32>,

        /// Write full results JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print per-item progress
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate and judge a single dataset row
    Demo {
        /// Task to demo
        #[arg(long, default_value = "alrage_qa")]
        task: String,

        /// Model under evaluation (overrides configuration)
        #[arg(long)]
        model_name: Option<String>,

        /// Judge model (overrides configuration)
        #[arg(long)]
        judge_model: Option<String>,

        /// Local dataset file, .json or .jsonl (the task's dataset is
        /// downloaded if omitted)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Use the built-in sample rows instead of a real dataset
        #[arg(long)]
        sample: bool,

        /// Row to demo
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Generation budget (defaults to the task's generation size)
        #[arg(long)]
        max_new_tokens: Option<u32>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,

        /// Nucleus sampling cutoff
        #[arg(long)]
        top_p: Option<f32>,
    },

    /// Download a task's dataset for offline runs
    Download {
        /// Task whose dataset to download
        #[arg(long, default_value = "alrage_qa")]
        task: String,

        /// Output path (defaults to the cache location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered tasks
    Tasks,

    /// Test LLM connections
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            task,
            model_name,
            judge_model,
            dataset,
            sample,
            max_samples,
            max_new_tokens,
            temperature,
            top_p,
            output,
            verbose,
        } => {
            let run_config = RunConfig {
                max_samples,
                max_new_tokens,
                temperature,
                top_p,
                verbose,
            };
            cmd_run(task, model_name, judge_model, dataset, sample, output, run_config).await
        }
        Commands::Demo {
            task,
            model_name,
            judge_model,
            dataset,
            sample,
            index,
            max_new_tokens,
            temperature,
            top_p,
        } => {
            cmd_demo(
                task,
                model_name,
                judge_model,
                dataset,
                sample,
                index,
                max_new_tokens,
                temperature,
                top_p,
            )
            .await
        }
        Commands::Download { task, output } => cmd_download(task, output).await,
        Commands::Tasks => cmd_tasks(),
        Commands::Test => cmd_test().await,
    }
}

/// Resolve the dataset a command should operate on.
async fn load_task_dataset(
    task: &TaskConfig,
    path: Option<PathBuf>,
    use_sample: bool,
) -> Result<Dataset> {
    if use_sample {
        return Ok(create_sample_dataset());
    }

    if let Some(path) = path {
        return if path.extension().is_some_and(|ext| ext == "jsonl") {
            Dataset::load_jsonl(&path)
        } else {
            Dataset::load_json(&path)
        };
    }

    let split = task.evaluation_splits.first().copied().unwrap_or("train");
    load_or_download(task.hf_repo, split).await
}

async fn cmd_run(
    task_name: String,
    model_name: Option<String>,
    judge_model: Option<String>,
    dataset_path: Option<PathBuf>,
    sample: bool,
    output: Option<PathBuf>,
    run_config: RunConfig,
) -> Result<()> {
    println!("Loading configuration...");
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(model) = model_name {
        config.llm.model = model;
    }
    if let Some(model) = judge_model {
        config.judge.model = model;
    }
    config.validate().context("Invalid configuration")?;

    let task = task_by_name(&task_name)?;
    let dataset = load_task_dataset(task, dataset_path, sample).await?;

    println!("Dataset: {} ({} records)", dataset.name, dataset.len());
    println!("Using model: {}", config.llm.model);
    println!("Using judge: {}", config.judge.model);

    let judge = Arc::new(LlmJudge::from_config(config.judge_llm()));
    let metric = Arc::new(JudgeMetricWrapper::new(judge));
    let client = LlmClient::new(config.llm.clone());
    let runner = Runner::new(client, metric, run_config);

    let results = runner.run(task, &dataset).await?;
    results.print_summary();

    if let Some(output) = output {
        results.save(&output)?;
        println!("Results saved to: {}", output.display());
    }

    Ok(())
}

async fn cmd_demo(
    task_name: String,
    model_name: Option<String>,
    judge_model: Option<String>,
    dataset_path: Option<PathBuf>,
    sample: bool,
    index: usize,
    max_new_tokens: Option<u32>,
    temperature: Option<f32>,
    top_p: Option<f32>,
) -> Result<()> {
    println!("Loading configuration...");
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(model) = model_name {
        config.llm.model = model;
    }
    if let Some(model) = judge_model {
        config.judge.model = model;
    }
    config.validate().context("Invalid configuration")?;

    let task = task_by_name(&task_name)?;
    let dataset = load_task_dataset(task, dataset_path, sample).await?;

    let record = dataset
        .records
        .get(index)
        .with_context(|| format!("Dataset has no row {} ({} records)", index, dataset.len()))?;
    let doc = (task.prompt_function)(record, task.name);

    println!();
    println!("Question:\n{}\n", record.question);
    println!("Candidates:\n{}\n", record.candidates.normalized().join("\n"));

    let options = GenerationOptions {
        max_tokens: Some(max_new_tokens.unwrap_or(task.generation_size)),
        temperature,
        top_p,
        stop: task.stop_sequence.iter().map(|s| s.to_string()).collect(),
    };

    let client = LlmClient::new(config.llm.clone());
    println!("Generating answer with {}...", config.llm.model);
    let response = client
        .chat_with_options(vec![Message::user(doc.query.clone())], &options)
        .await
        .context("Generation failed")?;
    let answer = response.content.trim().to_string();

    println!("\nGenerated answer:\n{}\n", answer);
    println!("Gold answer:\n{}\n", record.gold_answer);

    let judge = LlmJudge::from_config(config.judge_llm());
    println!("Judging with {}...", judge.model());
    let judgment = judge
        .evaluate_answer(&doc.query, &answer, None, doc.gold())
        .await
        .context("Judge call failed")?;

    println!("\nScore: {:.2}", judgment.score);
    println!("Judge response:\n{}", judgment.raw_response);

    Ok(())
}

async fn cmd_download(task_name: String, output: Option<PathBuf>) -> Result<()> {
    let task = task_by_name(&task_name)?;
    let split = task.evaluation_splits.first().copied().unwrap_or("train");

    println!("Downloading {} ({} split)...", task.hf_repo, split);
    let dataset = download_dataset(task.hf_repo, split).await?;

    let path = match output {
        Some(path) => path,
        None => cache_path(task.hf_repo, split).context("Could not determine cache directory")?,
    };

    dataset.save_json(&path)?;
    println!("Saved {} records to: {}", dataset.len(), path.display());

    Ok(())
}

fn cmd_tasks() -> Result<()> {
    println!("Registered tasks");
    println!("{}", "─".repeat(40));

    for task in TASKS_TABLE {
        println!("  {}", task.name);
        println!("    Suite:           {}", task.suite.join(", "));
        println!("    Dataset:         {}", task.hf_repo);
        println!("    Splits:          {}", task.evaluation_splits.join(", "));
        println!("    Generation size: {}", task.generation_size);
        println!("    Version:         {}", task.version);
    }

    Ok(())
}

async fn cmd_test() -> Result<()> {
    println!("Testing LLM connections...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  API Base:  {}", config.llm.api_base);
    println!("  Model:     {}", config.llm.model);
    println!("  Judge:     {}", config.judge.model);
    println!(
        "  API Key:   {}...",
        &config.llm.api_key[..config.llm.api_key.len().min(8)]
    );
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = LlmClient::new(config.llm.clone());
    println!("Testing model endpoint...");
    match client.test_connection().await {
        Ok(()) => println!("  Connection successful!"),
        Err(e) => println!("  Connection failed: {}", e),
    }

    let judge_client = LlmClient::new(config.judge_llm());
    println!("Testing judge endpoint...");
    match judge_client.test_connection().await {
        Ok(()) => println!("  Connection successful!"),
        Err(e) => println!("  Connection failed: {}", e),
    }

    Ok(())
}
