use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::{render_batch, render_summary, render_topics, summary_request, Cli, Command};
use paper_digest::{App, AppError, Config, Result};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging (only show warnings and errors by default)
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = %e.kind(), error = %e, "Request failed");
            eprintln!("Error ({}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Topics => {
            print!("{}", render_topics());
        }

        Command::List(page) => {
            let app = App::new(&config).await?;
            let batch = app.fetch(&page.fetch_request(&config)).await?;
            print!("{}", render_batch(&batch, page.page));
        }

        Command::Summarize {
            id,
            page,
            min_length,
            max_length,
            model,
            prompt,
        } => {
            let app = App::new(&config).await?;
            let batch = app.fetch(&page.fetch_request(&config)).await?;
            let request = summary_request(min_length, max_length, model, prompt);
            let summary = app.summarize(&batch, id, &request).await?;
            let paper = batch.get(id).ok_or(AppError::PaperNotFound(id))?;
            print!("{}", render_summary(paper, &summary));
        }

        Command::Open { id, page } => {
            let app = App::new(&config).await?;
            let batch = app.fetch(&page.fetch_request(&config)).await?;
            let url = app.pdf_link(&batch, id)?;
            println!("{}", url);
            open::that(&url)?;
        }
    }

    Ok(())
}
