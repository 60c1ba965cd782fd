use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;

use flashgen::{
  app::App,
  cli::Cli,
  gpt_connector::GPTConnector,
  trace_dbg,
  utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
  initialize_logging()?;
  initialize_panic_handler()?;
  let args = trace_dbg!(Cli::parse());

  dotenv::dotenv().ok();
  let app = App::from_cli(&args)?;
  let api_key = app.settings.api_key()?;
  let connector = GPTConnector::new(&app.settings.openai, api_key);

  let summary = app.run(&connector).await?;
  info!(
    flashcards = summary.flashcards,
    chunks = summary.chunks,
    skipped = summary.chunks_skipped,
    "done, flashcards written to {}",
    summary.output_path.display()
  );
  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  if let Err(e) = tokio_main().await {
    eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
    Err(e)
  } else {
    Ok(())
  }
}
