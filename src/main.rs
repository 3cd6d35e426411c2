// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// OZ RESEARCH CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// CLI para execução do pipeline de pesquisa em dois estágios.
//
// Uso:
//   oz-research-cli                                  (pergunta o tema no terminal)
//   oz-research-cli "remote patient monitoring for CHF patients"
//   oz-research-cli --model gpt-4o --output run.json "tema"
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use oz_research::prelude::*;

/// Expande um tema OZ em memo + conceitos de negócio.
#[derive(Debug, Parser)]
#[command(name = "oz-research-cli", version, about)]
struct Cli {
    /// Tema OZ / taxonomia. Se omitido, é pedido no terminal.
    theme: Vec<String>,

    /// Modelo (sobrescreve OZ_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Arquivo de saída JSON (sobrescreve OZ_OUTPUT)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Desliga a ferramenta de web search
    #[arg(long)]
    no_web_search: bool,

    /// Não grava o resultado em disco
    #[arg(long)]
    no_save: bool,
}

/// Carrega o `.env` do diretório atual, se existir
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("✓ Carregado .env de: {}", path.display()),
        Err(_) => eprintln!("⚠ Nenhum arquivo .env encontrado. Certifique-se de que OPENAI_API_KEY está definida."),
    }
}

/// Lê o tema do terminal
fn prompt_theme() -> io::Result<String> {
    print!("Enter OZ / Taxonomy theme: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = load_research_config();
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if cli.no_web_search {
        config = config.with_web_search(false);
    }

    let oz_text = if cli.theme.is_empty() {
        prompt_theme()?
    } else {
        cli.theme.join(" ").trim().to_string()
    };

    if oz_text.is_empty() {
        println!("No OZ text provided, exiting.");
        return Ok(());
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" OZ RESEARCH v{}", oz_research::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Tema: {}", oz_text);
    println!("Modelo: {} | Web search: {}", config.model, config.web_search);
    println!();

    let pipeline = ResearchPipeline::from_config(&config)?;
    let result = pipeline.run_research_for_oz(&oz_text).await?;

    print!("{}", format_summary(&result));

    if cli.no_save {
        println!("Skipping save (--no-save).");
    } else {
        save_result(&result, &config.output_path)?;
        println!(
            "Saved full structured output to {}",
            config.output_path.display()
        );
    }

    Ok(())
}
