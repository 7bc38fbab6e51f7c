//! Interface de linha de comando do edugen baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (generate, schema)
//! e flags globais (--model, --config, --verbose, ...).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// edugen — Gera explicações e questões de múltipla escolha revisadas por LLM.
#[derive(Debug, Parser)]
#[command(name = "edugen", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./edugen.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Identificador do modelo Anthropic a usar nesta sessão.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Encaminha o feedback do revisor para a segunda geração.
    #[arg(long, global = true, default_value_t = false)]
    pub attach_feedback: bool,

    /// Trata respostas fora das opções como falha de geração.
    #[arg(long, global = true, default_value_t = false)]
    pub validate_answers: bool,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gera conteúdo para uma série e um tópico.
    Generate {
        /// Série escolar (1 a 8).
        #[arg(long, short, value_parser = clap::value_parser!(u8).range(1..=8))]
        grade: u8,

        /// Tópico, ex.: "Types of angles".
        topic: String,

        /// Mostra as saídas estruturadas, o contador de retentativas e o log.
        #[arg(long, default_value_t = false)]
        inspect: bool,

        /// Grava o conteúdo gerado em JSON neste arquivo.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Imprime o estado final como JSON em vez de texto formatado.
        #[arg(long, default_value_t = false, conflicts_with = "inspect")]
        json: bool,
    },

    /// Imprime os schemas JSON de Content e Review.
    Schema,
}
