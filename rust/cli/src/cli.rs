//! Command-line definition.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "trivium",
    version,
    about = "Timed multiple-choice trivia in the terminal"
)]
pub struct TriviumCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a quiz: answer with a-d or 1-4, 30 seconds per question
    Play {
        /// Number of questions (5, 10, 15 or 20)
        #[arg(long)]
        amount: Option<u32>,
        /// easy, medium, hard or any
        #[arg(long)]
        difficulty: Option<String>,
        /// Category id (see `trivium categories`) or any
        #[arg(long)]
        category: Option<String>,
        /// Seed for answer order
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the question bank's categories
    Categories,
    /// Show the resolved configuration and where each value came from
    Cfg,
}

impl Commands {
    pub const NAMES: &'static [&'static str] = &["play", "categories", "cfg"];
}
