//! recovery-shards CLI
//!
//! Splits a BIP-39 recovery phrase into mnemonic shares and recovers it.
//!
//! ## Usage
//!
//! ```bash
//! # Split a phrase read from a file into 5 shares, any 3 recover it
//! recovery-shards split -n 5 -k 3 --in phrase.txt --out shares/
//!
//! # Split a phrase typed word by word, all shares in one file
//! recovery-shards split -n 3 -k 2 --out shares.txt
//!
//! # Recover from a share file or directory
//! recovery-shards recover --in shares/
//!
//! # Recover from shares typed in
//! recovery-shards recover --shares 3
//!
//! # Generate a throwaway phrase for testing
//! recovery-shards generate
//! ```

mod files;
mod prompt;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::RngCore;
use shards::{MnemonicCodec, Recoverer, ShareCodec, ShareSet, Splitter};
use tracing::info;

use crate::files::OutputTarget;

#[derive(Parser)]
#[command(name = "recovery-shards")]
#[command(about = "Split a BIP-39 recovery phrase into mnemonic shares")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random recovery phrase
    Generate {
        /// Number of words (12, 15, 18, 21 or 24)
        #[arg(short, long, default_value = "24", value_parser = parse_word_count)]
        words: usize,
    },

    /// Split a recovery phrase into shares
    Split {
        /// Total number of shares to create
        #[arg(short = 'n', long, env = "SHARDS_TOTAL", default_value = "3")]
        total: usize,

        /// Minimum number of shares needed to recover the phrase
        #[arg(short = 'k', long, env = "SHARDS_THRESHOLD", default_value = "2")]
        threshold: usize,

        /// File containing the recovery phrase (prompts when omitted)
        #[arg(short, long = "in")]
        input: Option<PathBuf>,

        /// Directory (trailing slash or existing) or file to save the shares
        #[arg(short, long)]
        out: Option<String>,

        /// Number of words to prompt for
        #[arg(long, default_value = "24", value_parser = parse_word_count)]
        words: usize,

        /// Print the shares as JSON
        #[arg(long)]
        json: bool,

        /// Also print each identifier as a single dictionary word
        #[arg(long)]
        word_ids: bool,
    },

    /// Recover a recovery phrase from shares
    Recover {
        /// Share file, or directory of share files
        #[arg(short, long = "in", conflicts_with = "shares")]
        input: Option<PathBuf>,

        /// Number of shares to type in
        #[arg(short, long)]
        shares: Option<usize>,

        /// Number of words per share when typing
        #[arg(long, default_value = "24", value_parser = parse_word_count)]
        words: usize,
    },
}

fn parse_word_count(s: &str) -> std::result::Result<usize, String> {
    let words: usize = s.parse().map_err(|e| format!("{}", e))?;
    if shards::mnemonic::VALID_WORD_COUNTS.contains(&words) {
        Ok(words)
    } else {
        Err(format!("word count must be one of 12, 15, 18, 21, 24, got {}", words))
    }
}

fn main() {
    let cli = Cli::parse();

    // Setup tracing
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(format!("recovery_shards={level},shards={level}"))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = run(cli, &mut stdin.lock(), &mut stdout.lock()) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run<R: BufRead, W: Write>(cli: Cli, input: &mut R, output: &mut W) -> Result<()> {
    match cli.command {
        Commands::Generate { words } => run_generate(words, output),
        Commands::Split {
            total,
            threshold,
            input: phrase_file,
            out,
            words,
            json,
            word_ids,
        } => {
            let phrase = {
                let codec = ShareCodec::default();
                match phrase_file {
                    Some(path) => files::read_phrase(&codec, &path)
                        .context("error reading input file")?,
                    None => prompt::prompt_phrase(
                        &codec,
                        words,
                        &format!("Enter your {words}-word recovery phrase, one word at a time:"),
                        input,
                        output,
                    )?,
                }
            };
            run_split(&phrase, total, threshold, out, json, word_ids, output)
        }
        Commands::Recover {
            input: share_path,
            shares,
            words,
        } => run_recover(share_path, shares, words, input, output),
    }
}

fn run_generate<W: Write>(words: usize, output: &mut W) -> Result<()> {
    let mut entropy = vec![0u8; words * 4 / 3];
    rand::thread_rng().fill_bytes(&mut entropy);
    let phrase = ShareCodec::default().mnemonic().encode(&entropy)?;

    writeln!(output, "Generated mnemonic:")?;
    writeln!(output, "\n{}", phrase)?;
    Ok(())
}

fn run_split<W: Write>(
    phrase: &str,
    total: usize,
    threshold: usize,
    out: Option<String>,
    json: bool,
    word_ids: bool,
    output: &mut W,
) -> Result<()> {
    let splitter = Splitter::default();
    let set = splitter.split(phrase, total, threshold)?;
    info!(total, threshold, "generated shares");

    if let Some(out) = out {
        let target = OutputTarget::from_path(&out);
        for path in files::write_shares(&set.shares, &target)? {
            // stdout stays pure json
            if json {
                info!(path = %path.display(), "saved share");
            } else {
                writeln!(output, "Saved share to {}", path.display())?;
            }
        }
    }

    if json {
        serde_json::to_writer_pretty(&mut *output, &set)?;
        writeln!(output)?;
    } else {
        writeln!(
            output,
            "Generated {} shares with a {}-out-of-{} threshold.",
            set.total, set.threshold, set.total
        )?;
        print_shares(splitter.codec(), &set, word_ids, output)?;
    }
    Ok(())
}

fn print_shares<M: MnemonicCodec, W: Write>(
    codec: &ShareCodec<M>,
    set: &ShareSet,
    word_ids: bool,
    output: &mut W,
) -> Result<()> {
    writeln!(output, "Shares:")?;
    for share in set {
        writeln!(output, "{}", codec.render(share))?;
        if word_ids {
            if let Some(line) = codec.render_word(share) {
                writeln!(output, "{}", line)?;
            }
        }
    }
    Ok(())
}

fn run_recover<R: BufRead, W: Write>(
    share_path: Option<PathBuf>,
    count: Option<usize>,
    words: usize,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let recoverer = Recoverer::default();
    let codec = recoverer.codec();

    let shares = match (share_path, count) {
        (Some(path), _) => files::read_shares(codec, &path)?,
        (None, Some(count)) if count > 0 => {
            prompt::prompt_shares(codec, count, words, input, output)?
        }
        _ => bail!("either --shares or --in must be provided to recover shares"),
    };

    let phrase = recoverer.recover(&shares)?;
    writeln!(output, "Recovered mnemonic phrase:")?;
    writeln!(output, "\n{}", phrase)?;
    Ok(())
}
