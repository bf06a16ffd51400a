//! interactive input
//!
//! prompts take any reader/writer pair so they run the same against a
//! terminal and against test buffers.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use shards::{MnemonicCodec, MnemonicShare, ShareCodec};

/// read a phrase one word at a time, re-asking on unknown words
pub fn prompt_phrase<M, R, W>(
    codec: &ShareCodec<M>,
    words: usize,
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String>
where
    M: MnemonicCodec,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", prompt)?;
    let mut phrase = Vec::with_capacity(words);

    while phrase.len() < words {
        write!(output, "Word {}: ", phrase.len() + 1)?;
        output.flush()?;

        let word = read_line(input)?.to_lowercase();
        if !codec.dictionary().contains(&word) {
            writeln!(output, "Invalid word: {}", word)?;
            continue;
        }
        phrase.push(word);
    }

    Ok(phrase.join(" "))
}

/// read `count` identifier + phrase pairs
pub fn prompt_shares<M, R, W>(
    codec: &ShareCodec<M>,
    count: usize,
    words: usize,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<MnemonicShare>>
where
    M: MnemonicCodec,
    R: BufRead,
    W: Write,
{
    let mut shares = Vec::with_capacity(count);
    for i in 0..count {
        writeln!(output, "\nShare {}:", i + 1)?;
        write!(output, "Identifier (hex or word): ")?;
        output.flush()?;

        let identifier = read_line(input).context("failed to read identifier")?;
        let phrase = prompt_phrase(
            codec,
            words,
            "Enter the mnemonic phrase for this share:",
            input,
            output,
        )
        .context("failed to read mnemonic")?;

        let share = codec
            .decode(&identifier, &phrase)
            .with_context(|| format!("failed to read share {}", i + 1))?;
        shares.push(share);
    }
    Ok(shares)
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("failed to read input: unexpected end of input");
    }
    Ok(line.trim().to_string())
}
