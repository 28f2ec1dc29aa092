use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use libzhuyin::{Engine, KeyOutcome, KeyboardLayout, LayoutKind, StaticLanguageModel, Syllable, ZhuyinConfig};

#[derive(Parser)]
#[command(name = "libzhuyin")]
#[command(about = "Zhuyin/Bopomofo syllable codec and decoder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "libchinese_lattice=trace")
    #[arg(global = true, long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw key sequence into a syllable
    Syllable {
        /// Keys as typed, e.g. "5j;3" on the standard layout
        keys: String,
        #[arg(short, long, default_value = "standard")]
        layout: LayoutKind,
    },
    /// Convert Hanyu Pinyin to Bopomofo and back
    Pinyin {
        /// Pinyin syllables separated by spaces, e.g. "zhong1 wen2"
        #[arg(required = true)]
        syllables: Vec<String>,
        /// Write ü as v
        #[arg(long)]
        use_v: bool,
    },
    /// Run key strokes through the decode engine and print the result
    Decode {
        /// Keys as typed; a space finishes a syllable without tone mark
        keys: String,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Interactive REPL mode
    Repl {
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(clap::Args)]
struct SessionArgs {
    /// Keyboard layout; overrides the config file
    #[arg(short, long)]
    layout: Option<LayoutKind>,
    /// Language model as JSON: {"reading": [["value", score], ...]}
    #[arg(long)]
    lm: Option<PathBuf>,
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SessionArgs {
    fn build_engine(&self) -> Result<Engine<StaticLanguageModel>> {
        let mut config = match &self.config {
            Some(path) => ZhuyinConfig::load_toml(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ZhuyinConfig::default(),
        };
        if let Some(layout) = self.layout {
            config.keyboard_layout = layout;
        }

        let lm = match &self.lm {
            Some(path) => StaticLanguageModel::load_json(path)
                .with_context(|| format!("loading language model {}", path.display()))?,
            None => build_demo_model(),
        };
        info!(entries = lm.len(), layout = %config.keyboard_layout, "engine ready");
        Ok(Engine::new(lm, config))
    }
}

fn build_demo_model() -> StaticLanguageModel {
    let mut lm = StaticLanguageModel::new();
    let entries: [(&str, &str, f64); 16] = [
        ("ㄋㄧˇ", "你", -3.6),
        ("ㄋㄧˇ", "妳", -4.9),
        ("ㄏㄠˇ", "好", -3.4),
        ("ㄏㄠˋ", "號", -4.2),
        ("ㄋㄧˇ-ㄏㄠˇ", "你好", -4.5),
        ("ㄓㄨㄥ", "中", -3.3),
        ("ㄓㄨㄥ", "終", -4.6),
        ("ㄨㄣˊ", "文", -3.5),
        ("ㄨㄣˊ", "聞", -4.4),
        ("ㄓㄨㄥ-ㄨㄣˊ", "中文", -4.3),
        ("ㄊㄞˊ", "台", -3.9),
        ("ㄊㄞˊ", "臺", -4.1),
        ("ㄅㄟˇ", "北", -3.7),
        ("ㄊㄞˊ-ㄅㄟˇ", "台北", -4.2),
        ("ㄕˋ", "是", -2.9),
        ("ㄕˋ", "市", -3.8),
    ];
    for (reading, value, score) in entries {
        lm.insert(reading, value, score);
    }
    lm
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(whole_seconds)
        .unwrap_or_default()
}

/// Saturates at `i64::MAX` instead of wrapping.
fn whole_seconds(elapsed: Duration) -> i64 {
    i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
}

fn print_state(engine: &Engine<StaticLanguageModel>) {
    println!("composing: {}", engine.composing_text());
    for (i, c) in engine.candidates().iter().enumerate() {
        println!("  {}. {} ({})", i + 1, c.displayed_text, c.reading);
    }
}

fn handle_syllable_command(keys: &str, layout: LayoutKind) {
    let layout = KeyboardLayout::new(layout);
    let syllable = layout.syllable_from_key_sequence(keys);
    println!("{syllable:?}");
    println!("bopomofo: {}", syllable.composed_string());
    println!("pinyin:   {}", syllable.to_hanyu_pinyin(true, false));
    println!("standard: {}", KeyboardLayout::standard().key_sequence_from_syllable(syllable));
}

fn handle_pinyin_command(syllables: &[String], use_v: bool) {
    for text in syllables {
        let syllable = Syllable::from_hanyu_pinyin(text);
        println!(
            "{} -> {} -> {}",
            text,
            syllable.composed_string(),
            syllable.to_hanyu_pinyin(true, use_v)
        );
    }
}

fn handle_decode_command(keys: &str, session: &SessionArgs) -> Result<()> {
    let mut engine = session.build_engine()?;
    let timestamp = now();
    for key in keys.chars() {
        if engine.handle_key(key, timestamp) == KeyOutcome::Rejected {
            eprintln!("warning: no candidates for the syllable ending at {key:?}");
        }
    }
    print_state(&engine);
    Ok(())
}

fn run_repl(session: &SessionArgs) -> Result<()> {
    let mut engine = session.build_engine()?;

    println!("libzhuyin REPL ({} layout)", engine.config().keyboard_layout);
    println!("Type keys and press Enter. Commands:");
    println!("  :pick N     select candidate N");
    println!("  :bs         backspace");
    println!("  :commit     commit and start over");
    println!("  :layout L   switch layout");
    println!("Ctrl-D to exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim_end_matches('\r');
        let timestamp = now();

        match line.split_once(' ').unwrap_or((line, "")) {
            (":pick", n) => {
                let Ok(index) = n.trim().parse::<usize>() else {
                    eprintln!("usage: :pick N");
                    continue;
                };
                let candidates = engine.candidates();
                let Some(candidate) = index.checked_sub(1).and_then(|i| candidates.get(i)) else {
                    eprintln!("no candidate {index}");
                    continue;
                };
                engine.select_candidate(candidate, timestamp);
            }
            (":bs", _) => {
                engine.backspace();
            }
            (":commit", _) => {
                println!("committed: {}", engine.commit());
                continue;
            }
            (":layout", name) => match name.parse::<LayoutKind>() {
                Ok(kind) => engine.set_layout(kind),
                Err(e) => eprintln!("{e}"),
            },
            (command, _) if command.starts_with(':') => {
                eprintln!("unknown command {command}");
                continue;
            }
            _ => {
                for key in line.chars() {
                    if engine.handle_key(key, timestamp) == KeyOutcome::Rejected {
                        eprintln!("no candidates for that syllable");
                    }
                }
            }
        }
        print_state(&engine);
        io::stdout().flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Commands::Syllable { keys, layout }) => handle_syllable_command(&keys, layout),
        Some(Commands::Pinyin { syllables, use_v }) => handle_pinyin_command(&syllables, use_v),
        Some(Commands::Decode { keys, session }) => handle_decode_command(&keys, &session)?,
        Some(Commands::Repl { session }) => run_repl(&session)?,
        None => bail!("no command given; try --help"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_saturate() {
        assert_eq!(whole_seconds(Duration::from_millis(1500)), 1);
        assert_eq!(whole_seconds(Duration::from_secs(u64::MAX)), i64::MAX);
        assert!(now() > 0);
    }
}
