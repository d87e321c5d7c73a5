mod ui;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(
    name = "passgauge",
    version,
    author,
    about = "Offline password strength analysis and strong password generation"
)]
struct Cli {
    #[arg(short, long, value_enum, default_value = "analyze")]
    mode: Mode,

    /// Read the password as a single line from standard input
    #[arg(long)]
    stdin: bool,

    /// 64 hex characters; makes generated passwords reproducible
    #[arg(long, value_name = "HEX")]
    seed: Option<String>,

    /// Print the analysis as JSON
    #[arg(short, long)]
    json: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Mode {
    Analyze,
    Generate,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    let mut generated = false;
    let password: Zeroizing<String> = match cli.mode {
        Mode::Analyze => {
            if cli.seed.is_some() {
                anyhow::bail!("--seed only applies to --mode generate");
            }
            if cli.stdin {
                ui::read_password_line()?
            } else {
                ui::prompt_password()?
            }
        }
        Mode::Generate => {
            if cli.stdin {
                anyhow::bail!("--stdin only applies to --mode analyze");
            }
            let password = match cli.seed.as_deref() {
                Some(hex) => passgauge::generate_seeded(&ui::parse_seed(hex)?),
                None => passgauge::generate(),
            };
            if !cli.json {
                ui::display_generated(&password, &options);
            }
            generated = true;
            password
        }
    };

    let analysis = passgauge::analyze(&password);
    log::info!(
        "strength {} at {:.0}/100",
        analysis.strength,
        analysis.score
    );

    if cli.json {
        ui::display_json(&analysis, generated.then_some(password.as_str()))?;
    } else {
        ui::display_analysis(&analysis, &options);
    }

    Ok(())
}
