use anyhow::{Context, Result};
use console::{Color, Style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use passgauge::analyzer::{Analysis, Strength, Tier};
use rpassword::read_password;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

pub const MAX_PASSWORD_BYTES: usize = 64 * 1024;

const METER_WIDTH: u64 = 40;

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "✗")
    } else {
        ("+", "-")
    }
}

fn warn_control_characters(s: &str) -> Result<()> {
    let positions: Vec<String> = s
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos.to_string())
        .collect();

    if !positions.is_empty() {
        log::warn!("password contains {} control character(s)", positions.len());
        Term::stderr().write_line(&format!(
            "WARNING: Password contains {} control character(s) at position(s): {}",
            positions.len(),
            positions.join(", ")
        ))?;
    }

    Ok(())
}

/// NFC-normalizes the password without trimming: surrounding whitespace is
/// part of what gets analyzed.
fn normalize_and_validate(s: &str) -> Result<Zeroizing<String>> {
    if s.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let normalized = Zeroizing::new(s.nfc().collect::<String>());

    if normalized.len() > MAX_PASSWORD_BYTES {
        anyhow::bail!(
            "Password too long ({} bytes, maximum is {})",
            normalized.len(),
            MAX_PASSWORD_BYTES
        );
    }

    warn_control_characters(&normalized)?;

    Ok(normalized)
}

pub fn prompt_password() -> Result<Zeroizing<String>> {
    print!("Password: ");
    io::stdout().flush()?;

    let password = Zeroizing::new(read_password().context("Failed to read password")?);
    normalize_and_validate(&password)
}

pub fn read_password_line() -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let password = line.strip_suffix('\n').unwrap_or(&line);
    let password = password.strip_suffix('\r').unwrap_or(password);
    normalize_and_validate(password)
}

pub fn parse_seed(hex: &str) -> Result<[u8; 32]> {
    let hex = hex.trim();
    if hex.len() != 64 || !hex.is_ascii() {
        anyhow::bail!("Seed must be exactly 64 hexadecimal characters");
    }

    let mut seed = [0u8; 32];
    for (i, byte) in seed.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .with_context(|| format!("Invalid hexadecimal at position {}", i * 2))?;
    }

    Ok(seed)
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Green => Color::Green,
        Tier::LightGreen => Color::Green,
        Tier::Blue => Color::Blue,
        Tier::Yellow => Color::Yellow,
        Tier::Orange => Color::Color256(208),
        Tier::Red => Color::Red,
    }
}

fn strength_style(strength: Strength, options: &DisplayOptions) -> Style {
    if !options.color_support {
        return Style::new();
    }

    let style = Style::new().fg(tier_color(strength.tier()));
    match strength.tier() {
        Tier::Green => style.bold(),
        _ => style,
    }
}

fn color_name(tier: Tier) -> &'static str {
    match tier {
        Tier::Green | Tier::LightGreen => "green",
        Tier::Blue => "blue",
        Tier::Yellow => "yellow",
        Tier::Orange => "208",
        Tier::Red => "red",
    }
}

fn show_meter(analysis: &Analysis, options: &DisplayOptions) {
    let template = if options.color_support {
        format!(
            "  {{bar:{}.{}}} {{pos:>3}}%",
            METER_WIDTH,
            color_name(analysis.strength.tier())
        )
    } else {
        format!("  {{bar:{}}} {{pos:>3}}%", METER_WIDTH)
    };

    let progress_chars = if options.unicode_support {
        "█░"
    } else {
        "#-"
    };

    let pb = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
    pb.set_style(
        ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(progress_chars),
    );
    pb.set_position(analysis.score.round() as u64);
    pb.abandon();
}

pub fn display_generated(password: &str, options: &DisplayOptions) {
    if options.quiet {
        println!("{}", password);
    } else {
        println!("Generated:\n{}\n", password);
    }
}

/// Prints the analysis as JSON, with the generated password alongside when there is one.
pub fn display_json(analysis: &Analysis, generated: Option<&str>) -> Result<()> {
    let json = render_json(analysis, generated)?;
    println!("{}", &*json);
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(flatten)]
    analysis: &'a Analysis,
}

fn render_json(analysis: &Analysis, generated: Option<&str>) -> Result<Zeroizing<String>> {
    let report = JsonReport {
        password: generated,
        analysis,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize analysis")?;
    Ok(Zeroizing::new(json))
}

pub fn display_analysis(analysis: &Analysis, options: &DisplayOptions) {
    let style = strength_style(analysis.strength, options);

    if options.quiet {
        println!(
            "{} ({:.0}/100, {:.1} bits)",
            style.apply_to(analysis.strength),
            analysis.score,
            analysis.entropy
        );
        return;
    }

    println!(
        "Strength: {} ({:.0}/100)",
        style.apply_to(analysis.strength),
        analysis.score
    );
    show_meter(analysis, options);
    println!();

    display_checks(analysis, options);
    display_stats(analysis, options);
    display_feedback(analysis, options);
}

fn display_checks(analysis: &Analysis, options: &DisplayOptions) {
    let (check_ok, check_fail) = get_status_symbols(options.unicode_support);
    let results = analysis.checks.results();

    println!("Checks:");

    for (i, (kind, passed)) in results.into_iter().enumerate() {
        let prefix = if i == results.len() - 1 {
            "└─"
        } else {
            "├─"
        };

        let style = match (options.color_support, passed) {
            (false, _) => Style::new(),
            (true, true) => Style::new().green(),
            (true, false) => Style::new().red(),
        };
        let status = if passed { check_ok } else { check_fail };

        println!(
            "  {} {} {}",
            prefix,
            style.apply_to(format!("[{}]", status)),
            kind.label()
        );
    }

    println!();
}

fn display_stats(analysis: &Analysis, options: &DisplayOptions) {
    let style = strength_style(analysis.strength, options);
    let length = analysis.length();

    println!("Stats:");
    println!(
        "  ├─ Entropy    {} bits",
        style.apply_to(format!("{:.1}", analysis.entropy))
    );
    println!(
        "  ├─ Length     {} {}",
        length,
        if length == 1 { "char" } else { "chars" }
    );
    println!("  ├─ Charset    {} chars", analysis.charset_size());
    println!("  └─ Raw score  {}/10", analysis.raw_score());

    if !analysis.dictionary_words.is_empty() {
        let warn = if options.color_support {
            Style::new().yellow()
        } else {
            Style::new()
        };
        println!("\nDictionary words:");
        for (i, word) in analysis.dictionary_words.iter().enumerate() {
            let prefix = if i == analysis.dictionary_words.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!("  {} {}", prefix, warn.apply_to(word));
        }
    }

    println!();
}

fn display_feedback(analysis: &Analysis, options: &DisplayOptions) {
    let (check_ok, check_fail) = get_status_symbols(options.unicode_support);
    let all_passed = analysis.checks.all_passed();

    let style = match (options.color_support, all_passed) {
        (false, _) => Style::new(),
        (true, true) => Style::new().green(),
        (true, false) => Style::new().yellow(),
    };
    let status = if all_passed { check_ok } else { check_fail };

    println!("Feedback:");
    for message in &analysis.feedback {
        println!("  {} {}", style.apply_to(format!("[{}]", status)), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_status_symbols_unicode() {
        let (ok, fail) = get_status_symbols(true);
        assert_eq!(ok, "✓");
        assert_eq!(fail, "✗");
    }

    #[test]
    fn test_get_status_symbols_ascii() {
        let (ok, fail) = get_status_symbols(false);
        assert_eq!(ok, "+");
        assert_eq!(fail, "-");
    }

    #[test]
    fn test_normalize_nfc() {
        let nfc = "café";
        let nfd = "cafe\u{0301}";

        assert_ne!(nfc.as_bytes(), nfd.as_bytes());

        let normalized_nfc = normalize_and_validate(nfc).unwrap();
        let normalized_nfd = normalize_and_validate(nfd).unwrap();

        assert_eq!(*normalized_nfc, *normalized_nfd);
        assert_eq!(normalized_nfd.chars().count(), 4);
    }

    #[test]
    fn test_whitespace_preserved() {
        let normalized = normalize_and_validate("  pass word  ").unwrap();
        assert_eq!(*normalized, "  pass word  ");
    }

    #[test]
    fn test_empty_rejected() {
        let err = normalize_and_validate("").unwrap_err();
        assert_eq!(err.to_string(), "Password cannot be empty");
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "a".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(normalize_and_validate(&long).is_err());
        assert!(normalize_and_validate(&long[1..]).is_ok());
    }

    #[test]
    fn test_parse_seed() {
        let hex = "00".repeat(31) + "ff";
        let seed = parse_seed(&hex).unwrap();
        assert_eq!(seed[0], 0);
        assert_eq!(seed[31], 0xff);

        let upper = "AB".repeat(32);
        assert_eq!(parse_seed(&upper).unwrap(), [0xab; 32]);
    }

    #[test]
    fn test_parse_seed_invalid() {
        assert!(parse_seed("abcd").is_err());
        assert!(parse_seed(&"zz".repeat(32)).is_err());
        assert!(parse_seed(&"é".repeat(32)).is_err());
    }

    #[test]
    fn test_strength_style_plain_without_color() {
        let options = DisplayOptions {
            unicode_support: false,
            color_support: false,
            quiet: false,
        };
        let style = strength_style(Strength::VeryWeak, &options);
        assert_eq!(
            style.apply_to("Very Weak").force_styling(false).to_string(),
            "Very Weak"
        );
    }

    #[test]
    fn test_render_json() {
        let analysis = passgauge::analyze("Password123!");

        let json = render_json(&analysis, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 60.0);
        assert_eq!(value["strength"], "Good");
        assert!(value.get("password").is_none());

        let json = render_json(&analysis, Some("Password123!")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["password"], "Password123!");
    }

    #[test]
    fn test_render_json_keeps_field_order() {
        let analysis = passgauge::analyze("Password123!");
        let json = render_json(&analysis, Some("Password123!")).unwrap();

        let position = |key: &str| json.find(&format!("\"{}\"", key)).unwrap();
        let keys = [
            "password",
            "score",
            "strength",
            "feedback",
            "checks",
            "dictionaryWords",
            "entropy",
        ];
        for pair in keys.windows(2) {
            assert!(
                position(pair[0]) < position(pair[1]),
                "{} should come before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(color_name(Tier::LightGreen), "green");
        assert_eq!(color_name(Tier::Orange), "208");
    }
}
