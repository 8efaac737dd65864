use anyhow::{bail, Context, Result};
use cfgparse::{Parser, StripMargin};
use std::fs;
use std::io::{stdin, Read};
use tracing::Level;

#[macro_use]
extern crate clap;
use clap::App;

fn main() -> Result<()> {
    let yaml = load_yaml!("main.yml");
    let matches = App::from_yaml(yaml).get_matches();
    init_logging(matches.occurrences_of("verbose"));

    let text = if let Some(path) = matches.value_of_os("config_file") {
        fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?
    } else {
        let mut text = String::new();
        stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        text
    };
    let text = if matches.is_present("strip_margin") {
        let margin = margin_char(matches.value_of("margin_char"))?;
        text.strip_margin_with(margin)
    } else {
        text
    };

    let config = Parser::new(&text).parse()?;
    println!("{:#?}", config);
    Ok(())
}

fn margin_char(arg: Option<&str>) -> Result<char> {
    let arg = match arg {
        Some(arg) => arg,
        None => return Ok('|'),
    };
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => bail!("margin must be a single character, got {:?}", arg),
    }
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
