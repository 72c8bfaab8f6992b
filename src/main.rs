use anyhow::{Context, Result};
use nimbus_ui::{view, WeatherModel};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of user input
#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Confirm a search for the text as typed
    Search(String),
    /// Pick the n-th (1-based) candidate
    Select(usize),
    Quit,
}

impl Command {
    /// `shown` is the number of candidates currently listed. A bare number
    /// picks a candidate only when it is in `1..=shown`, otherwise it is
    /// searched for like any other text (e.g. a postal code).
    /// `/select n` always selects.
    fn parse(line: &str, shown: usize) -> Self {
        let trimmed = line.trim();
        if trimmed == "/quit" || trimmed == "/q" {
            return Command::Quit;
        }
        if let Some(Ok(n)) = trimmed
            .strip_prefix("/select")
            .map(|rest| rest.trim().parse::<usize>())
        {
            return Command::Select(n);
        }
        match trimmed.parse::<usize>() {
            Ok(n) if (1..=shown).contains(&n) => Command::Select(n),
            _ => Command::Search(line.to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    nimbus_core::init()?;

    let config = nimbus_core::Config::load_validated()?;
    let (mut model, mut rx) =
        WeatherModel::new(&config.weather).context("Failed to create weather clients")?;

    tracing::info!("Nimbus started");

    println!("Nimbus Weather");
    println!("Type a place and press Enter. Enter a listed number (or /select n) to pick a location, /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                let shown = model.candidates().map_or(0, <[_]>::len);
                match Command::parse(&line, shown) {
                    Command::Quit => break,
                    Command::Select(n) => {
                        if !model.select_position(n) {
                            println!("No location #{} in the current results.", n);
                            continue;
                        }
                    }
                    Command::Search(text) => {
                        model.set_draft(text);
                        model.submit();
                    }
                }
                print!("{}", view::render(&model));
            }
            Some(message) = rx.recv() => {
                if model.apply(message) {
                    print!("{}", view::render(&model));
                }
            }
        }
    }

    tracing::info!("Nimbus shutting down");
    Ok(())
}
