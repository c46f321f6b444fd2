// src/display_client.rs
// Read-only public display client: polls the server's public view of one
// game and renders the live ball board on a second screen.

use std::error::Error;
use std::io::{Write, stdout};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use serde::Deserialize;
use tokio::time::sleep;

use bingo_hall::config::DisplayConfig;
use bingo_hall::defs::{Letter, NUMBERS_PER_LETTER, TOTALBALLS};

#[derive(Parser)]
#[command(name = "bingo-display", about = "Public second-screen display for a running game")]
struct Args {
    /// Id of the game to display
    #[arg(long)]
    game: String,

    /// Server base URL (overrides the config file)
    #[arg(long)]
    server: Option<String>,

    /// Seconds between refreshes (overrides the config file)
    #[arg(long)]
    refresh: Option<u64>,
}

// Public view document as served by the API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicView {
    game_number: u32,
    event_name: String,
    pattern_name: String,
    pattern_description: String,
    prize: String,
    status: String,
    drawn_balls: Vec<String>,
    last_ball: Option<String>,
    balls_drawn: usize,
    elapsed_seconds: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut config = DisplayConfig::load_or_default();
    if let Some(refresh) = args.refresh {
        config.refresh_interval = refresh;
    }
    let server_url = args.server.unwrap_or_else(|| config.server_url());

    println!("Bingo Public Display");
    print!("Connecting to server at {server_url}...");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()?;

    // Fail fast on an unknown game or unreachable server
    match fetch_view(&client, &server_url, &args.game).await {
        Ok(_) => println!("Ok. ✓"),
        Err(e) => {
            eprintln!("Error. ✗ Failed to reach game: {e}");
            eprintln!("Make sure the bingo server is running on {server_url}");
            return Err(e);
        }
    }

    loop {
        let view = match fetch_view(&client, &server_url, &args.game).await {
            Ok(view) => view,
            Err(e) => {
                eprintln!("Failed to refresh public view: {e}");
                sleep(Duration::from_secs(config.refresh_interval)).await;
                continue;
            }
        };

        render(&view)?;

        if view.status == "completed" {
            println!("\nGame over. Thanks for playing!");
            break;
        }
        sleep(Duration::from_secs(config.refresh_interval)).await;
    }

    Ok(())
}

async fn fetch_view(
    client: &reqwest::Client,
    server_url: &str,
    game_id: &str,
) -> Result<PublicView, Box<dyn Error>> {
    let url = format!("{server_url}/games/{game_id}/public");
    let response = client.get(&url).send().await?;

    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(format!("server returned status {}", response.status()).into())
    }
}

fn render(view: &PublicView) -> Result<(), Box<dyn Error>> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    println!("{} — Game #{}", view.event_name, view.game_number);
    println!("Pattern: {} ({})", view.pattern_name, view.pattern_description);
    println!("Prize: {}    Status: {}    Time: {}", view.prize, view.status, format_time(view.elapsed_seconds));
    println!();

    match &view.last_ball {
        Some(ball) => println!("  >>> {ball} <<<"),
        None => println!("  >>> waiting for first ball <<<"),
    }
    println!("  {} of {} balls drawn", view.balls_drawn, TOTALBALLS);
    println!();

    // One column per letter; drawn numbers are bracketed.
    for letter in Letter::ALL {
        print!("  {letter} ");
        for number in letter.range() {
            let label = format!("{letter}{number}");
            if view.drawn_balls.contains(&label) {
                print!("[{number:2}]");
            } else {
                print!(" {number:2} ");
            }
        }
        println!();
    }

    // Most recent draws first, like the host's call board
    if !view.drawn_balls.is_empty() {
        let recent: Vec<&String> = view.drawn_balls.iter().rev().take(NUMBERS_PER_LETTER as usize).collect();
        println!();
        print!("  Recent: ");
        for ball in recent {
            print!("{ball} ");
        }
        println!();
    }

    out.flush()?;
    Ok(())
}

// Format elapsed seconds as MM:SS
fn format_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
