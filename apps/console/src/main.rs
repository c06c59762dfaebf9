use anyhow::Result;
use clap::Parser;
use roster_client::PersonaStore;
use shared::{domain::PersonaId, protocol::Persona};
use tokio::io::{AsyncBufReadExt, BufReader};

mod config;
mod controller;

use controller::RosterController;

#[derive(Parser, Debug)]
struct Args {
    /// Backend base URL; overrides roster.toml and environment settings.
    #[arg(long)]
    server_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(server_url) = args.server_url {
        settings.base_url = server_url;
    }
    let settings = config::validate_settings(settings);

    let store = PersonaStore::new(settings.base_url);
    tracing::info!(base_url = store.base_url(), "persona roster console starting");
    let mut controller = RosterController::new(store.clone());

    controller.load().await;
    render(controller.personas());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (line.as_str(), ""),
        };

        match command {
            "list" => {
                controller.load().await;
                render(controller.personas());
            }
            "add" => {
                controller.draft_name = rest.to_string();
                controller.add().await;
                render(controller.personas());
            }
            "rm" => match rest.trim().parse::<i64>() {
                Ok(id) => {
                    controller.remove(PersonaId(id)).await;
                    render(controller.personas());
                }
                Err(_) => println!("usage: rm <id>"),
            },
            "set" => {
                let parsed = rest.trim().split_once(' ').and_then(|(id, name)| {
                    id.parse::<i64>().ok().map(|id| (id, name.to_string()))
                });
                match parsed {
                    Some((id, name)) => {
                        controller.rename(PersonaId(id), name).await;
                        render(controller.personas());
                    }
                    None => println!("usage: set <id> <name>"),
                }
            }
            "find" => match rest.trim().parse::<i64>() {
                Ok(id) => match store.find_by_id(PersonaId(id)).await {
                    Some(persona) => println!("  {:>4}  {}", persona.id.0, persona.name),
                    None => println!("no cached persona with id {id}"),
                },
                Err(_) => println!("usage: find <id>"),
            },
            "quit" | "exit" => break,
            "" => {}
            _ => print_help(),
        }
    }

    Ok(())
}

fn render(personas: &[Persona]) {
    if personas.is_empty() {
        println!("(no personas)");
        return;
    }
    for persona in personas {
        println!("  {:>4}  {}", persona.id.0, persona.name);
    }
}

fn print_help() {
    println!("commands: list | add <name> | rm <id> | set <id> <name> | find <id> | quit");
}
