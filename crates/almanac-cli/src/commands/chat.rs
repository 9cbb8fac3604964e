//! Interactive chat session

use crate::app::ChatArgs;
use almanac_core::Agent;
use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::Path;

pub async fn run(args: ChatArgs, agent: &Agent, verbose: bool) -> Result<()> {
    if let Some(ref path) = args.pdf {
        load_and_report(agent, path).await;
    }

    println!("almanac chat - ask about the weather or your documents");
    println!("commands: /load <path.pdf>, /quit");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line == "/quit" || line == "/exit" {
            break;
        }

        if let Some(path) = line.strip_prefix("/load ") {
            load_and_report(agent, Path::new(path.trim())).await;
            continue;
        }

        let outcome = agent.query(line).await;
        if verbose {
            eprintln!("[routed to: {}]", outcome.kind);
        }
        println!("{}", outcome.response);
        println!();
    }

    Ok(())
}

async fn load_and_report(agent: &Agent, path: &Path) {
    match agent.ingest_document(path).await {
        Ok(stats) => println!("Loaded {} ({} chunks indexed)", path.display(), stats.chunks),
        Err(e) => eprintln!("Could not load {}: {}", path.display(), e),
    }
}
