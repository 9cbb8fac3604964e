//! One-shot question command

use crate::app::AskArgs;
use almanac_core::Agent;
use anyhow::{bail, Result};

pub async fn run(args: AskArgs, agent: &Agent, verbose: bool) -> Result<()> {
    let query = args.query.join(" ");
    if query.trim().is_empty() {
        bail!("empty query; pass a question, e.g. `almanac ask what's the weather in Paris`");
    }

    if let Some(ref path) = args.pdf {
        let stats = agent.ingest_document(path).await?;
        eprintln!(
            "Loaded {} ({} chunks indexed)",
            path.display(),
            stats.chunks
        );
    }

    let outcome = agent.query(&query).await;

    if verbose {
        eprintln!("[routed to: {}]", outcome.kind);
        if let Some(ref error) = outcome.error {
            eprintln!("[degraded: {}]", error);
        }
    }

    println!("{}", outcome.response);
    Ok(())
}
