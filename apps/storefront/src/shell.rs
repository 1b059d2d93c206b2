//! Interactive loop: reads commands from stdin and applies backend results.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tokio::select! {                                                       │
//! │      line = stdin.next_line()  ──► parse ──► execute ──► print screen  │
//! │      event = results.recv()    ──► deliver ──► print screen            │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both branches run on this task, so commands and results never dispatch
//! at the same time.
//!
//! Screens go to stdout. Logs go to stderr so they never interleave with
//! what the user reads.

use std::fmt::Display;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::app::{Flow, Storefront};
use crate::backend::BackendResults;
use crate::error::{AppError, AppResult, InputError};
use crate::input::{UserCommand, HELP};

async fn print(out: &mut io::Stdout, text: impl Display) -> AppResult<()> {
    out.write_all(format!("{text}\n").as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Runs until `quit` or end of input.
pub async fn run(app: &Storefront, mut results: BackendResults) -> AppResult<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut out = io::stdout();

    print(&mut out, HELP).await?;
    print(&mut out, app.render()).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("End of input");
                    break;
                };

                match line.parse::<UserCommand>().map_err(AppError::from).and_then(|c| app.execute(c)) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Help) => print(&mut out, HELP).await?,
                    Ok(Flow::Continue) => print(&mut out, app.render()).await?,
                    Err(AppError::Input(InputError::Empty)) => {}
                    Err(AppError::Input(e @ InputError::Unknown(_))) => {
                        print(&mut out, format!("{e}\n\n{HELP}")).await?;
                    }
                    Err(AppError::Input(e)) => print(&mut out, e).await?,
                    Err(e) => {
                        error!("Command failed: {}", e);
                        print(&mut out, format!("Error: {e}")).await?;
                        print(&mut out, app.render()).await?;
                    }
                }
            }
            Some(event) = results.recv() => {
                if let Err(e) = app.deliver(event) {
                    error!("Handling backend result failed: {}", e);
                    print(&mut out, format!("Error: {e}")).await?;
                }
                print(&mut out, app.render()).await?;
            }
        }
    }

    info!("Leaving the store");
    Ok(())
}
