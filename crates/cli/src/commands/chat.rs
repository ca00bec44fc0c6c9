//! Interactive chat command.

use crate::commands::ask::render_response;
use crate::session::{ChatSession, TurnRefusal, TURN_FAILED_MESSAGE};
use assistant_core::{config::AppConfig, AppResult};
use assistant_knowledge::build_pipeline;
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive session with a per-session question limit
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Questions allowed before the session must be reset
    #[arg(long)]
    pub max_questions: Option<u32>,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let pipeline = build_pipeline(config)?;
        let mut session =
            ChatSession::new(self.max_questions.unwrap_or(config.session.max_questions));

        println!(
            "Ask up to {} questions per session. Commands: /reset, /quit",
            session.max_turns()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("[{} left] > ", session.remaining());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };

            match line.trim() {
                "/quit" | "/exit" => break,
                "/reset" => {
                    session.reset();
                    println!("Session reset.");
                    continue;
                }
                _ => {}
            }

            match session.try_begin_turn(&line) {
                Ok(()) => {}
                Err(TurnRefusal::Blank) => continue,
                Err(refusal) => {
                    println!("{}", refusal);
                    continue;
                }
            }

            match pipeline.answer(&line).await {
                Ok(response) => {
                    print!("{}", render_response(&response));
                    session.complete_turn(response.answer, response.sources);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Turn failed");
                    println!("{}", TURN_FAILED_MESSAGE);
                    session.fail_turn();
                }
            }
            println!();
        }

        tracing::debug!(
            turns = session.turn_count(),
            messages = session.messages().len(),
            "Chat session ended"
        );
        Ok(())
    }
}
