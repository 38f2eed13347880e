use super::AskArgs;
use anyhow::Result;
use folio_client::{ClientError, FolioClient};
use folio_core::ChatSession;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub async fn ask(args: AskArgs, server: &str) -> Result<()> {
    let client = FolioClient::new(server);
    let mut session = ChatSession::new();
    let question = args.question.join(" ");

    match client.send(&mut session, &question).await {
        Ok(reply) => {
            println!("{}", reply.response);
            Ok(())
        }
        Err(ClientError::Transport(e)) => Err(anyhow::anyhow!(
            "HTTP request failed: {}. Is `folio serve` running?",
            e
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn chat(server: &str) -> Result<()> {
    let client = FolioClient::new(server);
    let mut session = ChatSession::new();
    let mut rl = DefaultEditor::new()?;

    println!();
    println!("Folio chat, connected to {}", client.base_url());
    println!("Ask about the site's research, 'exit' to quit.");
    println!();

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if line == "exit" || line == "quit" {
                    println!("Goodbye.");
                    break;
                }

                match client.send(&mut session, &line).await {
                    Ok(reply) => println!("folio> {}\n", reply.response),
                    Err(ClientError::Session(e)) => eprintln!("Error: {}", e),
                    Err(_) => {
                        // The session already holds an assistant message describing the failure.
                        if let Some(last) = session.messages().last() {
                            println!("folio> {}\n", last.content);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(e) => {
                eprintln!("readline error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
