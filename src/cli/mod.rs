use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the relay proxy server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Start a chat session against a running relay
    Chat {
        /// Full URL of the relay endpoint
        #[arg(long, default_value = "http://127.0.0.1:2222/proxy")]
        proxy_url: String,

        /// Give up on a question after this many seconds
        #[arg(long, default_value = "45")]
        timeout_secs: u64,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Chat {
            proxy_url,
            timeout_secs,
        }) => {
            chat::run(&proxy_url, timeout_secs).await?;
        }
        None => {}
    }

    Ok(())
}
