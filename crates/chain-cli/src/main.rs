use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chain-cli")]
#[command(about = "CLI client for the chain node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:9000)
    #[arg(long, global = true, default_value = "http://127.0.0.1:9000")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every block
    List,
    /// Fetch one block by index
    Get {
        #[arg(long)]
        index: u64,
    },
    /// Append a block built from the given objects
    Append {
        #[arg(long = "a")]
        object_a: String,
        #[arg(long = "b")]
        object_b: String,
        #[arg(long = "c")]
        object_c: String,
        /// Free-text annotation, not covered by the block hash
        #[arg(long)]
        meta: Option<String>,
    },
    /// Create the genesis block if the chain is empty
    Genesis,
    /// Liveness probe
    Alive,
}

#[derive(Serialize, Debug, PartialEq)]
struct PayloadIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    metainfo: Option<String>,
    objecta: String,
    objectb: String,
    objectc: String,
}

fn url(node: &str, path: &str) -> String {
    format!("{}{path}", node.trim_end_matches('/'))
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let request = match cli.cmd {
        Command::List => client.get(url(&cli.node, "/api/v1/blockchain/list")),
        Command::Get { index } => client.get(url(&cli.node, &format!("/api/v1/blockchain/{index}"))),
        Command::Append {
            object_a,
            object_b,
            object_c,
            meta,
        } => {
            let payload = PayloadIn {
                metainfo: meta,
                objecta: object_a,
                objectb: object_b,
                objectc: object_c,
            };
            client
                .post(url(&cli.node, "/api/v1/blockchain"))
                .json(&payload)
        }
        Command::Genesis => client.post(url(&cli.node, "/api/v1/genesis")),
        Command::Alive => client.get(url(&cli.node, "/api/v2/sys/info/isalive")),
    };

    debug!(?request, "sending request");
    let res = request.send().await?;
    let status = res.status();
    let body = res.text().await?;
    println!("status: {}", status);
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{body}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        assert_eq!(
            url("http://localhost:9000/", "/api/v1/genesis"),
            "http://localhost:9000/api/v1/genesis"
        );
    }

    #[test]
    fn append_args_parse() {
        let cli = Cli::try_parse_from([
            "chain-cli", "append", "--a", "A", "--b", "B", "--c", "C", "--meta", "note",
        ])
        .unwrap();
        match cli.cmd {
            Command::Append {
                object_a, meta, ..
            } => {
                assert_eq!(object_a, "A");
                assert_eq!(meta.as_deref(), Some("note"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn payload_omits_missing_meta() {
        let payload = PayloadIn {
            metainfo: None,
            objecta: "A".into(),
            objectb: "B".into(),
            objectc: "C".into(),
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"objecta":"A","objectb":"B","objectc":"C"}"#
        );
    }
}
