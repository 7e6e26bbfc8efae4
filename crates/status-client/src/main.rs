//! checkStatus CLI
//!
//! Connects to a checkStatus server, calls one method with a bearer token
//! and prints the reply.
//!
//! ```text
//! status-client [--server URL] [--token TOKEN] [--timeout-ms N] <get-status|get-status-a|health>
//! ```
//!
//! # Exit codes
//!
//! - `0` - call succeeded
//! - `1` - server answered with an error status
//! - `2` - transport failure (unreachable, deadline, bad arguments)

#![warn(clippy::pedantic)]

use clap::{Parser, ValueEnum};
use common::error::RpcError;
use common::secret::SecretString;
use status_client::config::DEFAULT_SERVER_URL;
use status_client::{ClientConfig, Operation, Reply, StatusClient};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Call a checkStatus server.
#[derive(Debug, Parser)]
#[command(name = "status-client", version, about)]
struct Cli {
    /// Server endpoint URL.
    #[arg(long, env = "STATUS_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Bearer token sent in the `authorization` metadata.
    #[arg(long, env = "STATUS_TOKEN", hide_env_values = true)]
    token: String,

    /// Call deadline in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Operation to invoke.
    #[arg(value_enum)]
    operation: Operation,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "status_client=info,status=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::new(cli.server, SecretString::from(cli.token));
    if let Some(ms) = cli.timeout_ms {
        config = config.with_rpc_timeout(Duration::from_millis(ms));
    }

    let result = match StatusClient::connect(&config).await {
        Ok(client) => client.invoke(cli.operation, config.token()).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(reply) => match render(cli.operation, reply, cli.output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to render reply: {e}");
                return ExitCode::from(2);
            }
        },
        Err(e) if e.is_transport_failure() => eprintln!("Transport error: {e}"),
        Err(e) => eprintln!("{}", describe_status(e)),
    }

    ExitCode::from(exit_code(&result))
}

fn render(
    operation: Operation,
    reply: &Reply,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string(reply),
        OutputFormat::Text => Ok(match reply {
            Reply::Status(msg) => format!("{operation}: msg=\"{}\" status={}", msg.msg, msg.status),
            Reply::Health(_) => format!("{operation}: ok"),
        }),
    }
}

fn describe_status(err: &RpcError) -> String {
    format!("gRPC Error: {:?} - {}", err.code(), err.details())
}

fn exit_code(result: &Result<Reply, RpcError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) if e.is_transport_failure() => 2,
        Err(_) => 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proto_gen::{Empty, TestMsg};

    #[test]
    fn test_cli_parses_operation_and_flags() {
        let cli = Cli::try_parse_from([
            "status-client",
            "--server",
            "http://10.0.0.7:50001",
            "--token",
            "abc123",
            "--timeout-ms",
            "250",
            "get-status-a",
        ])
        .unwrap();

        assert_eq!(cli.server, "http://10.0.0.7:50001");
        assert_eq!(cli.token, "abc123");
        assert_eq!(cli.timeout_ms, Some(250));
        assert_eq!(cli.operation, Operation::GetStatusA);
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_cli_rejects_unknown_operation() {
        let result = Cli::try_parse_from(["status-client", "--token", "abc123", "reboot"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_exit_codes() {
        let ok = Ok(Reply::Health(Empty {}));
        assert_eq!(exit_code(&ok), 0);

        let rejected = Err(RpcError::Unauthenticated("Invalid authorization format".into()));
        assert_eq!(exit_code(&rejected), 1);

        let not_found = Err(RpcError::NotFound("Method not found".into()));
        assert_eq!(exit_code(&not_found), 1);

        let unreachable = Err(RpcError::Unavailable("connection refused".into()));
        assert_eq!(exit_code(&unreachable), 2);

        let late = Err(RpcError::DeadlineExceeded("Deadline of 50ms elapsed".into()));
        assert_eq!(exit_code(&late), 2);
    }

    #[test]
    fn test_describe_status() {
        let err = RpcError::Unauthenticated("Invalid authorization format".into());
        assert_eq!(
            describe_status(&err),
            "gRPC Error: Unauthenticated - Invalid authorization format"
        );
    }

    #[test]
    fn test_render_text_and_json() {
        let reply = Reply::Status(TestMsg {
            msg: "ok".to_string(),
            status: 200,
        });

        assert_eq!(
            render(Operation::GetStatus, &reply, OutputFormat::Text).unwrap(),
            "getStatus: msg=\"ok\" status=200"
        );

        let json = render(Operation::GetStatus, &reply, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["msg"], "ok");

        assert_eq!(
            render(Operation::Health, &Reply::Health(Empty {}), OutputFormat::Text).unwrap(),
            "health: ok"
        );
    }
}
