use anyhow::Result;
use clap::Parser;
use requester::commands::{SendOptions, parse_header, parse_payload, send};

/// requester - authenticated REST calls with automatic token refresh
///
/// Sends one JSON request to <BASE_URL><ROUTE>/<CONTROLLER>. If the server
/// answers 401 "Expired Token", a new token is requested from the token
/// endpoint using --identifier and the request is sent once more.
///
/// The base URL and token endpoint can also be set with REQUESTER_BASE_URL and
/// REQUESTER_TOKEN_PATH; REQUESTER_TIMEOUT_SECS sets a request timeout.
#[derive(Parser, Debug)]
#[command(author, version = env!("REQUESTER_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (also via REQUESTER_BASE_URL)
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Token endpoint path below the base URL (also via REQUESTER_TOKEN_PATH)
    #[arg(long = "token-path", value_name = "PATH", global = true)]
    pub token_path: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a request and print the JSON response
    Send(SendArgs),
}

#[derive(clap::Args, Debug)]
pub struct SendArgs {
    /// The endpoint in the format "route/controller"
    #[arg(value_name = "ROUTE/CONTROLLER")]
    pub endpoint: String,

    /// HTTP method: GET, POST, PATCH or DELETE
    #[arg(short = 'X', long = "method", default_value = "GET")]
    pub method: String,

    /// Extra header, may be repeated
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// Bearer token to send
    #[arg(long = "token", env = "REQUESTER_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Caller identifier sent to the token endpoint on refresh
    #[arg(long = "identifier", value_name = "ID")]
    pub identifier: Option<String>,

    /// Query string appended to the URL
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<String>,

    /// JSON request body
    #[arg(short = 'd', long = "data", value_name = "JSON")]
    pub data: Option<String>,
}

impl SendArgs {
    fn into_options(self) -> Result<SendOptions> {
        let mut options = SendOptions::new(self.endpoint.parse()?, self.method.parse()?);
        options.headers = self
            .headers
            .iter()
            .map(|h| parse_header(h))
            .collect::<Result<_>>()?;
        options.access_token = self.token;
        options.identifier = self.identifier;
        options.query = self.query;
        if let Some(data) = &self.data {
            options.payload = parse_payload(data)?;
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = requester::runtime::RealRuntime;

    match cli.command {
        Commands::Send(args) => {
            let options = args.into_options()?;
            let response = send(&runtime, options, cli.base_url, cli.token_path).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use requester::{Endpoint, Method};
    use serde_json::json;

    fn send_args(cli: Cli) -> SendArgs {
        match cli.command {
            Commands::Send(args) => args,
        }
    }

    #[test]
    fn test_cli_send_parsing() {
        let cli = Cli::try_parse_from(["requester", "send", "users/profile"]).unwrap();
        assert_eq!(cli.base_url, None);
        let args = send_args(cli);
        assert_eq!(args.endpoint, "users/profile");
        assert_eq!(args.method, "GET");
        assert!(args.headers.is_empty());
    }

    #[test]
    fn test_cli_send_full_parsing() {
        let cli = Cli::try_parse_from([
            "requester",
            "send",
            "items/create",
            "-X",
            "post",
            "-H",
            "X-One: 1",
            "-H",
            "X-Two: 2",
            "--token",
            "abc",
            "--identifier",
            "user-1",
            "--query",
            "dry=1",
            "-d",
            r#"{"name": "n"}"#,
        ])
        .unwrap();

        let options = send_args(cli).into_options().unwrap();
        assert_eq!(options.endpoint, Endpoint::new("items", "create"));
        assert_eq!(options.method, Method::Post);
        assert_eq!(
            options.headers,
            vec![
                ("X-One".to_string(), "1".to_string()),
                ("X-Two".to_string(), "2".to_string())
            ]
        );
        assert_eq!(options.access_token.as_deref(), Some("abc"));
        assert_eq!(options.identifier.as_deref(), Some("user-1"));
        assert_eq!(options.query.as_deref(), Some("dry=1"));
        assert_eq!(options.payload, json!({"name": "n"}));
    }

    #[test]
    fn test_cli_global_options_parsing() {
        let cli = Cli::try_parse_from([
            "requester",
            "--base-url",
            "http://localhost:8080",
            "send",
            "a/b",
            "--token-path",
            "auth/token",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cli.token_path.as_deref(), Some("auth/token"));
    }

    #[test]
    fn test_cli_rejects_bad_endpoint_and_method() {
        let cli = Cli::try_parse_from(["requester", "send", "nocontroller"]).unwrap();
        assert!(send_args(cli).into_options().is_err());

        let cli = Cli::try_parse_from(["requester", "send", "a/b", "-X", "PUT"]).unwrap();
        assert!(send_args(cli).into_options().is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["requester", "a/b"]);
        assert!(result.is_err());
    }
}
