use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use inspector_core::{HttpRequest, HttpResponse};
use inspector_server::client;

#[derive(Parser)]
#[command(name = "inspect-client")]
#[command(about = "Send raw HTTP/1.1 requests and print the response", long_about = None)]
struct Cli {
    /// Seconds to wait for the full response
    #[arg(short, long, default_value_t = client::DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Extra header as `Name: value` (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header, global = true)]
    headers: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a URL
    Get { url: String },
    /// POST form fields (`key=value`) or a JSON document to a URL
    Post {
        url: String,
        /// Form field as `key=value` (repeatable)
        #[arg(short, long = "field", value_parser = parse_field, conflicts_with = "json")]
        fields: Vec<(String, String)>,
        /// JSON document sent as the body
        #[arg(short, long)]
        json: Option<String>,
    },
    /// Send a raw request read from a file; its Host header picks the server
    File { path: PathBuf },
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got {s:?}"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    let (key, value) = s.split_once('=').unwrap_or((s, ""));
    if key.is_empty() {
        return Err(format!("empty field name in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn print_response(response: &HttpResponse) {
    println!("< {} {} {}", response.version, response.status, response.reason);
    for (name, value) in &response.headers {
        println!("< {name}: {value}");
    }
    println!();
    println!("{}", response.body);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut request = match cli.command {
        Commands::Get { url } => HttpRequest::get(&url)?,
        Commands::Post { url, json: Some(json), .. } => {
            let value: serde_json::Value = serde_json::from_str(&json)?;
            HttpRequest::post_json(&url, &value)?
        }
        Commands::Post { url, fields, .. } => {
            let fields: Vec<(&str, &str)> =
                fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            HttpRequest::post_form(&url, &fields)?
        }
        Commands::File { path } => {
            let raw = tokio::fs::read_to_string(&path).await?;
            HttpRequest::parse(&raw)?
        }
    };
    for (name, value) in &cli.headers {
        request = request.header(name, value);
    }

    let response = client::send(&request, Duration::from_secs(cli.timeout)).await?;
    print_response(&response);
    Ok(())
}
