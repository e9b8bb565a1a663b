//! CLI tool to generate API keys.
//!
//! Prints the key once, plus the `RPT_API_KEYS` entry holding its hash.
//!
//! Usage:
//!   cargo run --bin generate-api-key -- --user "ci-bot" --role contributor

use std::env;

use reporting_lib::models::ApiKeyRole;
use reporting_lib::services::api_key;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut user: Option<String> = None;
    let mut role = "contributor".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--user" | "-u" => {
                i += 1;
                if i < args.len() {
                    user = Some(args[i].clone());
                }
            }
            "--role" | "-r" => {
                i += 1;
                if i < args.len() {
                    role = args[i].clone();
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let user = match user {
        Some(u) if !u.is_empty() && !u.contains([':', ',']) => u,
        Some(u) => {
            eprintln!("Error: invalid username '{}' (must be non-empty, without ':' or ',')", u);
            std::process::exit(1);
        }
        None => {
            eprintln!("Error: --user is required");
            print_usage();
            std::process::exit(1);
        }
    };

    let role = match ApiKeyRole::parse(&role) {
        Some(r) => r,
        None => {
            eprintln!(
                "Error: Invalid role '{}'. Must be: admin, contributor, viewer",
                role
            );
            std::process::exit(1);
        }
    };

    let key = api_key::generate_key();
    let entry = api_key::credential_entry(&user, &key, role);

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  API Key Generated");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  User:    {}", user);
    println!("  Role:    {}", role);
    println!();
    println!("  Key:     {}", key);
    println!();
    println!("  Add to RPT_API_KEYS (comma-separated):");
    println!("  {}", entry);
    println!();
    println!("  ⚠️  Save this key! It cannot be retrieved later.");
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: generate-api-key --user <username> [--role <role>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --user, -u   Username reports are attributed to (required)");
    eprintln!("  --role, -r   Role: admin, contributor, viewer (default: contributor)");
    eprintln!("  --help, -h   Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  generate-api-key --user ci-bot --role contributor");
    eprintln!("  generate-api-key --user ops --role admin");
    eprintln!();
}
