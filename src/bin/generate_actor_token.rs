//! CLI tool to create actors and mint their tokens.
//!
//! Usage:
//!   cargo run --bin generate-actor-token -- --username alice --roles qa,tester

use std::env;

use qatrack_lib::config::Config;
use qatrack_lib::db::{self, DbPool};
use qatrack_lib::models::actor::{Role, roles_from_csv};
use qatrack_lib::services::actor_admin;

fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut username: Option<String> = None;
    let mut roles_arg = "tester".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--username" | "-u" => {
                i += 1;
                if i < args.len() {
                    username = Some(args[i].clone());
                }
            }
            "--roles" | "-r" => {
                i += 1;
                if i < args.len() {
                    roles_arg = args[i].clone();
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

    // Validate required arguments
    let username = match username {
        Some(u) => u,
        None => {
            eprintln!("Error: --username is required");
            print_usage();
            std::process::exit(1);
        }
    };

    // Parse roles
    let roles: Vec<Role> = roles_from_csv(&roles_arg);
    if roles.is_empty() {
        eprintln!(
            "Error: Invalid roles '{}'. Must be a comma-separated list of: admin, qa, tester, developer",
            roles_arg
        );
        std::process::exit(1);
    }

    // Load config and initialize database
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    runtime.block_on(async {
        let pool = match DbPool::connect(&config).await {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("Error: Failed to connect to database: {}", e);
                std::process::exit(1);
            }
        };

        if let Ok(Some(_)) = db::actors::find_by_username(pool.connection(), &username).await {
            eprintln!("Error: An actor named '{}' already exists", username);
            std::process::exit(1);
        }

        let (full_token, new_actor) = actor_admin::generate_token(&username, &roles);

        let created = match db::actors::insert(pool.connection(), new_actor).await {
            Ok(actor) => actor,
            Err(e) => {
                eprintln!("Error: Failed to insert actor: {}", e);
                std::process::exit(1);
            }
        };

        println!("Actor created:");
        println!("  ID:       {}", created.id);
        println!("  Username: {}", created.username);
        println!("  Roles:    {}", created.roles);
        println!();
        println!("Token (shown once, store it securely):");
        println!("  {}", full_token);
    });
}

fn print_usage() {
    println!("Create an actor and mint its token");
    println!();
    println!("Usage:");
    println!("  generate-actor-token --username <name> [--roles <csv>]");
    println!();
    println!("Options:");
    println!("  -u, --username  Actor username (required)");
    println!("  -r, --roles     Comma-separated roles: admin, qa, tester, developer");
    println!("                  (default: tester)");
}
