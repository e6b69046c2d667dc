use std::io::{self, Write};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use searu_dash_core::session::{session_from_cookie_header, SESSION_COOKIE_NAME};
use searu_dash_core::{ApiClient, ApiResponse, Config, Credentials, LoginFlow, Session, Token};

use crate::jar::CookieJar;
use crate::{Cli, Command};

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.api_base).context("Failed to load configuration")?;

    let mut jar = CookieJar::new(config.cache_dir()?);
    jar.load()?;
    let client = ApiClient::from_config(&config)?;

    // Derived once per invocation, like once per page request
    let session = session_from_cookie_header(&jar.cookie_header());

    match cli.command {
        Command::Login { username } => login(&config, &mut jar, username).await,
        Command::Logout => logout(&config, &mut jar).await,
        Command::Session => show_session(&session, &jar),
        Command::Version => {
            println!("{}", client.version().await?);
            Ok(())
        }
        Command::Overview => overview(&client, require_token(&session)?).await,
        Command::Get { path } => {
            print_response(client.get(&path, require_token(&session)?).await?);
            Ok(())
        }
        Command::Delete { path } => {
            print_response(client.del(&path, require_token(&session)?).await?);
            Ok(())
        }
        Command::Post { path, body } => {
            let body = parse_body(&body)?;
            print_response(client.post(&path, &body, session.token()).await?);
            Ok(())
        }
        Command::Put { path, body } => {
            let body = parse_body(&body)?;
            print_response(client.put(&path, &body, require_token(&session)?).await?);
            Ok(())
        }
    }
}

fn require_token(session: &Session) -> Result<&Token> {
    session
        .token()
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `searu-dash login` first."))
}

fn parse_body(body: &str) -> Result<Value> {
    serde_json::from_str(body).context("Request body must be valid JSON")
}

fn print_response(response: ApiResponse) {
    if let Some(msg) = response.error_message() {
        warn!(error = msg, "API reported an error");
    }
    println!("{}", response);
}

fn prompt_username() -> Result<String> {
    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}

async fn login(config: &Config, jar: &mut CookieJar, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompt_username()?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    if username.is_empty() || password.is_empty() {
        return Err(anyhow::anyhow!("Username and password required"));
    }

    let flow = LoginFlow::from_config(config)?;
    let outcome = flow
        .login(Credentials::new(username, password))
        .await
        .context("Failed to send login request")?;

    // Store whatever the flow set, placeholder included, as a browser would
    jar.apply(&outcome.set_cookie)?;
    jar.save()?;

    if outcome.established {
        println!("Login successful!");
        return Ok(());
    }
    match outcome.remote_error {
        Some(msg) => Err(anyhow::anyhow!("Login failed: {}", msg)),
        None => Err(anyhow::anyhow!("Login failed: the server reply had no token")),
    }
}

async fn logout(config: &Config, jar: &mut CookieJar) -> Result<()> {
    let flow = LoginFlow::from_config(config)?;
    let outcome = flow.logout().await.context("Failed to send logout request")?;

    jar.apply(&outcome.set_cookie)?;
    jar.save()?;

    println!("Logged out.");
    Ok(())
}

fn show_session(session: &Session, jar: &CookieJar) -> Result<()> {
    if session.is_authenticated() {
        match jar.get(SESSION_COOKIE_NAME) {
            Some(cookie) => println!(
                "Authenticated (cookie stored {})",
                cookie.stored_at.format("%Y-%m-%d %H:%M UTC")
            ),
            None => println!("Authenticated"),
        }
    } else {
        println!("Anonymous");
    }
    Ok(())
}

/// Fetch every resource list at once; one failing list doesn't hide the others.
async fn overview(client: &ApiClient, token: &Token) -> Result<()> {
    let (projects, nodes, vms, vpcs) = futures::join!(
        client.list_projects(token),
        client.list_nodes(token),
        client.list_vms(token),
        client.list_vpcs(token),
    );

    println!("Projects");
    match projects {
        Ok(list) => {
            for project in &list.objects {
                println!("  {}", project.name);
            }
        }
        Err(e) => println!("  unavailable: {}", e),
    }

    println!("Nodes");
    match nodes {
        Ok(list) => {
            for node in &list.objects {
                println!(
                    "  {:<20} {:<16} {}",
                    node.metadata.name,
                    node.cpu_display(),
                    node.memory_display()
                );
            }
        }
        Err(e) => println!("  unavailable: {}", e),
    }

    println!("VMs");
    match vms {
        Ok(list) => {
            for vm in &list.objects {
                println!(
                    "  {:<20} {:<12} {:<12} {}",
                    vm.metadata.name,
                    vm.metadata.project,
                    vm.status.state.label(),
                    vm.node_display()
                );
            }
        }
        Err(e) => println!("  unavailable: {}", e),
    }

    println!("VPCs");
    match vpcs {
        Ok(list) => {
            for vpc in &list.objects {
                println!("  {:<20} {}", vpc.metadata.name, vpc.spec.subnet);
            }
        }
        Err(e) => println!("  unavailable: {}", e),
    }

    Ok(())
}
