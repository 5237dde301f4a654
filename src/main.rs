use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod client;
mod config;
mod error;
mod flows;
mod models;
mod mood;
mod ui;


use crate::auth::{AuthFlow, FormValidator, ResetForm, SigninForm, SignupForm};
use crate::client::{SwaraClient, Transport};
use crate::config::load_config;
use crate::error::AuthError;
use crate::flows::MoodGame;
use crate::models::{ModuleType, RecommendationRequest};
use crate::ui::control::Banner;
use crate::ui::{render_html, render_text, terminal, ResultsPage};

#[derive(Parser)]
#[command(name = "swara")]
#[command(about = "Detect your mood with a quiz, image rounds or a puzzle and get matching songs")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Backend address, overrides SWARA_BASE_URL
    #[arg(long = "base-url", global = true)]
    base_url: Option<String>,

    /// Quiet mode - reduce output verbosity
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    /// Also write the recommendations page as HTML to this file
    #[arg(long = "html", global = true)]
    html: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Accept the Terms and Privacy Policy
        #[arg(long = "accept-terms")]
        accept_terms: bool,
    },
    /// Sign in to an existing account
    Signin {
        #[arg(long)]
        email: String,
    },
    /// Request password reset instructions
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Five-question mood quiz
    Quiz,
    /// Four rounds of picking an image
    Images,
    /// Click the numbers 1 to 16 in order
    Puzzle,
    /// Run all three activities and combine the moods
    Combined,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet);

    // Load configuration from .env
    let mut config = load_config()?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    info!(base_url = %config.base_url, "Configuration loaded");

    let client = SwaraClient::new(&config);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let request = match args.command {
        Command::Signup {
            username,
            email,
            accept_terms,
        } => {
            let password = prompt(&mut input, "Password: ")?;
            if let Some(label) = FormValidator::strength_label(FormValidator::password_strength(&password)) {
                println!("Password strength: {label}");
            }
            let confirm_password = prompt(&mut input, "Confirm Password: ")?;
            let form = SignupForm {
                username,
                email,
                password,
                confirm_password,
                terms_accepted: accept_terms,
            };
            return report_auth(AuthFlow::new(&client).signup(&form));
        }
        Command::Signin { email } => {
            let password = prompt(&mut input, "Password: ")?;
            return report_auth(AuthFlow::new(&client).signin(&SigninForm { email, password }));
        }
        Command::ResetPassword { email } => {
            return report_auth(AuthFlow::new(&client).reset_password(&ResetForm { email }));
        }
        Command::Quiz => terminal::run_quiz(&mut input, &mut out)?.recommendation_request(),
        Command::Images => terminal::run_images(&mut input, &mut out)?.recommendation_request(),
        Command::Puzzle => terminal::run_puzzle(&mut input, &mut out)?.recommendation_request(),
        Command::Combined => combined_request(&mut input, &mut out)?,
    };

    let request = request.ok_or_else(|| anyhow!("The activity finished without a mood"))?;

    if let Some((email, password)) = config.credentials() {
        let form = SigninForm {
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(e) = AuthFlow::new(&client).signin(&form) {
            warn!("Sign-in before fetching recommendations failed: {e}");
        }
    }

    recommend(&client, &request, args.html.as_deref())
}

/// Initialize the tracing subscriber for logging
fn init_logging(quiet: bool) {
    let default_filter = if quiet { "swara=warn" } else { "swara=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn report_auth(result: Result<auth::AuthSuccess, AuthError>) -> Result<()> {
    match result {
        Ok(success) => {
            println!("{}", Banner::success(success.message));
            if let Some(redirect) = success.redirect {
                println!("Next: {redirect}");
            }
            Ok(())
        }
        Err(AuthError::Invalid(errors)) => {
            for error in &errors {
                eprintln!("{}", Banner::error(error.message.clone()));
            }
            Err(anyhow!("{} field(s) failed validation", errors.len()))
        }
        Err(e) => {
            eprintln!("{}", Banner::error(e.to_string()));
            Err(e.into())
        }
    }
}

/// Play all three activities and send the mood they agree on
fn combined_request<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<RecommendationRequest>> {
    let session = terminal::run_combined(input, out)?;

    let Some(result) = session.combined() else {
        return Ok(None);
    };
    writeln!(
        out,
        "\nCombined mood: {} ({}% agreement)",
        result.dominant_mood, result.confidence_percent
    )?;

    let mut request = RecommendationRequest::new(result.dominant_mood, ModuleType::Combined);
    request.confidence = Some(result.confidence_percent);
    Ok(Some(request))
}

fn recommend<T: Transport>(
    client: &SwaraClient<T>,
    request: &RecommendationRequest,
    html_path: Option<&Path>,
) -> Result<()> {
    println!("\nFetching recommendations...");
    let mut page = ResultsPage::new(client);

    let Some(view) = page.fetch(request) else {
        let banner = page
            .current_banner(Instant::now())
            .cloned()
            .unwrap_or_else(|| Banner::error(error::RECOMMENDATION_FAILED));
        eprintln!("{banner}");
        return Err(anyhow!(banner.message));
    };

    println!("\n{}", render_text(&view));

    if let Some(path) = html_path {
        std::fs::write(path, render_html(&view))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved recommendations page to {}", path.display());
    }
    Ok(())
}
