//! hey request assembler.
//!
//! Builds the request a hey run would send, from command-line directives
//! and an optional TOML request profile, and prints it.
//!
//! ```text
//! flags ─┐
//!        ├─▶ DirectiveSet ─▶ Assembler ─▶ AssembledRequest + body ─▶ stdout
//! profile┘                      │                                  (wire or JSON)
//!                               └─▶ trace file (--trace)
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use hey::config::{load_directives, DirectiveSet};
use hey::observability::logging;
use hey::request::Assembler;
use hey::wire;

#[derive(Parser)]
#[command(name = "hey")]
#[command(about = "Assemble the HTTP request a hey run sends", long_about = None)]
struct Cli {
    /// Target URL.
    url: String,

    /// HTTP method, one of GET, POST, PUT, DELETE, HEAD, OPTIONS.
    #[arg(short = 'm')]
    method: Option<String>,

    /// Custom HTTP header, repeatable. For example -H "Accept: text/html".
    #[arg(short = 'H')]
    headers: Vec<String>,

    /// Url-encoded body field, repeatable: value, name=value, name=@file.
    #[arg(short = 'd')]
    query: Vec<String>,

    /// Multipart form field, repeatable: name=value, name=@file.
    #[arg(short = 'F')]
    form: Vec<String>,

    /// HTTP request body from file.
    #[arg(short = 'D')]
    body_file: Option<PathBuf>,

    /// Content type of the body file.
    #[arg(short = 'T')]
    content_type: Option<String>,

    /// HTTP Accept header.
    #[arg(short = 'A')]
    accept: Option<String>,

    /// Basic authentication, username:password.
    #[arg(short = 'a')]
    auth: Option<String>,

    /// HTTP Host header.
    #[arg(long)]
    host: Option<String>,

    /// User-Agent header.
    #[arg(short = 'U')]
    user_agent: Option<String>,

    /// Write the wire-format request to this file.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// TOML request profile; flags are applied on top of it.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Print a JSON summary instead of the wire-format request.
    #[arg(long)]
    json: bool,

    /// Debug logging.
    #[arg(short = 'v')]
    verbose: bool,
}

impl Cli {
    fn directives(&self) -> DirectiveSet {
        DirectiveSet {
            method: self.method.clone(),
            headers: self.headers.clone(),
            legacy_header: None,
            query: self.query.clone(),
            form: self.form.clone(),
            body_file: self.body_file.clone(),
            content_type: self.content_type.clone(),
            accept: self.accept.clone(),
            auth: self.auth.clone(),
            host: self.host.clone(),
            user_agent: self.user_agent.clone(),
            trace: self.trace.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "request assembly failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let directives = match &cli.profile {
        Some(path) => load_directives(path)?.merge(cli.directives()),
        None => cli.directives(),
    };

    let (request, body) = Assembler::new().assemble(&cli.url, &directives)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &request.summary(&body))?;
        writeln!(out)?;
    } else {
        wire::write_request(&mut out, &request, &body)?;
    }
    out.flush()?;
    Ok(())
}
