use crate::options::sub_command::Commands;
use clap::Parser;
use formwalk::features::webdriver_common::{Viewport, WebDriverBrowser};
use std::path::PathBuf;

/// program to walk a multi-page web form and extract its questions.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Build main sub commands
    #[clap(subcommand)]
    pub command: Option<Commands>,
    /// The form URL to walk.
    #[clap(short, long, global = true)]
    pub url: Option<String>,
    /// Print progress logs on standard error
    #[clap(short, long, global = true)]
    pub verbose: bool,
    /// Also write the logs into this file.
    #[clap(long, global = true)]
    pub log_file: Option<PathBuf>,
    /// JSON configuration file. Flags given on the command line take precedence.
    #[clap(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// The WebDriver server to connect to ex: http://localhost:4444
    #[clap(short, long, global = true)]
    pub server_url: Option<String>,
    /// Browser to drive: chrome or firefox.
    #[clap(short, long, global = true)]
    pub browser: Option<WebDriverBrowser>,
    /// Show the browser window instead of running headless.
    #[clap(long, global = true)]
    pub headed: bool,
    /// Keep the browser sandbox enabled.
    #[clap(long, global = true)]
    pub sandbox: bool,
    /// Page load timeout in seconds.
    #[clap(short, long, global = true)]
    pub timeout: Option<u64>,
    /// Browser window size as WIDTHxHEIGHT ex: 1280x800
    #[clap(long, global = true)]
    pub viewport: Option<Viewport>,
    /// User-Agent
    #[clap(short = 'a', long, global = true)]
    pub user_agent: Option<String>,
    /// The proxy url to use.
    #[clap(short, long, global = true)]
    pub proxy: Option<String>,
}
