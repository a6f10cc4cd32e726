extern crate env_logger;
extern crate formwalk;

pub mod options;

use clap::Parser;
use formwalk::configuration::Configuration;
use formwalk::pipeline::FormExtractor;
use formwalk::tokio;
use formwalk::tokio::io::AsyncWriteExt;
use formwalk::utils::{ensure_scheme, log};
use formwalk::FormSchema;
use options::{Cli, Commands};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Where artifacts land when nothing else is configured.
const DEFAULT_OUTPUT: &str = "extracted_questions.json";

/// Copies every log record to standard error and a file.
struct Tee {
    file: std::fs::File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = std::io::stderr().write_all(buf);
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = std::io::stderr().flush();
        self.file.flush()
    }
}

fn init_logger(cli: &Cli) {
    if !cli.verbose && cli.log_file.is_none() {
        return;
    }

    use env_logger::{Env, Target};

    let env = Env::default()
        .filter_or("RUST_LOG", "info")
        .write_style_or("RUST_LOG_STYLE", "always");

    let mut builder = env_logger::Builder::from_env(env);

    if let Some(ref path) = cli.log_file {
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder
                    .write_style(env_logger::WriteStyle::Never)
                    .target(Target::Pipe(Box::new(Tee { file })));
            }
            Err(e) => eprintln!("Unable to open log file {}: {e}", path.display()),
        }
    }

    builder.init();
}

/// The file configuration with the command line flags applied on top.
fn build_configuration(cli: &Cli) -> formwalk::Result<Configuration> {
    let mut configuration = match cli.config {
        Some(ref path) => Configuration::from_file(path)?,
        _ => Configuration::new(),
    };

    let mut webdriver = configuration.webdriver.clone();

    if let Some(ref server_url) = cli.server_url {
        webdriver = webdriver.with_server_url(server_url);
    }
    if let Some(browser) = cli.browser {
        webdriver = webdriver.with_browser(browser);
    }
    if cli.headed {
        webdriver = webdriver.with_headless(false);
    }
    if cli.sandbox {
        webdriver = webdriver.with_sandbox_disabled(false);
    }
    if let Some(viewport) = cli.viewport {
        webdriver = webdriver.with_viewport(viewport.width, viewport.height);
    }
    if let Some(ref agent) = cli.user_agent {
        webdriver = webdriver.with_user_agent(agent);
    }
    if let Some(ref proxy) = cli.proxy {
        webdriver = webdriver.with_proxy(proxy);
    }

    configuration.with_webdriver(webdriver);

    if let Some(timeout) = cli.timeout {
        configuration.with_page_load_timeout(Duration::from_secs(timeout));
    }

    Ok(configuration)
}

async fn print_json(schema: &FormSchema) {
    let mut stdout = tokio::io::stdout();

    match schema.to_json_pretty() {
        Ok(j) => {
            if let Err(e) = stdout.write_all(format!("{j}\n").as_bytes()).await {
                eprintln!("{:?}", e)
            }
        }
        Err(e) => eprintln!("{:?}", e),
    }
}

async fn extract(cli: &Cli, output: Option<PathBuf>, no_save: bool) -> formwalk::Result<()> {
    let url = match cli.url {
        Some(ref url) => ensure_scheme(url),
        _ => {
            eprintln!("A form URL is required to extract, pass it with --url.");
            std::process::exit(2);
        }
    };

    let mut configuration = build_configuration(cli)?;

    let output_path = if no_save {
        None
    } else {
        output
            .or_else(|| configuration.output_path.clone())
            .or_else(|| Some(PathBuf::from(DEFAULT_OUTPUT)))
    };

    configuration.with_output_path(output_path);

    let mut extractor = FormExtractor::new(&url);
    extractor.with_configuration(configuration);

    let extractor = match extractor.build() {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("Invalid form URL passed in. The url should start with http:// or https:// following the domain ex: https://example.com/form. {e}");
            std::process::exit(2);
        }
    };

    let schema = extractor.extract().await?;

    log("Questions extracted", schema.questions.len().to_string());
    print_json(&schema).await;

    Ok(())
}

async fn show(cli: &Cli, path: Option<PathBuf>) -> formwalk::Result<()> {
    let path = match path {
        Some(path) => path,
        _ => build_configuration(cli)?
            .output_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
    };

    let schema = FormSchema::load(&path).await?;
    print_json(&schema).await;

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logger(&cli);

    let result = match cli.command {
        Some(Commands::SHOW { ref path }) => show(&cli, path.clone()).await,
        Some(Commands::EXTRACT {
            ref output,
            no_save,
        }) => extract(&cli, output.clone(), no_save).await,
        None => extract(&cli, None, false).await,
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
