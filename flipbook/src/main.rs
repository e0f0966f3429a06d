use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flipbook::config::FlipbookConfig;
use flipbook::probe::SourceProbe;
use flipbook::runtime::{wrap_viewer_html, ShellOptions};
use flipbook::server::DevState;

#[derive(Parser)]
#[command(name = "flipbook", version)]
#[command(about = "Page-flipping image and video viewer")]
struct Cli {
    /// Config file (default: flipbook.toml in the book directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages of a book directory or served URL
    Pages {
        /// Book directory, or http(s) URL of the host page's directory
        source: String,

        /// Print the book as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the page markup that the viewer mounts into the flipbook
    Render {
        /// Book directory, or http(s) URL of the host page's directory
        source: String,

        /// Write output to file instead of stdout
        #[arg(short)]
        o: Option<PathBuf>,
    },

    /// Write the host page for a book directory
    Build {
        /// Book directory
        dir: PathBuf,

        /// Output file (default: <dir>/index.html)
        #[arg(short)]
        o: Option<PathBuf>,

        /// Page title
        #[arg(long, default_value = "Flipbook")]
        title: String,

        /// turn.js script URL
        #[arg(long, default_value = "js/turn.min.js")]
        turn_src: String,

        /// jQuery script URL
        #[arg(long, default_value = "https://code.jquery.com/jquery-3.7.1.min.js")]
        jquery_src: String,

        /// wasm-pack ES module URL
        #[arg(long, default_value = "./pkg/flipbook.js")]
        module_src: String,
    },

    /// Serve a book directory with live reload
    Serve {
        /// Book directory
        dir: PathBuf,

        /// Server port
        #[arg(long, default_value_t = 3333)]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "flipbook=info",
        1 => "flipbook=debug",
        _ => "flipbook=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    match cli.command {
        Commands::Pages { source, json } => {
            let config = load_config(cli.config.as_deref(), &source)?;
            let probe = SourceProbe::from_source(&source)?;
            let book = rt.block_on(flipbook::discover_book(&probe, &config))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&book)?);
            } else {
                for page in book.pages() {
                    let marker = if book.is_video_page(page.number) {
                        "  (video)"
                    } else {
                        ""
                    };
                    println!("{:>4}  {}{marker}", page.number, page.path);
                }
                eprintln!("{}: {} page(s)", source, book.page_count());
            }
        }

        Commands::Render { source, o } => {
            let config = load_config(cli.config.as_deref(), &source)?;
            let probe = SourceProbe::from_source(&source)?;
            let book = rt.block_on(flipbook::discover_book(&probe, &config))?;
            let html = flipbook::render_book_html(&book, &config);
            write_output(o.as_deref(), &html, "markup")?;
        }

        Commands::Build {
            dir,
            o,
            title,
            turn_src,
            jquery_src,
            module_src,
        } => {
            if !dir.is_dir() {
                anyhow::bail!("'{}' is not a directory", dir.display());
            }
            let config = load_config(cli.config.as_deref(), &dir.to_string_lossy())?;
            let options = ShellOptions {
                title,
                jquery_src,
                turn_src,
                module_src,
            };
            let html = wrap_viewer_html(&config, &options);
            let out_path = o.unwrap_or_else(|| dir.join("index.html"));
            write_output(Some(&out_path), &html, "host page")?;
        }

        Commands::Serve { dir, port } => {
            if !dir.is_dir() {
                anyhow::bail!("'{}' is not a directory", dir.display());
            }
            let config = load_config(cli.config.as_deref(), &dir.to_string_lossy())?;
            let state = DevState::new(dir, config, ShellOptions::default());
            rt.block_on(flipbook::server::run_dev_server(state, port))
                .map_err(|e| anyhow::anyhow!("dev server failed: {e}"))?;
        }
    }

    Ok(())
}

/// Explicit `--config`, else `flipbook.toml` next to the book (or in the
/// working directory for served sources).
fn load_config(explicit: Option<&Path>, source: &str) -> anyhow::Result<FlipbookConfig> {
    let config = match explicit {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read '{}'", path.display()))?;
            FlipbookConfig::from_toml(&text)
                .with_context(|| format!("in '{}'", path.display()))?
        }
        None => {
            let base = if source.starts_with("http://") || source.starts_with("https://") {
                PathBuf::from(".")
            } else {
                PathBuf::from(flipbook::probe::local_path(source)?)
            };
            FlipbookConfig::load_or_default(&base.join("flipbook.toml"))?
        }
    };
    Ok(config)
}

fn write_output(path: Option<&Path>, contents: &str, kind: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, contents)
                .with_context(|| format!("cannot write '{}'", path.display()))?;
            eprintln!(
                "wrote {kind} to {} ({} bytes)",
                path.display(),
                contents.len()
            );
        }
        None => print!("{contents}"),
    }
    Ok(())
}
