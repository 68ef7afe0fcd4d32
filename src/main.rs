use clap::{Parser, Subcommand};
use sitelang::{check, config, localize, output, scan};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "sitelang")]
#[command(about = "Hebrew/English localizer for static sites")]
#[command(long_about = "\
Hebrew/English localizer for static sites

Pages opt nodes into translation with data-i18n marker attributes. Keys are
resolved against JSON locale bundles and every page is emitted once per
enabled language, with right-to-left presentation wired for Hebrew.

Site structure:

  site/
  ├── localize.toml                # Localization config (optional)
  ├── index.html                   # Pages: any *.html in the tree
  ├── catalog/
  │   └── index.html
  └── assets/
      ├── locales/
      │   ├── en.json              # Bundles: nested objects of strings
      │   └── he.json
      └── css/rtl.css              # Injected on RTL pages

Markers:

  <a data-i18n=\"nav.home\">Home</a>                       text content
  <input data-i18n-placeholder=\"search.placeholder\">     placeholder attr
  <button data-i18n-title=\"cta.viewDetails\">             title attr
  <img data-i18n-alt=\"hero.title\">                       alt attr
  <title data-i18n=\"page.title\">                         document title

Fallbacks (never an error): a bundle that cannot be loaded is replaced by
the snapshot embedded in the binary; a key the bundle cannot resolve is
rendered as its literal dotted path. 'sitelang check' reports both.

Run 'sitelang gen-config' to generate a documented localize.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site directory
    #[arg(long, default_value = "site", global = true)]
    site: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inventory translation markers across the site's pages
    Scan,
    /// Emit one localized page tree per enabled language
    Localize,
    /// Check bundle health: drift, key parity, unresolved page keys
    Check,
    /// Write the embedded snapshot bundles into the site's locales directory
    Sync {
        /// Overwrite existing bundle files
        #[arg(long)]
        force: bool,
    },
    /// Print a stock localize.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let config = config::LocalizeConfig::load(&cli.site)?;
            let report = scan::scan(&cli.site, &config)?;
            output::print_scan_output(&report);
        }
        Command::Localize => {
            let config = config::LocalizeConfig::load(&cli.site)?;
            let report = localize::localize(&cli.site, &cli.output, &config)?;
            output::print_localize_output(&report);
        }
        Command::Check => {
            let config = config::LocalizeConfig::load(&cli.site)?;
            let source = localize::build_source(&cli.site, &config);
            let report = check::check(&cli.site, &config, source.as_ref())?;
            output::print_check_output(&report);
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Command::Sync { force } => {
            let config = config::LocalizeConfig::load(&cli.site)?;
            let dir = cli.site.join(&config.locales.dir);
            let written = check::export_embedded(&dir, force)?;
            for name in written {
                println!("{} \u{2192} {}", name, dir.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
