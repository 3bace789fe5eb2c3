use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use scriptlets::config::{self, Settings};
use scriptlets::{
    convert_to_canonical, get_scriptlet_code, list_scriptlets, ContentFilterManager,
    InjectionContext, ScriptletKind, ScriptletRule, Source,
};

/// Generate scriptlet injection code and apply scriptlet filter lists
#[derive(Debug, Parser)]
#[command(name = config::APP_NAME, version = config::APP_VERSION)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overrides RUST_LOG)
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print injectable code for one scriptlet
    Code {
        /// Scriptlet name or alias
        name: String,
        /// Scriptlet arguments
        args: Vec<String>,
        /// Engine tag (corelibs, test or extension)
        #[arg(long)]
        engine: Option<String>,
        /// Identifier used to skip repeated injections
        #[arg(long)]
        unique_id: Option<String>,
        /// Log scriptlet hits in the page console
        #[arg(long)]
        verbose: bool,
    },
    /// List built-in scriptlets
    List {
        /// Also print every alias
        #[arg(long)]
        aliases: bool,
    },
    /// Print the scripts filter lists inject into a page
    Page {
        /// Page URL
        url: url::Url,
        /// Filter list files or directories (override settings)
        #[arg(long = "filters")]
        filters: Vec<PathBuf>,
        /// Skip the bundled filter list
        #[arg(long)]
        no_bundled: bool,
    },
    /// Rewrite the scriptlet rules of a filter list in AdGuard syntax
    Convert {
        /// Filter list file
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = cli.log_level {
        builder.filter_level(level.into());
    }
    builder.init();

    log::debug!("Starting {} v{}", config::APP_NAME, config::APP_VERSION);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Code {
            name,
            args,
            engine,
            unique_id,
            verbose,
        } => {
            let mut source = Source::new(name)
                .with_args(args)
                .with_engine(engine.unwrap_or(settings.engine))
                .verbose(verbose || settings.verbose);
            if let Some(id) = unique_id.or(settings.unique_id) {
                source = source.with_unique_id(id);
            }
            println!("{}", get_scriptlet_code(&source)?);
        }
        Command::List { aliases } => {
            for name in list_scriptlets() {
                if !aliases {
                    println!("{}", name);
                    continue;
                }
                let kind = ScriptletKind::from_name(name).ok_or("registry out of sync")?;
                println!("{}\t{}", name, kind.aliases().join(", "));
            }
        }
        Command::Page {
            url,
            filters,
            no_bundled,
        } => {
            let mut settings = settings;
            if !filters.is_empty() {
                settings.filter_lists = filters;
            }
            if no_bundled {
                settings.bundled_filters = false;
            }

            let mut manager = ContentFilterManager::new(settings);
            manager.initialize()?;

            let mut context = InjectionContext::new();
            for script in manager.scripts_for_url(&url, &mut context) {
                println!("{}", script);
            }
        }
        Command::Convert { path } => {
            let content = std::fs::read_to_string(&path)?;
            for rule in content.lines().flat_map(ScriptletRule::parse_all) {
                if !rule.scriptlet_name.is_empty()
                    && convert_to_canonical(&rule.scriptlet_name).is_none()
                {
                    log::warn!("Skipping unknown scriptlet: {}", rule.text);
                    continue;
                }
                println!("{}", rule.to_adg_rule());
            }
        }
    }

    Ok(())
}

fn load_settings(path: Option<&std::path::Path>) -> Result<Settings, config::ConfigError> {
    match path.map(PathBuf::from).or_else(Settings::default_path) {
        Some(path) => Settings::load(&path),
        None => {
            log::warn!("No config directory available, using default settings");
            Ok(Settings::default())
        }
    }
}
