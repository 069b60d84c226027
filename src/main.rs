use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use continue_folder::cli::{self, Cli, Commands};
use continue_folder::{
    colors, Clock, CreateError, CreationSink, Destination, DirectorySink, FsDirectoryLister,
    JsonPresetStore, Preset, PresetError, PresetStore, Resolution, Session, SystemClock, TokenKind,
    TokenTable,
};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Disable colors if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let color = if cli.no_color { ColorChoice::Never } else { ColorChoice::Auto };
    if let Err(e) = TermLogger::init(level, simplelog::Config::default(), TerminalMode::Stderr, color) {
        eprintln!("{} Logging unavailable: {}", "⚠️".yellow(), e);
    }

    if let Commands::Version = cli.command {
        Cli::print_version();
        return Ok(());
    }

    if cli.safe {
        println!("{}", "🔒 SAFE MODE ENABLED".bold().color(colors::WARNING));
        println!("   Showing previews only - nothing will be created");
        println!();
    }

    let presets_path = match cli.presets.clone() {
        Some(path) => path,
        None => JsonPresetStore::default_path().context("Could not find home directory")?,
    };
    let mut store = JsonPresetStore::load(&presets_path).context("Failed to load presets")?;

    // Handle command
    match cli.command {
        Commands::Preview(args) => handle_preview(&store, &args, cli.verbose)?,

        Commands::Create(args) => handle_create(&store, &args, cli.safe, cli.verbose)?,

        Commands::Tokens => handle_tokens(),

        Commands::Preset(subcommand) => handle_preset(&mut store, subcommand, cli.safe)?,

        Commands::Version => unreachable!(),
    }

    Ok(())
}

/// Pick the pattern from the flags, a named preset, or the store's default.
fn select_pattern(store: &JsonPresetStore, args: &cli::ResolveArgs) -> Result<String> {
    if let Some(pattern) = &args.pattern {
        return Ok(pattern.clone());
    }
    if let Some(name) = &args.preset {
        return match store.get(name) {
            Some(preset) => Ok(preset.pattern),
            None => bail!("Preset '{}' not found in {}", name, store.path().display()),
        };
    }
    Ok(store.default_pattern())
}

fn run_pass(store: &JsonPresetStore, args: &cli::ResolveArgs) -> Result<Resolution> {
    let pattern = select_pattern(store, args)?;
    let mut session = Session::new(&args.path, FsDirectoryLister, SystemClock);
    let resolution = session
        .update(&pattern)
        .with_context(|| format!("Failed to resolve pattern {pattern:?}"))?;
    Ok(resolution.clone())
}

fn print_resolution(resolution: &Resolution, verbose: bool) {
    println!("{} {}", "Pattern:".bold(), resolution.pattern);
    if verbose {
        println!("{} {}", "Regex:  ".bold(), resolution.regex.dimmed());
    }

    if resolution.matches.is_empty() {
        println!("{} No existing folders match", "✨".green());
    } else {
        println!("Found {} matching folders", resolution.matches.len());
        if verbose {
            for found in &resolution.matches {
                match found.version {
                    Some(v) => println!("  - {} (version {})", found.name.color(colors::MATCH), v),
                    None => println!("  - {}", found.name.color(colors::MATCH)),
                }
            }
        }
    }

    if resolution.has_version {
        println!(
            "{} {} (padding {})",
            "Next version:".bold(),
            resolution.version,
            resolution.padding
        );
    }
    println!("{} {}", "New folder:".bold(), resolution.name.bold().color(colors::SUCCESS));
}

fn handle_preview(store: &JsonPresetStore, args: &cli::ResolveArgs, verbose: bool) -> Result<()> {
    let resolution = run_pass(store, args)?;
    print_resolution(&resolution, verbose);
    Ok(())
}

fn handle_create(
    store: &JsonPresetStore,
    args: &cli::CreateArgs,
    safe_mode: bool,
    verbose: bool,
) -> Result<()> {
    let destination = Destination::from(args.dest);
    let sink = DirectorySink::new(&args.resolve.path);
    if !sink.supports(destination) {
        return Err(CreateError::UnsupportedDestination(destination.as_str()).into());
    }

    let resolution = run_pass(store, &args.resolve)?;
    print_resolution(&resolution, verbose);
    println!();

    if safe_mode {
        println!("{} Would create {} '{}'", "🔒".cyan(), destination, resolution.name);
        return Ok(());
    }

    if !args.yes {
        let confirm = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Create {} '{}'?", destination, resolution.name))
            .default(true)
            .interact()
            .context("Failed to get confirmation")?;

        if !confirm {
            println!("{} Cancelled", "ℹ️".cyan());
            return Ok(());
        }
    }

    match sink.create(&resolution.name, destination) {
        Ok(path) => {
            println!("{} Created {}", "✅".green(), path.display().to_string().color(colors::PATH));
            Ok(())
        }
        Err(e @ CreateError::Conflict { .. }) => {
            println!("{} The folder appeared after scanning, run again for a new name", "⚠️".yellow());
            Err(e.into())
        }
        Err(e) => Err(e).context("Failed to create folder"),
    }
}

fn handle_tokens() {
    let tokens = TokenTable::build(SystemClock.now());

    println!("{}", "🔤 TOKENS".bold().color(colors::HEADER));
    println!();
    for token in tokens.sorted_by_name() {
        let value = match token.kind {
            TokenKind::Version => "next in sequence".dimmed().to_string(),
            TokenKind::Clock => token.current_value.clone(),
        };
        println!("  {:<14} {:<10} {}", token.name, token.placeholder.cyan(), value);
    }
    println!();
    println!("{} Pad the version with #: {}", "💡".cyan(), "{version###}".bold());
}

fn handle_preset(store: &mut JsonPresetStore, subcommand: cli::PresetArgs, safe_mode: bool) -> Result<()> {
    match subcommand {
        cli::PresetArgs::List => {
            let presets = store.list();
            if presets.is_empty() {
                println!("{} No presets saved", "ℹ️".cyan());
                println!("{} Try: {}", "💡".cyan(), "continue-folder preset save daily \"{YYYY}{MM}{DD}_{version##}\"".bold());
                return Ok(());
            }

            println!("{} ({}):", "📋 PRESETS".bold().color(colors::HEADER), presets.len());
            for preset in presets {
                println!("  {} {}", preset.name.bold(), preset.pattern.cyan());
            }
        }

        cli::PresetArgs::Show { name } => match store.get(&name) {
            Some(preset) => println!("{} {}", preset.name.bold(), preset.pattern.cyan()),
            None => bail!("Preset '{}' not found", name),
        },

        cli::PresetArgs::Save { name, pattern, yes } => {
            if safe_mode {
                println!("{} Would save preset '{}'", "🔒".cyan(), name);
                return Ok(());
            }

            match store.create(Preset { name: name.clone(), pattern: pattern.clone() }) {
                Ok(()) => {}
                Err(PresetError::Duplicate(_)) => {
                    let overwrite = yes
                        || Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(format!("Overwrite existing preset '{}'?", name))
                            .default(false)
                            .interact()
                            .context("Failed to get confirmation")?;

                    if !overwrite {
                        println!("{} Preset left unchanged", "ℹ️".cyan());
                        return Ok(());
                    }
                    store.update(&name, &pattern)?;
                }
                Err(e) => return Err(e.into()),
            }

            store.save().context("Failed to save presets")?;
            println!("{} Saved preset '{}' to {}", "✅".green(), name, store.path().display());
        }

        cli::PresetArgs::Delete { name, yes } => {
            if store.get(&name).is_none() {
                bail!("Preset '{}' not found", name);
            }
            if safe_mode {
                println!("{} Would delete preset '{}'", "🔒".cyan(), name);
                return Ok(());
            }

            if !yes {
                let confirm = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("Permanently delete preset '{}'?", name))
                    .default(false)
                    .interact()
                    .context("Failed to get confirmation")?;

                if !confirm {
                    println!("{} Preset kept", "ℹ️".cyan());
                    return Ok(());
                }
            }

            store.delete(&name)?;
            store.save().context("Failed to save presets")?;
            println!("{} Deleted preset '{}'", "✅".green(), name);
        }
    }

    Ok(())
}
