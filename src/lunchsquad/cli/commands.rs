//! # CLI Layer
//!
//! This module is **one possible UI client** for lunchsquad. It is the only
//! place that:
//! - Parses shell arguments
//! - Writes to stdout and stderr
//! - Asks for confirmation
//!
//! Each `handle_*` function turns parsed arguments into one `LunchApi` call
//! and prints the returned `CmdResult`. Business rules live in the command
//! layer; nothing here validates orders.

use super::render::{print_messages, render_config, render_rows, render_status, render_tally};
use super::setup::{print_grouped_help, AddCommands, Cli, Commands};
use clap::Parser;
use lunchsquad::api::{ConfigAction, LunchApi};
use lunchsquad::error::{LunchError, Result};
use lunchsquad::export::ExportFormat;
use lunchsquad::init::initialize;
use lunchsquad::logging;
use lunchsquad::model::{Candidate, DeliMeal, KebabMeal, Kind, Modifier};
use lunchsquad::presenter::{OrderFilter, SortKey};
use lunchsquad::store::FsBackend;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

struct AppContext {
    api: LunchApi<FsBackend, FsBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let command = match cli.command {
        Some(command) if !cli.help => command,
        _ => {
            print_grouped_help();
            return Ok(());
        }
    };

    let mut ctx = init_context()?;

    match command {
        Commands::Add { meal } => handle_add(&mut ctx, meal),
        Commands::List { sort, kind, name } => handle_list(&ctx, sort, kind, name),
        Commands::Remove { positions } => handle_remove(&mut ctx, positions),
        Commands::Vote { kind, name } => handle_vote(&mut ctx, kind, name),
        Commands::Votes => handle_votes(&ctx),
        Commands::Clear { yes } => handle_clear(&mut ctx, yes),
        Commands::Import { file } => handle_import(&mut ctx, file),
        Commands::Export { format, dir } => handle_export(&ctx, format, dir),
        Commands::Status => handle_status(&ctx),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

fn init_context() -> Result<AppContext> {
    let ctx = initialize()?;
    Ok(AppContext { api: ctx.api })
}

/// Turn the add subcommand into an unvalidated candidate.
fn candidate_from(meal: AddCommands) -> Candidate {
    match meal {
        AddCommands::Numbered { name, item } => Candidate::numbered(name, item),
        AddCommands::Kebab {
            name,
            venue,
            product,
            sauces,
            extras,
            custom,
            spice,
            box_style,
        } => {
            let modifiers = extras
                .into_iter()
                .map(Modifier::standard)
                .chain(custom.into_iter().map(Modifier::custom))
                .collect();
            let mut kebab = KebabMeal::new(venue, product)
                .with_sauces(sauces)
                .with_modifiers(modifiers)
                .with_spice_level(spice);
            if let Some(style) = box_style {
                kebab = kebab.with_box_style(style);
            }
            Candidate::kebab(name, kebab)
        }
        AddCommands::Deli {
            name,
            product,
            salad,
            bakery,
            sauce,
            note,
        } => {
            let mut deli = DeliMeal::new(product);
            deli.salad_choice = salad;
            deli.bakery_free_text = bakery;
            deli.sauce = sauce;
            deli.note = note;
            Candidate::deli(name, deli)
        }
    }
}

fn handle_add(ctx: &mut AppContext, meal: AddCommands) -> Result<()> {
    let result = ctx.api.add_order(&candidate_from(meal))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &AppContext,
    sort: SortKey,
    kind: Option<Kind>,
    name: Option<String>,
) -> Result<()> {
    let filter = OrderFilter {
        kind,
        submitter: name,
    };
    let result = ctx.api.list_orders(sort, &filter)?;
    print!("{}", render_rows(&result.listed_rows));
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, positions: Vec<String>) -> Result<()> {
    let result = ctx.api.remove_orders(&positions[..])?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_vote(ctx: &mut AppContext, kind: Kind, name: String) -> Result<()> {
    let result = ctx.api.vote(&name, kind)?;
    print_messages(&result.messages);
    if let Some(tally) = &result.tally {
        print!("{}", render_tally(tally, &ctx.api.current_config().catalog));
    }
    Ok(())
}

fn handle_votes(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.votes()?;
    match &result.tally {
        Some(tally) if tally.total() > 0 => {
            print!("{}", render_tally(tally, &ctx.api.current_config().catalog))
        }
        _ => {}
    }
    print_messages(&result.messages);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    if !yes {
        let count = ctx.api.store().len();
        if !io::stdin().is_terminal() {
            return Err(LunchError::Api(format!(
                "Refusing to clear {} orders without --yes",
                count
            )));
        }
        if !confirm(&format!("Clear {} orders and reset the votes?", count))? {
            println!("Nothing cleared.");
            return Ok(());
        }
    }
    let result = ctx.api.clear_orders()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: PathBuf) -> Result<()> {
    let result = ctx.api.import_orders(&file)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, format: ExportFormat, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let result = ctx.api.export_orders(format, &dir)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_status(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.status()?;
    if let Some(status) = &result.status {
        print!("{}", render_status(status));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    Ok(())
}
