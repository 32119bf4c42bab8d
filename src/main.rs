// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;
use std::sync::Arc;

use waste_wise::{
    AppConfig, Catalog, Category, IdentificationStub, IdentificationTicket, InputDescriptor,
    LimitEvaluator, PendingIdentification, TracingNotifier, WasteLogStore, WasteResult,
    WasteSession, WasteType,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(waste_wise::config::log_filter())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = AppConfig::from_env()?;

    if args.first().map(String::as_str) == Some("config") {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut session = open_session(&config)?;

    match args.first().map(String::as_str) {
        None => run_ui_mode(&mut session)?,
        Some("identify") => run_identify(&mut session, &config, &args[1..])?,
        Some("search") => run_search(&session, &args[1..].join(" ")),
        Some("show") => run_show(&session, arg(&args, 1, "waste-id")?)?,
        Some("record") => run_record(&mut session, &args[1..])?,
        Some("remove") => {
            let id = arg(&args, 1, "waste-id")?;
            session.store_mut().remove_entry(id)?;
            println!("✓ Removed {} from the disposal log", id);
        }
        Some("clear") => {
            session.store_mut().clear_all()?;
            println!("✓ Disposal log cleared, limits reset to defaults");
        }
        Some("limit") => {
            let category: Category = arg(&args, 1, "category")?.parse()?;
            let limit: u32 = arg(&args, 2, "limit")?
                .parse()
                .context("limit must be a whole number")?;
            session.store_mut().set_limit(category, limit)?;
            println!("✓ Daily limit for {} set to {}", category, limit);
        }
        Some("stats") => print_stats(&session),
        Some("vendors") => {
            let category = match args.get(1) {
                Some(c) => Some(c.parse::<Category>()?),
                None => None,
            };
            print_vendors(session.catalog(), category);
        }
        Some(other) => {
            print_usage();
            bail!("unknown command: {}", other);
        }
    }

    session.close();
    Ok(())
}

fn open_session(config: &AppConfig) -> Result<WasteSession> {
    let catalog = Arc::new(Catalog::builtin());
    if let Err(issues) = catalog.validate() {
        for issue in &issues {
            tracing::error!(%issue, "catalog issue");
        }
        bail!("built-in catalog failed validation ({} issues)", issues.len());
    }

    let storage = config.open_storage()?;
    let store = WasteLogStore::load(catalog.clone(), storage);

    let stub = match config.rng_seed {
        Some(seed) => IdentificationStub::with_seed(catalog, seed),
        None => IdentificationStub::new(catalog),
    }
    .with_max_bytes(config.max_image_bytes);

    Ok(WasteSession::new(store, stub, Box::new(TracingNotifier)))
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .with_context(|| format!("missing <{}> argument", name))
}

fn print_usage() {
    eprintln!("Usage: waste-wise [command]");
    eprintln!();
    eprintln!("  (no command)              open the dashboard");
    eprintln!("  identify <image-path>     identify a waste item from a photo");
    eprintln!("  search <query>            search the waste catalog");
    eprintln!("  show <waste-id>           decomposition, 5Rs and vendors for an item");
    eprintln!("  record <waste-id> [n]     log n disposals (default 1)");
    eprintln!("  remove <waste-id>         drop an item from the log");
    eprintln!("  clear                     empty the log and reset limits");
    eprintln!("  limit <category> <n>      set a daily limit");
    eprintln!("  stats                     today's counts against limits");
    eprintln!("  vendors [category]        vendors accepting a category");
    eprintln!("  config                    print the effective configuration");
}

// ============================================================================
// COMMANDS
// ============================================================================

fn run_identify(session: &mut WasteSession, config: &AppConfig, args: &[String]) -> Result<()> {
    let path = arg(args, 0, "image-path")?;
    let descriptor = InputDescriptor::from_path(path)?;

    println!("🔍 Identifying {}...", path);
    let pending = session.start_identification(Some(descriptor), config.identify_delay());
    let (ticket, result) = resolve_identification(pending)?;

    match session.complete_identification(ticket, result) {
        Some(waste) => {
            println!("✓ Item identified as {}\n", waste.name);
            print_detail(session.catalog(), &waste);
        }
        None => {
            eprintln!("❌ Could not identify the waste item. Please try again.");
        }
    }
    Ok(())
}

#[cfg(feature = "async")]
fn resolve_identification(
    pending: PendingIdentification,
) -> Result<(IdentificationTicket, WasteResult<WasteType>)> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(pending.resolve()))
}

#[cfg(not(feature = "async"))]
fn resolve_identification(
    pending: PendingIdentification,
) -> Result<(IdentificationTicket, WasteResult<WasteType>)> {
    if !pending.delay().is_zero() {
        tracing::debug!(delay = ?pending.delay(), "built without async, skipping identification delay");
    }
    Ok(pending.resolve_now())
}

fn run_search(session: &WasteSession, query: &str) {
    let results = session.catalog().search(query);
    if results.is_empty() {
        println!("No waste items match '{}'", query.trim());
        return;
    }

    for waste in results {
        println!("{:<16} {:<16} {}", waste.id, waste.name, waste.category);
    }
}

fn run_show(session: &WasteSession, waste_id: &str) -> Result<()> {
    let waste = session
        .catalog()
        .lookup_by_id(waste_id)
        .with_context(|| format!("no waste item with id '{}'", waste_id))?;
    print_detail(session.catalog(), waste);
    Ok(())
}

fn run_record(session: &mut WasteSession, args: &[String]) -> Result<()> {
    let waste_id = arg(args, 0, "waste-id")?;
    let quantity: u32 = match args.get(1) {
        Some(q) => q.parse().context("quantity must be a whole number")?,
        None => 1,
    };

    let waste = session.select(waste_id)?;
    let outcome = session.record_disposal(&waste, quantity)?;

    if outcome.is_over_limit {
        println!(
            "⚠️  You've exceeded your daily limit for {} waste! ({} today)",
            waste.category, outcome.current_count
        );
    } else {
        println!(
            "✓ {} {} added to your disposal log ({} {} today)",
            quantity, waste.name, outcome.current_count, waste.category
        );
    }
    Ok(())
}

// ============================================================================
// OUTPUT
// ============================================================================

fn print_detail(catalog: &Catalog, waste: &WasteType) {
    println!("{} ({})", waste.name, waste.category);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", waste.description);

    println!(
        "\n⏳ Decomposition: {} ({} impact)",
        waste.decomposition_time.display(),
        waste.impact_level().as_str()
    );

    println!("\n♻️  5R strategies:");
    for r in waste.five_rs() {
        let mark = if r.applicable { "✓" } else { "·" };
        println!("  {} {:<10} {}", mark, r.strategy.name(), r.strategy.description());
    }

    println!("\n💡 Reuse suggestions:");
    for suggestion in &waste.reuse_suggestions {
        println!("  - {}", suggestion);
    }

    if let Some(notes) = &waste.recycling_notes {
        println!("\nRecycling: {}", notes);
    }
    if let Some(notes) = &waste.hazardous_notes {
        println!("⚠️  Hazard: {}", notes);
    }

    println!();
    print_vendors(catalog, Some(waste.category));
}

fn print_stats(session: &WasteSession) {
    println!("📊 Today's disposals");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for stat in LimitEvaluator::new(session.store()).stats() {
        let flag = if stat.is_over_limit {
            format!("⚠️  over by {}", stat.over_by)
        } else {
            String::new()
        };
        println!("{:<12} {:>3} / {:<3} {}", stat.name, stat.count, stat.limit, flag);
    }
}

fn print_vendors(catalog: &Catalog, category: Option<Category>) {
    let vendors: Vec<_> = match category {
        Some(c) => catalog.vendors_accepting(c),
        None => catalog.vendors().iter().collect(),
    };

    match category {
        Some(c) => println!("🏪 Vendors accepting {} waste:", c),
        None => println!("🏪 All vendors:"),
    }

    if vendors.is_empty() {
        println!("  (none)");
        return;
    }

    for vendor in vendors {
        println!("  {} - {} ({})", vendor.name, vendor.location, vendor.contact);
        if let Some(c) = category {
            if let Some(price) = vendor.price_for(c) {
                println!("      pricing: {}", price.display());
            }
        }
        if let Some(site) = &vendor.website {
            println!("      {}", site);
        }
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[cfg(feature = "tui")]
fn run_ui_mode(session: &mut WasteSession) -> Result<()> {
    let mut app = ui::App::new(session);
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_session: &mut WasteSession) -> Result<()> {
    print_usage();
    eprintln!();
    eprintln!("❌ Dashboard not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
