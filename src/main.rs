use pokemon_sheet::persistence::write_export;
use pokemon_sheet::{DerivedCapabilities, PartyState, RuleTables, SheetConfig, SheetStore};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line: `pokemon-sheet [SAVE_FILE] [--export <PATH>]`
#[derive(Debug, Default)]
struct CliArgs {
    save_path: Option<PathBuf>,
    export: Option<PathBuf>,
}

fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args;
    while let Some(arg) = args.next() {
        if arg == "--export" {
            let Some(target) = args.next() else {
                anyhow::bail!("--export needs a target path");
            };
            parsed.export = Some(PathBuf::from(target));
        } else if arg.starts_with("--") {
            anyhow::bail!("unknown option {}", arg);
        } else if parsed.save_path.is_none() {
            parsed.save_path = Some(PathBuf::from(arg));
        } else {
            anyhow::bail!("unexpected argument {}", arg);
        }
    }
    Ok(parsed)
}

fn print_slot(derived: &DerivedCapabilities) {
    for line in derived.summary_lines() {
        println!("{}", line);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokemon_sheet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = SheetConfig::from_env();
    let save_path = args.save_path.unwrap_or_else(|| config.save_path.clone());

    let tables = RuleTables::load_dir_async(&config.data_dir).await;
    tracing::info!(data_dir = %config.data_dir.display(), "Rule tables loaded");

    let mut party = PartyState::new();
    let store = SheetStore::new(&save_path);
    if !store.load_into(&mut party, &tables) {
        println!("No saved sheet at {}, showing a blank one", save_path.display());
    }

    let trainer = &party.trainer;
    println!(
        "Trainer: {} (player {})",
        trainer.trainer_name, trainer.player_name
    );
    println!(
        "  Role levels: {}  PB: +{}  Pokemon level: {}",
        trainer.total_role_levels(),
        trainer.proficiency_bonus(),
        trainer.pokemon_level()
    );
    println!();

    let resolver = party.resolver(&tables);
    for (slot, _) in party.slots() {
        let derived = resolver.derive_slot(slot)?;
        print_slot(&derived);
    }

    if let Some(target) = args.export {
        let written = write_export(&target, &party)?;
        println!();
        println!("Exported sheet to {}", written.display());
    }

    Ok(())
}
