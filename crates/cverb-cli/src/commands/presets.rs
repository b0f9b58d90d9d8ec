//! Preset management commands.
//!
//! Provides commands to list, show and copy reverb presets.

use clap::{Args, Subcommand};
use cverb_config::{
    PresetDirs, ReverbPreset, ensure_user_presets_dir, factory_preset_names, factory_presets,
    get_factory_preset, list_user_presets, load_preset, preset_name_from_path, user_presets_dir,
};

/// Sample rate used to show delays in samples.
const SHOW_SAMPLE_RATE: u32 = 44100;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Copy a factory preset to user presets for customization
    Copy {
        /// Factory preset name
        source: String,

        /// New preset name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Copy { source, name } => copy_preset(&source, name.as_deref()),
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        let rows = factory_presets()
            .into_iter()
            .map(|p| (p.name, p.description.unwrap_or_default()));
        print_section("Factory presets", rows);
    }

    if !factory_only {
        let files = list_user_presets();
        if files.is_empty() {
            println!("User presets ({})", user_presets_dir().display());
            println!("  (none) - start from a factory preset with `cverb presets copy <name>`");
            println!();
        } else {
            let rows = files.iter().map(|path| {
                let name = preset_name_from_path(path).unwrap_or_else(|| "?".to_string());
                let desc = match ReverbPreset::load(path) {
                    Ok(preset) => preset.description.unwrap_or_default(),
                    Err(e) => format!("<unreadable: {e}>"),
                };
                (name, desc)
            });
            print_section(
                &format!("User presets ({})", user_presets_dir().display()),
                rows,
            );
        }
    }

    Ok(())
}

fn print_section(title: &str, rows: impl Iterator<Item = (String, String)>) {
    println!("{title}");
    for (name, desc) in rows {
        println!("  {name:<12} {desc}");
    }
    println!();
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    let config = preset.to_config();

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {desc}");
        println!();
    }

    println!("{}", preset.to_toml()?.trim_end());
    println!();

    println!("At {SHOW_SAMPLE_RATE} Hz:");
    match (
        config.comb_delay_samples(SHOW_SAMPLE_RATE),
        config.allpass_delay_samples(SHOW_SAMPLE_RATE),
        config.history_capacity(SHOW_SAMPLE_RATE),
    ) {
        (Ok(comb), Ok(allpass), Ok(capacity)) => {
            println!("  comb delay:      {comb} samples");
            println!("  all-pass delays: {allpass:?} samples");
            println!("  line capacity:   {capacity} samples");
        }
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            println!("  cannot be sized: {e}");
        }
    }

    Ok(())
}

fn copy_preset(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let Some(factory) = get_factory_preset(source) else {
        anyhow::bail!(
            "no factory preset named '{source}' (available: {})",
            factory_preset_names().join(", ")
        );
    };

    let target = new_name.unwrap_or(source);
    let path = ensure_user_presets_dir()?.join(format!("{target}.toml"));
    if path.exists() {
        anyhow::bail!("{} already exists; pick another --name", path.display());
    }

    let mut preset = ReverbPreset::new(target).with_params(factory.reverb);
    preset.description = factory.description;
    preset.save(&path)?;

    println!("{} -> {}", factory.name, path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    let dirs = PresetDirs::platform();
    println!("user:   {}", dirs.user.display());
    println!("system: {}", dirs.system.display());
    Ok(())
}
