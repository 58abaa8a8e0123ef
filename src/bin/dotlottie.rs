use std::{
    fs,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use dotlottie_bundle::{
    Animation, ArchiveCodec as _, Bundle, BuildOptions, FormatVersion, OfflineAssetCodec,
    StateMachine, Theme, ZipCodec,
};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dotlottie", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack Lottie JSON files (and optional themes/state machines) into a .lottie archive.
    Pack(PackArgs),
    /// Print the manifest summary and every archive entry with its size and SHA-256.
    Inspect(InspectArgs),
    /// Convert an archive between the legacy and current layouts.
    Convert(ConvertArgs),
    /// Extract every archive entry into a directory.
    Unpack(UnpackArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Animation as `ID=PATH` (repeatable).
    #[arg(long = "animation", value_name = "ID=PATH", required = true)]
    animations: Vec<String>,

    /// Theme as `ID=PATH` (repeatable, current format only).
    #[arg(long = "theme", value_name = "ID=PATH")]
    themes: Vec<String>,

    /// State machine as `ID=PATH` (repeatable, current format only).
    #[arg(long = "state-machine", value_name = "ID=PATH")]
    state_machines: Vec<String>,

    /// Archive layout.
    #[arg(long, value_enum, default_value_t = FormatChoice::V2)]
    format: FormatChoice,

    /// Fold perceptually identical images into one copy.
    #[arg(long, default_value_t = false)]
    dedupe: bool,

    /// Refuse network fetches for URL-sourced content.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Output .lottie path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input .lottie path.
    path: PathBuf,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input .lottie path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target layout.
    #[arg(long, value_enum)]
    to: FormatChoice,

    /// Output .lottie path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct UnpackArgs {
    /// Input .lottie path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Destination directory.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    V1,
    V2,
}

impl From<FormatChoice> for FormatVersion {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::V1 => FormatVersion::V1,
            FormatChoice::V2 => FormatVersion::V2,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Unpack(args) => cmd_unpack(args),
    }
}

fn split_pair(raw: &str) -> anyhow::Result<(&str, &Path)> {
    let (id, path) = raw
        .split_once('=')
        .with_context(|| format!("expected ID=PATH, got '{raw}'"))?;
    Ok((id, Path::new(path)))
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let bytes = fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse JSON '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let mut builder = Bundle::builder()
        .version(args.format.into())
        .options(BuildOptions {
            deduplicate_images: args.dedupe,
            plugin_threads: None,
        });
    if args.offline {
        builder = builder.asset_codec(Arc::new(OfflineAssetCodec));
    }
    let mut bundle = builder.build()?;

    for raw in &args.animations {
        let (id, path) = split_pair(raw)?;
        bundle.add_animation(Animation::new(id, read_json(path)?)?)?;
    }
    for raw in &args.themes {
        let (id, path) = split_pair(raw)?;
        bundle.add_theme(Theme::new(id, read_json(path)?)?)?;
    }
    for raw in &args.state_machines {
        let (id, path) = split_pair(raw)?;
        bundle.add_state_machine(StateMachine::new(id, read_json(path)?)?)?;
    }

    let bytes = bundle.to_archive()?;
    write_output(&args.out, &bytes)?;
    eprintln!(
        "wrote {} ({} animations, {} assets, {} bytes)",
        args.out.display(),
        bundle.registry().animation_count(),
        bundle.registry().asset_count(),
        bytes.len()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = fs::read(&args.path).with_context(|| format!("read '{}'", args.path.display()))?;
    let bundle = Bundle::from_archive(&bytes)?;
    let registry = bundle.registry();

    println!("version: {}", bundle.version());
    println!("generator: {}", bundle.metadata().generator);
    println!("animations:");
    for animation in registry.animations() {
        let files: Vec<_> = registry
            .assets_of(animation.id())
            .into_iter()
            .map(|(_, a)| a.file_name().to_owned())
            .collect();
        println!("  {} [{}]", animation.id(), files.join(", "));
    }
    let themes: Vec<_> = registry.themes().map(|t| t.id()).collect();
    if !themes.is_empty() {
        println!("themes: {}", themes.join(", "));
    }
    let machines: Vec<_> = registry.state_machines().map(|s| s.id()).collect();
    if !machines.is_empty() {
        println!("state machines: {}", machines.join(", "));
    }

    println!("entries:");
    for entry in ZipCodec.unpack(&bytes)? {
        let digest = sha2::Sha256::digest(&entry.bytes);
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        println!("  {:>10}  {}  {}", entry.bytes.len(), hex, entry.path);
    }
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let bytes =
        fs::read(&args.in_path).with_context(|| format!("read '{}'", args.in_path.display()))?;
    let mut source = Bundle::from_archive(&bytes)?;
    let mut target = source.convert_to(args.to.into())?;
    let out = target.to_archive()?;
    write_output(&args.out, &out)?;
    eprintln!(
        "converted {} ({}) -> {} ({})",
        args.in_path.display(),
        source.version(),
        args.out.display(),
        target.version()
    );
    Ok(())
}

fn cmd_unpack(args: UnpackArgs) -> anyhow::Result<()> {
    let bytes =
        fs::read(&args.in_path).with_context(|| format!("read '{}'", args.in_path.display()))?;
    let entries = ZipCodec.unpack(&bytes)?;
    for entry in &entries {
        let rel = Path::new(&entry.path);
        let safe = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        anyhow::ensure!(safe, "refusing to extract unsafe entry path '{}'", entry.path);
        write_output(&args.out_dir.join(rel), &entry.bytes)?;
    }
    eprintln!("extracted {} entries into {}", entries.len(), args.out_dir.display());
    Ok(())
}
