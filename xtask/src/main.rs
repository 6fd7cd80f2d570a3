use anyhow::Result;
use clap::{Parser, Subcommand};
use jellyscape_assets::TextureStore;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for jellyscape")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, assets, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Verify the required sprite textures exist and decode
    Assets {
        #[arg(long, default_value = "assets")]
        dir: PathBuf,
    },
    /// Run a short headless simulation through the CLI
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt --check", &["fmt", "--all", "--", "--check"])?;
            clippy()?;
            cargo("test", &["test", "--workspace"])?;
            check_assets(Path::new("assets"))?;
            cargo("doc", &["doc", "--workspace", "--no-deps"])?;
        }
        Commands::Fmt => cargo("fmt --check", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => clippy()?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Assets { dir } => check_assets(&dir)?,
        Commands::Smoke => cargo(
            "headless simulate",
            &[
                "run", "-p", "jellyscape-cli", "--", "simulate", "--frames", "5",
            ],
        )?,
    }

    Ok(())
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {label} failed");
    }
    Ok(())
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn check_assets(dir: &Path) -> Result<()> {
    let store = TextureStore::load_required(dir)?;
    println!("==> Checked textures in {}", store.root().display());
    for name in jellyscape_assets::REQUIRED_TEXTURES {
        let tex = store.get(name)?;
        println!("    {name}: {}x{}", tex.width, tex.height);
    }
    Ok(())
}
