use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Context, Result, eyre};
use outsource_codegen::Options;

use super::UnwrapOrExit;
use crate::module::{self, Format};

const DEFAULT_CONFIG: &str = "outsource.toml";

#[derive(Args)]
pub struct GenerateCommand {
    /// Data file to render (JSON or TOML)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Module-level name bound to the data
    #[arg(short, long)]
    pub name: String,

    /// Output file (prints to stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input format (inferred from the file extension by default)
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Module docstring
    #[arg(short, long)]
    pub docstring: Option<String>,

    /// Path to outsource.toml (defaults to ./outsource.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let options = self.load_options()?;
        let source = self.render(options)?;

        match &self.output {
            Some(path) if !self.dry_run => {
                write_file(path, &source)
                    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
                println!("Generated: {}", path.display());
            }
            Some(path) => {
                println!("── {} ──", path.display());
                println!("{}", source);
            }
            None => print!("{}", source),
        }

        Ok(())
    }

    fn render(&self, options: Options) -> Result<String> {
        let format = match self.format {
            Some(format) => format,
            None => Format::from_path(&self.input).ok_or_else(|| {
                eyre!(
                    "Cannot infer the format of {}; pass --format json or --format toml",
                    self.input.display()
                )
            })?,
        };

        if self.name.chars().any(char::is_lowercase) {
            eprintln!("warning: `{}` is not an upper-case constant name", self.name);
        }

        let data = module::load(&self.input, format)?;
        module::render(&self.name, data, self.docstring.as_deref(), options)
    }

    fn load_options(&self) -> Result<Options> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG);
                if !default.exists() {
                    return Ok(Options::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        Ok(Options::from_toml(&content, &path.display().to_string()).unwrap_or_exit())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
