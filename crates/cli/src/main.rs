use clap::{Parser, Subcommand};
use media_files::{
    data_dir_from_env_value, renderer_program_from_env_value, FileStore, StoreConfig,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "media")]
#[command(about = "Media service file store CLI")]
struct Cli {
    /// Directory holding stored files (defaults to $MEDIA_DATA_DIR, then "data")
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Program used to render previews (defaults to $MEDIA_RENDERER_BIN, then "pdftoppm")
    #[arg(long, global = true)]
    renderer: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all stored files
    List,
    /// Store a file
    Add {
        /// Path of the file to store
        path: PathBuf,
        /// Display name (defaults to the file name of `path`)
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the content path of a stored file
    Get {
        /// File id
        id: String,
    },
    /// Generate (or reuse) the preview of a stored file
    Preview {
        /// File id
        id: String,
        /// Copy the preview to this path instead of printing its location
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn open_store(cli: &Cli) -> Result<FileStore, Box<dyn std::error::Error>> {
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("MEDIA_DATA_DIR").ok()));
    let renderer = cli.renderer.clone().unwrap_or_else(|| {
        renderer_program_from_env_value(std::env::var("MEDIA_RENDERER_BIN").ok())
    });

    Ok(StoreConfig::new(data_dir, renderer)?.open()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        println!("Use 'media --help' for commands");
        return Ok(());
    };

    let store = open_store(&cli)?;

    match command {
        Commands::List => {
            let files = store.list()?;
            if files.is_empty() {
                println!("No files found.");
            } else {
                for file in files {
                    println!("{}  {}", file.id, file.name);
                }
            }
        }
        Commands::Add { path, name } => {
            let content = std::fs::read(path)?;
            let name = name
                .clone()
                .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()));

            match store.add(name.as_deref(), &content) {
                Ok(file) => println!("Stored {} as {}", file.name, file.id),
                Err(e) => eprintln!("Error storing file: {}", e),
            }
        }
        Commands::Get { id } => match store.get(id) {
            Ok(path) => println!("{}", path.display()),
            Err(e) => eprintln!("Error finding file: {}", e),
        },
        Commands::Preview { id, output } => match store.preview(id) {
            Ok(path) => match output {
                Some(output) => {
                    std::fs::copy(&path, output)?;
                    println!("Wrote preview to {}", output.display());
                }
                None => println!("{}", path.display()),
            },
            Err(e) => eprintln!("Error generating preview: {}", e),
        },
    }

    Ok(())
}
