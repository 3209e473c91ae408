use clap::{Parser, Subcommand};
use imagen_studio::{
    logger::{self, LoggerConfig},
    models::{append_keyword, QUICK_ELEMENTS},
    resolve_credential, save_images, store_api_key, AspectRatio, Credential, CredentialStore,
    FileCredentialStore, ImageModel, StudioClient, StudioConfig, GEMINI_API_KEY_SLOT,
    SUPPORTED_IMAGE_MODEL,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(
    name = "imagen-studio",
    version,
    about = "Generate images from a prompt and enhance prompt ideas with Google's generative AI"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store the Gemini API key
    SetKey { api_key: String },
    /// Forget the stored API key
    ClearKey,
    /// Generate four images from a prompt
    Generate(GenerateArgs),
    /// Rewrite an idea into a detailed photography prompt
    Enhance(EnhanceArgs),
    /// List aspect ratios and image models
    Models,
    /// List the quick-add prompt keywords
    Keywords,
}

#[derive(Debug, Parser)]
struct GenerateArgs {
    prompt: Vec<String>,
    #[arg(long, value_parser = AspectRatio::from_str, default_value = "1:1")]
    aspect: AspectRatio,
    #[arg(long, default_value = SUPPORTED_IMAGE_MODEL)]
    model: String,
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Debug, Parser)]
struct EnhanceArgs {
    seed: Vec<String>,
    #[arg(long = "keyword")]
    keywords: Vec<String>,
    /// Generate images from the enhanced prompt right away
    #[arg(long)]
    generate: bool,
    #[arg(long, value_parser = AspectRatio::from_str, default_value = "1:1")]
    aspect: AspectRatio,
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

impl EnhanceArgs {
    fn seed_with_keywords(&self) -> String {
        self.keywords
            .iter()
            .fold(self.seed.join(" "), |seed, keyword| append_keyword(&seed, keyword))
    }
}

fn print_models() {
    println!("Aspect ratios:");
    for ratio in AspectRatio::all() {
        println!("  {:<5} {}", ratio.as_str(), ratio.label());
    }
    println!("Models:");
    for model in ImageModel::catalog() {
        let state = if model.enabled { "" } else { " (unavailable)" };
        println!("  {:<24} {}{}", model.id, model.name, state);
    }
}

fn print_keywords() {
    for group in QUICK_ELEMENTS.iter() {
        println!("{}", group.title);
        for keyword in group.keywords {
            println!("  {}", keyword);
        }
    }
}

async fn generate_and_save(
    client: &StudioClient,
    prompt: &str,
    aspect_ratio: AspectRatio,
    model_id: &str,
    out_dir: &Path,
    credential: &Credential,
) -> imagen_studio::Result<()> {
    let uris = client
        .generate_images(prompt, aspect_ratio, model_id, credential)
        .await?;
    println!("Generated {} images", uris.len());
    for path in save_images(out_dir, &uris).await? {
        println!("{}", path.display());
    }
    Ok(())
}

async fn run(command: Command, config: StudioConfig) -> imagen_studio::Result<()> {
    let store = FileCredentialStore::new(config.credentials_path.clone());

    match command {
        Command::SetKey { api_key } => {
            store_api_key(&store, &api_key).await?;
            println!("API key saved to {}", store.path().display());
        }
        Command::ClearKey => {
            store.remove(GEMINI_API_KEY_SLOT).await?;
            println!("API key removed");
        }
        Command::Models => print_models(),
        Command::Keywords => print_keywords(),
        Command::Generate(args) => {
            let credential = resolve_credential(&config, &store).await?;
            let client = StudioClient::new(&config)?;
            generate_and_save(
                &client,
                &args.prompt.join(" "),
                args.aspect,
                &args.model,
                &args.out,
                &credential,
            )
            .await?;
        }
        Command::Enhance(args) => {
            let credential = resolve_credential(&config, &store).await?;
            let client = StudioClient::new(&config)?;
            let enhanced = client
                .enhance_prompt(&args.seed_with_keywords(), &credential)
                .await?;
            println!("{}", enhanced);

            if args.generate {
                generate_and_save(
                    &client,
                    &enhanced,
                    args.aspect,
                    SUPPORTED_IMAGE_MODEL,
                    &args.out,
                    &credential,
                )
                .await?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let logger_config = match std::env::var("IMAGEN_STUDIO_LOG").as_deref() {
        Ok("debug") => LoggerConfig::development(),
        Ok("json") => LoggerConfig::production(),
        _ => LoggerConfig::new().with_level(log::LevelFilter::Warn),
    };
    if let Err(e) = logger::init_with_config(logger_config) {
        eprintln!("{}", e);
    }
    if !dotenv_loaded {
        log::debug!("No .env file found, using process environment");
    }

    let config = StudioConfig::from_env();
    logger::log_config_info(&config);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_with_flags() {
        let cli = Cli::try_parse_from([
            "imagen-studio", "generate", "a", "red", "dress", "--aspect", "16:9", "--out", "shots",
        ])
        .unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.prompt.join(" "), "a red dress");
                assert_eq!(args.aspect, AspectRatio::Landscape);
                assert_eq!(args.model, SUPPORTED_IMAGE_MODEL);
                assert_eq!(args.out, PathBuf::from("shots"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn generate_defaults() {
        let cli = Cli::try_parse_from(["imagen-studio", "generate", "a fox"]).unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.aspect, AspectRatio::Square);
                assert_eq!(args.out, PathBuf::from("."));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn prompt_words_after_double_dash_are_kept() {
        let cli =
            Cli::try_parse_from(["imagen-studio", "generate", "--", "--vivid portrait"]).unwrap();
        match cli.command {
            Command::Generate(args) => assert_eq!(args.prompt, vec!["--vivid portrait"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn enhance_appends_keywords_to_seed() {
        let cli = Cli::try_parse_from([
            "imagen-studio", "enhance", "--keyword", "Neon glow", "--keyword", "35mm lens",
            "--generate",
        ])
        .unwrap();
        match cli.command {
            Command::Enhance(args) => {
                assert_eq!(args.seed_with_keywords(), "Neon glow, 35mm lens");
                assert!(args.generate);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn set_key_takes_the_key() {
        let cli = Cli::try_parse_from(["imagen-studio", "set-key", "AIza-1"]).unwrap();
        assert!(matches!(cli.command, Command::SetKey { api_key } if api_key == "AIza-1"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Cli::try_parse_from(["imagen-studio"]).is_err());
        assert!(Cli::try_parse_from(["imagen-studio", "paint"]).is_err());
        assert!(Cli::try_parse_from(["imagen-studio", "generate", "x", "--aspect", "2:1"]).is_err());
        assert!(Cli::try_parse_from(["imagen-studio", "generate", "x", "--model"]).is_err());
        assert!(Cli::try_parse_from(["imagen-studio", "generate", "x", "--seed", "1"]).is_err());
        assert!(Cli::try_parse_from(["imagen-studio", "set-key"]).is_err());
    }
}
