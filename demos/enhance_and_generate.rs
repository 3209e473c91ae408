use imagen_studio::{
    models::append_keyword, resolve_credential, save_images, AspectRatio, FileCredentialStore,
    StudioClient, StudioConfig, SUPPORTED_IMAGE_MODEL,
};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    imagen_studio::logger::init()?;

    let config = StudioConfig::from_env();
    let store = FileCredentialStore::new(config.credentials_path.clone());
    let credential = resolve_credential(&config, &store).await?;
    let client = StudioClient::new(&config)?;

    let seed = append_keyword("A model in a red dress, mystical forest setting", "Golden hour sunlight");
    let prompt = client.enhance_prompt(&seed, &credential).await?;
    println!("Enhanced prompt: {}", prompt);

    let images = client
        .generate_images(&prompt, AspectRatio::Portrait, SUPPORTED_IMAGE_MODEL, &credential)
        .await?;
    for path in save_images(Path::new("output"), &images).await? {
        println!("Saved {}", path.display());
    }

    Ok(())
}
