// crates/laptop-cli/src/commands/upload.rs
//
// `laptop upload-image <laptop-id> <path>`: upload a laptop image.

use std::path::PathBuf;

use clap::Args;

use super::ConnectOpts;

#[derive(Debug, Args)]
pub struct UploadCmd {
    /// ID of the laptop the image belongs to.
    pub laptop_id: String,

    /// Image file. Its extension becomes the stored image type.
    pub path: PathBuf,
}

/// Run the upload command.
pub async fn run(opts: &ConnectOpts, cmd: &UploadCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = opts.laptop_client().await?;
    let response = client.upload_image(&cmd.laptop_id, &cmd.path).await?;
    println!("Uploaded image {} ({} bytes)", response.id, response.size);
    Ok(())
}
