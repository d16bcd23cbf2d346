use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Subcommand;
use qrsite_config::Config;
use qrsite_core_qr_contracts::QrFeatureService;
use qrsite_core_qr_impl::{
    preview::{PreviewState, QrPreview},
    terminal, QrFeatureServiceImpl,
};
use qrsite_models::qr::QrWidth;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinSet,
};

#[derive(Debug, Subcommand)]
pub enum QrCommand {
    /// Encode text as a QR code
    #[command(aliases(["e"]))]
    Encode {
        /// The text to encode
        text: String,
        /// Width of the image in pixels, clamped to 120..=600
        #[arg(short, long)]
        width: Option<u32>,
        /// Write a PNG image to this path instead of printing to the terminal
        #[arg(short, long, conflicts_with = "data_url")]
        output: Option<PathBuf>,
        /// Print a `data:` url of the PNG image
        #[arg(short, long)]
        data_url: bool,
    },
    /// Read lines from stdin and show a live preview of the most recent one
    #[command(aliases(["p"]))]
    Preview {
        /// Width of the encoded images in pixels, clamped to 120..=600
        #[arg(short, long)]
        width: Option<u32>,
    },
}

impl QrCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let default_width = config.qr.default_width;
        match self {
            QrCommand::Encode {
                text,
                width,
                output,
                data_url,
            } => {
                encode(
                    text,
                    QrWidth::new(width.unwrap_or(default_width)),
                    output,
                    data_url,
                )
                .await
            }
            QrCommand::Preview { width } => {
                preview(QrWidth::new(width.unwrap_or(default_width))).await
            }
        }
    }
}

async fn encode(
    text: String,
    width: QrWidth,
    output: Option<PathBuf>,
    data_url: bool,
) -> anyhow::Result<()> {
    let Some(image) = QrFeatureServiceImpl.encode(text.clone(), width).await? else {
        eprintln!("Nothing to encode");
        return Ok(());
    };

    match (output, data_url) {
        (Some(path), _) => tokio::fs::write(&path, &image.png)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        (None, true) => println!("{}", image.to_data_url()),
        (None, false) => println!("{}", terminal::render(&text)?),
    }

    Ok(())
}

async fn preview(width: QrWidth) -> anyhow::Result<()> {
    let preview = Arc::new(QrPreview::new(QrFeatureServiceImpl));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = JoinSet::new();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let preview = Arc::clone(&preview);
        updates.spawn(async move {
            if preview.update(line, width).await {
                show(&preview.state());
            }
        });
    }

    while updates.join_next().await.is_some() {}

    Ok(())
}

fn show(state: &PreviewState) {
    // clear screen and move the cursor home
    print!("\x1b[2J\x1b[H");
    match state {
        PreviewState::Idle => {}
        PreviewState::Encoding => println!("..."),
        PreviewState::Ready { text, image } => match terminal::render(text) {
            Ok(rendered) => println!("{rendered}\n{} ({}px)", text, image.width),
            Err(err) => eprintln!("{err:#}"),
        },
        PreviewState::Error(message) => eprintln!("{message}"),
    }
}
