//! Attach an evidence file to a dispute by reference. Only metadata is read.

use std::path::Path;

use adevo_core::Evidence;
use anyhow::{Context, bail};

fn media_type(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(media.to_string())
}

pub async fn load_evidence(path: &Path) -> anyhow::Result<Evidence> {
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("reading evidence {}", path.display()))?;
    if !meta.is_file() {
        bail!("evidence {} is not a file", path.display());
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("evidence {} has no usable file name", path.display()))?
        .to_string();

    Ok(Evidence {
        file_name,
        size_bytes: meta.len(),
        media_type: media_type(path),
    })
}
