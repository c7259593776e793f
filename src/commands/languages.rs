use anyhow::{Context, Result};
use log::debug;
use std::io::Write;

use crate::judge0::ExecutionApi;

/// Prints one `id<TAB>name` line per supported language.
#[tracing::instrument(skip(api, out))]
pub async fn languages<A: ExecutionApi + ?Sized, W: Write>(api: &A, out: &mut W) -> Result<()> {
    let mut languages = api.languages().await.context("Failed to list languages")?;
    debug!("Server reported {} languages", languages.len());

    languages.sort_by_key(|l| l.id);
    for language in &languages {
        writeln!(out, "{}\t{}", language.id, language.name)?;
    }
    Ok(())
}
