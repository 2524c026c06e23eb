use std::env;

use anyhow::{Context, Result, bail};

use crate::pagination::DEFAULT_PAGE_SIZE;

/// Environment variable overriding the default page size
pub const PAGE_SIZE_ENV: &str = "TASK_EXPLORER_PAGE_SIZE";

/// Resolve the page size: explicit flag, then `TASK_EXPLORER_PAGE_SIZE`, then the default
pub fn resolve_page_size(flag: Option<usize>) -> Result<usize> {
    resolve_page_size_from(flag, env::var(PAGE_SIZE_ENV).ok().as_deref())
}

fn resolve_page_size_from(flag: Option<usize>, env_value: Option<&str>) -> Result<usize> {
    let page_size = match (flag, env_value) {
        (Some(size), _) => size,
        (None, Some(raw)) => raw
            .trim()
            .parse::<usize>()
            .with_context(|| format!("{PAGE_SIZE_ENV} must be a positive integer, got '{raw}'"))?,
        (None, None) => DEFAULT_PAGE_SIZE,
    };

    if page_size == 0 {
        bail!("Page size must be at least 1");
    }
    Ok(page_size)
}
