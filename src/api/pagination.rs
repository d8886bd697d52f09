use serde::Deserialize;

use crate::database::Page;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// `?page=&limit=`; missing, unparseable or non-positive values fall back to
/// the defaults. `limit` is capped at [`MAX_LIMIT`].
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn positive(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page {
            page: positive(self.page.as_deref(), DEFAULT_PAGE),
            limit: positive(self.limit.as_deref(), DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }
}

pub fn total_pages(total: i64, limit: u32) -> i64 {
    if limit == 0 {
        return 0;
    }
    (total + limit as i64 - 1) / limit as i64
}
