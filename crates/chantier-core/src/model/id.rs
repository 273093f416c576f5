//! Opaque id minting for projects and owned entities.
//!
//! Project ids follow the `PRJ-<year>-<suffix>` format; owned entities get
//! a short prefixed id (`stg-`, `tsk-`, `cmt-`, `pht-`, `upd-`, `doc-`).
//! Suffixes are lowercase base36. Uniqueness is probabilistic; the store
//! retries against its known-id set on the rare collision.

use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

fn base36_suffix<R: Rng>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..BASE36.len());
            BASE36[idx] as char
        })
        .collect()
}

/// Mint a project id like `PRJ-2026-x7k3q9`.
#[must_use]
pub fn mint_project_id<R: Rng>(year: i32, rng: &mut R) -> String {
    format!("PRJ-{year}-{}", base36_suffix(rng))
}

/// Mint a short prefixed id like `tsk-p02ak1`.
#[must_use]
pub fn mint_short_id<R: Rng>(prefix: &str, rng: &mut R) -> String {
    format!("{prefix}-{}", base36_suffix(rng))
}

/// Mint a project id using the current year and the thread RNG.
#[must_use]
pub fn new_project_id() -> String {
    use chrono::Datelike;
    let year = chrono::Utc::now().year();
    mint_project_id(year, &mut rand::thread_rng())
}

/// Mint a short prefixed id using the thread RNG.
#[must_use]
pub fn new_short_id(prefix: &str) -> String {
    mint_short_id(prefix, &mut rand::thread_rng())
}
