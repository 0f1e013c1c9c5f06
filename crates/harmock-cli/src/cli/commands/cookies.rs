//! `harmock cookies <value>...` – parse Set-Cookie values into JSON.

use anyhow::Result;
use harmock_core::cookie::{self, ParseOptions};

pub fn run_cookies(values: &[String], raw: bool, map: bool) -> Result<()> {
    let split: Vec<String> = values
        .iter()
        .flat_map(|value| cookie::split_cookies_string(value))
        .collect();
    let options = ParseOptions {
        decode_values: !raw,
        map,
        silent: false,
    };
    let parsed = cookie::parse(&split, &options);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
