use std::error::Error;

use serde::Serialize;

pub mod demo;
pub mod elect;
pub mod sweep;
pub mod tabulate;

/// Prints `value` to stdout as canonical JSON.
fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let bytes = bloc_exp::serde::to_canonical_json_bytes(value)?;
    println!("{}", String::from_utf8(bytes)?);
    Ok(())
}
