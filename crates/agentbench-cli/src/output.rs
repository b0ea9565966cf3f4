use agentbench_core::Result;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Warning line on stderr; stdout stays reserved for command output.
pub(crate) fn warn(msg: &str) {
    eprintln!("[agentbench WARN] {msg}");
}
