use crate::calc::{from_decimal, to_decimal};
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug, Clone)]
pub enum ConvertCommand {
    /// Hours and minutes to decimal hours, e.g. `1 30` -> 1.50
    ToDecimal { hours: u32, minutes: u32 },
    /// Decimal hours to hours and minutes, e.g. `1.5` -> 1h 30m
    FromDecimal { value: f64 },
}

pub fn run(command: ConvertCommand) -> Result<()> {
    write_conversion(command, &mut std::io::stdout())
}

pub(crate) fn write_conversion<W: Write>(command: ConvertCommand, out: &mut W) -> Result<()> {
    match command {
        ConvertCommand::ToDecimal { hours, minutes } => {
            let value = to_decimal(hours, minutes)?;
            writeln!(out, "{hours}h {minutes}m = {value}")?;
        }
        ConvertCommand::FromDecimal { value } => {
            let hm = from_decimal(value)?;
            writeln!(out, "{value} = {hm}")?;
        }
    }
    Ok(())
}
