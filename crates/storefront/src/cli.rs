// src/cli.rs
use clap::{Args, Parser, Subcommand};

use address_form::AddressDraft;

#[derive(Parser)]
#[command(name = "storefront", version, about = "Storefront shipping address manager")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Run interactive TUI (default)
    Run,
    /// Print the stored addresses
    List {
        #[arg(long)]
        json: bool,
    },
    /// Validate an address without saving it
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub zipcode: String,
    #[arg(long, default_value = "")]
    pub address1: String,
    #[arg(long, default_value = "")]
    pub address2: String,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    /// Raw values as typed; normalization happens when they enter the form.
    pub fn raw_values(&self) -> AddressDraft {
        AddressDraft {
            name: self.name.clone(),
            phone: self.phone.clone(),
            zipcode: self.zipcode.clone(),
            address1: self.address1.clone(),
            address2: self.address2.clone(),
        }
    }
}
