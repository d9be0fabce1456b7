use anyhow::Result;
use clap::Args;
use serde::Serialize;

use callme_core::{format_phone, phone_digits};

use crate::commands::print_json;

#[derive(Debug, Args)]
pub struct PhoneArgs {
    /// Raw input, as typed into the phone field
    #[arg(required = true, allow_hyphen_values = true)]
    pub inputs: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MaskedPhone {
    input: String,
    digits: String,
    formatted: String,
}

pub fn format(json: bool, args: PhoneArgs) -> Result<()> {
    let masked: Vec<MaskedPhone> = args
        .inputs
        .into_iter()
        .map(|input| MaskedPhone {
            digits: phone_digits(&input),
            formatted: format_phone(&input),
            input,
        })
        .collect();

    if json {
        return print_json(&masked);
    }
    for phone in masked {
        println!("{}", phone.formatted);
    }
    Ok(())
}
