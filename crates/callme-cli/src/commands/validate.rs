use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use callme_core::{FieldViolation, Page, PageEffect, PageEvent};

use crate::commands::{print_json, Context};
use crate::error::invalid_input;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Raw phone input; the mask is applied before validation
    #[arg(long, allow_hyphen_values = true)]
    pub phone: Option<String>,
    #[arg(long)]
    pub topic: Option<String>,
    #[arg(long)]
    pub message: Option<String>,
}

impl ValidateArgs {
    fn values(self) -> Vec<(&'static str, String)> {
        [
            ("name", self.name),
            ("email", self.email),
            ("phone", self.phone),
            ("topic", self.topic),
            ("message", self.message),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
    }
}

#[derive(Debug, Serialize)]
struct ValidateOutput {
    valid: bool,
    values: BTreeMap<String, String>,
    violations: Vec<FieldViolation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acknowledgement: Option<String>,
}

pub fn validate(ctx: &Context<'_>, args: ValidateArgs) -> Result<()> {
    let settings = ctx.config.page_settings(None);
    let mut page = Page::contact_page(settings).with_context(|| "build contact page")?;

    let opener = page.controls().open_button;
    page.doc_mut().focus(opener);
    page.handle(PageEvent::Click(opener));

    for (name, value) in args.values() {
        let element = page
            .form()
            .field(name)
            .map(|field| field.element)
            .with_context(|| format!("contact form has no {name} field"))?;
        page.handle(PageEvent::Input { element, value });
    }

    let values: BTreeMap<String, String> = page
        .form()
        .fields()
        .iter()
        .map(|field| (field.name.clone(), field.value.clone()))
        .collect();

    let mut output = ValidateOutput {
        valid: false,
        values,
        violations: Vec::new(),
        acknowledgement: None,
    };
    for effect in page.handle(PageEvent::Submit) {
        debug!(?effect, "page effect");
        match effect {
            PageEffect::Rejected(report) => output.violations = report.violations,
            PageEffect::Acknowledged(message) => {
                output.valid = true;
                output.acknowledgement = Some(message);
            }
            PageEffect::DialogOpened | PageEffect::DialogClosed(_) => {}
        }
    }

    if ctx.json {
        print_json(&output)?;
    } else if let Some(message) = &output.acknowledgement {
        println!("{message}");
    } else {
        for violation in &output.violations {
            println!("{}: {}", violation.error_id, violation.message);
        }
    }

    if output.valid {
        Ok(())
    } else {
        let count = output.violations.len();
        let noun = if count == 1 { "field" } else { "fields" };
        Err(invalid_input(format!("{count} {noun} failed validation")))
    }
}
