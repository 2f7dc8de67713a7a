use crate::args::Command;
use anyhow::{Context, Result};
use consent::domain::{CategoryConsentPatch, ServiceDescriptor};
use consent::signal::{ConsentSignal, DataLayer};
use consent::{ConsentEngine, ServiceDeclaration};
use std::io::Write;
use tracing::debug;

pub(crate) fn run(engine: &ConsentEngine, command: Command, out: &mut impl Write) -> Result<()> {
    debug!(?command, "Running command");

    match command {
        Command::Status { json } => status(engine, json, out)?,
        Command::AcceptAll => {
            engine.accept_all();
            writeln!(out, "All categories granted; overrides cleared")?;
        },
        Command::DisableAll => {
            engine.disable_all();
            writeln!(out, "All categories denied; overrides cleared")?;
        },
        Command::SetCategory { category, state } => {
            let granted = bool::from(state);
            engine.set_category_consent(CategoryConsentPatch::new().set(category, granted));
            writeln!(out, "{category}: {}", describe(granted))?;
        },
        Command::SetService { id, state } => {
            let value = Option::<bool>::from(state);
            engine.set_service_override(&id, value);
            writeln!(out, "{id}: {}", value.map_or("follows category", describe))?;
        },
        Command::Check { id, category, consent_mode } => {
            let descriptor = ServiceDescriptor::new(id.clone(), id, category);
            let handle = engine
                .attach(ServiceDeclaration::new(descriptor.clone()).consent_mode(consent_mode));
            let source = if consent_mode && handle.is_consent_mode_active()? {
                "consent mode"
            } else if engine.service_overrides().get(&descriptor.id).is_some() {
                "override"
            } else {
                "category"
            };
            let verdict = if handle.may_run()? { "may run" } else { "blocked" };
            writeln!(out, "{} ({}): {verdict} by {source}", descriptor.id, descriptor.category)?;
        },
        Command::Signal => {
            let signal = ConsentSignal::from_categories(&engine.category_consents())
                .with_wait_for_update(engine.config().signal.wait_for_update());
            write!(out, "{}", DataLayer::bootstrap_script(&signal)?)?;
        },
    }

    Ok(())
}

fn status(engine: &ConsentEngine, json: bool, out: &mut impl Write) -> Result<()> {
    let snapshot = engine.snapshot();

    if json {
        serde_json::to_writer_pretty(&mut *out, &snapshot).context("Encoding consent record")?;
        writeln!(out)?;
        return Ok(());
    }

    let record = if engine.record_existed_at_startup() { "stored" } else { "not stored" };
    let prompt = if engine.is_prompt_open() { "open" } else { "closed" };
    writeln!(out, "record:  {record}")?;
    writeln!(out, "prompt:  {prompt}")?;

    writeln!(out, "categories:")?;
    for (category, granted) in snapshot.categories.iter() {
        writeln!(out, "  {:<10} {}", category.as_str(), describe(granted))?;
    }

    if !snapshot.overrides.is_empty() {
        writeln!(out, "overrides:")?;
        for (id, value) in snapshot.overrides.iter() {
            writeln!(out, "  {id:<10} {}", value.map_or("follows category", describe))?;
        }
    }

    Ok(())
}

const fn describe(granted: bool) -> &'static str {
    if granted { "granted" } else { "denied" }
}
