//! Quote cart commands.

use anyhow::{bail, Context as _, Result};
use chrono::NaiveDate;
use cotizador_cache::{Backend, FileBackend};
use cotizador_commerce::prelude::*;
use dialoguer::{Confirm, Input, Select};

use super::{QuoteArgs, QuoteCommand, SubmitArgs};
use crate::context::Context;
use crate::output::{format_days, urgency_badge, Output};

/// Run the quote command.
pub fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    match args.command {
        QuoteCommand::Add { id, quantity } => add_item(&mut store, &id, quantity, ctx),
        QuoteCommand::Remove { id } => remove_item(&mut store, &id, ctx),
        QuoteCommand::Quantity { id, quantity } => {
            update_quantity(&mut store, &id, quantity, ctx)
        }
        QuoteCommand::Notes { id, text } => update_notes(&mut store, &id, text, ctx),
        QuoteCommand::Urgency { id, urgency } => update_urgency(&mut store, &id, &urgency, ctx),
        QuoteCommand::Show => show_quote(&store, ctx),
        QuoteCommand::Clear { yes } => clear_quote(&mut store, yes, ctx),
        QuoteCommand::Submit(args) => submit_quote(&mut store, args, ctx),
    }
}

type Store = QuoteStore<FileBackend>;

fn parse_id(id: &str) -> Result<ProductId> {
    id.parse()
        .with_context(|| format!("Invalid product ID: {}", id))
}

fn add_item(store: &mut Store, id: &str, quantity: u32, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog()?;
    let product = catalog
        .find_by_id(parse_id(id)?)
        .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;

    if !product.available_for_quote {
        bail!("{} ({}) is not available for quote", product.name, product.sku);
    }

    store.add_item(product, quantity);
    save_or_warn(store, &ctx.output);
    let line = store.get(product.id).map(|i| i.quantity).unwrap_or(quantity);

    ctx.output.success(&format!(
        "Added {} x {} ({} in quote)",
        quantity, product.sku, line
    ));
    if product.is_on_order() {
        ctx.output.info(&format!(
            "Made to order, estimated delivery {}",
            format_days(product.estimated_delivery_days)
        ));
    }
    print_summary(store, ctx);
    Ok(())
}

fn remove_item(store: &mut Store, id: &str, ctx: &Context) -> Result<()> {
    if store.remove_item(parse_id(id)?) {
        save_or_warn(store, &ctx.output);
        ctx.output.success(&format!("Removed product {} from the quote", id));
    } else {
        ctx.output.warn(&format!("Product {} is not in the quote", id));
    }
    print_summary(store, ctx);
    Ok(())
}

fn update_quantity(store: &mut Store, id: &str, quantity: u32, ctx: &Context) -> Result<()> {
    let product_id = parse_id(id)?;
    if !store.contains(product_id) {
        ctx.output.warn(&format!("Product {} is not in the quote", id));
    } else if quantity < 1 {
        ctx.output.warn("Quantity must be at least 1, leaving it unchanged");
    } else if store.update_quantity(product_id, quantity) {
        save_or_warn(store, &ctx.output);
        ctx.output.success(&format!("Quantity for product {} set to {}", id, quantity));
    } else {
        ctx.output.debug("Quantity unchanged");
    }
    print_summary(store, ctx);
    Ok(())
}

fn update_notes(store: &mut Store, id: &str, text: String, ctx: &Context) -> Result<()> {
    let product_id = parse_id(id)?;
    if !store.contains(product_id) {
        ctx.output.warn(&format!("Product {} is not in the quote", id));
    } else if store.update_notes(product_id, text) {
        save_or_warn(store, &ctx.output);
        ctx.output.success(&format!("Notes updated for product {}", id));
    } else {
        ctx.output.debug("Notes unchanged");
    }
    Ok(())
}

fn update_urgency(store: &mut Store, id: &str, urgency: &str, ctx: &Context) -> Result<()> {
    let product_id = parse_id(id)?;
    let urgency: Urgency = urgency.parse()?;
    if !store.contains(product_id) {
        ctx.output.warn(&format!("Product {} is not in the quote", id));
    } else if store.update_urgency(product_id, urgency) {
        save_or_warn(store, &ctx.output);
        ctx.output.success(&format!(
            "Product {} marked {}",
            id,
            urgency.display_name().to_lowercase()
        ));
    } else {
        ctx.output.debug("Urgency unchanged");
    }
    Ok(())
}

fn show_quote(store: &Store, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "summary": store.summary(),
            "items": store.items(),
        }));
        return Ok(());
    }

    ctx.output.header("Cotización");
    if store.is_empty() {
        ctx.output.info("The quote is empty. Add products with `cotizador quote add <ID>`.");
        return Ok(());
    }

    let widths = [4, 20, 36, 8];
    ctx.output
        .table_row(&["ID", "SKU", "Producto", "Cantidad"], &widths);
    for item in store.items() {
        let id = item.product_id().to_string();
        let quantity = item.quantity.to_string();
        ctx.output.table_row(
            &[
                id.as_str(),
                item.product.sku.as_str(),
                item.product.name.as_str(),
                quantity.as_str(),
            ],
            &widths,
        );
        if item.is_urgent() {
            ctx.output.kv("urgencia", &urgency_badge(item.urgency));
        }
        if !item.notes.is_empty() {
            ctx.output.kv("notas", &item.notes);
        }
    }

    print_summary(store, ctx);
    Ok(())
}

fn clear_quote(store: &mut Store, yes: bool, ctx: &Context) -> Result<()> {
    if store.is_empty() {
        ctx.output.info("The quote is already empty");
        return Ok(());
    }

    if !yes {
        if ctx.output.is_json() || !console::user_attended() {
            bail!("Refusing to clear the quote without confirmation. Use --yes.");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} lines from the quote?", store.item_count()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    store.clear_quote();
    save_or_warn(store, &ctx.output);
    ctx.output.success("Quote cleared");
    Ok(())
}

fn submit_quote(store: &mut Store, args: SubmitArgs, ctx: &Context) -> Result<()> {
    let mut flow = QuoteFlow::new();
    flow.advance(store)?;

    let interactive = !args.no_input && !ctx.output.is_json() && console::user_attended();
    if interactive {
        ctx.output.header("Datos de contacto");
    }

    let client = ClientInfo {
        name: required("Nombre", args.name, interactive)?,
        company: required("Empresa", args.company, interactive)?,
        tax_id: optional("RUT", args.rut, interactive)?,
        position: optional("Cargo", args.position, interactive)?,
        email: required("Email", args.email, interactive)?,
        phone: required("Teléfono", args.phone, interactive)?,
    };

    let delivery = DeliveryInfo {
        address: required("Dirección de entrega", args.address, interactive)?,
        city: required("Ciudad", args.city, interactive)?,
        region: region(args.region, interactive)?,
        requested_date: requested_date(args.date, interactive)?,
    };

    let observations = optional("Observaciones", args.observations, interactive)?;
    let request =
        QuoteRequest::from_store(store, client, delivery).with_observations(observations);

    let confirmation = flow.submit(request)?;

    if ctx.output.is_json() {
        ctx.output.json(confirmation);
    } else {
        ctx.output.success("Quote request sent");
        ctx.output.kv("Referencia", &confirmation.reference.to_string());
        ctx.output
            .kv("Productos", &confirmation.request.items.len().to_string());
        ctx.output
            .kv("Unidades", &confirmation.request.total_units().to_string());
        ctx.output.kv("Email", &confirmation.request.client.email);
        ctx.output
            .info("Our sales team will contact you within 24 business hours.");
    }

    if args.clear {
        store.clear_quote();
        save_or_warn(store, &ctx.output);
        ctx.output.debug("Quote cleared after submission");
    }

    Ok(())
}

/// Use the flag value, or prompt for it. Blank values pass through so
/// validation can report every missing field at once.
fn required(label: &str, value: Option<String>, interactive: bool) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ if interactive => Ok(Input::<String>::new()
            .with_prompt(label)
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() {
                    Err("required")
                } else {
                    Ok(())
                }
            })
            .interact_text()?),
        value => Ok(value.unwrap_or_default()),
    }
}

fn optional(label: &str, value: Option<String>, interactive: bool) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None if interactive => Ok(Input::<String>::new()
            .with_prompt(format!("{} (opcional)", label))
            .allow_empty(true)
            .interact_text()?),
        None => Ok(String::new()),
    }
}

fn region(value: Option<String>, interactive: bool) -> Result<Option<Region>> {
    match value {
        Some(code) => Ok(Some(code.parse()?)),
        None if interactive => {
            let names: Vec<String> = Region::ALL.iter().map(Region::to_string).collect();
            let selected = Select::new()
                .with_prompt("Región")
                .items(&names)
                .default(5)
                .interact()?;
            Ok(Region::ALL.get(selected).copied())
        }
        None => Ok(None),
    }
}

fn requested_date(value: Option<NaiveDate>, interactive: bool) -> Result<Option<NaiveDate>> {
    if value.is_some() || !interactive {
        return Ok(value);
    }
    let input: String = Input::new()
        .with_prompt("Fecha requerida (AAAA-MM-DD, opcional)")
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            if input.trim().is_empty() {
                return Ok(());
            }
            NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    if input.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")?))
}

/// Each command is its own session, so a change that fails to reach disk is
/// lost on exit. Returns whether the cart was saved.
fn save_or_warn<B: Backend>(store: &QuoteStore<B>, output: &Output) -> bool {
    match store.save() {
        Ok(()) => true,
        Err(e) => {
            output.warn(&format!(
                "The quote could not be saved ({}); this change will be lost",
                e
            ));
            false
        }
    }
}

fn print_summary(store: &Store, ctx: &Context) {
    let summary = store.summary();
    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return;
    }
    let mut line = format!(
        "{} productos, {} unidades",
        summary.item_count, summary.total_items
    );
    if summary.urgent_count > 0 {
        line.push_str(&format!(", {} urgentes", summary.urgent_count));
    }
    ctx.output.info(&line);
}
