//! Catalog browsing commands.

use anyhow::{Context as _, Result};
use cotizador_cache::{Backend, FileBackend};
use cotizador_commerce::prelude::*;

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::{availability_badge, format_days};

const LIST_WIDTHS: [usize; 5] = [4, 20, 40, 12, 14];

const IN_QUOTE_LABEL: &str = "en cotización";

/// Run the catalog command.
pub fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.load_catalog()?;

    match args.command {
        CatalogCommand::List {
            search,
            category,
            availability,
        } => list_products(&catalog, open_quote(ctx).as_ref(), search, category, availability, ctx),
        CatalogCommand::Show { id } => show_product(&catalog, open_quote(ctx).as_ref(), &id, ctx),
        CatalogCommand::Categories => list_categories(&catalog, ctx),
    }
}

/// The quote cart, for marking products already in it. Catalog browsing
/// still works when the cart cannot be opened.
fn open_quote(ctx: &Context) -> Option<QuoteStore<FileBackend>> {
    match ctx.open_store() {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::debug!(error = %format!("{:#}", e), "quote cart unavailable");
            None
        }
    }
}

fn in_quote_label<B: Backend>(store: Option<&QuoteStore<B>>, id: ProductId) -> &'static str {
    match store {
        Some(store) if store.contains(id) => IN_QUOTE_LABEL,
        _ => "",
    }
}

fn list_products(
    catalog: &Catalog,
    store: Option<&QuoteStore<FileBackend>>,
    search: Option<String>,
    category: Option<String>,
    availability: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let mut query = CatalogQuery::new();
    if let Some(text) = search {
        query = query.with_text(text);
    }
    if let Some(slug) = category {
        if catalog.find_by_slug(&slug).is_none() {
            ctx.output
                .warn(&format!("Unknown category '{}', showing all categories", slug));
        }
        query = query.with_category(slug);
    }
    if let Some(mode) = availability {
        query = query.with_availability(mode.parse()?);
    }

    let results = query.execute(catalog);

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    ctx.output.header(&format!(
        "Productos ({} de {})",
        results.len(),
        catalog.products().len()
    ));

    if results.is_empty() {
        ctx.output.info("No products match the current filters.");
        return Ok(());
    }

    ctx.output
        .table_row(&["ID", "SKU", "Nombre", "Disponibilidad", "Cotización"], &LIST_WIDTHS);
    for product in results {
        let id = product.id.to_string();
        ctx.output.table_row(
            &[
                id.as_str(),
                product.sku.as_str(),
                product.name.as_str(),
                product.availability_label(),
                in_quote_label(store, product.id),
            ],
            &LIST_WIDTHS,
        );
    }

    Ok(())
}

fn show_product(
    catalog: &Catalog,
    store: Option<&QuoteStore<FileBackend>>,
    id: &str,
    ctx: &Context,
) -> Result<()> {
    let product_id: ProductId = id
        .parse()
        .with_context(|| format!("Invalid product ID: {}", id))?;
    let product = catalog
        .find_by_id(product_id)
        .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;

    if ctx.output.is_json() {
        ctx.output.json(product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("SKU", &product.sku);
    ctx.output.kv("Categoría", &product.category_name);
    ctx.output.kv("Disponibilidad", &availability_badge(product));
    ctx.output
        .kv("Entrega estimada", &format_days(product.estimated_delivery_days));
    if let Some(item) = store.and_then(|s| s.get(product.id)) {
        ctx.output.kv(
            "Cotización",
            &format!("{} ({} unidades)", IN_QUOTE_LABEL, item.quantity),
        );
    }
    if !product.available_for_quote {
        ctx.output.warn("This product is not currently available for quote");
    }

    if !product.description.is_empty() {
        ctx.output.info("");
        ctx.output.info(&product.description);
    }

    if !product.technical_specs.is_empty() {
        ctx.output.header("Especificaciones técnicas");
        for (label, value) in product.technical_specs.iter() {
            ctx.output.kv(label, value);
        }
    }

    if !product.compatible_models.is_empty() {
        ctx.output.header("Modelos compatibles");
        for model in &product.compatible_models {
            ctx.output.list_item(model);
        }
    }

    Ok(())
}

fn list_categories(catalog: &Catalog, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&catalog.categories());
        return Ok(());
    }

    ctx.output.header("Categorías");
    let widths = [4, 20, 30, 10];
    ctx.output
        .table_row(&["ID", "Slug", "Nombre", "Productos"], &widths);
    for category in catalog.categories() {
        let id = category.id.to_string();
        let count = category.product_count.to_string();
        ctx.output.table_row(
            &[id.as_str(), category.slug.as_str(), category.name.as_str(), count.as_str()],
            &widths,
        );
    }

    Ok(())
}
