//! Product command handlers.

use std::sync::Arc;

use tabled::Tabled;

use sirs_core::{
    BulkOutcome, CategoryFilter, Command as CoreCommand, CommandResult, Controller, EntityId,
    EntityKind, FilterPatch, Product, ProductDraft, ProductField, SavedView, SortDirection,
    StockFilter, Summary, ViewController,
};

use crate::cli::{
    GlobalOpts, ProductFieldArgs, ProductFilterArgs, ProductListArgs, ProductsArgs,
    ProductsCommand, SortArg, StockArg, ViewArg,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
}

impl ProductRow {
    fn new(p: &Product, color: bool) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            brand: p.brand.clone(),
            category: p.category_name().to_owned(),
            price: p.price.clone(),
            stock: output::paint_stock(&p.stock, p.stock_level(), color),
        }
    }
}

fn detail(p: &Product) -> String {
    let mut lines = vec![
        format!("ID:          {}", p.id),
        format!("Name:        {}", p.name),
        format!("Brand:       {}", util::or_dash(Some(&p.brand))),
        format!("Category:    {}", util::or_dash(Some(p.category_name()))),
        format!("Price:       {}", p.price),
        format!("Stock:       {} ({})", p.stock, p.stock_level()),
    ];
    if let Some(ref code) = p.model_code {
        lines.push(format!("Model code:  {code}"));
    }
    if let Some(ref code) = p.warranty_code {
        lines.push(format!("Warranty:    {code}"));
    }
    if let Some(ref price) = p.price_list {
        lines.push(format!("List price:  {price}"));
    }
    if let Some(ref price) = p.price_cash {
        lines.push(format!("Cash price:  {price}"));
    }
    if let Some(ref tag) = p.campaign_tag {
        lines.push(format!("Campaign:    {tag}"));
    }
    if !p.description.is_empty() {
        lines.push(format!("\n{}", p.description));
    }
    lines.join("\n")
}

fn summary_detail(s: &Summary) -> String {
    [
        format!("Products:      {}", s.total),
        format!("Matching:      {}", s.filtered),
        format!("In stock:      {}", s.in_stock),
        format!("Low stock:     {}", s.low_stock),
        format!("Out of stock:  {}", s.out_of_stock),
        format!("Stock value:   {:.2}", s.inventory_value),
    ]
    .join("\n")
}

// ── Arg translation ─────────────────────────────────────────────────

fn stock_filter(arg: StockArg) -> StockFilter {
    match arg {
        StockArg::All => StockFilter::All,
        StockArg::InStock => StockFilter::InStock,
        StockArg::OutOfStock => StockFilter::OutOfStock,
        StockArg::LowStock => StockFilter::LowStock,
    }
}

fn sort_field(arg: SortArg) -> ProductField {
    match arg {
        SortArg::Id => ProductField::Id,
        SortArg::Name => ProductField::Name,
        SortArg::Brand => ProductField::Brand,
        SortArg::Category => ProductField::Category,
        SortArg::Price => ProductField::Price,
        SortArg::Stock => ProductField::Stock,
    }
}

fn saved_view(arg: ViewArg) -> SavedView {
    match arg {
        ViewArg::LowStock => SavedView::LowStock,
        ViewArg::OutOfStock => SavedView::OutOfStock,
        ViewArg::Recent => SavedView::Recent,
    }
}

fn filter_patch(args: &ProductFilterArgs) -> FilterPatch {
    FilterPatch {
        search: args.search.clone(),
        category: args
            .category
            .map(|id| CategoryFilter::Only(EntityId::new(id))),
        min_price: args.min_price.clone(),
        max_price: args.max_price.clone(),
        stock: args.stock.map(stock_filter),
    }
}

fn draft(args: ProductFieldArgs) -> ProductDraft {
    ProductDraft {
        name: args.name,
        brand: args.brand,
        description: args.description,
        price: args.price,
        stock: args.stock,
        category: args.category.map(EntityId::new),
        model_code: args.model_code,
        campaign_tag: args.campaign_tag,
    }
}

/// Drive the view-state controller the way the dashboard does: saved view
/// first, then filter flags, sort, page.
fn build_view(
    entities: Arc<Vec<Arc<Product>>>,
    args: &ProductListArgs,
    page_size: usize,
) -> ViewController {
    let mut view = ViewController::new(args.page_size.unwrap_or(page_size));
    view.replace_entities(entities);

    if let Some(v) = args.view {
        view.apply_saved_view(saved_view(v));
    }

    let patch = filter_patch(&args.filter);
    if patch != FilterPatch::default() {
        view.apply_filter(patch);
    }

    if args.sort.is_some() || args.desc {
        let field = args.sort.map_or(view.sort().field, sort_field);
        if view.sort().field != field {
            view.apply_sort(field);
        }
        let want = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        if view.sort().direction != want {
            view.apply_sort(field);
        }
    }

    view.set_page(args.page);
    view
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ProductsArgs,
    global: &GlobalOpts,
    page_size: usize,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ProductsCommand::List(list) => {
            util::fetch(controller, EntityKind::Products, global.quiet).await?;
            let view = build_view(controller.store().products_snapshot(), &list, page_size);
            let derived = view.derived();

            let out = output::render_list(
                &global.output,
                &derived.rows,
                |p| ProductRow::new(p, color),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            output::print_page_footer(
                &global.output,
                derived.page,
                derived.total_pages,
                derived.filtered.len(),
                global.quiet,
            );
            Ok(())
        }

        ProductsCommand::Stats(filter) => {
            util::fetch(controller, EntityKind::Products, global.quiet).await?;
            let mut view = ViewController::new(page_size);
            view.replace_entities(controller.store().products_snapshot());
            view.apply_filter(filter_patch(&filter));

            let summary = view.derived().summary;
            let out = output::render_single(&global.output, &summary, summary_detail, |s| {
                s.total.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let product = controller.product(EntityId::new(id)).await?;
            let out = output::render_single(&global.output, &product, detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Create(fields) => {
            let result = controller
                .execute(CoreCommand::CreateProduct(draft(fields)))
                .await?;
            if let CommandResult::Product(p) = result {
                if !global.quiet {
                    eprintln!("Product {} created", p.id);
                }
                let out = output::render_single(&global.output, &p, |p| detail(p), |p| {
                    p.id.to_string()
                });
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        ProductsCommand::Update { id, fields } => {
            let result = controller
                .execute(CoreCommand::UpdateProduct {
                    id: EntityId::new(id),
                    draft: draft(fields),
                })
                .await?;
            if let CommandResult::Product(p) = result {
                if !global.quiet {
                    eprintln!("Product {} updated", p.id);
                }
            }
            Ok(())
        }

        ProductsCommand::Delete { ids } => {
            let ids: Vec<EntityId> = ids.into_iter().map(EntityId::new).collect();
            let prompt = match ids.as_slice() {
                [one] => format!("Delete product {one}?"),
                many => format!("Delete {} products?", many.len()),
            };
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            if let [id] = ids.as_slice() {
                controller
                    .execute(CoreCommand::DeleteProduct { id: *id })
                    .await?;
                if !global.quiet {
                    eprintln!("Product {id} deleted");
                }
                return Ok(());
            }

            match controller.execute(CoreCommand::DeleteProducts { ids }).await? {
                CommandResult::Bulk(outcome) => report_bulk(&outcome, global),
                _ => Ok(()),
            }
        }
    }
}

fn report_bulk(outcome: &BulkOutcome, global: &GlobalOpts) -> Result<(), CliError> {
    if !matches!(global.output, crate::cli::OutputFormat::Table) {
        let out = output::render_single(&global.output, outcome, |_| String::new(), |o| {
            o.succeeded
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        });
        output::print_output(&out, global.quiet);
    } else if !global.quiet {
        for id in &outcome.succeeded {
            eprintln!("✓ deleted {id}");
        }
        for failure in &outcome.failed {
            eprintln!("✗ {}: {}", failure.id, failure.reason);
        }
    }

    if outcome.is_complete() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            failed: outcome.failed.len(),
            total: outcome.total(),
        })
    }
}
