use clap::Parser;
use colored::*;
use inquire::{Confirm, Select, Text};
use std::process;
use tabled::{settings::Style, Table, Tabled};
use tracing::error;

use prodcat::catalog::Catalog;
use prodcat::cli::{Cli, Commands};
use prodcat::config::AppConfig;
use prodcat::db::{Product, Store};
use prodcat::dialog::{DialogOutcome, EditDialog};
use prodcat::status::Tone;
use prodcat::{logging, tui};

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    // The UI keeps working without a log file.
    let _guard = logging::init(&config.log_dir)
        .map_err(|e| eprintln!("Logging disabled: {:#}", e))
        .ok();

    let store = Store::open(&config.db_path).unwrap_or_else(|e| {
        error!(error = %e, "failed to open database");
        eprintln!("Failed to initialize database: {}", e);
        process::exit(1);
    });
    let mut catalog = Catalog::new(store, config.message_ttl);

    let res = match cli.command {
        None | Some(Commands::Tui) => tui::run_tui(catalog),
        Some(Commands::Add { name, price }) => {
            add(&mut catalog, name, price);
            Ok(())
        }
        Some(Commands::List) => {
            print_products(catalog.products());
            Ok(())
        }
        Some(Commands::Remove { name }) => {
            remove(&mut catalog, name);
            Ok(())
        }
        Some(Commands::Edit { name }) => {
            edit(&mut catalog, name);
            Ok(())
        }
    };

    if let Err(e) = res {
        error!(error = %e, "command failed");
        eprintln!("{}", format!("Error: {:#}", e).red());
        process::exit(1);
    }
}

fn print_notice(catalog: &Catalog) {
    if let Some(notice) = catalog.status.last() {
        match notice.tone {
            Tone::Success => println!("{}", notice.text.green()),
            Tone::Error => println!("{}", notice.text.red()),
        }
    }
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("{}", "No products yet.".bright_black());
        return;
    }
    let rows = products.iter().map(|p| ProductRow {
        name: p.name.clone(),
        price: p.price.clone(),
    });
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn add(catalog: &mut Catalog, name: Option<String>, price: Option<String>) {
    let name = name.or_else(|| Text::new("Name:").prompt().ok());
    let price = price.or_else(|| Text::new("Price:").prompt().ok());
    let (Some(name), Some(price)) = (name, price) else {
        return;
    };

    catalog.form.name = name;
    catalog.form.price = price;
    catalog.add_product();
    print_notice(catalog);
}

/// Index of the product to act on; prompts when `name` is missing or ambiguous.
fn choose_product(catalog: &Catalog, name: Option<String>) -> Option<usize> {
    let candidates: Vec<usize> = catalog
        .products()
        .iter()
        .enumerate()
        .filter(|(_, p)| name.as_ref().map_or(true, |n| &p.name == n))
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [] => {
            match name {
                Some(n) => println!("{}", format!("No product named '{}'.", n).red()),
                None => println!("{}", "No products available.".red()),
            }
            None
        }
        [only] if name.is_some() => Some(*only),
        _ => {
            let options: Vec<String> = candidates
                .iter()
                .map(|&i| {
                    let p = &catalog.products()[i];
                    format!("{} ({})", p.name, p.price)
                })
                .collect();
            let chosen = Select::new("Select a product:", options).raw_prompt().ok()?;
            Some(candidates[chosen.index])
        }
    }
}

fn remove(catalog: &mut Catalog, name: Option<String>) {
    let Some(index) = choose_product(catalog, name) else {
        return;
    };
    let target = &catalog.products()[index].name;
    let confirmed = Confirm::new(&format!("Remove every product named '{}'?", target))
        .with_default(false)
        .prompt()
        .unwrap_or(false);
    if confirmed {
        catalog.delete_product(Some(index));
        print_notice(catalog);
    }
}

fn edit(catalog: &mut Catalog, name: Option<String>) {
    let Some(index) = choose_product(catalog, name) else {
        return;
    };
    let current = catalog.products()[index].clone();
    println!("Current name: {}  Current price: {}", current.name.bold(), current.price.bold());

    let mut dialog = EditDialog::new(current);
    loop {
        let Ok(new_name) = Text::new("New name:").with_initial_value(&dialog.new_name).prompt() else {
            return;
        };
        let Ok(new_price) = Text::new("New price:").with_initial_value(&dialog.new_price).prompt() else {
            return;
        };
        dialog.new_name = new_name;
        dialog.new_price = new_price;

        let outcome = dialog.submit(catalog);
        print_notice(catalog);
        if outcome == DialogOutcome::Close {
            return;
        }
    }
}
