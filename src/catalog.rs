use std::time::Duration;
use tracing::{error, info, warn};

use crate::db::{Product, Store};
use crate::error::DbResult;
use crate::status::{Notice, StatusLine};
use crate::utils;

/// Operations the edit dialog may call back into.
///
/// The dialog gets this instead of a reference to the whole main window.
pub trait CatalogHandle {
    fn submit_update(
        &mut self,
        current: &Product,
        new_name: &str,
        new_price: &str,
    ) -> DbResult<usize>;
    fn refresh(&mut self);
    fn show_message(&mut self, notice: Notice);
}

/// Contents of the "Register a New Product" form.
#[derive(Clone, Debug, Default)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
}

impl ProductForm {
    pub fn clear(&mut self) {
        self.name.clear();
        self.price.clear();
    }
}

/// Main window model: the product list, the add form and the status line.
pub struct Catalog {
    store: Store,
    products: Vec<Product>,
    pub form: ProductForm,
    pub status: StatusLine,
}

impl Catalog {
    /// Builds the model and loads the initial list.
    pub fn new(store: Store, message_ttl: Duration) -> Self {
        let mut catalog = Self {
            store,
            products: Vec::new(),
            form: ProductForm::default(),
            status: StatusLine::new(message_ttl),
        };
        catalog.refresh();
        catalog
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product_at(&self, index: Option<usize>) -> Option<&Product> {
        index.and_then(|i| self.products.get(i))
    }

    /// Reloads every row, sorted by name.
    pub fn refresh(&mut self) {
        self.products.clear();
        match self.store.list_products() {
            Ok(products) => self.products = products,
            Err(e) => {
                error!(error = %e, "failed to fetch products");
                self.status.show(Notice::error("Error fetching products"));
            }
        }
    }

    /// Saves the form as a new product. Returns true when a row was inserted.
    pub fn add_product(&mut self) -> bool {
        if !utils::is_present(&self.form.name) || !utils::is_present(&self.form.price) {
            warn!("add rejected: name or price missing");
            self.status.show(Notice::error("Name and price is required"));
            return false;
        }

        match self.store.insert_product(&self.form.name, &self.form.price) {
            Ok(_) => {
                info!(name = %self.form.name, price = %self.form.price, "product added");
                self.status.show(Notice::success(format!(
                    "{} product successfully added",
                    self.form.name
                )));
                self.form.clear();
                self.refresh();
                true
            }
            Err(e) => {
                error!(error = %e, "failed to add product");
                self.status.show(Notice::error("Error adding product"));
                false
            }
        }
    }

    /// Deletes every product named like the selected row.
    pub fn delete_product(&mut self, selected: Option<usize>) -> bool {
        let Some(name) = self.product_at(selected).map(|p| p.name.clone()) else {
            self.status.show(Notice::error("Please select a product"));
            return false;
        };

        match self.store.delete_by_name(&name) {
            Ok(removed) => {
                info!(name = %name, removed, "product deleted");
                self.status.show(Notice::success(format!(
                    "{} product successfully deleted",
                    name
                )));
                self.refresh();
                true
            }
            Err(e) => {
                error!(error = %e, name = %name, "failed to delete product");
                self.status.show(Notice::error("Error deleting product"));
                false
            }
        }
    }
}

impl CatalogHandle for Catalog {
    fn submit_update(
        &mut self,
        current: &Product,
        new_name: &str,
        new_price: &str,
    ) -> DbResult<usize> {
        let changed =
            self.store
                .update_product(&current.name, &current.price, new_name, new_price)?;
        info!(
            old_name = %current.name,
            new_name = %new_name,
            new_price = %new_price,
            changed,
            "product updated"
        );
        Ok(changed)
    }

    fn refresh(&mut self) {
        Catalog::refresh(self);
    }

    fn show_message(&mut self, notice: Notice) {
        self.status.show(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Tone, DEFAULT_TTL};
    use tempfile::TempDir;

    fn temp_catalog() -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("database.db")).unwrap();
        (dir, Catalog::new(store, DEFAULT_TTL))
    }

    fn add(catalog: &mut Catalog, name: &str, price: &str) -> bool {
        catalog.form.name = name.to_string();
        catalog.form.price = price.to_string();
        catalog.add_product()
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.products().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn add_inserts_row_clears_form_and_reports() {
        let (_dir, mut catalog) = temp_catalog();
        assert!(add(&mut catalog, "Widget", "9.99"));

        assert_eq!(catalog.products().len(), 1);
        assert!(catalog.form.name.is_empty());
        assert!(catalog.form.price.is_empty());
        let notice = catalog.status.last().unwrap();
        assert_eq!(notice.text, "Widget product successfully added");
        assert_eq!(notice.tone, Tone::Success);
    }

    #[test]
    fn add_with_missing_field_touches_nothing() {
        let (_dir, mut catalog) = temp_catalog();
        assert!(!add(&mut catalog, "", "9.99"));
        assert!(!add(&mut catalog, "Widget", "  "));

        assert!(catalog.store.list_products().unwrap().is_empty());
        // form keeps what the user typed
        assert_eq!(catalog.form.name, "Widget");
        let notice = catalog.status.last().unwrap();
        assert_eq!(notice.text, "Name and price is required");
        assert_eq!(notice.tone, Tone::Error);
    }

    #[test]
    fn delete_without_selection_changes_nothing() {
        let (_dir, mut catalog) = temp_catalog();
        add(&mut catalog, "Widget", "9.99");

        assert!(!catalog.delete_product(None));
        assert!(!catalog.delete_product(Some(5)));
        assert_eq!(catalog.store.list_products().unwrap().len(), 1);
        assert_eq!(catalog.status.last().unwrap().text, "Please select a product");
    }

    #[test]
    fn delete_removes_all_rows_sharing_the_name() {
        let (_dir, mut catalog) = temp_catalog();
        add(&mut catalog, "Widget", "9.99");
        add(&mut catalog, "Apple", "1.50");
        add(&mut catalog, "Widget", "2.00");
        assert_eq!(names(&catalog), ["Apple", "Widget", "Widget"]);

        assert!(catalog.delete_product(Some(1)));
        assert_eq!(names(&catalog), ["Apple"]);
    }

    #[test]
    fn list_stays_sorted_after_each_mutation() {
        let (_dir, mut catalog) = temp_catalog();
        add(&mut catalog, "Widget", "9.99");
        assert_eq!(names(&catalog), ["Widget"]);
        add(&mut catalog, "Apple", "1.50");
        assert_eq!(names(&catalog), ["Apple", "Widget"]);
        add(&mut catalog, "Mango", "2");
        assert_eq!(names(&catalog), ["Apple", "Mango", "Widget"]);
    }

    #[test]
    fn add_failure_keeps_form_and_reports() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("gone").join("database.db"));
        let mut catalog = Catalog::new(store, DEFAULT_TTL);

        assert!(!add(&mut catalog, "Widget", "9.99"));
        let notice = catalog.status.last().unwrap();
        assert_eq!(notice.text, "Error adding product");
        assert_eq!(notice.tone, Tone::Error);
        assert_eq!(catalog.form.name, "Widget");
        assert_eq!(catalog.form.price, "9.99");
    }

    #[test]
    fn delete_failure_keeps_list_and_reports() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let store = Store::open(data.join("database.db")).unwrap();
        let mut catalog = Catalog::new(store, DEFAULT_TTL);
        add(&mut catalog, "Widget", "9.99");
        std::fs::remove_dir_all(&data).unwrap();

        assert!(!catalog.delete_product(Some(0)));
        let notice = catalog.status.last().unwrap();
        assert_eq!(notice.text, "Error deleting product");
        assert_eq!(notice.tone, Tone::Error);
        assert_eq!(names(&catalog), ["Widget"]);

        // still usable: the next action runs and reports normally
        assert!(!catalog.delete_product(None));
        assert_eq!(catalog.status.last().unwrap().text, "Please select a product");
    }

    #[test]
    fn refresh_failure_clears_list_and_reports() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("gone").join("database.db"));
        let catalog = Catalog::new(store, DEFAULT_TTL);

        assert!(catalog.products().is_empty());
        assert_eq!(catalog.status.last().unwrap().text, "Error fetching products");
    }
}
