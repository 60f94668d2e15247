use tracing::{error, warn};

use crate::catalog::CatalogHandle;
use crate::db::Product;
use crate::status::Notice;
use crate::utils;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditField {
    NewName,
    NewPrice,
}

impl EditField {
    pub fn toggle(self) -> Self {
        match self {
            EditField::NewName => EditField::NewPrice,
            EditField::NewPrice => EditField::NewName,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Validation failed; the dialog keeps its input.
    Stay,
    Close,
}

/// Modal "Product Edition" popup for one selected row.
#[derive(Debug)]
pub struct EditDialog {
    current: Product,
    pub new_name: String,
    pub new_price: String,
    pub focus: EditField,
}

impl EditDialog {
    pub fn new(current: Product) -> Self {
        Self {
            current,
            new_name: String::new(),
            new_price: String::new(),
            focus: EditField::NewName,
        }
    }

    pub fn current(&self) -> &Product {
        &self.current
    }

    pub fn focused_input(&mut self) -> &mut String {
        match self.focus {
            EditField::NewName => &mut self.new_name,
            EditField::NewPrice => &mut self.new_price,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.toggle();
    }

    /// Validates the inputs and pushes the update through `handle`.
    pub fn submit(&mut self, handle: &mut dyn CatalogHandle) -> DialogOutcome {
        if utils::parse_price(&self.new_price).is_none() {
            warn!(input = %self.new_price, "edit rejected: invalid price");
            handle.show_message(Notice::error("Invalid price format"));
            self.focus = EditField::NewPrice;
            return DialogOutcome::Stay;
        }
        if !utils::is_present(&self.new_name) {
            warn!("edit rejected: new name missing");
            handle.show_message(Notice::error("New name is required"));
            self.focus = EditField::NewName;
            return DialogOutcome::Stay;
        }

        let new_price = self.new_price.trim();
        let notice = match handle.submit_update(&self.current, &self.new_name, new_price) {
            Ok(changed) if changed > 0 => Notice::success("Product successfully updated"),
            Ok(_) => {
                warn!(name = %self.current.name, "update matched no rows");
                Notice::error("Error updating product")
            }
            Err(e) => {
                error!(error = %e, name = %self.current.name, "failed to update product");
                Notice::error("Error updating product")
            }
        };

        handle.refresh();
        handle.show_message(notice);
        DialogOutcome::Close
    }
}
