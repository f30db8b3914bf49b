//! Categories command implementation.

use crate::output::Formatter;
use biofacts_domain::default_categories;

/// Execute the categories command.
pub fn execute_categories(formatter: &Formatter) {
    let categories = default_categories();
    println!("{}", formatter.categories_table(&categories));
    println!("{}", formatter.info(&format!("{} categories, requested in this order", categories.len())));
}
